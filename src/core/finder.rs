//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//


//! Resolution of the instantiation hierarchy and the top-level entity.

use crate::core::board::Board;
use crate::core::lang::error::ParseError;
use crate::core::lang::verilog::svinst::Svinst;
use crate::core::lang::Language;
use crate::core::source::{by_port_name, Entity, Port, SourceModel, UserPort};
use crate::util::graph::{EdgeStatus, Graph, NodeIndex};
use serde_derive::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    Parse(ParseError),
    #[error("{} files have problems", .0.len())]
    Files(Vec<ParseError>),
    #[error("{0} {1} is duplicated")]
    Duplicate(&'static str, String),
    #[error("no {0} found")]
    Empty(&'static str),
    #[error("circular reference between {0} instantiations")]
    Circular(&'static str),
}

/// One line of the flattened instantiation hierarchy.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HierarchyItem {
    level: usize,
    name: String,
    source_file: String,
    is_top: bool,
}

impl HierarchyItem {
    pub fn get_level(&self) -> usize {
        self.level
    }

    /// References the case-folded entity name.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_source_file(&self) -> &str {
        &self.source_file
    }

    pub fn is_top(&self) -> bool {
        self.is_top
    }
}

#[derive(Debug)]
pub struct TopEntityFinder {
    lang: Language,
    graph: Graph<Entity>,
    lookup: HashMap<String, NodeIndex>,
    ports: HashMap<String, Vec<Port>>,
    top: String,
    top_ports: Vec<Port>,
    user_ports: Vec<UserPort>,
    suggested: String,
    list_items: Vec<HierarchyItem>,
}

impl TopEntityFinder {
    /// Parses every file of `files` and resolves the hierarchy of the
    /// declared entities.
    ///
    /// Any file that fails to parse aborts the resolution.
    pub fn new(files: &[PathBuf], lang: Language, tool: Option<&Svinst>) -> Result<Self, ResolveError> {
        let mut models = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        for file in files {
            match lang.parse(file, tool) {
                Ok(m) => models.push(m),
                Err(e) => {
                    log::warn!("{}", e);
                    errors.push(e);
                }
            }
        }
        match errors.len() {
            0 => Self::from_models(lang, models),
            1 => Err(ResolveError::Parse(errors.remove(0))),
            _ => Err(ResolveError::Files(errors)),
        }
    }

    /// Resolves the hierarchy from already parsed models, given in file order.
    pub fn from_models(lang: Language, models: Vec<SourceModel>) -> Result<Self, ResolveError> {
        let term = lang.unit_term();
        let mut graph: Graph<Entity> = Graph::new();
        let mut lookup: HashMap<String, NodeIndex> = HashMap::new();
        let mut ports: HashMap<String, Vec<Port>> = HashMap::new();
        let mut components = Vec::new();

        for model in models {
            let (entities, comps, model_ports) = model.into_parts();
            for entity in entities {
                if lookup.contains_key(entity.get_name()) == true {
                    return Err(ResolveError::Duplicate(term, entity.get_original_name().to_string()));
                }
                let entity_ports = model_ports.get(entity.get_name()).cloned().unwrap_or_default();
                // entities without ports are testbenches
                if entity_ports.is_empty() == true {
                    log::debug!("skipping {} {} without ports", term, entity.get_original_name());
                    continue;
                }
                log::debug!(
                    "registered {} {} from {}",
                    term,
                    entity.get_original_name(),
                    entity.get_source_file()
                );
                ports.insert(entity.get_name().to_string(), entity_ports);
                let key = entity.get_name().to_string();
                lookup.insert(key, graph.add_node(entity));
            }
            components.extend(comps);
        }

        for comp in &components {
            match (lookup.get(comp.get_parent()), lookup.get(comp.get_name())) {
                (Some(parent), Some(child)) => {
                    if graph.add_edge(*parent, *child) == EdgeStatus::AlreadyExists {
                        log::debug!("ignoring repeated instance of {} in {}", comp.get_name(), comp.get_parent());
                    }
                }
                _ => log::debug!(
                    "dropping instance of {} in {}: not a registered {}",
                    comp.get_name(),
                    comp.get_parent(),
                    term
                ),
            }
        }

        if graph.node_count() == 0 {
            return Err(ResolveError::Empty(term));
        }

        let roots = graph.roots();
        if roots.is_empty() == true {
            return Err(ResolveError::Circular(term));
        }
        let mut trees: Vec<Vec<HierarchyItem>> = Vec::with_capacity(roots.len());
        for root in roots {
            let walk = graph
                .depth_first_tree(root)
                .map_err(|_| ResolveError::Circular(term))?;
            trees.push(
                walk.into_iter()
                    .filter_map(|(level, n)| {
                        graph.get_node(n).map(|e| HierarchyItem {
                            level: level,
                            name: e.get_name().to_string(),
                            source_file: e.get_source_file().to_string(),
                            is_top: false,
                        })
                    })
                    .collect(),
            );
        }

        // the largest tree wins; earlier roots win ties
        let mut best = 0;
        for (i, tree) in trees.iter().enumerate() {
            if tree.len() > trees[best].len() {
                best = i;
            }
        }
        let suggested = trees[best][0].name.clone();
        log::debug!("suggesting {} {} as top", term, suggested);

        let mut finder = Self {
            lang: lang,
            graph: graph,
            lookup: lookup,
            ports: ports,
            top: String::new(),
            top_ports: Vec::new(),
            user_ports: Vec::new(),
            suggested: suggested.clone(),
            list_items: trees.into_iter().flatten().collect(),
        };
        finder.set_top_entity(&suggested, false);
        Ok(finder)
    }

    /// Selects the entity named `name` as the top and rebuilds its user ports.
    ///
    /// With `preserve`, each new user port takes the assignment of the old
    /// user port with the same name. Returns `false` and changes nothing if no
    /// such entity is registered.
    pub fn set_top_entity(&mut self, name: &str, preserve: bool) -> bool {
        let key = self.lang.fold(name);
        let mut ports = match self.ports.get(&key) {
            Some(p) => p.clone(),
            None => return false,
        };
        ports.sort_by(by_port_name);

        let old: HashMap<String, String> = match preserve {
            true => self
                .user_ports
                .iter()
                .filter(|p| p.is_assigned() == true)
                .map(|p| (p.get_name().to_string(), p.get_assigned().to_string()))
                .collect(),
            false => HashMap::new(),
        };
        self.user_ports = ports
            .iter()
            .flat_map(|p| p.to_vector(&self.lang))
            .map(|mut p| {
                if let Some(signal) = old.get(p.get_name()) {
                    p.assign(signal);
                }
                p
            })
            .collect();
        self.top_ports = ports;
        for item in self.list_items.iter_mut() {
            item.is_top = item.name == key;
        }
        self.top = key;
        true
    }

    /// Binds the user port named `port` to the board signal `signal`.
    ///
    /// Returns `false` if no such user port exists or the board has no target
    /// of that name in the port's direction.
    pub fn assign(&mut self, board: &Board, port: &str, signal: &str) -> bool {
        let lang = self.lang;
        let key = lang.fold(port);
        match self.user_ports.iter_mut().find(|p| lang.fold(p.get_name()) == key) {
            Some(p) => match board.accepts(&lang, signal, p.get_direction()) {
                true => {
                    p.assign(signal);
                    true
                }
                false => false,
            },
            None => false,
        }
    }

    /// Applies `(user port, board signal)` pairs, skipping every pair the
    /// board cannot accept. Returns the number of pairs applied.
    pub fn restore_assignments(&mut self, board: &Board, pairs: &[(String, String)]) -> usize {
        let mut applied = 0;
        for (port, signal) in pairs {
            match self.assign(board, port, signal) {
                true => applied += 1,
                false => log::debug!("not restoring {} => {}", port, signal),
            }
        }
        applied
    }

    pub fn get_language(&self) -> &Language {
        &self.lang
    }

    /// References the case-folded name of the selected top entity.
    pub fn get_top_name(&self) -> &str {
        &self.top
    }

    /// References the selected top entity.
    pub fn get_top_entity(&self) -> Option<&Entity> {
        self.get_entity(&self.top)
    }

    /// References the registered entity named `name`.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.graph.get_node(*self.lookup.get(&self.lang.fold(name))?)
    }

    /// References the case-folded name of the suggested top entity.
    pub fn get_suggested_top_entity(&self) -> &str {
        &self.suggested
    }

    /// References the top entity's ports sorted by name.
    pub fn get_top_ports(&self) -> &Vec<Port> {
        &self.top_ports
    }

    pub fn get_user_ports(&self) -> &Vec<UserPort> {
        &self.user_ports
    }

    pub fn get_user_ports_mut(&mut self) -> &mut Vec<UserPort> {
        &mut self.user_ports
    }

    /// References every tree of the hierarchy, flattened in root order.
    pub fn get_list_items(&self) -> &Vec<HierarchyItem> {
        &self.list_items
    }
}
