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

use crate::core::lang::Language;
use crate::util::anyerror::AnyError;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// A declared design unit.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Entity {
    name: String,
    original_name: String,
    source_file: String,
}

impl Entity {
    pub fn new(lang: &Language, original_name: &str, source_file: &str) -> Self {
        Self {
            name: lang.fold(original_name),
            original_name: original_name.to_string(),
            source_file: source_file.to_string(),
        }
    }

    /// References the case-folded name used as the registry key.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// References the name as it was spelled in the source code.
    pub fn get_original_name(&self) -> &str {
        &self.original_name
    }

    pub fn get_source_file(&self) -> &str {
        &self.source_file
    }
}

/// An instantiation edge: `parent` instantiates `name`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Component {
    name: String,
    parent: String,
}

impl Component {
    pub fn new(name: &str, parent: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.to_string(),
        }
    }

    /// References the case-folded name of the instantiated entity.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// References the case-folded name of the instantiating entity.
    pub fn get_parent(&self) -> &str {
        &self.parent
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "in", alias = "input")]
    Input,
    #[serde(rename = "out", alias = "output")]
    Output,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Input => "in",
                Self::Output => "out",
            }
        )
    }
}

impl std::str::FromStr for Direction {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "in" | "input" => Ok(Self::Input),
            "out" | "output" => Ok(Self::Output),
            _ => Err(AnyError(format!("unknown port direction {:?}", s))),
        }
    }
}

/// Inclusive bit range of a vector port.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Range {
    upper: usize,
    lower: usize,
}

impl Range {
    /// Creates a `[upper:lower]` range, swapping the bounds if given ascending.
    pub fn new(upper: usize, lower: usize) -> Self {
        match upper >= lower {
            true => Self { upper, lower },
            false => Self {
                upper: lower,
                lower: upper,
            },
        }
    }

    /// Creates the range `[width-1:0]`.
    pub fn with_width(width: usize) -> Self {
        Self::new(width.saturating_sub(1), 0)
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    pub fn lower(&self) -> usize {
        self.lower
    }

    pub fn width(&self) -> usize {
        self.upper - self.lower + 1
    }
}

/// A named, directed I/O signal of an entity.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Port {
    name: String,
    original_name: String,
    direction: Direction,
    range: Option<Range>,
}

impl Port {
    /// Creates a port whose `range` is only kept when it spans more than one bit.
    pub fn new(lang: &Language, original_name: &str, direction: Direction, range: Option<Range>) -> Self {
        Self {
            name: lang.fold(original_name),
            original_name: original_name.to_string(),
            direction: direction,
            range: range.filter(|r| r.width() > 1),
        }
    }

    /// Creates a port from a bit-width, where a width of 1 is a scalar.
    pub fn with_width(lang: &Language, original_name: &str, direction: Direction, width: usize) -> Self {
        let range = match width > 1 {
            true => Some(Range::with_width(width)),
            false => None,
        };
        Self::new(lang, original_name, direction, range)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_original_name(&self) -> &str {
        &self.original_name
    }

    pub fn get_direction(&self) -> &Direction {
        &self.direction
    }

    pub fn is_vector(&self) -> bool {
        self.range.is_some()
    }

    pub fn get_range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    pub fn width(&self) -> usize {
        self.range.as_ref().map(|r| r.width()).unwrap_or(1)
    }

    /// Expands the port into one scalar [UserPort] per bit.
    ///
    /// Vectors are expanded from the upper index down to the lower index.
    pub fn to_vector(&self, lang: &Language) -> Vec<UserPort> {
        match &self.range {
            Some(r) => (r.lower()..=r.upper())
                .rev()
                .map(|i| UserPort::new(lang.index(&self.original_name, i), self.direction))
                .collect(),
            None => vec![UserPort::new(self.original_name.clone(), self.direction)],
        }
    }
}

/// Orders ports by their case-folded names.
pub fn by_port_name(a: &Port, b: &Port) -> std::cmp::Ordering {
    a.name.cmp(&b.name)
}

/// A single bit of the top entity's ports available for board assignment.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct UserPort {
    name: String,
    direction: Direction,
    assigned: String,
}

impl UserPort {
    pub fn new(name: String, direction: Direction) -> Self {
        Self {
            name: name,
            direction: direction,
            assigned: String::new(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> &Direction {
        &self.direction
    }

    /// References the board signal bound to this port (empty when unassigned).
    pub fn get_assigned(&self) -> &str {
        &self.assigned
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_empty() == false
    }

    pub fn assign(&mut self, signal: &str) {
        self.assigned = signal.to_string();
    }

    pub fn unassign(&mut self) {
        self.assigned.clear();
    }
}

/// Everything declared in one parsed source file.
#[derive(Debug, PartialEq, Default)]
pub struct SourceModel {
    entities: Vec<Entity>,
    components: Vec<Component>,
    ports: HashMap<String, Vec<Port>>,
}

impl SourceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new entity declaration and gives it an (empty) port list.
    pub fn add_entity(&mut self, entity: Entity) {
        if self.ports.contains_key(entity.get_name()) == false {
            self.ports.insert(entity.get_name().to_string(), Vec::new());
        }
        self.entities.push(entity);
    }

    /// Records an instantiation edge unless the same edge was already seen.
    pub fn add_component(&mut self, comp: Component) -> bool {
        if self.components.contains(&comp) == true {
            return false;
        }
        self.components.push(comp);
        true
    }

    /// Appends a port to the entity named `entity`.
    ///
    /// Ports that appear before any entity declaration are ignored.
    pub fn add_port(&mut self, entity: &str, port: Port) -> bool {
        match self.ports.get_mut(entity) {
            Some(list) => {
                list.push(port);
                true
            }
            None => false,
        }
    }

    pub fn get_entities(&self) -> &Vec<Entity> {
        &self.entities
    }

    pub fn get_components(&self) -> &Vec<Component> {
        &self.components
    }

    /// References the ports declared for `entity`.
    pub fn get_ports(&self, entity: &str) -> Option<&Vec<Port>> {
        self.ports.get(entity)
    }

    /// Consumes the model into its parts.
    pub fn into_parts(self) -> (Vec<Entity>, Vec<Component>, HashMap<String, Vec<Port>>) {
        (self.entities, self.components, self.ports)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vectorize_descending_vhdl() {
        let port = Port::new(&Language::Vhdl, "Data", Direction::Input, Some(Range::new(7, 0)));
        let names: Vec<String> = port
            .to_vector(&Language::Vhdl)
            .iter()
            .map(|p| p.get_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Data(7)", "Data(6)", "Data(5)", "Data(4)", "Data(3)", "Data(2)", "Data(1)", "Data(0)"]
        );
        assert!(port.to_vector(&Language::Vhdl).iter().all(|p| p.get_direction() == &Direction::Input));
    }

    #[test]
    fn vectorize_verilog_offset() {
        let port = Port::new(&Language::Verilog, "q", Direction::Output, Some(Range::new(5, 3)));
        let names: Vec<String> = port
            .to_vector(&Language::Verilog)
            .iter()
            .map(|p| p.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["q[5]", "q[4]", "q[3]"]);
    }

    #[test]
    fn vectorize_scalar() {
        let port = Port::with_width(&Language::Vhdl, "CLK", Direction::Input, 1);
        assert_eq!(port.is_vector(), false);
        let bits = port.to_vector(&Language::Vhdl);
        assert_eq!(bits.len(), 1);
        assert_eq!(bits[0].get_name(), "CLK");
        assert_eq!(bits[0].is_assigned(), false);
        // a single-bit range is still a scalar
        let port = Port::new(&Language::Vhdl, "b", Direction::Input, Some(Range::new(0, 0)));
        assert_eq!(port.is_vector(), false);
    }

    #[test]
    fn port_folding_by_language() {
        let port = Port::with_width(&Language::Vhdl, "LED", Direction::Output, 4);
        assert_eq!(port.get_name(), "led");
        assert_eq!(port.get_original_name(), "LED");
        assert_eq!(port.get_range(), Some(&Range::new(3, 0)));
        let port = Port::with_width(&Language::Verilog, "LED", Direction::Output, 4);
        assert_eq!(port.get_name(), "LED");
    }

    #[test]
    fn sort_by_folded_name() {
        let lang = Language::Vhdl;
        let mut ports = vec![
            Port::with_width(&lang, "b", Direction::Input, 1),
            Port::with_width(&lang, "A", Direction::Input, 1),
            Port::with_width(&lang, "c", Direction::Output, 1),
        ];
        ports.sort_by(by_port_name);
        let names: Vec<&str> = ports.iter().map(|p| p.get_original_name()).collect();
        assert_eq!(names, vec!["A", "b", "c"]);
    }

    #[test]
    fn model_dedups_components() {
        let mut model = SourceModel::new();
        model.add_entity(Entity::new(&Language::Vhdl, "top", "top.vhd"));
        assert_eq!(model.add_component(Component::new("sub", "top")), true);
        assert_eq!(model.add_component(Component::new("sub", "top")), false);
        assert_eq!(model.add_component(Component::new("sub2", "top")), true);
        assert_eq!(model.get_components().len(), 2);
        assert_eq!(model.add_port("nothing", Port::with_width(&Language::Vhdl, "a", Direction::Input, 1)), false);
        assert_eq!(model.get_ports("top"), Some(&Vec::new()));
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("IN".parse::<Direction>(), Ok(Direction::Input));
        assert_eq!("output".parse::<Direction>(), Ok(Direction::Output));
        assert!("inout".parse::<Direction>().is_err());
    }
}
