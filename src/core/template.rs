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


//! Line-oriented code generation from marker templates.
//!
//! A template is plain HDL text where certain comment lines act as markers.
//! Block markers are replaced by generated code, and preserve markers delimit
//! regions whose contents are carried over from the previous output file.

use crate::core::board::{Assignments, Logic};
use crate::core::lang::Language;
use crate::core::source::{Port, UserPort};
use crate::util::filesystem;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder replaced by the entity name in design skeletons.
pub const ENTITY_PLACEHOLDER: &str = "DR_ENTITY_NAME";

const TOP_VHDL: &str = include_str!("templates/top.vhd");
const TESTBENCH_VHDL: &str = include_str!("templates/testbench.vhd");
const SKELETON_VHDL: &str = include_str!("templates/skeleton.vhd");
const TOP_VERILOG: &str = include_str!("templates/top.sv");
const TESTBENCH_VERILOG: &str = include_str!("templates/testbench.sv");
const SKELETON_VERILOG: &str = include_str!("templates/skeleton.sv");

/// The built-in templates available for each language.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Builtin {
    Top,
    Testbench,
    Skeleton,
}

impl Builtin {
    pub fn text(&self, lang: &Language) -> &'static str {
        match (self, lang) {
            (Self::Top, Language::Vhdl) => TOP_VHDL,
            (Self::Testbench, Language::Vhdl) => TESTBENCH_VHDL,
            (Self::Skeleton, Language::Vhdl) => SKELETON_VHDL,
            (Self::Top, Language::Verilog) => TOP_VERILOG,
            (Self::Testbench, Language::Verilog) => TESTBENCH_VERILOG,
            (Self::Skeleton, Language::Verilog) => SKELETON_VERILOG,
        }
    }

    /// The default name of the file generated from this template.
    pub fn file_name(&self, lang: &Language) -> Option<String> {
        let stem = match self {
            Self::Top => "dr_top",
            Self::Testbench => "dr_testbench",
            Self::Skeleton => return None,
        };
        Some(format!("{}.{}", stem, lang.default_extension()))
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read previous output {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to write {0:?}: {1}")]
    Write(PathBuf, std::io::Error),
    #[error("board signal {0} is assigned to {} ports: {}", .1.len(), .1.join(", "))]
    Conflict(String, Vec<String>),
    #[error("invalid {0} name {1:?}")]
    InvalidName(&'static str, String),
    #[error("port width must be at least 1 for port {0:?}")]
    InvalidWidth(String),
    #[error("port {0:?} is declared more than once")]
    DuplicatePort(String),
}

/// A template line with a special meaning.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Marker {
    Component,
    Signal { prefixed: bool },
    Instance { prefixed: bool },
    Uut,
    Port,
    Board,
    Begin,
    End,
}

impl Marker {
    /// Recognizes `line` as a marker when it starts with the `comment` token
    /// followed by a marker keyword.
    pub fn parse(line: &str, comment: &str) -> Option<Self> {
        let rest = line.strip_prefix(comment)?.strip_prefix(' ')?;
        if rest.starts_with("USER_COMPONENT") {
            Some(Self::Component)
        } else if rest.starts_with("USER_SIGNAL") {
            Some(Self::Signal {
                prefixed: rest.starts_with("USER_SIGNAL_PREFIX"),
            })
        } else if rest.starts_with("USER_INSTANCE") {
            Some(Self::Instance {
                prefixed: rest.starts_with("USER_INSTANCE_PREFIX"),
            })
        } else if rest.starts_with("USER_UUT") {
            Some(Self::Uut)
        } else if rest.starts_with("USER_PORT") {
            Some(Self::Port)
        } else if rest.starts_with("USER_BOARD") {
            Some(Self::Board)
        } else if rest.starts_with("vvv") {
            Some(Self::Begin)
        } else if rest.starts_with("^^^") {
            Some(Self::End)
        } else {
            None
        }
    }
}

/// Everything a wrapper template needs to know about the selected design.
#[derive(Debug, PartialEq)]
pub struct Wrapper<'a> {
    lang: Language,
    entity: &'a str,
    ports: &'a [Port],
    user_ports: &'a [UserPort],
    defaults: Vec<(String, Logic)>,
    board: Vec<Port>,
}

impl<'a> Wrapper<'a> {
    pub fn new(
        lang: Language,
        entity: &'a str,
        ports: &'a [Port],
        user_ports: &'a [UserPort],
        defaults: Vec<(String, Logic)>,
    ) -> Self {
        Self {
            lang: lang,
            entity: entity,
            ports: ports,
            user_ports: user_ports,
            defaults: defaults,
            board: Vec::new(),
        }
    }

    /// Sets the board signals declared as the wrapper's own ports.
    pub fn board(mut self, signals: Vec<Port>) -> Self {
        self.board = signals;
        self
    }

    pub fn get_language(&self) -> &Language {
        &self.lang
    }

    /// References the top entity's name as spelled in its source.
    pub fn get_entity(&self) -> &str {
        self.entity
    }

    pub fn get_ports(&self) -> &[Port] {
        self.ports
    }

    pub fn get_user_ports(&self) -> &[UserPort] {
        self.user_ports
    }

    /// References the unused board targets and the level each is driven to.
    pub fn get_defaults(&self) -> &Vec<(String, Logic)> {
        &self.defaults
    }

    pub fn get_board(&self) -> &[Port] {
        &self.board
    }
}

fn is_preserve_marker(line: &str, token: &str) -> bool {
    let line = line.trim_start();
    line.starts_with(&format!("-- {}", token)) || line.starts_with(&format!("// {}", token))
}

/// Extracts the text of every preserved region of the file at `path`, in
/// order of appearance.
///
/// Each region is the lines strictly between an opening and a closing marker,
/// each terminated by a newline. Characters outside of 7-bit ASCII are
/// replaced with `?`. A missing file has no regions.
pub fn extract_preserved(path: &Path) -> Result<Vec<String>, GenerateError> {
    if path.exists() == false {
        return Ok(Vec::new());
    }
    let text = filesystem::read_latin1(path).map_err(|e| GenerateError::Read(path.to_path_buf(), e))?;
    Ok(extract_regions(&text))
}

fn extract_regions(text: &str) -> Vec<String> {
    let mut regions = Vec::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        if is_preserve_marker(line, "^^^") == true {
            if let Some(region) = current.take() {
                regions.push(region);
            }
        } else if is_preserve_marker(line, "vvv") == true {
            // an unterminated region ends at the next opening marker
            if let Some(region) = current.replace(String::new()) {
                regions.push(region);
            }
        } else if let Some(region) = current.as_mut() {
            region.push_str(&filesystem::to_ascii_lossy(line));
            region.push('\n');
        }
    }
    // an unterminated region runs to the end of the file
    if let Some(region) = current {
        regions.push(region);
    }
    regions
}

/// Writes the text of `template` with every block marker replaced and every
/// preserved region filled from `preserved`.
///
/// The n-th opening marker of the template receives the n-th region. An empty
/// or missing region keeps the template's own lines.
pub fn render(template: &str, wrapper: &Wrapper, preserved: &[String]) -> String {
    let lang = wrapper.get_language();
    let mut result = String::new();
    let mut push = |line: &str| {
        result.push_str(line);
        result.push('\n');
    };
    let mut region = 0;
    let mut suppress = false;
    for line in template.lines() {
        match Marker::parse(line, lang.comment()) {
            Some(Marker::Begin) => {
                push(line);
                match preserved.get(region) {
                    Some(text) if text.is_empty() == false => {
                        for kept in text.lines() {
                            push(kept);
                        }
                        suppress = true;
                    }
                    _ => (),
                }
                region += 1;
            }
            Some(Marker::End) => {
                suppress = false;
                push(line);
            }
            _ if suppress == true => (),
            Some(marker) => {
                for generated in lang.render(&marker, wrapper) {
                    push(&generated);
                }
            }
            None => push(line),
        }
    }
    result
}

/// Generates the wrapper from `template` into the file at `dest`.
///
/// Nothing is written when a board target is bound by more than one user port.
/// The previous contents of `dest` are only replaced once the new contents are
/// fully written.
pub fn generate(
    template: &str,
    dest: &Path,
    wrapper: &Wrapper,
    assignments: &Assignments,
) -> Result<(), GenerateError> {
    if let Some((target, ports)) = assignments.conflicts().into_iter().next() {
        return Err(GenerateError::Conflict(target.to_string(), ports.clone()));
    }
    let preserved = extract_preserved(dest)?;
    log::debug!("preserving {} regions of {:?}", preserved.len(), dest);
    let text = render(template, wrapper, &preserved);
    filesystem::write_atomic(dest, text.as_bytes()).map_err(|e| GenerateError::Write(dest.to_path_buf(), e))?;
    log::info!("generated {:?}", dest);
    Ok(())
}

/// Checks the names requested for a new design skeleton.
pub fn validate_skeleton(lang: &Language, entity: &str, ports: &[Port]) -> Result<(), GenerateError> {
    if lang.is_valid_name(entity) == false {
        return Err(GenerateError::InvalidName(lang.unit_term(), entity.to_string()));
    }
    for (i, port) in ports.iter().enumerate() {
        if lang.is_valid_name(port.get_original_name()) == false {
            return Err(GenerateError::InvalidName("port", port.get_original_name().to_string()));
        }
        if ports[..i].iter().any(|p| p.get_name() == port.get_name()) == true {
            return Err(GenerateError::DuplicatePort(port.get_original_name().to_string()));
        }
    }
    Ok(())
}

/// Writes the text of a design skeleton for `entity` with the given `ports`.
pub fn render_skeleton(template: &str, lang: &Language, entity: &str, ports: &[Port]) -> String {
    let indent = match lang {
        Language::Vhdl => "        ",
        Language::Verilog => "    ",
    };
    let mut result = String::new();
    for line in template.lines() {
        match Marker::parse(line, lang.comment()) {
            Some(Marker::Port) => {
                for (i, port) in ports.iter().enumerate() {
                    let sep = if i == ports.len() - 1 { "" } else { lang.port_separator() };
                    result.push_str(&format!("{}{}{}\n", indent, lang.declare_port(port), sep));
                }
            }
            _ => {
                result.push_str(&line.replace(ENTITY_PLACEHOLDER, entity));
                result.push('\n');
            }
        }
    }
    result
}

/// Validates and writes a design skeleton into the file at `dest`.
pub fn generate_skeleton(
    template: &str,
    dest: &Path,
    lang: &Language,
    entity: &str,
    ports: &[Port],
) -> Result<(), GenerateError> {
    validate_skeleton(lang, entity, ports)?;
    let text = render_skeleton(template, lang, entity, ports);
    filesystem::write_atomic(dest, text.as_bytes()).map_err(|e| GenerateError::Write(dest.to_path_buf(), e))
}
