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

pub mod error;
pub mod verilog;
pub mod vhdl;

use crate::core::board::Logic;
use crate::core::source::{Port, SourceModel};
use crate::core::template::{Marker, Wrapper};
use crate::util::anyerror::AnyError;
use error::ParseError;
use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use verilog::svinst::Svinst;

/// The HDL dialect of a source set.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "vhdl")]
    Vhdl,
    #[serde(rename = "verilog", alias = "systemverilog", alias = "sv")]
    Verilog,
}

impl Default for Language {
    fn default() -> Self {
        Self::Vhdl
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Vhdl => "VHDL",
                Self::Verilog => "Verilog/SystemVerilog",
            }
        )
    }
}

impl FromStr for Language {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "vhdl" | "vhd" => Ok(Self::Vhdl),
            "verilog" | "systemverilog" | "verilog/systemverilog" | "sv" | "v" => Ok(Self::Verilog),
            _ => Err(AnyError(format!(
                "unknown language {:?}: expecting 'vhdl' or 'verilog'",
                s
            ))),
        }
    }
}

impl Language {
    /// Applies the language's identifier case rules to `name`.
    ///
    /// VHDL identifiers are case-insensitive; Verilog identifiers are not.
    pub fn fold(&self, name: &str) -> String {
        match self {
            Self::Vhdl => name.to_ascii_lowercase(),
            Self::Verilog => name.to_string(),
        }
    }

    /// Names a single bit `i` of the vector `base`.
    pub fn index(&self, base: &str, i: usize) -> String {
        match self {
            Self::Vhdl => format!("{}({})", base, i),
            Self::Verilog => format!("{}[{}]", base, i),
        }
    }

    /// The line comment token.
    pub fn comment(&self) -> &'static str {
        match self {
            Self::Vhdl => "--",
            Self::Verilog => "//",
        }
    }

    /// The word used for a design unit in messages.
    pub fn unit_term(&self) -> &'static str {
        match self {
            Self::Vhdl => "entity",
            Self::Verilog => "module",
        }
    }

    /// File extensions that hold source code of this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Vhdl => &["vhd", "vhdl"],
            Self::Verilog => &["v", "sv"],
        }
    }

    /// The extension given to generated files.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Vhdl => "vhdl",
            Self::Verilog => "sv",
        }
    }

    /// Writes a single-bit constant.
    pub fn literal(&self, value: &Logic) -> &'static str {
        match (self, value) {
            (Self::Vhdl, Logic::Low) => "'0'",
            (Self::Vhdl, Logic::High) => "'1'",
            (Self::Verilog, Logic::Low) => "1'b0",
            (Self::Verilog, Logic::High) => "1'b1",
        }
    }

    /// Checks if `name` is a legal identifier that is not a reserved word.
    pub fn is_valid_name(&self, name: &str) -> bool {
        match self {
            Self::Vhdl => vhdl::keyword::is_valid_name(name),
            Self::Verilog => verilog::keyword::is_valid_name(name),
        }
    }

    /// Collects the declarations of a single source file.
    ///
    /// Verilog sources require the external introspection tool.
    pub fn parse(&self, path: &Path, tool: Option<&Svinst>) -> Result<SourceModel, ParseError> {
        match self {
            Self::Vhdl => vhdl::parser::parse(path),
            Self::Verilog => match tool {
                Some(t) => verilog::parser::parse(path, t),
                None => Err(ParseError::ToolNotConfigured),
            },
        }
    }

    /// Recovers the `(user port, board signal)` pairs written into a
    /// previously generated wrapper.
    pub fn parse_generated_top(&self, path: &Path) -> Result<Vec<(String, String)>, ParseError> {
        match self {
            Self::Vhdl => vhdl::parser::parse_generated_top(path),
            Self::Verilog => verilog::parser::parse_generated_top(path),
        }
    }

    /// Emits the lines that replace a block `marker` in a wrapper template.
    pub fn render(&self, marker: &Marker, wrapper: &Wrapper) -> Vec<String> {
        match self {
            Self::Vhdl => vhdl::format::render(marker, wrapper),
            Self::Verilog => verilog::format::render(marker, wrapper),
        }
    }

    /// Writes one port declaration for a design skeleton.
    pub fn declare_port(&self, port: &Port) -> String {
        match self {
            Self::Vhdl => vhdl::format::port_declaration(port, true),
            Self::Verilog => verilog::format::port_declaration(port, true, false),
        }
    }

    /// The separator placed between consecutive port declarations.
    pub fn port_separator(&self) -> &'static str {
        match self {
            Self::Vhdl => ";",
            Self::Verilog => ",",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!(Language::from_str("VHDL"), Ok(Language::Vhdl));
        assert_eq!(Language::from_str("Verilog/SystemVerilog"), Ok(Language::Verilog));
        assert_eq!(Language::from_str("sv"), Ok(Language::Verilog));
        assert!(Language::from_str("chisel").is_err());
    }

    #[test]
    fn fold_and_index() {
        assert_eq!(Language::Vhdl.fold("My_Top"), "my_top");
        assert_eq!(Language::Verilog.fold("My_Top"), "My_Top");
        assert_eq!(Language::Vhdl.index("SW", 3), "SW(3)");
        assert_eq!(Language::Verilog.index("SW", 3), "SW[3]");
    }

    #[test]
    fn literals() {
        assert_eq!(Language::Vhdl.literal(&Logic::High), "'1'");
        assert_eq!(Language::Verilog.literal(&Logic::Low), "1'b0");
    }

    #[test]
    fn verilog_needs_tool() {
        let result = Language::Verilog.parse(Path::new("top.sv"), None);
        assert!(matches!(result, Err(ParseError::ToolNotConfigured)));
    }
}
