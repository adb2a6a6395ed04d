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


use regex::Regex;
use std::sync::OnceLock;

/// VHDL-93 reserved words, sorted for binary search.
const RESERVED: [&str; 97] = [
    "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert",
    "attribute", "begin", "block", "body", "buffer", "bus", "case", "component",
    "configuration", "constant", "disconnect", "downto", "else", "elsif", "end", "entity",
    "exit", "file", "for", "function", "generate", "generic", "group", "guarded", "if",
    "impure", "in", "inertial", "inout", "is", "label", "library", "linkage", "literal",
    "loop", "map", "mod", "nand", "new", "next", "nor", "not", "null", "of", "on", "open",
    "or", "others", "out", "package", "port", "postponed", "procedure", "process", "pure",
    "range", "record", "register", "reject", "rem", "report", "return", "rol", "ror",
    "select", "severity", "shared", "signal", "sla", "sll", "sra", "srl", "subtype", "then",
    "to", "transport", "type", "unaffected", "units", "until", "use", "variable", "wait",
    "when", "while", "with", "xnor", "xor",
];

/// Checks if `s` is a reserved word, ignoring case.
pub fn is_reserved(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    RESERVED.binary_search(&lower.as_str()).is_ok()
}

fn basic_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[a-z][a-z0-9_]*$").unwrap())
}

/// Checks if `name` can be used as a basic identifier.
///
/// Basic identifiers start with a letter, never hold two underscores in a row
/// and never end with an underscore.
pub fn is_valid_name(name: &str) -> bool {
    basic_identifier().is_match(name) == true
        && name.contains("__") == false
        && name.ends_with('_') == false
        && is_reserved(name) == false
}
