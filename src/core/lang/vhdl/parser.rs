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


//! Line-oriented scanner for VHDL declarations.
//!
//! The scanner does not tokenize the source. It only recognizes the handful of
//! line shapes needed to list entities, their `std_logic` ports and the
//! components instantiated inside each architecture.

use crate::core::lang::error::ParseError;
use crate::core::lang::Language;
use crate::core::source::{Component, Direction, Entity, Port, Range, SourceModel};
use crate::util::filesystem;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

struct Patterns {
    entity: Regex,
    port: Regex,
    architecture: Regex,
    component: Regex,
    direct_instance: Regex,
    binding: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        entity: Regex::new(r"(?i)entity\s+([a-z0-9_]+)\s+is").unwrap(),
        port: Regex::new(
            r"(?i)([a-z0-9_]+(?:\s*,\s*[a-z0-9_]+)*)\s*:\s*(in|out)\s+std_logic(_vector\s*\(\s*(\d+)\s+downto\s+(\d+)\s*\))?",
        )
        .unwrap(),
        architecture: Regex::new(r"(?i)architecture\s+([a-z0-9_]+)\s+of\s+([a-z0-9_]+)\s+is").unwrap(),
        component: Regex::new(r"(?i)component\s+([a-z0-9_]+)\s+is").unwrap(),
        direct_instance: Regex::new(r"(?i)^\s*[a-z0-9_]+\s*:\s*entity\s+(?:[a-z0-9_]+\.)?([a-z0-9_]+)").unwrap(),
        binding: Regex::new(r"([A-Za-z0-9_\(\)]+) => ([A-Za-z0-9_\(\)]+)").unwrap(),
    })
}

/// Builds the pattern that closes the scope opened by `keyword` named `name`.
///
/// Both the keyword and the name are optional after `end`.
fn closing(keyword: &str, name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?i)^\s*end(\s+{})?(\s+{})?\s*;",
        keyword,
        regex::escape(name)
    ))
    .ok()
}

/// Reads and scans the VHDL file at `path`.
pub fn parse(path: &Path) -> Result<SourceModel, ParseError> {
    let text = filesystem::read_latin1(path).map_err(|e| ParseError::Io(path.to_path_buf(), e))?;
    let model = scan(&text, &filesystem::file_name(path));
    log::debug!(
        "scanned {:?}: {} entities, {} components",
        path,
        model.get_entities().len(),
        model.get_components().len()
    );
    Ok(model)
}

/// Collects the declarations found in `text` for the file named `source_file`.
pub fn scan(text: &str, source_file: &str) -> SourceModel {
    let pats = patterns();
    let lang = Language::Vhdl;
    let mut model = SourceModel::new();

    // case-folded names of the open entity and architecture ("" when closed)
    let mut current_entity = String::new();
    let mut current_arch = String::new();
    let mut entity_end: Option<Regex> = None;
    let mut arch_end: Option<Regex> = None;

    for line in text.lines() {
        // drop comments
        let line = match line.find("--") {
            Some(i) => &line[..i],
            None => line,
        };

        if let Some(caps) = pats.entity.captures(line) {
            let entity = Entity::new(&lang, &caps[1], source_file);
            current_entity = entity.get_name().to_string();
            current_arch.clear();
            entity_end = closing("entity", &current_entity);
            model.add_entity(entity);
        }

        if current_entity.is_empty() == false && current_arch.is_empty() == true {
            if let Some(re) = &entity_end {
                if re.is_match(line) == true {
                    current_entity.clear();
                }
            }
            if let Some(caps) = pats.port.captures(line) {
                let direction = match caps[2].to_ascii_lowercase().as_str() {
                    "in" => Direction::Input,
                    _ => Direction::Output,
                };
                let range = match (caps.get(4), caps.get(5)) {
                    (Some(upper), Some(lower)) => match (upper.as_str().parse(), lower.as_str().parse()) {
                        (Ok(u), Ok(l)) => Some(Range::new(u, l)),
                        _ => None,
                    },
                    _ => None,
                };
                for name in caps[1].split(',').map(|s| s.trim()) {
                    model.add_port(&current_entity, Port::new(&lang, name, direction, range));
                }
            }
        }

        if let Some(caps) = pats.architecture.captures(line) {
            current_entity = lang.fold(&caps[2]);
            current_arch = lang.fold(&caps[1]);
            arch_end = closing("architecture", &current_arch);
        }

        if current_arch.is_empty() == false {
            if let Some(re) = &arch_end {
                if re.is_match(line) == true {
                    current_entity.clear();
                    current_arch.clear();
                }
            }
            let child = match pats.component.captures(line) {
                Some(caps) => Some(lang.fold(&caps[1])),
                None => pats.direct_instance.captures(line).map(|caps| lang.fold(&caps[1])),
            };
            if let Some(child) = child {
                model.add_component(Component::new(&child, &current_entity));
            }
        }
    }
    model
}

/// Recovers the `(user port, board signal)` bindings from the port map of a
/// previously generated wrapper at `path`.
///
/// A missing file has no bindings.
pub fn parse_generated_top(path: &Path) -> Result<Vec<(String, String)>, ParseError> {
    if path.exists() == false {
        return Ok(Vec::new());
    }
    let text = filesystem::read_latin1(path).map_err(|e| ParseError::Io(path.to_path_buf(), e))?;
    Ok(read_bindings(&text))
}

fn read_bindings(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| patterns().binding.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        // unconnected outputs
        .filter(|(_, signal)| signal.eq_ignore_ascii_case("open") == false)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    const COUNTER: &str = r#"library ieee;
use ieee.std_logic_1164.all;

entity Counter is
    port (
        CLK, RST : in std_logic;
        -- q : out std_logic;
        COUNT : out std_logic_vector(7 downto 0);
        Dir : inout std_logic
    );
end entity Counter;

architecture rtl of counter is
    component Adder is
        port ( a : in std_logic );
    end component;
    component adder is
    end component;
    signal tmp : std_logic;
begin
    u0 : adder port map (a => tmp);
    u1 : entity work.Prescaler port map (clk => CLK);
end architecture rtl;

entity Adder is
    port ( A : in std_logic_vector(3 downto 0) );
end Adder;
"#;

    #[test]
    fn scan_entities_and_ports() {
        let model = scan(COUNTER, "counter.vhd");
        let names: Vec<&str> = model.get_entities().iter().map(|e| e.get_name()).collect();
        assert_eq!(names, vec!["counter", "adder"]);
        assert_eq!(model.get_entities()[0].get_original_name(), "Counter");
        assert_eq!(model.get_entities()[0].get_source_file(), "counter.vhd");

        let ports = model.get_ports("counter").unwrap();
        let names: Vec<&str> = ports.iter().map(|p| p.get_original_name()).collect();
        // commented-out and inout ports are not recognized
        assert_eq!(names, vec!["CLK", "RST", "COUNT"]);
        assert_eq!(ports[1].get_direction(), &Direction::Input);
        assert_eq!(ports[2].get_direction(), &Direction::Output);
        assert_eq!(ports[2].get_range(), Some(&Range::new(7, 0)));
        assert_eq!(ports[0].is_vector(), false);

        // ports inside the component declaration do not belong to any entity
        assert_eq!(model.get_ports("adder").unwrap().len(), 1);
        assert_eq!(model.get_ports("adder").unwrap()[0].width(), 4);
    }

    #[test]
    fn scan_components() {
        let model = scan(COUNTER, "counter.vhd");
        assert_eq!(
            model.get_components(),
            &vec![
                Component::new("adder", "counter"),
                Component::new("prescaler", "counter"),
            ]
        );
    }

    #[test]
    fn end_entity_short_form() {
        let text = "entity a is\nport (x : in std_logic);\nend a;\nsignal y : out std_logic;\n";
        let model = scan(text, "a.vhd");
        assert_eq!(model.get_ports("a").unwrap().len(), 1);
    }

    #[test]
    fn end_entity_without_name() {
        let text = "entity a is\nport (x : in std_logic);\nend entity;\nb : out std_logic;\n";
        let model = scan(text, "a.vhd");
        assert_eq!(model.get_ports("a").unwrap().len(), 1);
        let re = closing("architecture", "rtl").unwrap();
        assert_eq!(re.is_match("end architecture rtl;"), true);
        assert_eq!(re.is_match("  END;"), true);
        assert_eq!(re.is_match("end process;"), false);
        assert_eq!(re.is_match("end component;"), false);
    }

    #[test]
    fn single_bit_vector_is_scalar() {
        let text = "entity a is\nport (b : in std_logic_vector(0 downto 0));\nend a;\n";
        let model = scan(text, "a.vhd");
        let port = &model.get_ports("a").unwrap()[0];
        assert_eq!(port.is_vector(), false);
        assert_eq!(port.width(), 1);
        assert_eq!(port.to_vector(&Language::Vhdl)[0].get_name(), "b");
    }

    #[test]
    fn zero_port_entity() {
        let text = "entity tb is\nend entity;\narchitecture sim of tb is\ncomponent dut is\nend component;\nbegin\nend sim;\n";
        let model = scan(text, "tb.vhd");
        assert_eq!(model.get_ports("tb"), Some(&Vec::new()));
        assert_eq!(model.get_components(), &vec![Component::new("dut", "tb")]);
    }

    #[test]
    fn missing_file() {
        let result = parse(Path::new("/does/not/exist.vhd"));
        assert!(matches!(result, Err(ParseError::Io(_, _))));
    }

    #[test]
    fn bindings() {
        let text = r#"    usr : counter port map (
        clk => CLK,
        count(7) => LD(7),
        count(6) => open,
        en => '0',
        rst => btn_c );
    AN(0) <= '1';
"#;
        assert_eq!(
            read_bindings(text),
            vec![
                ("clk".to_string(), "CLK".to_string()),
                ("count(7)".to_string(), "LD(7)".to_string()),
                ("rst".to_string(), "btn_c".to_string()),
            ]
        );
        assert_eq!(parse_generated_top(Path::new("/does/not/exist.vhdl")).unwrap(), Vec::new());
    }
}
