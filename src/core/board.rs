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


//! Board signals that the ports of a top entity can be bound to.

use crate::core::lang::Language;
use crate::core::source::{Direction, Port, UserPort};
use serde_derive::{Deserialize, Serialize};

/// A constant single-bit level.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Logic {
    #[serde(rename = "0")]
    Low,
    #[serde(rename = "1")]
    High,
}

/// A named external signal of the board, possibly a vector.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardSignal {
    name: String,
    dir: Direction,
    width: Option<usize>,
    idle: Option<Logic>,
}

impl BoardSignal {
    pub fn new(name: &str, dir: Direction) -> Self {
        Self {
            name: name.to_string(),
            dir: dir,
            width: None,
            idle: None,
        }
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn idle(mut self, level: Logic) -> Self {
        self.idle = Some(level);
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> &Direction {
        &self.dir
    }

    pub fn get_width(&self) -> usize {
        self.width.unwrap_or(1)
    }

    pub fn get_idle(&self) -> Option<&Logic> {
        self.idle.as_ref()
    }
}

/// One bit of a board signal that a single user port can drive or read.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Target {
    name: String,
    dir: Direction,
    idle: Option<Logic>,
}

impl Target {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> &Direction {
        &self.dir
    }

    pub fn get_idle(&self) -> Option<&Logic> {
        self.idle.as_ref()
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Board {
    name: String,
    #[serde(rename = "signal", default)]
    signals: Vec<BoardSignal>,
}

impl Default for Board {
    fn default() -> Self {
        Self::nexys_a7()
    }
}

impl Board {
    pub fn new(name: &str, signals: Vec<BoardSignal>) -> Self {
        Self {
            name: name.to_string(),
            signals: signals,
        }
    }

    /// The Digilent Nexys A7-100T.
    pub fn nexys_a7() -> Self {
        let mut signals = vec![BoardSignal::new("SW", Direction::Input).width(16)];
        for name in ["BTNC", "BTNL", "BTNR", "BTNU", "BTND", "CLK", "RST"] {
            signals.push(BoardSignal::new(name, Direction::Input));
        }
        signals.push(BoardSignal::new("LD", Direction::Output).width(16).idle(Logic::Low));
        signals.push(BoardSignal::new("AN", Direction::Output).width(8).idle(Logic::High));
        for name in ["CA", "CB", "CC", "CD", "CE", "CF", "CG", "DP"] {
            signals.push(BoardSignal::new(name, Direction::Output).idle(Logic::High));
        }
        Self::new("Nexys A7-100T", signals)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_signals(&self) -> &Vec<BoardSignal> {
        &self.signals
    }

    /// Declares every signal as a port of the wrapper, in board order.
    pub fn to_ports(&self, lang: &Language) -> Vec<Port> {
        self.signals
            .iter()
            .map(|sig| Port::with_width(lang, &sig.name, sig.dir, sig.get_width()))
            .collect()
    }

    /// Checks the board definition for unusable signals.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = Vec::new();
        for sig in &self.signals {
            if sig.get_width() == 0 {
                return Err(format!("board signal {:?} has a width of 0", sig.get_name()));
            }
            if sig.get_idle().is_some() && sig.get_direction() == &Direction::Input {
                return Err(format!(
                    "board signal {:?} is an input and cannot have an idle value",
                    sig.get_name()
                ));
            }
            if seen.contains(&sig.get_name()) == true {
                return Err(format!("board signal {:?} is defined more than once", sig.get_name()));
            }
            seen.push(sig.get_name());
        }
        Ok(())
    }

    /// Expands every signal into its single-bit targets in board order.
    ///
    /// Vector signals are listed from bit 0 upward.
    pub fn targets(&self, lang: &Language) -> Vec<Target> {
        let mut result = Vec::new();
        for sig in &self.signals {
            let make = |name: String| Target {
                name: name,
                dir: sig.dir,
                idle: sig.idle,
            };
            match sig.get_width() {
                1 => result.push(make(sig.name.clone())),
                w => (0..w).for_each(|i| result.push(make(lang.index(&sig.name, i)))),
            }
        }
        result
    }

    /// Checks if a user port with direction `dir` may be bound to `target`.
    pub fn accepts(&self, lang: &Language, target: &str, dir: &Direction) -> bool {
        self.targets(lang)
            .iter()
            .any(|t| t.get_name() == target && t.get_direction() == dir)
    }

    /// Builds the table of user ports bound to each target.
    ///
    /// Bindings to names that are not targets of this board are ignored.
    pub fn assignments(&self, lang: &Language, user_ports: &[UserPort]) -> Assignments {
        let mut table: Vec<(Target, Vec<String>)> = self
            .targets(lang)
            .into_iter()
            .map(|t| (t, Vec::new()))
            .collect();
        for port in user_ports.iter().filter(|p| p.is_assigned() == true) {
            match table.iter_mut().find(|(t, _)| t.get_name() == port.get_assigned()) {
                Some((_, ports)) => ports.push(port.get_name().to_string()),
                None => log::warn!(
                    "port {} is bound to unknown board signal {}",
                    port.get_name(),
                    port.get_assigned()
                ),
            }
        }
        Assignments { table: table }
    }
}

/// Every board target paired with the user ports bound to it.
#[derive(Debug, PartialEq)]
pub struct Assignments {
    table: Vec<(Target, Vec<String>)>,
}

impl Assignments {
    /// References the user ports bound to the target named `target`.
    pub fn get(&self, target: &str) -> Option<&Vec<String>> {
        self.table
            .iter()
            .find(|(t, _)| t.get_name() == target)
            .map(|(_, ports)| ports)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Target, Vec<String>)> {
        self.table.iter()
    }

    /// Collects the targets bound by two or more user ports.
    pub fn conflicts(&self) -> Vec<(&str, &Vec<String>)> {
        self.table
            .iter()
            .filter(|(_, ports)| ports.len() >= 2)
            .map(|(t, ports)| (t.get_name(), ports))
            .collect()
    }

    /// Lists the unbound targets that must be driven to an idle level.
    pub fn unused_defaults(&self) -> Vec<(String, Logic)> {
        self.table
            .iter()
            .filter(|(_, ports)| ports.is_empty() == true)
            .filter_map(|(t, _)| t.get_idle().map(|idle| (t.get_name().to_string(), *idle)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn user_port(name: &str, dir: Direction, target: &str) -> UserPort {
        let mut port = UserPort::new(name.to_string(), dir);
        port.assign(target);
        port
    }

    #[test]
    fn default_board_targets() {
        let board = Board::default();
        assert_eq!(board.validate(), Ok(()));
        let targets = board.targets(&Language::Vhdl);
        // 16 + 7 inputs, 16 + 8 + 8 outputs
        assert_eq!(targets.len(), 55);
        assert_eq!(targets[0].get_name(), "SW(0)");
        assert_eq!(targets[15].get_name(), "SW(15)");
        assert_eq!(targets[16].get_name(), "BTNC");
        assert_eq!(board.targets(&Language::Verilog)[0].get_name(), "SW[0]");
        assert_eq!(targets.iter().filter(|t| t.get_idle().is_some()).count(), 32);
    }

    #[test]
    fn board_as_ports() {
        let board = Board::new(
            "DE10-Lite",
            vec![
                BoardSignal::new("KEY", Direction::Input).width(2),
                BoardSignal::new("LEDR", Direction::Output).width(10).idle(Logic::Low),
                BoardSignal::new("CLOCK_50", Direction::Input),
            ],
        );
        let ports = board.to_ports(&Language::Vhdl);
        let names: Vec<&str> = ports.iter().map(|p| p.get_original_name()).collect();
        assert_eq!(names, vec!["KEY", "LEDR", "CLOCK_50"]);
        assert_eq!(ports[1].get_direction(), &Direction::Output);
        assert_eq!(ports[1].width(), 10);
        assert_eq!(ports[2].is_vector(), false);
    }

    #[test]
    fn accepts_matching_direction() {
        let board = Board::default();
        assert_eq!(board.accepts(&Language::Vhdl, "LD(3)", &Direction::Output), true);
        assert_eq!(board.accepts(&Language::Vhdl, "LD(3)", &Direction::Input), false);
        assert_eq!(board.accepts(&Language::Vhdl, "LD[3]", &Direction::Output), false);
        assert_eq!(board.accepts(&Language::Vhdl, "LD(16)", &Direction::Output), false);
    }

    #[test]
    fn conflicts_and_defaults() {
        let board = Board::default();
        let ports = vec![
            user_port("a", Direction::Output, "LD(0)"),
            user_port("b", Direction::Output, "LD(0)"),
            user_port("c", Direction::Output, "AN(2)"),
            user_port("d", Direction::Input, "MISSING"),
            UserPort::new(String::from("e"), Direction::Input),
        ];
        let table = board.assignments(&Language::Vhdl, &ports);
        assert_eq!(table.conflicts(), vec![("LD(0)", &vec![String::from("a"), String::from("b")])]);
        assert_eq!(table.get("AN(2)"), Some(&vec![String::from("c")]));
        assert_eq!(table.get("SW(0)"), Some(&Vec::new()));

        let defaults = table.unused_defaults();
        // 32 idle targets, two of them in use
        assert_eq!(defaults.len(), 30);
        assert_eq!(defaults[0], (String::from("LD(1)"), Logic::Low));
        assert!(defaults.iter().all(|(t, _)| t != "AN(2)"));
        assert!(defaults.contains(&(String::from("DP"), Logic::High)));
    }

    #[test]
    fn invalid_boards() {
        let board = Board::new("x", vec![BoardSignal::new("SW", Direction::Input).width(0)]);
        assert!(board.validate().is_err());
        let board = Board::new("x", vec![BoardSignal::new("SW", Direction::Input).idle(Logic::Low)]);
        assert!(board.validate().is_err());
        let board = Board::new(
            "x",
            vec![
                BoardSignal::new("A", Direction::Input),
                BoardSignal::new("A", Direction::Output),
            ],
        );
        assert!(board.validate().is_err());
    }
}
