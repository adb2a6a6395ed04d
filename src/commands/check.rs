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


use crate::commands::helps::check;
use crate::core::context::Context;
use crate::core::finder::{HierarchyItem, TopEntityFinder};
use crate::core::lang::Language;
use crate::core::source::UserPort;
use crate::error::{Error, Hint, LastError};
use crate::util::anyerror::Fault;
use crate::util::graph::Twig;
use colored::Colorize;
use serde_derive::Serialize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Check {
    dir: Option<PathBuf>,
    lang: Option<Language>,
    top: Option<String>,
    ascii: bool,
    json: bool,
}

impl Subcommand<Context> for Check {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(check::HELP))?;
        Ok(Check {
            // flags
            ascii: cli.check(Arg::flag("ascii"))?,
            json: cli.check(Arg::flag("json"))?,
            // options
            dir: cli.get(Arg::option("dir").value("path"))?,
            lang: cli.get(Arg::option("lang").value("lang"))?,
            top: cli.get(Arg::option("top").value("unit"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let c = c
            .clone()
            .dir(self.dir.clone())?
            .language(self.lang)
            .top(self.top.clone());
        let finder = resolve(&c)?;

        if self.json == true {
            let report = Report {
                language: finder.get_language(),
                top: finder.get_top_name(),
                suggested: finder.get_suggested_top_entity(),
                hierarchy: finder.get_list_items(),
                ports: finder.get_user_ports(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        print!("{}", Self::format_tree(&finder, self.ascii));
        println!();
        print!("{}", Self::format_ports(&finder));
        // report every board signal claimed more than once
        let assignments = c
            .get_board()
            .assignments(finder.get_language(), finder.get_user_ports());
        for (target, ports) in assignments.conflicts() {
            println!(
                "{}: board signal {} is assigned to {}",
                "warning".yellow(),
                target,
                ports.join(", ")
            );
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    language: &'a Language,
    top: &'a str,
    suggested: &'a str,
    hierarchy: &'a Vec<HierarchyItem>,
    ports: &'a Vec<UserPort>,
}

impl Check {
    /// Draws every instantiation tree with the selected top highlighted.
    fn format_tree(finder: &TopEntityFinder, ascii: bool) -> String {
        let items = finder.get_list_items();
        let levels: Vec<usize> = items.iter().map(|i| i.get_level()).collect();
        let twigs = Twig::from_levels(&levels);

        let mut result = String::new();
        for (item, twig) in items.iter().zip(twigs.iter()) {
            let name = match finder.get_entity(item.get_name()) {
                Some(e) => e.get_original_name().to_string(),
                None => item.get_name().to_string(),
            };
            let twig = match ascii {
                true => Twig::to_ascii(&twig.to_string()),
                false => twig.to_string(),
            };
            let name = match item.is_top() {
                true => name.green().bold().to_string(),
                false => name,
            };
            result.push_str(&format!("{}{}\n", twig, name));
        }
        result
    }

    /// Lists every bit of the top's ports alongside its board signal.
    fn format_ports(finder: &TopEntityFinder) -> String {
        let mut result = String::new();
        if let Some(top) = finder.get_top_entity() {
            result.push_str(&format!(
                "Top: {} ({})\n",
                top.get_original_name(),
                top.get_source_file()
            ));
        }
        result.push_str(&format!(
            "{:<24}{:<6}{}\n{}\n",
            "Port",
            "Dir",
            "Signal",
            "-".repeat(38)
        ));
        for port in finder.get_user_ports() {
            result.push_str(&format!(
                "{:<24}{:<6}{}\n",
                port.get_name(),
                port.get_direction().to_string(),
                match port.is_assigned() {
                    true => port.get_assigned(),
                    false => "-",
                }
            ));
        }
        result
    }
}

/// Analyzes the sources of the context's directory and selects the top-level
/// design unit.
///
/// Assignments of a previously generated wrapper are restored first and then
/// overridden by the assignments of the configuration file.
pub fn resolve(c: &Context) -> Result<TopEntityFinder, Fault> {
    let lang = *c.get_language();
    let dir = c.get_dir().to_path_buf();
    let sources = c
        .get_sources()
        .map_err(|e| Error::SourcesUnreadable(dir.clone(), LastError(e.to_string())))?;
    if sources.is_empty() == true {
        return Err(Error::NoSources(lang.to_string(), dir))?;
    }
    let tool = c.get_tool();
    if lang == Language::Verilog && tool.is_none() {
        return Err(Error::ToolNotConfigured(lang.to_string(), Hint::SvinstConfig))?;
    }
    log::info!("analyzing {} {} files", sources.len(), lang);
    let mut finder = TopEntityFinder::new(&sources, lang, tool.as_ref())
        .map_err(|e| Error::AnalysisFailed(LastError(e.to_string())))?;

    if let Some(top) = c.get_top() {
        if finder.set_top_entity(top, false) == false {
            return Err(Error::TopNotFound(
                lang.unit_term(),
                top.clone(),
                Hint::CheckList,
            ))?;
        }
    }

    let board = c.get_board();
    let previous = lang
        .parse_generated_top(&c.get_output_path())
        .map_err(|e| Error::AnalysisFailed(LastError(e.to_string())))?;
    let restored = finder.restore_assignments(board, &previous);
    log::debug!("restored {} assignments from {:?}", restored, c.get_output_path());

    // configured signals are taken away from the ports that held them before
    for (_, signal) in c.get_assignments() {
        finder
            .get_user_ports_mut()
            .iter_mut()
            .filter(|p| p.get_assigned() == signal)
            .for_each(|p| p.unassign());
    }
    let configured = finder.restore_assignments(board, c.get_assignments());
    if configured < c.get_assignments().len() {
        log::warn!(
            "{} configured assignments do not match a port of {} and the board",
            c.get_assignments().len() - configured,
            finder.get_top_name()
        );
    }
    Ok(finder)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const COUNTER: &str = "\
entity counter is
    port (
        clk : in std_logic;
        count : out std_logic_vector(3 downto 0)
    );
end entity counter;

architecture rtl of counter is
    component prescaler is
    end component;
begin
end architecture rtl;
";

    const PRESCALER: &str = "\
entity prescaler is
    port ( clk : in std_logic; tick : out std_logic );
end prescaler;
";

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("counter.vhd"), COUNTER).unwrap();
        fs::write(dir.path().join("prescaler.vhd"), PRESCALER).unwrap();
        dir
    }

    fn context(dir: &tempfile::TempDir) -> Context {
        Context::new().dir(Some(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn resolve_suggests_root() {
        let dir = project();
        let finder = resolve(&context(&dir)).unwrap();
        assert_eq!(finder.get_top_name(), "counter");
        let names: Vec<&str> = finder
            .get_user_ports()
            .iter()
            .map(|p| p.get_name())
            .collect();
        assert_eq!(
            names,
            vec!["clk", "count(3)", "count(2)", "count(1)", "count(0)"]
        );
    }

    #[test]
    fn resolve_unknown_top() {
        let dir = project();
        let c = context(&dir).top(Some(String::from("missing")));
        let err = resolve(&c).unwrap_err().to_string();
        assert!(err.starts_with("no entity named \"missing\" exists"));
    }

    #[test]
    fn resolve_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(&context(&dir)).unwrap_err().to_string();
        assert!(err.starts_with("no VHDL sources found"));
    }

    #[test]
    fn resolve_verilog_needs_tool() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.sv"), "module top(input a); endmodule\n").unwrap();
        let c = Context::new()
            .dir(Some(dir.path().to_path_buf()))
            .unwrap()
            .language(Some(Language::Verilog));
        let err = resolve(&c).unwrap_err().to_string();
        assert!(err.starts_with("no source analysis tool is configured"));
    }

    #[test]
    fn resolve_restores_then_configures() {
        let dir = project();
        fs::write(
            dir.path().join("dr_top.vhdl"),
            "    usr : counter port map (\n        clk => CLK,\n        count(0) => LD(0),\n        count(1) => LD(1) );\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("hdltop.toml"),
            "[assign]\n\"count(3)\" = \"LD(0)\"\n",
        )
        .unwrap();
        let finder = resolve(&context(&dir)).unwrap();
        let assigned: Vec<(&str, &str)> = finder
            .get_user_ports()
            .iter()
            .map(|p| (p.get_name(), p.get_assigned()))
            .collect();
        assert_eq!(
            assigned,
            vec![
                ("clk", "CLK"),
                ("count(3)", "LD(0)"),
                ("count(2)", ""),
                ("count(1)", "LD(1)"),
                ("count(0)", ""),
            ]
        );
    }

    #[test]
    fn tree_and_ports() {
        colored::control::set_override(false);
        let dir = project();
        let finder = resolve(&context(&dir)).unwrap();
        assert_eq!(Check::format_tree(&finder, false), "counter\n└─ prescaler\n");
        assert_eq!(Check::format_tree(&finder, true), "counter\n\\- prescaler\n");
        let table = Check::format_ports(&finder);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Top: counter (counter.vhd)");
        assert_eq!(lines[3], "clk                     in    -");
        assert_eq!(lines.len(), 8);
    }
}
