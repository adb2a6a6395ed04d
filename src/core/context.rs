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


use crate::core::board::Board;
use crate::core::config::{Config, ConfigError};
use crate::core::fileset;
use crate::core::lang::verilog::svinst::{self, Svinst};
use crate::core::lang::Language;
use crate::core::template::Builtin;
use crate::util::filesystem;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The environment variable naming the `svinst` executable.
pub const SVINST_KEY: &str = "SVINST";

/// Everything a command needs to know about the source directory.
#[derive(Debug, Clone)]
pub struct Context {
    dir: PathBuf,
    lang: Language,
    svinst: Option<PathBuf>,
    timeout: Duration,
    top: Option<String>,
    output: Option<String>,
    board: Board,
    assignments: Vec<(String, String)>,
}

impl Context {
    pub fn new() -> Context {
        Context {
            dir: PathBuf::from("."),
            lang: Language::default(),
            svinst: None,
            timeout: svinst::DEFAULT_TIMEOUT,
            top: None,
            output: None,
            board: Board::default(),
            assignments: Vec::new(),
        }
    }

    /// Sets the source directory and loads its configuration file.
    ///
    /// Values already set on the context by command-line flags are applied
    /// afterward with the other builder methods, so they take precedence.
    pub fn dir(mut self, dir: Option<PathBuf>) -> Result<Context, ConfigError> {
        if let Some(d) = dir {
            self.dir = d;
        }
        if self.dir.is_dir() == false {
            return Err(ConfigError::MissingDir(self.dir));
        }
        let cfg = Config::load(&self.dir)?;
        if let Some(project) = cfg.get_project() {
            if let Some(lang) = project.get_language() {
                self.lang = *lang;
            }
            if let Some(tool) = project.get_svinst() {
                self.svinst = Some(filesystem::resolve_rel_path(&self.dir, tool));
            }
            if let Some(ms) = project.get_timeout_ms() {
                self.timeout = Duration::from_millis(ms);
            }
            self.top = project.get_top().cloned();
            self.output = project.get_output().cloned();
        }
        if let Some(board) = cfg.get_board() {
            self.board = board.clone();
        }
        self.assignments = cfg.get_assignments();
        Ok(self)
    }

    /// Overrides the language when given on the command-line.
    pub fn language(mut self, lang: Option<Language>) -> Context {
        if let Some(l) = lang {
            self.lang = l;
        }
        self
    }

    /// Overrides the top entity when given on the command-line.
    pub fn top(mut self, top: Option<String>) -> Context {
        if top.is_some() {
            self.top = top;
        }
        self
    }

    /// Falls back to the environment variable `key` for the `svinst` path
    /// when it was not configured.
    pub fn svinst(mut self, key: &str) -> Context {
        if self.svinst.is_none() {
            if let Ok(s) = env::var(key) {
                self.svinst = Some(PathBuf::from(s));
            }
        }
        self
    }

    pub fn get_dir(&self) -> &Path {
        &self.dir
    }

    pub fn get_language(&self) -> &Language {
        &self.lang
    }

    /// Creates the tool runner when a `svinst` path is known.
    pub fn get_tool(&self) -> Option<Svinst> {
        self.svinst
            .as_ref()
            .map(|p| Svinst::new(p.clone()).timeout(self.timeout))
    }

    pub fn get_top(&self) -> Option<&String> {
        self.top.as_ref()
    }

    pub fn get_board(&self) -> &Board {
        &self.board
    }

    /// References the assignments listed in the configuration file.
    pub fn get_assignments(&self) -> &Vec<(String, String)> {
        &self.assignments
    }

    /// The path of the generated wrapper.
    pub fn get_output_path(&self) -> PathBuf {
        let name = match &self.output {
            Some(o) => o.clone(),
            None => Builtin::Top.file_name(&self.lang).unwrap_or_default(),
        };
        self.dir.join(name)
    }

    /// Collects the source files of the directory, leaving out generated files.
    pub fn get_sources(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut exclude = vec![filesystem::file_name(&self.get_output_path())];
        if let Some(tb) = Builtin::Testbench.file_name(&self.lang) {
            exclude.push(tb);
        }
        fileset::gather_sources(&self.dir, &self.lang, &exclude)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let c = Context::new().dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(c.get_language(), &Language::Vhdl);
        assert_eq!(c.get_tool(), None);
        assert_eq!(c.get_board(), &Board::nexys_a7());
        assert_eq!(c.get_output_path(), dir.path().join("dr_top.vhdl"));
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hdltop.toml"),
            "[project]\nlanguage = \"verilog\"\nsvinst = \"/opt/svinst\"\ntimeout-ms = 50\ntop = \"a\"\noutput = \"wrap.sv\"\n",
        )
        .unwrap();
        let c = Context::new()
            .dir(Some(dir.path().to_path_buf()))
            .unwrap()
            .language(None)
            .top(Some(String::from("b")))
            .svinst(SVINST_KEY);
        assert_eq!(c.get_language(), &Language::Verilog);
        assert_eq!(c.get_top(), Some(&String::from("b")));
        assert_eq!(c.get_output_path(), dir.path().join("wrap.sv"));
        let tool = c.get_tool().unwrap();
        assert_eq!(tool.get_path(), &PathBuf::from("/opt/svinst"));
        assert_eq!(tool.get_timeout(), &Duration::from_millis(50));

        let c = c.language(Some(Language::Vhdl));
        assert_eq!(c.get_language(), &Language::Vhdl);
    }

    #[test]
    fn sources_skip_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["top.vhd", "dr_top.vhdl", "dr_testbench.vhdl"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let c = Context::new().dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(c.get_sources().unwrap(), vec![dir.path().join("top.vhd")]);
    }

    #[test]
    fn missing_dir() {
        let result = Context::new().dir(Some(PathBuf::from("/does/not/exist")));
        assert!(matches!(result, Err(ConfigError::MissingDir(_))));
    }
}
