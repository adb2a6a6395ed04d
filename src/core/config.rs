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
use crate::core::lang::Language;
use serde_derive::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_FILE: &str = "hdltop.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("directory {0:?} does not exist")]
    MissingDir(PathBuf),
    #[error("failed to read configuration file {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse configuration file {0:?}: {1}")]
    Parse(PathBuf, toml::de::Error),
    #[error("invalid board in {0:?}: {1}")]
    Board(PathBuf, String),
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    language: Option<Language>,
    svinst: Option<String>,
    #[serde(rename = "timeout-ms")]
    timeout_ms: Option<u64>,
    top: Option<String>,
    output: Option<String>,
}

impl Project {
    pub fn get_language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    pub fn get_svinst(&self) -> Option<&String> {
        self.svinst.as_ref()
    }

    pub fn get_timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    pub fn get_top(&self) -> Option<&String> {
        self.top.as_ref()
    }

    pub fn get_output(&self) -> Option<&String> {
        self.output.as_ref()
    }
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    project: Option<Project>,
    board: Option<Board>,
    assign: Option<BTreeMap<String, String>>,
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration file from `dir`.
    ///
    /// A directory without a configuration file has the default configuration.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        match path.is_file() {
            true => Self::from_file(&path),
            false => {
                log::debug!("no {} found in {:?}; using defaults", CONFIG_FILE, dir);
                Ok(Self::new())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let cfg = Self::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        if let Some(board) = &cfg.board {
            board
                .validate()
                .map_err(|e| ConfigError::Board(path.to_path_buf(), e))?;
        }
        Ok(cfg)
    }

    pub fn get_project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn get_board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Lists the configured `(user port, board signal)` pairs.
    pub fn get_assignments(&self) -> Vec<(String, String)> {
        match &self.assign {
            Some(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            None => Vec::new(),
        }
    }
}
