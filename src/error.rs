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

use colored::Colorize;
use std::{fmt::Display, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path {0:?} already exists{1}")]
    PathAlreadyExists(PathBuf, Hint),
    #[error("no source analysis tool is configured for {0} sources{1}")]
    ToolNotConfigured(String, Hint),
    #[error("no {0} named {1:?} exists among the analyzed sources{2}")]
    TopNotFound(&'static str, String, Hint),
    #[error("failed to analyze the sources: {0}")]
    AnalysisFailed(LastError),
    #[error("failed to generate {0:?}: {1}")]
    GenerateFailed(PathBuf, LastError),
    #[error("failed to read the sources of {0:?}: {1}")]
    SourcesUnreadable(PathBuf, LastError),
    #[error("no {0} sources found in {1:?}")]
    NoSources(String, PathBuf),
    #[error("invalid port {0:?}: expecting <name>:<in|out>[:<width>]")]
    BadPortSpec(String),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    SvinstConfig,
    CheckList,
    ForceOverwrite,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::SvinstConfig => {
                "set \"svinst\" under [project] in hdltop.toml or the SVINST environment variable"
            }
            Self::CheckList => "use `hdltop check` to see the list of analyzed design units",
            Self::ForceOverwrite => "use the \"--force\" flag to overwrite the existing file",
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            Error::lowerize(message.to_string())
        )
    }
}
