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

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single source file could not be turned into a `SourceModel`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read source file {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("the source analysis tool is not configured")]
    ToolNotConfigured,
    #[error("the source analysis tool was not found at {0:?}")]
    ToolMissing(PathBuf),
    #[error("failed to launch the source analysis tool {0:?}: {1}")]
    ToolLaunch(PathBuf, std::io::Error),
    #[error("source analysis of {0:?} timed out after {1} ms")]
    ToolTimeout(PathBuf, u128),
    #[error("source analysis of {0:?} failed{}", match .1 { Some(c) => format!(" with exit code {}", c), None => String::new() })]
    ToolFailed(PathBuf, Option<i32>),
}

impl ParseError {
    /// Checks if the failure came from the external tool rather than the source.
    pub fn is_tool_failure(&self) -> bool {
        match self {
            Self::Io(_, _) => false,
            _ => true,
        }
    }
}
