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


//! Runner for the `svinst` source introspection tool.

use crate::core::lang::error::ParseError;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// The default time a single file analysis may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, PartialEq, Clone)]
pub struct Svinst {
    path: PathBuf,
    timeout: Duration,
}

impl Svinst {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: path,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn get_path(&self) -> &PathBuf {
        &self.path
    }

    pub fn get_timeout(&self) -> &Duration {
        &self.timeout
    }

    /// Analyzes the source file at `file` and returns the tool's listing.
    ///
    /// The child process is killed if it does not finish within the timeout.
    pub fn run(&self, file: &Path) -> Result<String, ParseError> {
        let launch_err = |e: std::io::Error| ParseError::ToolLaunch(self.path.clone(), e);

        // capture the listing in an anonymous file so no reader thread is needed
        let mut listing = tempfile::tempfile().map_err(launch_err)?;
        let stdout = listing.try_clone().map_err(launch_err)?;

        log::debug!("running {:?} --allow_incomplete {:?}", self.path, file);
        let mut child = Command::new(&self.path)
            .arg("--allow_incomplete")
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ParseError::ToolMissing(self.path.clone()),
                _ => ParseError::ToolLaunch(self.path.clone(), e),
            })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait().map_err(launch_err)? {
                Some(status) => break status,
                None => {
                    if Instant::now() >= deadline {
                        log::warn!("analysis of {:?} timed out; killing {:?}", file, self.path);
                        // the child may have exited in between
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ParseError::ToolTimeout(
                            file.to_path_buf(),
                            self.timeout.as_millis(),
                        ));
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };
        if status.success() == false {
            return Err(ParseError::ToolFailed(file.to_path_buf(), status.code()));
        }

        let mut bytes = Vec::new();
        listing.seek(SeekFrom::Start(0)).map_err(launch_err)?;
        listing.read_to_end(&mut bytes).map_err(launch_err)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
