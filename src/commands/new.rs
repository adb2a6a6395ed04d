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


use crate::commands::helps::new;
use crate::core::context::Context;
use crate::core::lang::Language;
use crate::core::source::{Direction, Port};
use crate::core::template::{self, Builtin, GenerateError};
use crate::error::{Error, Hint, LastError};
use crate::util::anyerror::{AnyError, Fault};
use std::path::PathBuf;
use std::str::FromStr;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

/// A port requested on the command-line as `<name>:<dir>[:<width>]`.
#[derive(Debug, PartialEq, Clone)]
pub struct PortSpec {
    name: String,
    dir: Direction,
    width: usize,
}

impl FromStr for PortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::BadPortSpec(s.to_string());
        let mut parts = s.split(':');
        let name = match parts.next() {
            Some(n) if n.is_empty() == false => n.to_string(),
            _ => return Err(bad()),
        };
        let dir = parts
            .next()
            .and_then(|d| Direction::from_str(d).ok())
            .ok_or_else(bad)?;
        let width = match parts.next() {
            Some(w) => w.parse::<usize>().map_err(|_| bad())?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self { name, dir, width })
    }
}

impl PortSpec {
    fn to_port(&self, lang: &Language) -> Result<Port, GenerateError> {
        match self.width {
            0 => Err(GenerateError::InvalidWidth(self.name.clone())),
            w => Ok(Port::with_width(lang, &self.name, self.dir, w)),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct New {
    unit: String,
    ports: Vec<PortSpec>,
    lang: Option<Language>,
    output: Option<PathBuf>,
    force: bool,
}

impl Subcommand<Context> for New {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(new::HELP))?;
        Ok(New {
            force: cli.check(Arg::flag("force"))?,
            ports: cli
                .get_all(Arg::option("port").value("spec"))?
                .unwrap_or_default(),
            lang: cli.get(Arg::option("lang").value("lang"))?,
            output: cli.get(Arg::option("output").value("file"))?,
            unit: cli.require(Arg::positional("unit"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        // the new file is not part of an analyzed directory
        let lang = self.lang.unwrap_or(*c.get_language());
        let dest = self.destination(&lang);
        if dest.exists() == true && self.force == false {
            return Err(Error::PathAlreadyExists(dest, Hint::ForceOverwrite))?;
        }
        self.run(&lang, &dest)?;
        println!("info: created {}", dest.display());
        Ok(())
    }
}

impl New {
    /// Determines the file to write, defaulting to the unit's name.
    fn destination(&self, lang: &Language) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None => PathBuf::from(format!("{}.{}", self.unit, lang.default_extension())),
        }
    }

    fn run(&self, lang: &Language, dest: &PathBuf) -> Result<(), Fault> {
        if self.ports.is_empty() == true {
            return Err(AnyError(format!(
                "{} {} needs at least one port",
                lang.unit_term(),
                self.unit
            )))?;
        }
        let ports = self
            .ports
            .iter()
            .map(|p| p.to_port(lang))
            .collect::<Result<Vec<Port>, GenerateError>>()
            .map_err(|e| Error::GenerateFailed(dest.clone(), LastError(e.to_string())))?;
        template::generate_skeleton(Builtin::Skeleton.text(lang), dest, lang, &self.unit, &ports)
            .map_err(|e| Error::GenerateFailed(dest.clone(), LastError(e.to_string())))?;
        Ok(())
    }
}
