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


use crate::commands::helps;
use crate::util::anyerror::AnyError;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Help {
    list: bool,
    topic: Option<Topic>,
}

impl Subcommand<()> for Help {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(cliproc::Help::with(HELP))?;
        Ok(Help {
            list: cli.check(Arg::flag("list"))?,
            topic: cli.get(Arg::positional("topic"))?,
        })
    }

    fn execute(self, _: &()) -> proc::Result {
        self.run()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Topic {
    Check,
    Gen,
    New,
}

impl Topic {
    fn list_all() -> String {
        let list = ["check", "gen", "new"];
        list.into_iter().fold(String::new(), |mut acc, x| {
            acc.push_str(&format!("{}\n", x));
            acc
        })
    }

    /// Writes the full manual page of the topic.
    fn manual(&self) -> String {
        let (usage, manual) = match self {
            Self::Check => (helps::check::HELP, helps::check::MANUAL),
            Self::Gen => (helps::gen::HELP, helps::gen::MANUAL),
            Self::New => (helps::new::HELP, helps::new::MANUAL),
        };
        // drop the pointer back to this command
        let usage = usage
            .lines()
            .filter(|l| l.starts_with("Use 'hdltop help") == false)
            .collect::<Vec<&str>>()
            .join("\n");
        format!("{}\n{}", usage.trim_end(), manual)
    }
}

impl std::str::FromStr for Topic {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "check" => Self::Check,
            "gen" => Self::Gen,
            "new" => Self::New,
            _ => return Err(AnyError(format!("no help topic named {:?}", s))),
        })
    }
}

impl Help {
    fn run(&self) -> Result<(), AnyError> {
        if self.list == true {
            print!("{}", Topic::list_all());
            return Ok(());
        }
        match &self.topic {
            Some(t) => println!("{}", t.manual()),
            None => println!("{}", helps::hdltop::HELP),
        }
        Ok(())
    }
}

const HELP: &str = "\
Read in-depth documentation around hdltop topics.

Usage:
    hdltop help [options] [<topic>]

Args:
    <topic>         a listed topic or any hdltop subcommand

Options:
    --list          view list of available topics

Use 'hdltop help' to read more about the tool.
";
