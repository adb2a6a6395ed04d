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

use crate::commands::check::Check;
use crate::commands::gen::Gen;
use crate::commands::help::Help;
use crate::commands::helps::hdltop;
use crate::commands::new::New;
use crate::core::context::{self, Context};
use crate::util::anyerror::AnyError;
use std::str::FromStr;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

impl FromStr for ColorMode {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            _ => Err(AnyError(format!(
                "unknown color mode {:?}: expecting 'auto', 'always', or 'never'",
                s
            ))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Hdltop {
    version: bool,
    verbose: bool,
    command: Option<HdltopSubcommand>,
}

impl Command for Hdltop {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(cliproc::Help::with(hdltop::HELP))?;
        // need to set this coloring mode ASAP
        match cli
            .get(Arg::option("color").value("when"))?
            .unwrap_or(ColorMode::Auto)
        {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => (),
        }
        Ok(Hdltop {
            version: cli.check(Arg::flag("version"))?,
            verbose: cli.check(Arg::flag("verbose"))?,
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // prioritize version information
        if self.version == true {
            println!("hdltop {}", VERSION);
            return Ok(());
        }
        Self::init_logger(self.verbose);
        match self.command {
            Some(c) => {
                // the config file of each command's directory is applied on top
                let context = Context::new().svinst(context::SVINST_KEY);
                c.execute(&context)
            }
            // if no command is given then print default help
            None => Ok(println!("{}", hdltop::HELP)),
        }
    }
}

impl Hdltop {
    /// Installs the logger, honoring `RUST_LOG` unless `verbose` is set.
    fn init_logger(verbose: bool) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        if verbose == true {
            builder.filter_level(log::LevelFilter::Debug);
        }
        builder.format_timestamp(None);
        // a logger may already be installed when running inside another program
        let _ = builder.try_init();
    }
}

#[derive(Debug, PartialEq)]
enum HdltopSubcommand {
    Help(Help),
    Check(Check),
    Gen(Gen),
    New(New),
}

impl Subcommand<Context> for HdltopSubcommand {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli.select(&["help", "check", "gen", "new"])?.as_ref() {
            "help" => Ok(Self::Help(Help::interpret(cli)?)),
            "check" => Ok(Self::Check(Check::interpret(cli)?)),
            "gen" => Ok(Self::Gen(Gen::interpret(cli)?)),
            "new" => Ok(Self::New(New::interpret(cli)?)),
            _ => panic!("an unimplemented command was passed through!"),
        }
    }

    fn execute(self, context: &Context) -> proc::Result {
        match self {
            Self::Help(c) => c.execute(&()),
            Self::Check(c) => c.execute(context),
            Self::Gen(c) => c.execute(context),
            Self::New(c) => c.execute(context),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn color_mode() {
        assert_eq!(ColorMode::from_str("always"), Ok(ColorMode::Always));
        assert_eq!(ColorMode::from_str("never"), Ok(ColorMode::Never));
        assert!(ColorMode::from_str("sometimes").is_err());
    }
}
