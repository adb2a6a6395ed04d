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


use crate::commands::check;
use crate::commands::helps::gen;
use crate::core::context::Context;
use crate::core::finder::TopEntityFinder;
use crate::core::lang::Language;
use crate::core::template::{self, Builtin, Wrapper};
use crate::error::{Error, Hint, LastError};
use crate::util::anyerror::Fault;
use std::path::{Path, PathBuf};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Gen {
    dir: Option<PathBuf>,
    lang: Option<Language>,
    top: Option<String>,
    testbench: Option<PathBuf>,
    force: bool,
}

impl Subcommand<Context> for Gen {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(gen::HELP))?;
        Ok(Gen {
            // flags
            force: cli.check(Arg::flag("force"))?,
            // options
            dir: cli.get(Arg::option("dir").value("path"))?,
            lang: cli.get(Arg::option("lang").value("lang"))?,
            top: cli.get(Arg::option("top").value("unit"))?,
            testbench: cli.get(Arg::option("testbench").value("dir"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let c = c
            .clone()
            .dir(self.dir.clone())?
            .language(self.lang)
            .top(self.top.clone());
        let finder = check::resolve(&c)?;
        self.run(&c, &finder)
    }
}

impl Gen {
    fn run(&self, c: &Context, finder: &TopEntityFinder) -> Result<(), Fault> {
        let dest = c.get_output_path();
        Self::write(c, finder, Builtin::Top, &dest)?;
        println!("info: generated {}", dest.display());

        if let Some(dir) = &self.testbench {
            let name = Builtin::Testbench
                .file_name(finder.get_language())
                .unwrap_or_default();
            let dest = dir.join(name);
            if dest.exists() == true && self.force == false {
                return Err(Error::PathAlreadyExists(dest, Hint::ForceOverwrite))?;
            }
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::GenerateFailed(dest.clone(), LastError(e.to_string())))?;
            Self::write(c, finder, Builtin::Testbench, &dest)?;
            println!("info: generated {}", dest.display());
        }
        Ok(())
    }

    /// Fills the built-in `template` with the selected top entity and writes
    /// it to `dest`.
    fn write(c: &Context, finder: &TopEntityFinder, template: Builtin, dest: &Path) -> Result<(), Fault> {
        let lang = *finder.get_language();
        let entity = match finder.get_top_entity() {
            Some(e) => e.get_original_name(),
            None => finder.get_top_name(),
        };
        let assignments = c.get_board().assignments(&lang, finder.get_user_ports());
        let wrapper = Wrapper::new(
            lang,
            entity,
            finder.get_top_ports(),
            finder.get_user_ports(),
            assignments.unused_defaults(),
        )
        .board(c.get_board().to_ports(&lang));
        template::generate(template.text(&lang), dest, &wrapper, &assignments)
            .map_err(|e| Error::GenerateFailed(dest.to_path_buf(), LastError(e.to_string())))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const BLINKY: &str = "\
entity Blinky is
    port (
        clk : in std_logic;
        led : out std_logic_vector(1 downto 0)
    );
end entity Blinky;
";

    fn project(config: &str) -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blinky.vhd"), BLINKY).unwrap();
        fs::write(dir.path().join("hdltop.toml"), config).unwrap();
        let c = Context::new().dir(Some(dir.path().to_path_buf())).unwrap();
        (dir, c)
    }

    fn gen(testbench: Option<PathBuf>, force: bool) -> Gen {
        Gen {
            dir: None,
            lang: None,
            top: None,
            testbench: testbench,
            force: force,
        }
    }

    #[test]
    fn generates_wrapper() {
        let (dir, c) = project("[assign]\nclk = \"CLK\"\n\"led(0)\" = \"LD(3)\"\n");
        let finder = check::resolve(&c).unwrap();
        gen(None, false).run(&c, &finder).unwrap();
        let text = fs::read_to_string(dir.path().join("dr_top.vhdl")).unwrap();
        assert!(text.contains("    usr : Blinky port map ("));
        assert!(text.contains("        clk => CLK,"));
        assert!(text.contains("        led(1) => open,"));
        assert!(text.contains("        led(0) => LD(3) );"));
        assert!(text.contains("    LD(0) <= '0';"));
        assert_eq!(text.contains("    LD(3) <= '0';"), false);
        assert!(text.contains("    AN(7) <= '1';"));
    }

    #[test]
    fn wrapper_declares_configured_board() {
        let config = "\
[board]
name = \"DE10-Lite\"

[[board.signal]]
name = \"KEY\"
dir = \"in\"
width = 2

[[board.signal]]
name = \"LEDR\"
dir = \"out\"
width = 2
idle = \"0\"

[assign]
clk = \"KEY(0)\"
";
        let (dir, c) = project(config);
        let finder = check::resolve(&c).unwrap();
        gen(None, false).run(&c, &finder).unwrap();
        let text = fs::read_to_string(dir.path().join("dr_top.vhdl")).unwrap();
        assert!(text.contains(
            "entity dr_top is
    port (
        KEY : in std_logic_vector(1 downto 0);
        LEDR : out std_logic_vector(1 downto 0) );
end dr_top;
"
        ));
        assert!(text.contains("        clk => KEY(0),"));
        assert!(text.contains("    LEDR(0) <= '0';"));
        assert!(text.contains("    LEDR(1) <= '0';"));
        // nothing of the default board is left behind
        assert_eq!(text.contains("SW"), false);
        assert_eq!(text.contains("AN("), false);
    }

    #[test]
    fn keeps_assignments_and_user_code() {
        let (dir, c) = project("[assign]\n\"led(1)\" = \"LD(15)\"\n");
        let finder = check::resolve(&c).unwrap();
        gen(None, false).run(&c, &finder).unwrap();

        // edit a preserved region of the generated wrapper
        let dest = dir.path().join("dr_top.vhdl");
        let text = fs::read_to_string(&dest).unwrap();
        let edited = text.replacen(
            "-- vvv user statements vvv\n",
            "-- vvv user statements vvv\n    -- keep me\n",
            1,
        );
        assert_ne!(text, edited);
        fs::write(&dest, &edited).unwrap();

        // drop the configuration so the assignment comes from the wrapper
        fs::remove_file(dir.path().join("hdltop.toml")).unwrap();
        let c = Context::new().dir(Some(dir.path().to_path_buf())).unwrap();
        let finder = check::resolve(&c).unwrap();
        assert_eq!(finder.get_user_ports()[1].get_assigned(), "LD(15)");
        gen(None, false).run(&c, &finder).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), edited);
    }

    #[test]
    fn refuses_conflicts() {
        let (dir, c) = project("[assign]\n\"led(0)\" = \"LD(0)\"\n\"led(1)\" = \"LD(0)\"\n");
        let finder = check::resolve(&c).unwrap();
        let err = gen(None, false).run(&c, &finder).unwrap_err().to_string();
        assert!(err.contains("board signal LD(0) is assigned to 2 ports"));
        assert_eq!(dir.path().join("dr_top.vhdl").exists(), false);
    }

    #[test]
    fn testbench_needs_force() {
        let (dir, c) = project("");
        let tb = dir.path().join("sim");
        let finder = check::resolve(&c).unwrap();
        gen(Some(tb.clone()), false).run(&c, &finder).unwrap();
        let text = fs::read_to_string(tb.join("dr_testbench.vhdl")).unwrap();
        assert!(text.contains("    uut : Blinky port map ("));

        let err = gen(Some(tb.clone()), false).run(&c, &finder).unwrap_err().to_string();
        assert!(err.starts_with("path"));
        assert!(gen(Some(tb), true).run(&c, &finder).is_ok());
    }
}
