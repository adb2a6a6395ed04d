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

pub const HELP: &str = r#"Generate the top-level wrapper for the board.

Usage:
    hdltop gen [options]

Options:
    --dir <path>            directory holding the hdl sources
    --lang <lang>           source language: vhdl, verilog
    --top <unit>            select the top-level design unit
    --testbench <dir>       also create a testbench skeleton in the directory
    --force                 overwrite an existing testbench

Use 'hdltop help gen' to read more about the command.
"#;

pub const MANUAL: &str = r#"Writes the wrapper that instantiates the top-level unit and binds its port
bits to the board's signals. Board outputs left unassigned are driven to their
idle level. Two ports may never share one board signal; the wrapper is left
untouched in that case.

Code placed between the 'vvv' and '^^^' comment lines of an existing wrapper
is carried over into the regenerated file. Assignments made in the existing
wrapper are restored unless hdltop.toml assigns the port differently.

Examples:
    hdltop gen
    hdltop gen --top counter --testbench ./sim
"#;
