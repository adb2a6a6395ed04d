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

pub const HELP: &str = r#"Analyze the sources and print the design hierarchy.

Usage:
    hdltop check [options]

Options:
    --dir <path>            directory holding the hdl sources
    --lang <lang>           source language: vhdl, verilog
    --top <unit>            select the top-level design unit
    --ascii                 draw the tree with ascii characters only
    --json                  print the analysis as json

Use 'hdltop help check' to read more about the command.
"#;

pub const MANUAL: &str = r#"Every source file of the directory is parsed for its design units, their
ports and the units they instantiate. Units without ports are treated as
testbenches and left out. The remaining units are arranged into instantiation
trees, listed from each unit that no other unit instantiates.

The top-level unit is the one given by '--top', or by the 'top' key of the
project configuration. Otherwise the root of the largest tree is suggested.

After the tree, every bit of the top-level unit's ports is listed along with
the board signal it is assigned to. Assignments come from the [assign] table
of hdltop.toml and from a previously generated wrapper.

Examples:
    hdltop check
    hdltop check --dir ./rtl --lang verilog --top counter
"#;
