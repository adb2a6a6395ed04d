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

pub const HELP: &str = r#"Create a design skeleton with the given ports.

Usage:
    hdltop new [options] <unit>

Args:
    <unit>                  name of the new design unit

Options:
    --port <spec>...        add a port as <name>:<in|out>[:<width>]
    --lang <lang>           source language: vhdl, verilog
    --output <file>         destination file (default: <unit>.<ext>)
    --force                 overwrite an existing file

Use 'hdltop help new' to read more about the command.
"#;

pub const MANUAL: &str = r#"Names are checked against the identifier rules and reserved words of the
selected language before anything is written. A port without a width is a
single bit.

Examples:
    hdltop new counter --port clk:in --port rst:in --port count:out:8
    hdltop new blinky --lang verilog --port led:out:4
"#;
