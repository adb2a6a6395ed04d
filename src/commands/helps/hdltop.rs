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

pub const HELP: &str = r#"Hdltop binds an hdl design to the signals of a development board.

Usage:
    hdltop [options] [command]

Commands:
    check           analyze the sources and print the design hierarchy
    gen             generate the top-level wrapper for the board
    new             create a design skeleton with the given ports
    help            print help information about a command

Options:
    --version       print version information and exit
    --verbose       print debug information while running
    --color <when>  coloring: auto, always, never
    --help, -h      print help information

Use 'hdltop help <command>' for more information about a command.
"#;
