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


use crate::core::lang::Language;
use crate::core::source::{Direction, Port};
use crate::core::template::{Marker, Wrapper};

/// Prefix given to the wrapper's internal copies of the top entity's ports.
pub const SIGNAL_PREFIX: &str = "_usr_";

fn prefix(prefixed: bool) -> &'static str {
    match prefixed {
        true => SIGNAL_PREFIX,
        false => "",
    }
}

/// Writes `port` as an ANSI port declaration (`input logic [7:0] a`) or, when
/// `with_dir` is false, as the body of a `logic` declaration.
pub fn port_declaration(port: &Port, with_dir: bool, prefixed: bool) -> String {
    let dir = match (with_dir, port.get_direction()) {
        (false, _) => "",
        (true, Direction::Input) => "input ",
        (true, Direction::Output) => "output ",
    };
    let range = match port.get_range() {
        Some(r) => format!("[{}:{}] ", r.upper(), r.lower()),
        None => String::new(),
    };
    format!(
        "{}logic {}{}{}",
        dir,
        range,
        prefix(prefixed),
        port.get_original_name()
    )
}

/// Emits the lines for the block `marker` of a Verilog wrapper template.
pub fn render(marker: &Marker, wrapper: &Wrapper) -> Vec<String> {
    match marker {
        Marker::Signal { prefixed } => into_wires(wrapper, *prefixed),
        Marker::Instance { prefixed } => {
            let mut result = into_instance(wrapper, "usr", *prefixed);
            if *prefixed == true {
                result.append(&mut into_assignments(wrapper));
            }
            result
        }
        Marker::Uut => into_instance(wrapper, "uut", false),
        Marker::Board => into_board(wrapper),
        // modules need no declaration before instantiation
        _ => Vec::new(),
    }
}

/// Declares the board signals as the ANSI port list of the wrapper module.
fn into_board(wrapper: &Wrapper) -> Vec<String> {
    let signals = wrapper.get_board();
    signals
        .iter()
        .enumerate()
        .map(|(i, sig)| {
            let sep = if i == signals.len() - 1 { "" } else { "," };
            format!("    {}{}", port_declaration(sig, true, false), sep)
        })
        .collect()
}

fn into_wires(wrapper: &Wrapper, prefixed: bool) -> Vec<String> {
    wrapper
        .get_ports()
        .iter()
        .map(|p| format!("    {};", port_declaration(p, false, prefixed)))
        .collect()
}

fn into_instance(wrapper: &Wrapper, label: &str, prefixed: bool) -> Vec<String> {
    let mut result = vec![format!("    {} {} (", wrapper.get_entity(), label)];
    let ports = wrapper.get_ports();
    for (i, port) in ports.iter().enumerate() {
        let sep = if i == ports.len() - 1 { ");" } else { "," };
        result.push(format!(
            "        .{}({}{}){}",
            port.get_original_name(),
            prefix(prefixed),
            port.get_original_name(),
            sep
        ));
    }
    if ports.is_empty() == true {
        result.push(String::from("    );"));
    }
    result
}

/// Binds every bit of the prefixed signals to its board target.
///
/// Unassigned inputs are tied low and unassigned outputs are left floating.
fn into_assignments(wrapper: &Wrapper) -> Vec<String> {
    let mut result = Vec::new();
    for port in wrapper.get_user_ports() {
        match (port.get_direction(), port.is_assigned()) {
            (Direction::Input, assigned) => {
                let target = match assigned {
                    true => port.get_assigned(),
                    false => "1'b0",
                };
                result.push(format!("    assign {}{} = {};", SIGNAL_PREFIX, port.get_name(), target));
            }
            (Direction::Output, true) => result.push(format!(
                "    assign {} = {}{};",
                port.get_assigned(),
                SIGNAL_PREFIX,
                port.get_name()
            )),
            (Direction::Output, false) => (),
        }
    }
    for (target, idle) in wrapper.get_defaults() {
        result.push(format!("    assign {} = {};", target, Language::Verilog.literal(idle)));
    }
    result
}
