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

/// Writes the VHDL type of `port`.
fn to_type(port: &Port) -> String {
    match port.get_range() {
        Some(r) => format!("std_logic_vector({} downto {})", r.upper(), r.lower()),
        None => String::from("std_logic"),
    }
}

/// Writes `port` as an interface declaration (`name : in std_logic`) or, when
/// `with_mode` is false, as the body of a signal declaration.
pub fn port_declaration(port: &Port, with_mode: bool) -> String {
    match with_mode {
        true => format!(
            "{} : {} {}",
            port.get_original_name(),
            port.get_direction(),
            to_type(port)
        ),
        false => format!("{} : {}", port.get_original_name(), to_type(port)),
    }
}

/// Emits the lines for the block `marker` of a VHDL wrapper template.
pub fn render(marker: &Marker, wrapper: &Wrapper) -> Vec<String> {
    match marker {
        Marker::Component => into_component(wrapper),
        Marker::Signal { .. } => into_signals(wrapper),
        Marker::Instance { .. } => into_instance(wrapper),
        Marker::Uut => into_uut(wrapper),
        Marker::Board => into_board(wrapper),
        _ => Vec::new(),
    }
}

/// Declares the board signals as the port clause of the wrapper entity.
fn into_board(wrapper: &Wrapper) -> Vec<String> {
    let signals = wrapper.get_board();
    if signals.is_empty() == true {
        return Vec::new();
    }
    let mut result = vec![String::from("    port (")];
    for (i, sig) in signals.iter().enumerate() {
        let sep = if i == signals.len() - 1 { " );" } else { ";" };
        result.push(format!("        {}{}", port_declaration(sig, true), sep));
    }
    result
}

fn into_component(wrapper: &Wrapper) -> Vec<String> {
    let mut result = vec![format!("    component {} is", wrapper.get_entity())];
    let ports = wrapper.get_ports();
    if ports.is_empty() == false {
        result.push(String::from("        port ("));
        for (i, port) in ports.iter().enumerate() {
            let sep = if i == ports.len() - 1 { ");" } else { ";" };
            result.push(format!("            {}{}", port_declaration(port, true), sep));
        }
    }
    result.push(String::from("    end component;"));
    result
}

fn into_signals(wrapper: &Wrapper) -> Vec<String> {
    wrapper
        .get_ports()
        .iter()
        .map(|p| format!("    signal {};", port_declaration(p, false)))
        .collect()
}

fn into_instance(wrapper: &Wrapper) -> Vec<String> {
    let mut result = vec![format!("    usr : {} port map (", wrapper.get_entity())];
    let user_ports = wrapper.get_user_ports();
    for (i, port) in user_ports.iter().enumerate() {
        let target = match (port.is_assigned(), port.get_direction()) {
            (true, _) => port.get_assigned(),
            (false, Direction::Input) => "'0'",
            (false, Direction::Output) => "open",
        };
        let sep = if i == user_ports.len() - 1 { " );" } else { "," };
        result.push(format!("        {} => {}{}", port.get_name(), target, sep));
    }
    // drive every untouched board output to its idle level
    for (target, idle) in wrapper.get_defaults() {
        result.push(format!("    {} <= {};", target, Language::Vhdl.literal(idle)));
    }
    result
}

fn into_uut(wrapper: &Wrapper) -> Vec<String> {
    let mut result = vec![format!("    uut : {} port map (", wrapper.get_entity())];
    let user_ports = wrapper.get_user_ports();
    for (i, port) in user_ports.iter().enumerate() {
        let sep = if i == user_ports.len() - 1 { " );" } else { "," };
        result.push(format!("        {} => {}{}", port.get_name(), port.get_name(), sep));
    }
    result
}
