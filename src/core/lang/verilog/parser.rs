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

//! Reads the module listing printed by `svinst` for Verilog and SystemVerilog
//! sources, and the assignments of a previously generated wrapper.

use super::format::SIGNAL_PREFIX;
use super::svinst::Svinst;
use crate::core::lang::error::ParseError;
use crate::core::lang::Language;
use crate::core::source::{Component, Direction, Entity, Port, SourceModel};
use crate::util::filesystem;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

struct Patterns {
    module: Regex,
    instance: Regex,
    port_name: Regex,
    port_dir: Regex,
    port_width: Regex,
    input_binding: Regex,
    output_binding: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let signal = r"[A-Za-z0-9_$\[\]]+";
        Patterns {
            module: Regex::new(r#"^      - mod_name: "([A-Za-z_][A-Za-z0-9_$]*)""#).unwrap(),
            instance: Regex::new(r#"^          - mod_name: "([A-Za-z_][A-Za-z0-9_$]*)""#).unwrap(),
            port_name: Regex::new(r#"^          - port_name: "([A-Za-z_][A-Za-z0-9_$]*)""#).unwrap(),
            port_dir: Regex::new(r#"^            port_dir: "(in|out)put""#).unwrap(),
            port_width: Regex::new(r"^            port_width: ([0-9]+)").unwrap(),
            input_binding: Regex::new(&format!(
                r"assign {}({}) = ({});",
                regex::escape(SIGNAL_PREFIX),
                signal,
                signal
            ))
            .unwrap(),
            output_binding: Regex::new(&format!(
                r"assign ({}) = {}({});",
                signal,
                regex::escape(SIGNAL_PREFIX),
                signal
            ))
            .unwrap(),
        }
    })
}

/// Runs `tool` on the file at `path` and reads its listing.
pub fn parse(path: &Path, tool: &Svinst) -> Result<SourceModel, ParseError> {
    let listing = tool.run(path)?;
    let model = parse_listing(&listing, &filesystem::file_name(path));
    log::debug!(
        "analyzed {:?}: {} modules, {} instances",
        path,
        model.get_entities().len(),
        model.get_components().len()
    );
    Ok(model)
}

/// Collects the declarations from an `svinst` listing for the file named
/// `source_file`.
///
/// A port is recorded once its width line is read.
pub fn parse_listing(listing: &str, source_file: &str) -> SourceModel {
    let pats = patterns();
    let lang = Language::Verilog;
    let mut model = SourceModel::new();

    let mut current_module = String::new();
    let mut port_name = String::new();
    let mut port_dir: Option<Direction> = None;

    for line in listing.lines() {
        if let Some(caps) = pats.module.captures(line) {
            let entity = Entity::new(&lang, &caps[1], source_file);
            current_module = entity.get_name().to_string();
            model.add_entity(entity);
        } else if let Some(caps) = pats.instance.captures(line) {
            model.add_component(Component::new(&lang.fold(&caps[1]), &current_module));
        } else if let Some(caps) = pats.port_name.captures(line) {
            port_name = caps[1].to_string();
            port_dir = None;
        } else if let Some(caps) = pats.port_dir.captures(line) {
            port_dir = match &caps[1] {
                "in" => Some(Direction::Input),
                _ => Some(Direction::Output),
            };
        } else if let Some(caps) = pats.port_width.captures(line) {
            let width: usize = match caps[1].parse() {
                Ok(w) => w,
                Err(_) => continue,
            };
            match port_dir {
                Some(dir) if port_name.is_empty() == false => {
                    model.add_port(&current_module, Port::with_width(&lang, &port_name, dir, width));
                }
                _ => log::warn!("skipping port without a name or direction in {}", source_file),
            }
        }
    }
    model
}

/// Recovers the `(user port, board signal)` bindings from the assignments of
/// a previously generated wrapper at `path`.
///
/// A missing file has no bindings.
pub fn parse_generated_top(path: &Path) -> Result<Vec<(String, String)>, ParseError> {
    if path.exists() == false {
        return Ok(Vec::new());
    }
    let text = filesystem::read_latin1(path).map_err(|e| ParseError::Io(path.to_path_buf(), e))?;
    Ok(read_bindings(&text))
}

fn read_bindings(text: &str) -> Vec<(String, String)> {
    let pats = patterns();
    let mut bindings = Vec::new();
    for line in text.lines() {
        if let Some(caps) = pats.input_binding.captures(line) {
            bindings.push((caps[1].to_string(), caps[2].to_string()));
        } else if let Some(caps) = pats.output_binding.captures(line) {
            bindings.push((caps[2].to_string(), caps[1].to_string()));
        }
    }
    bindings
}
