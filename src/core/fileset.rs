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
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

const MATCH_OPTS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Checks against file patterns if the file is a source file of `lang`.
pub fn is_source(lang: &Language, file: &str) -> bool {
    lang.extensions().iter().any(|ext| match Pattern::new(&format!("*.{}", ext)) {
        Ok(p) => p.matches_with(file, MATCH_OPTS),
        Err(_) => false,
    })
}

/// Collects the source files of `lang` directly inside `dir`, sorted by name.
///
/// Files named in `exclude` are skipped, ignoring case.
pub fn gather_sources(dir: &Path, lang: &Language, exclude: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() == false {
            continue;
        }
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };
        if is_source(lang, &name) == false {
            continue;
        }
        if exclude.iter().any(|e| e.eq_ignore_ascii_case(&name)) == true {
            log::debug!("excluding generated file {:?}", path);
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detect_sources() {
        assert_eq!(is_source(&Language::Vhdl, "top.vhd"), true);
        assert_eq!(is_source(&Language::Vhdl, "TOP.VHDL"), true);
        assert_eq!(is_source(&Language::Vhdl, "top.sv"), false);
        assert_eq!(is_source(&Language::Verilog, "top.sv"), true);
        assert_eq!(is_source(&Language::Verilog, "top.v"), true);
        assert_eq!(is_source(&Language::Verilog, "top.vhd"), false);
        assert_eq!(is_source(&Language::Verilog, "top.svh"), false);
    }

    #[test]
    fn gather() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.vhd", "a.vhdl", "dr_top.vhdl", "notes.txt", "c.sv"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.vhd")).unwrap();
        let files = gather_sources(dir.path(), &Language::Vhdl, &[String::from("DR_TOP.vhdl")]).unwrap();
        let names: Vec<String> = files.iter().map(|f| crate::util::filesystem::file_name(f)).collect();
        assert_eq!(names, vec!["a.vhdl", "b.vhd"]);
    }
}
