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

use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolves a relative path into a full path if given relative to some `root` path.
///
/// Paths that do not exist under `root` are returned untouched so that bare
/// program names can still be looked up on the user's PATH.
pub fn resolve_rel_path(root: &Path, s: &str) -> PathBuf {
    let resolved_path = root.join(s);
    if resolved_path.exists() == true && PathBuf::from(s).is_relative() == true {
        resolved_path
    } else {
        PathBuf::from(s)
    }
}

/// Reads a file byte-for-byte as ISO-8859-1 text.
///
/// Every byte maps to exactly one `char`, so reading never fails on encoding.
pub fn read_latin1(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(bytes.into_iter().map(|b| b as char).collect())
}

/// Replaces every character outside of the 7-bit ASCII range with `?`.
///
/// Operates on latin-1 decoded text, so each original byte becomes one `?`.
pub fn to_ascii_lossy(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() == true { c } else { '?' })
        .collect()
}

/// Returns the final component of `path` as a string, or the whole path when
/// it has no file name.
pub fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(n) => n.to_string_lossy().to_string(),
        None => path.display().to_string(),
    }
}

/// Writes `contents` to `dest` in one step.
///
/// The data is first written to a temporary file next to `dest` and only
/// renamed over `dest` once it was fully flushed, so a failure never leaves a
/// partially written file behind.
pub fn write_atomic(dest: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if p.as_os_str().is_empty() == false => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    // temporary files are only readable by their owner
    let perms = match std::fs::metadata(dest) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(perms) = perms {
        temp.as_file().set_permissions(perms)?;
    }
    temp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_path_simple() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("svinst"), "").unwrap();
        // expands relative path to full path
        assert_eq!(resolve_rel_path(dir.path(), "svinst"), dir.path().join("svinst"));
        // no file named 'sv2v' at the relative root
        assert_eq!(resolve_rel_path(dir.path(), "sv2v"), PathBuf::from("sv2v"));
        // not relative
        assert_eq!(resolve_rel_path(dir.path(), "/bin/svinst"), PathBuf::from("/bin/svinst"));
    }

    #[test]
    fn latin1_and_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.vhd");
        // "é" in utf-8 is two bytes
        std::fs::write(&path, "x <= 'é';\n").unwrap();
        let text = read_latin1(&path).unwrap();
        assert_eq!(text.chars().count(), 11);
        assert_eq!(to_ascii_lossy(&text), "x <= '??';\n");
    }

    #[test]
    fn atomic_write_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.vhd");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn atomic_write_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dr_top.vhdl");
        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

        write_atomic(&path, b"first").unwrap();
        assert_eq!(mode(&path), 0o644);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o664)).unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(mode(&path), 0o664);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
