use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files directly inside `dir` whose name ends with `suffix`, sorted.
///
/// A missing directory yields an empty list rather than an error.
pub fn list_files_with_suffix<P: AsRef<Path>>(dir: P, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut result = Vec::new();

    if !dir.exists() {
        return Ok(result);
    }

    for entry in fs::read_dir(dir)? {
        let entry_path = entry?.path();
        let matches = entry_path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.len() > suffix.len() && name.ends_with(suffix));
        if matches && entry_path.is_file() {
            result.push(entry_path);
        }
    }

    result.sort();
    Ok(result)
}

/// Plugin name encoded in a library file name: `suffix` removed, then
/// `prefix` removed if present (`libMathOps.so` -> `MathOps`).
pub fn plugin_name_from_file(path: &Path, prefix: &str, suffix: &str) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(suffix)?;
    let name = if prefix.is_empty() {
        stem
    } else {
        stem.strip_prefix(prefix).unwrap_or(stem)
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
