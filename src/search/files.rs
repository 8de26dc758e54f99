//! Directory lookup for normalized match patterns.

use super::pattern::glob_to_regex;
use crate::error::{PackError, Result};
use std::path::{Path, PathBuf};

/// Return the names of the files in `source` matching `pattern`, sorted.
///
/// Only the directory itself is searched. The returned paths are bare file names,
/// relative to `source`.
pub fn find_matches(pattern: &str, source: &Path) -> Result<Vec<PathBuf>> {
    let regex = glob_to_regex(pattern)?;
    let entries = std::fs::read_dir(source).map_err(|e| PackError::ReadDir {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PackError::ReadDir {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        if regex.is_match(&name.to_string_lossy()) {
            matches.push(PathBuf::from(name));
        }
    }

    matches.sort();
    Ok(matches)
}

/// How many files in `source` match `pattern`.
pub fn count_matches(pattern: &str, source: &Path) -> Result<usize> {
    find_matches(pattern, source).map(|matches| matches.len())
}
