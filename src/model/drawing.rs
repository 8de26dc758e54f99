//! Drawing identifiers parsed from file names.

use super::revision::Revision;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// 5300600002-VWC-MS-SPC-00001-00-R34
// base: 5300600002-VWC-MS-SPC-00001-00, rev: 34
static DRAWING_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>\w{10}-\w{3}-\w{2}-\w{3}-\w{5}.*)-R(?P<rev>\w+)$")
        .expect("Invalid drawing identifier regex")
});

/// A drawing number split into its base and revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawingId {
    /// Project, discipline, space, type, sequence and sub-sheet: everything before `-R`.
    pub base: String,
    /// Revision code.
    pub revision: Revision,
    /// File extension without the dot, if any.
    pub extension: Option<String>,
}

/// Outcome of reading a file name as a drawing identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    Parsed(DrawingId),
    /// Not a drawing number; callers skip these.
    Unrecognized,
}

impl ParsedName {
    /// The identifier, if the name was recognized.
    pub fn into_parsed(self) -> Option<DrawingId> {
        match self {
            ParsedName::Parsed(id) => Some(id),
            ParsedName::Unrecognized => None,
        }
    }
}

impl DrawingId {
    /// Parse the file name of `path` (any directory part is ignored).
    pub fn parse(path: &Path) -> ParsedName {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return ParsedName::Unrecognized;
        };
        let Some(caps) = DRAWING_ID.captures(stem) else {
            return ParsedName::Unrecognized;
        };

        ParsedName::Parsed(DrawingId {
            base: caps["base"].to_string(),
            revision: Revision::parse(&caps["rev"]),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
        })
    }

    /// The file stem, `{base}-R{rev}`.
    pub fn stem(&self) -> String {
        format!("{}-R{}", self.base, self.revision)
    }

    /// The file name with the original extension.
    pub fn file_name(&self) -> PathBuf {
        match &self.extension {
            Some(ext) => PathBuf::from(format!("{}.{ext}", self.stem())),
            None => PathBuf::from(self.stem()),
        }
    }
}
