//! Reduce a set of drawings to the latest revision of each.

use crate::model::{DrawingId, ParsedName, Revision};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keep one path per drawing base, the one with the highest revision.
///
/// Names that aren't drawing numbers are dropped. Output follows the order in which each
/// base was first seen; each winner is returned exactly as it was passed in.
pub fn resolve_latest<I, P>(candidates: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut found: IndexMap<String, (Revision, PathBuf)> = IndexMap::new();

    for candidate in candidates {
        let path = candidate.as_ref();
        let id = match DrawingId::parse(path) {
            ParsedName::Parsed(id) => id,
            ParsedName::Unrecognized => {
                debug!("Skipping {}: not a drawing number", path.display());
                continue;
            }
        };

        match found.get_mut(&id.base) {
            Some((best, best_path)) => {
                if id.revision > *best {
                    *best = id.revision;
                    *best_path = path.to_path_buf();
                }
            }
            None => {
                found.insert(id.base, (id.revision, path.to_path_buf()));
            }
        }
    }

    found.into_values().map(|(_, path)| path).collect()
}
