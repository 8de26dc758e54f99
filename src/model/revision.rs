//! Drawing revision codes and their ordering.

use serde::Serialize;
use std::cmp::Ordering;

/// A revision code as written after `-R` in a drawing name.
///
/// Numeric revisions are issued drawings and always outrank alphabetic (preliminary)
/// ones, whatever their values. Numerics compare as integers, alphabetics by text.
#[derive(Debug, Clone, Serialize)]
pub enum Revision {
    /// All ASCII digits, e.g. `0`, `1`, `34`.
    Numeric(String),
    /// Anything else, e.g. `A`, `B`.
    Alpha(String),
}

impl Revision {
    /// Classify a revision code.
    pub fn parse(code: &str) -> Self {
        if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
            Revision::Numeric(code.to_string())
        } else {
            Revision::Alpha(code.to_string())
        }
    }

    /// The code exactly as it appeared in the file name.
    pub fn as_str(&self) -> &str {
        match self {
            Revision::Numeric(code) | Revision::Alpha(code) => code,
        }
    }

    /// Whether this is a numeric revision.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Revision::Numeric(_))
    }
}

/// Compare digit strings by value without parsing, so long codes can't overflow.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Revision::Numeric(a), Revision::Numeric(b)) => cmp_digits(a, b),
            (Revision::Numeric(_), Revision::Alpha(_)) => Ordering::Greater,
            (Revision::Alpha(_), Revision::Numeric(_)) => Ordering::Less,
            (Revision::Alpha(a), Revision::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Revision {}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
