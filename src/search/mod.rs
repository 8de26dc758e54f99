//! Locating drawings from a user search term.

mod files;
mod pattern;

pub use files::{count_matches, find_matches};
pub use pattern::{glob_to_regex, normalize};
