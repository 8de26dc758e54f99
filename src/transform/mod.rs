//! Naming rules applied to matched drawings and plotted sheets.

mod latest;
mod sheet_name;

pub use latest::resolve_latest;
pub use sheet_name::{base_name, derive_suffix, sheet_width};
pub(crate) use sheet_name::{prefix, skip};
