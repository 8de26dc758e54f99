//! Data model for drawing packages.

mod drawing;
mod job;
mod revision;

pub use drawing::{DrawingId, ParsedName};
pub use job::{RenderJob, Sheet};
pub use revision::Revision;
