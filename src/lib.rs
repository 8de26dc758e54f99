//! drawing-pack - Plot CAD drawings to PDF and merge them into drawing packages.
//!
//! Drawings are found by a loose drawing-number search, optionally reduced to their latest
//! revision, plotted through the AutoCAD core console (modelspace, or one page per
//! paperspace layout) and merged into a single bookmarked PDF.
//!
//! # Example
//!
//! ```no_run
//! use drawing_pack_rs::{run, AccoreConsole, LopdfMerger, PackRequest, PlotConfig};
//!
//! let engine = AccoreConsole::discover().unwrap();
//! let mut merger = LopdfMerger::new();
//! let request = PackRequest::new("00200", "P:/Projects/5300221014/Drawings");
//! let outcome = run(&request, &engine, &mut merger, &PlotConfig::default()).unwrap();
//! println!("{}", outcome);
//! ```

pub mod app;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod search;
pub mod transform;

// Re-exports for convenience
pub use app::{output_names, plan, run, PackOutcome, PackPlan, PackRequest, Plan};
pub use config::{PlotConfig, Space};
pub use error::{ErrorCode, PackError, Result};
pub use model::{DrawingId, ParsedName, RenderJob, Revision, Sheet};
pub use render::{AccoreConsole, CadEngine, JobReport, LopdfMerger, PdfMerger};
pub use search::normalize;
pub use transform::{derive_suffix, resolve_latest};
