//! Rendering jobs handed to the CAD engine.

use crate::config::MODEL_PDF_SUFFIX;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which sheet of a drawing a job plots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Sheet {
    /// The modelspace view.
    Model,
    /// A named paperspace layout, as stored in the drawing.
    Layout(String),
}

/// One engine invocation: plot `sheet` of `drawing` into `dest` using `script`.
///
/// Every job of a run gets its own script path and output name.
#[derive(Debug, Clone, Serialize)]
pub struct RenderJob {
    /// Position in the fan-out, used to name the per-job script.
    pub index: usize,
    /// Drawing to open.
    pub drawing: PathBuf,
    /// Sheet selector.
    pub sheet: Sheet,
    /// Plot script the engine runs.
    pub script: PathBuf,
    /// Directory the drawing lives in and the plot lands in.
    pub dest: PathBuf,
}

impl RenderJob {
    /// Create a modelspace job.
    pub fn model(index: usize, drawing: PathBuf, script: PathBuf) -> Self {
        let dest = parent_dir(&drawing);
        Self {
            index,
            drawing,
            sheet: Sheet::Model,
            script,
            dest,
        }
    }

    /// Create a layout job.
    pub fn layout(index: usize, drawing: PathBuf, label: impl Into<String>, script: PathBuf) -> Self {
        let dest = parent_dir(&drawing);
        Self {
            index,
            drawing,
            sheet: Sheet::Layout(label.into()),
            script,
            dest,
        }
    }

    /// Drawing file stem.
    pub fn stem(&self) -> String {
        self.drawing
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Where the engine writes the plot: `<stem>-Model.pdf` or `<stem>-<layout>.pdf`.
    pub fn raw_output(&self) -> PathBuf {
        let stem = self.stem();
        match &self.sheet {
            Sheet::Model => self.dest.join(format!("{stem}{MODEL_PDF_SUFFIX}")),
            Sheet::Layout(label) => self.dest.join(format!("{stem}-{label}.pdf")),
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
