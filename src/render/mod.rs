//! Plotting drawings through the CAD engine and merging the results.

mod engine;
mod fanout;
mod layouts;
mod merge;
mod model_space;
mod paper_space;

pub use engine::{AccoreConsole, CadEngine};
pub use fanout::run_all;
pub use layouts::{enumerate_layouts, parse_layout_list, sheet_list_script};
pub use merge::{LopdfMerger, PdfMerger};
pub use model_space::{default_model_output, render_model, ModelPack};
pub use paper_space::{layout_script, render_paper, PaperPack};

use crate::config::PlotConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Collaborators shared by the jobs of one run.
pub struct Renderer<'a> {
    /// Engine that plots.
    pub engine: &'a dyn CadEngine,
    /// Merger that builds the package.
    pub merger: &'a mut dyn PdfMerger,
    /// Scripts and scratch locations.
    pub config: &'a PlotConfig,
}

impl<'a> Renderer<'a> {
    /// Bundle the collaborators for a run.
    pub fn new(
        engine: &'a dyn CadEngine,
        merger: &'a mut dyn PdfMerger,
        config: &'a PlotConfig,
    ) -> Self {
        Self {
            engine,
            merger,
            config,
        }
    }
}

/// What one merged package ended up containing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Drawing the package was built from (the first drawing for modelspace).
    pub source: PathBuf,
    /// Combined PDF, if anything was merged.
    pub output: Option<PathBuf>,
    /// Bookmark titles in merge order.
    pub bookmarks: Vec<String>,
    /// Expected plots that never appeared.
    pub skipped: Vec<PathBuf>,
    /// Individual sheet PDFs left on disk.
    pub kept: Vec<PathBuf>,
}

impl std::fmt::Display for JobReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.output {
            Some(output) => write!(f, "{}", output.display()),
            None => write!(f, "Nothing plotted from '{}'", self.source.display()),
        }
    }
}

/// Whether two paths name the same directory. An empty path is the working directory.
pub(crate) fn same_dir(a: &Path, b: &Path) -> bool {
    let (a, b) = (or_cwd(a), or_cwd(b));
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn or_cwd(dir: &Path) -> &Path {
    if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    }
}

/// Place `name` in `dir` with a `.pdf` extension.
pub(crate) fn pdf_in(dir: &Path, name: &Path) -> PathBuf {
    dir.join(name).with_extension("pdf")
}

/// Copy `drawing` into `dest`, returning the copy's path.
///
/// Refuses to copy a file onto itself; the copy is deleted at cleanup.
pub(crate) fn stage(drawing: &Path, dest: &Path) -> crate::Result<PathBuf> {
    let name = drawing.file_name().unwrap_or(drawing.as_os_str());
    let copy = dest.join(name);
    let copy_error = |source| crate::PackError::Copy {
        from: drawing.to_path_buf(),
        to: copy.clone(),
        source,
    };

    if let (Ok(from), Ok(to)) = (std::fs::canonicalize(drawing), std::fs::canonicalize(&copy)) {
        if from == to {
            return Err(copy_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "source and destination are the same file",
            )));
        }
    }
    std::fs::copy(drawing, &copy).map_err(copy_error)?;
    Ok(copy)
}
