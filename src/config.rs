//! Configuration constants and settings for the packager.

use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Width of the drawing prefix shared by every sheet of a drawing (`5300XXXXXX-VWC-MS-DWG-YYYYY`).
pub const BASE_NAME_WIDTH: usize = 27;

/// Offset of the revision marker in a single-sheet drawing stem (`...-YYYYY-01` is 30 wide).
pub const REVISION_OFFSET: usize = 30;

/// Minimum width of a canonical sheet number.
pub const MIN_SHEET_WIDTH: usize = 2;

/// Document-type code restored when the user searches by bare number.
pub const DRAWING_TYPE_FILTER: &str = "DWG";

/// Drawing file extension.
pub const DRAWING_EXTENSION: &str = "dwg";

/// Name of the implicit modelspace layout.
pub const MODEL_LAYOUT: &str = "Model";

/// Suffix the engine appends to a modelspace plot.
pub const MODEL_PDF_SUFFIX: &str = "-Model.pdf";

/// Locale passed to the engine.
pub const ENGINE_LOCALE: &str = "en-US";

/// Line of the layout plot script holding the layout name.
pub const SHEET_LINE: usize = 2;

/// Log files the engine leaves in the working directory.
pub const PLOT_LOGS: [&str; 2] = ["plot.log", "hardcopy.log"];

/// Default AutoCAD install root.
pub const AUTODESK_DIR: &str = "C:/Program Files/Autodesk";

/// Core console executable name.
pub const ACCORE_EXE: &str = "accoreconsole.exe";

/// Scratch file receiving the layout list.
pub const LAYOUT_LIST_FILE: &str = "layouts.txt";

/// Scratch script dumping the layout list.
pub const SHEET_LIST_SCRIPT: &str = "sheetlist.scr";

/// Scratch copy of the modelspace plot script.
pub const MODEL_SCRIPT_FILE: &str = "pdfgen11x17model.scr";

/// Built-in modelspace plot script (11x17, DWG To PDF, monochrome).
pub const MODEL_PLOT_SCRIPT: &str = include_str!("../scripts/pdfgen11x17model.scr");

/// Built-in layout plot script. Line [`SHEET_LINE`] is replaced by the layout name.
pub const LAYOUT_PLOT_SCRIPT: &str = include_str!("../scripts/pdfgen11x17layout.scr");

/// Which sheets of a drawing get plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// One page per drawing.
    #[default]
    Model,
    /// One page per named layout.
    Paper,
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Space::Model => write!(f, "modelspace"),
            Space::Paper => write!(f, "paperspace"),
        }
    }
}

/// Plot settings shared by every job of a run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Where the layout-dump script, layout list and modelspace script are written.
    pub scratch_dir: PathBuf,
    /// Directory the engine drops its plot logs in.
    pub log_dir: PathBuf,
    /// Modelspace plot script contents.
    pub model_script: String,
    /// Layout plot script template.
    pub layout_script: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            log_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            model_script: MODEL_PLOT_SCRIPT.to_string(),
            layout_script: LAYOUT_PLOT_SCRIPT.to_string(),
        }
    }
}

impl PlotConfig {
    /// Create a configuration writing scratch files to `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            ..Default::default()
        }
    }

    /// Set the directory plot logs are removed from.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Replace the modelspace plot script with the contents of `path`.
    pub fn with_model_script_file(mut self, path: &Path) -> Result<Self> {
        self.model_script = std::fs::read_to_string(path).map_err(|source| PackError::Script {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self)
    }

    /// Replace the layout plot template with the contents of `path`.
    pub fn with_layout_script_file(mut self, path: &Path) -> Result<Self> {
        self.layout_script = std::fs::read_to_string(path).map_err(|source| PackError::Script {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self)
    }

    /// Path of the layout list file.
    pub fn layout_list_path(&self) -> PathBuf {
        self.scratch_dir.join(LAYOUT_LIST_FILE)
    }

    /// Path of the layout-dump script.
    pub fn sheet_list_script_path(&self) -> PathBuf {
        self.scratch_dir.join(SHEET_LIST_SCRIPT)
    }

    /// Path the modelspace script is materialized to.
    pub fn model_script_path(&self) -> PathBuf {
        self.scratch_dir.join(MODEL_SCRIPT_FILE)
    }
}

/// Directory next to the running executable, falling back to the working directory.
pub fn default_scratch_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Find `accoreconsole.exe` in the newest `AutoCAD*` folder under `base`.
pub fn locate_accore(base: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(base).map_err(|_| PackError::EngineNotFound {
        base: base.to_path_buf(),
    })?;

    let mut installs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| entry.file_name().to_string_lossy().contains("AutoCAD"))
        .map(|entry| entry.path())
        .collect();
    installs.sort();

    installs
        .pop()
        .map(|install| install.join(ACCORE_EXE))
        .ok_or_else(|| PackError::EngineNotFound {
            base: base.to_path_buf(),
        })
}
