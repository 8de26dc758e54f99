//! The external CAD engine.

use crate::config::{locate_accore, AUTODESK_DIR, ENGINE_LOCALE};
use crate::error::{PackError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Something that can open a drawing and run a script against it.
///
/// Plots are a side effect of the script; nothing is read back from the engine, so callers
/// check for the expected output files afterwards.
pub trait CadEngine: Send + Sync {
    /// Open `drawing` and run `script`. Only a failure to start the engine is an error.
    fn run_script(&self, drawing: &Path, script: &Path) -> Result<()>;
}

/// AutoCAD core console (`accoreconsole.exe`).
#[derive(Debug, Clone)]
pub struct AccoreConsole {
    executable: PathBuf,
}

impl AccoreConsole {
    /// Use the console at `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Find the newest AutoCAD install under the default Autodesk folder.
    pub fn discover() -> Result<Self> {
        locate_accore(Path::new(AUTODESK_DIR)).map(Self::new)
    }

    /// Path of the console executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The invocation as it would be typed at a prompt.
    pub fn command_line(&self, drawing: &Path, script: &Path) -> String {
        format!(
            "\"{}\" /i \"{}\" /s \"{}\" /l \"{}\"",
            self.executable.display(),
            drawing.display(),
            script.display(),
            ENGINE_LOCALE
        )
    }

    fn command(&self, drawing: &Path, script: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("/i")
            .arg(drawing)
            .arg("/s")
            .arg(script)
            .arg("/l")
            .arg(ENGINE_LOCALE)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl CadEngine for AccoreConsole {
    fn run_script(&self, drawing: &Path, script: &Path) -> Result<()> {
        debug!("{}", self.command_line(drawing, script));
        let status = self
            .command(drawing, script)
            .status()
            .map_err(|source| PackError::EngineLaunch {
                executable: self.executable.clone(),
                source,
            })?;
        debug!("{} finished with {}", drawing.display(), status);
        Ok(())
    }
}
