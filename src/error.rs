//! Error types for drawing package runs.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes reported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The user asked for something that isn't there (1)
    UserInput = 1,
    /// CAD engine missing or could not be launched (2)
    Engine = 2,
    /// Filesystem failure (3)
    Io = 3,
    /// PDF read or write failure (4)
    Pdf = 4,
}

/// Main error type for the packager.
///
/// Conditions the user can fix (missing source, nothing matched) are not errors; they are
/// reported through [`crate::app::PackOutcome`].
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Could not locate accoreconsole.exe under {base}")]
    EngineNotFound { base: PathBuf },

    #[error("Failed to launch {executable}: {source}")]
    EngineLaunch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid match pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Failed to read PDF {path}: {source}")]
    PdfRead {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Malformed PDF {path}: {message}")]
    PdfStructure { path: PathBuf, message: String },

    #[error("Failed to write PDF {path}: {message}")]
    PdfWrite { path: PathBuf, message: String },

    #[error("Nothing to merge into {path}")]
    EmptyMerge { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PackError::EngineNotFound { .. } | PackError::EngineLaunch { .. } => {
                ErrorCode::Engine
            }
            PackError::Pattern { .. } => ErrorCode::UserInput,
            PackError::ReadDir { .. }
            | PackError::Copy { .. }
            | PackError::Rename { .. }
            | PackError::Script { .. }
            | PackError::Io(_) => ErrorCode::Io,
            PackError::PdfRead { .. }
            | PackError::PdfStructure { .. }
            | PackError::PdfWrite { .. }
            | PackError::EmptyMerge { .. } => ErrorCode::Pdf,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for packager operations.
pub type Result<T> = std::result::Result<T, PackError>;
