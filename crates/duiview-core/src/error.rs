//! Error types for DuiView

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using DuiView's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the preview pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The skin XML is malformed
    #[error("XML parse error: {0}")]
    Parse(#[from] xmltree::ParseError),

    /// Re-serializing the prepared document failed
    #[error("XML write error: {0}")]
    Serialize(#[from] xmltree::Error),

    /// The serialized document was not valid UTF-8
    #[error("XML output encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The renderer executable could not be started
    #[error("failed to launch renderer {}: {source}", .path.display())]
    RendererSpawn {
        /// Path the spawn was attempted with
        path: PathBuf,
        /// Underlying spawn failure
        source: std::io::Error,
    },

    /// The renderer exited with a non-zero status
    #[error("renderer exited with status {code:?}: {stderr}")]
    RendererExit {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured renderer diagnostics
        stderr: String,
    },

    /// The renderer did not finish within the allowed time and was killed
    #[error("renderer timed out after {0:?}")]
    RendererTimeout(Duration),

    /// Preference storage read or write failure
    #[error("preference storage error: {0}")]
    Storage(String),

    /// File watching failure
    #[error("file watcher error: {0}")]
    Watch(String),

    /// Inbound message carried a kind outside the known preference set
    #[error("unknown option kind: {0}")]
    UnknownOption(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
