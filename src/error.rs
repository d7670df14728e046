//! Error types produced while parsing and replaying a transcript.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the parser, the interpreter and the session glue.
///
/// Line numbers are 1-based and refer to the transcript as it was read.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line_no}: cannot parse {line:?}")]
    MalformedLine { line_no: usize, line: String },

    #[error("line {line_no}: invalid file size {size:?}")]
    InvalidSize { line_no: usize, size: String },

    #[error("line {line_no}: `cd ..` would leave the root directory")]
    AboveRoot { line_no: usize },

    #[error("line {line_no}: no such directory {path:?}")]
    NoSuchDirectory { line_no: usize, path: PathBuf },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shell not found: {0}")]
    ShellNotFound(String),
}

impl ReplayError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReplayError::Io {
            path: path.into(),
            source,
        }
    }
}
