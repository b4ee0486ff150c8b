//! Error types for the scaffolding pipeline.
//!
//! Every variant is fatal: the run stops at the first error and the CLI maps it
//! to a non-zero exit. Files already flushed before the failure stay on disk.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for a `tabletest` run.
#[derive(Debug, Error)]
pub enum Error {
    /// A source file produced a syntax tree with error or missing nodes.
    #[error("failed to parse {}:{line}:{column}", path.display())]
    StructuralParse { path: PathBuf, line: usize, column: usize },

    /// Reading, creating, or writing a file failed.
    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A node span does not fit the bytes of the file it came from.
    #[error("span {start}..{end} out of range for {} ({len} bytes)", path.display())]
    PositionRange { path: PathBuf, start: usize, end: usize, len: usize },

    /// The formatter or import organizer could not run or exited non-zero.
    #[error("{tool} failed on {}: {status}", path.display())]
    PostProcess { tool: String, path: PathBuf, status: String },

    /// An `init` step (tool install or mock generation) could not run or exited non-zero.
    #[error("`{command}` failed: {status}")]
    ToolInstall { command: String, status: String },

    /// `.tabletest.toml` exists but is not usable.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileSystem { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
