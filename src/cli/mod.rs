//! CLI support for velafix
//!
//! The driver around the library: file and directory selection, no-op
//! detection, per-document error isolation and the process summary.

mod fix;
mod logging;

pub use fix::{FixOptions, FixSummary, FixedSource, Failure, fix_path, fix_source, run};
pub use logging::setup_logging;

use crate::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("no input provided, pass paths or pipe a document to stdin")]
    NoInput,

    #[error("failed to set up logging: {0}")]
    Logging(String),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
