//! Error taxonomy for the render pipeline.
//!
//! One variant per pipeline stage; nothing leaves the pipeline
//! unclassified, so the CLI can map each failure to its own exit code.

use std::path::PathBuf;
use thiserror::Error;

use jinjet_vars::{ModuleError, VarsFileError};

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised by the render pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid invocation: bad source selection, search path, or flag value.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    VarsFile(#[from] VarsFileError),

    /// The template itself, or an included/imported template, was not found.
    #[error("Template resolution failed: {message}")]
    Resolution {
        message: String,
        #[source]
        source: Option<minijinja::Error>,
    },

    /// The engine failed while compiling or evaluating the template.
    #[error("Failed to render {name}: {message}")]
    Render {
        name: String,
        message: String,
        #[source]
        source: minijinja::Error,
    },

    /// The rendered output could not be written.
    #[error("Failed to write output to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
