//! Error types for variable sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a scripted variable module.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Module not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Module must be a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Failed to compile module {}: {message}", path.display())]
    Compile { path: PathBuf, message: String },

    #[error("Failed to load module {}: {message}", path.display())]
    Eval { path: PathBuf, message: String },
}

/// Errors raised while loading a structured vars file.
#[derive(Error, Debug)]
pub enum VarsFileError {
    #[error("Vars file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Vars file must be a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Unsupported vars file type for {} (expected one of: {expected})", path.display())]
    UnsupportedFormat { path: PathBuf, expected: String },

    #[error("Malformed {format} in vars file {}: {message}", path.display())]
    Malformed {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Variables file {} is empty; expected a mapping", .0.display())]
    Empty(PathBuf),

    #[error("Variables file {} must contain a mapping at the root", .0.display())]
    NotAMapping(PathBuf),

    #[error("{format} support is not compiled in (needed for {}); {hint}", path.display())]
    MissingDependency {
        format: &'static str,
        path: PathBuf,
        hint: &'static str,
    },

    #[error("Failed to read vars file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
