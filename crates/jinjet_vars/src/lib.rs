//! # jinjet_vars
//!
//! Variable sources for jinjet.
//!
//! This crate acquires template variables from the three supported origins
//! and folds them into a single context:
//!
//! - Vars files (json / yaml / toml / ini), dispatched by extension
//! - Rhai modules, evaluated into isolated namespaces
//! - Explicit `KEY=VALUE` pairs
//!
//! Precedence is fixed: modules < vars files < explicit pairs, and within
//! a group the last-listed occurrence wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use jinjet_vars::{assemble_context, load_module, load_vars_file};
//!
//! let modules = vec![load_module(Path::new("extras.rhai")).unwrap()];
//! let files = vec![load_vars_file(Path::new("vars.yaml")).unwrap()];
//! let pairs = vec![("greeting".to_string(), "hello".to_string())];
//!
//! let context = assemble_context(modules, files, pairs);
//! ```

pub mod context;
pub mod error;
pub mod formats;
pub mod module;

pub use context::{assemble_context, Context};
pub use error::{ModuleError, VarsFileError};
pub use formats::{load_vars_file, INI_DEFAULT_SECTION, SUPPORTED_EXTENSIONS};
pub use module::load_module;
