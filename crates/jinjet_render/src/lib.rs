//! # jinjet_render
//!
//! Template resolution, environment configuration, and render
//! orchestration for jinjet.
//!
//! The pipeline runs one deterministic pass per invocation: variable
//! sources are loaded and assembled (see `jinjet_vars`), the template
//! source is resolved to an engine lookup name plus ordered search
//! directories, the escaping decision is computed, a MiniJinja environment
//! is built from the [`EnvironmentConfig`], and the rendered text is
//! written to the output sink only after rendering has fully succeeded.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jinjet_render::{
//!     execute, EnvironmentConfig, OutputSink, RenderRequest, TemplateSource,
//! };
//!
//! let request = RenderRequest {
//!     source: TemplateSource::File("template.j2".into()),
//!     modules: Vec::new(),
//!     vars_files: Vec::new(),
//!     pairs: vec![("name".to_string(), "World".to_string())],
//!     search_paths: Vec::new(),
//!     config: EnvironmentConfig::default(),
//!     output: OutputSink::Stdout,
//! };
//! execute(&request).unwrap();
//! ```

pub mod env;
pub mod error;
pub mod escape;
pub mod pipeline;
pub mod source;

pub use env::{build_environment, EnvironmentConfig, NewlineSequence, UndefinedPolicy};
pub use error::{PipelineError, PipelineResult};
pub use escape::{
    default_escape_exts, escape_active, parse_escape_exts, EscapeMode, DEFAULT_ESCAPE_EXTS,
};
pub use pipeline::{execute, render, write_output, OutputSink, RenderRequest};
pub use source::{
    resolve_template, stdin_template_name, ResolvedTemplate, TemplateSource,
    STDIN_TEMPLATE_BASENAME,
};
