//! Template source resolution.
//!
//! Turns "a file path or stdin text" plus the search-path flags into a
//! loadable template reference: an engine lookup name, the ordered search
//! directories, and (for stdin) the inline text to register.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::OutputSink;

/// Basename of the synthetic name given to stdin templates.
pub const STDIN_TEMPLATE_BASENAME: &str = "__stdin__";

/// Where the template text comes from. Exactly one origin per invocation.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// A template file on disk.
    File(PathBuf),
    /// Raw template text captured from standard input.
    Inline(String),
}

/// A template reference the engine can load by name.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    /// Name used for engine lookup.
    pub name: String,
    /// Directories consulted for the template and its includes, in order.
    pub search_paths: Vec<PathBuf>,
    /// Inline template text (stdin source), registered under `name`.
    pub inline: Option<String>,
}

/// Resolve a template source against the output sink and search paths.
///
/// File templates search their own directory first, then the explicit
/// paths in listed order. Inline templates have no containing directory;
/// they search the current working directory first (an inline template may
/// still `include` other files), then the explicit paths.
pub fn resolve_template(
    source: &TemplateSource,
    output: &OutputSink,
    extra_paths: &[PathBuf],
    escape_exts: &[String],
) -> PipelineResult<ResolvedTemplate> {
    let extra = validated_search_paths(extra_paths)?;

    let resolved = match source {
        TemplateSource::File(path) => {
            if !path.exists() {
                return Err(PipelineError::Resolution {
                    message: format!("template not found: {}", path.display()),
                    source: None,
                });
            }
            if path.is_dir() {
                return Err(PipelineError::Resolution {
                    message: format!("template must be a file: {}", path.display()),
                    source: None,
                });
            }
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => {
                    return Err(PipelineError::Resolution {
                        message: format!("template must be a file: {}", path.display()),
                        source: None,
                    })
                }
            };
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let dir = dir.canonicalize().unwrap_or(dir);

            let mut search_paths = vec![dir];
            search_paths.extend(extra);
            ResolvedTemplate {
                name,
                search_paths,
                inline: None,
            }
        }
        TemplateSource::Inline(text) => {
            let name = stdin_template_name(output, escape_exts);
            let cwd = std::env::current_dir().map_err(|err| {
                PipelineError::Usage(format!("cannot determine current directory: {err}"))
            })?;

            let mut search_paths = vec![cwd];
            search_paths.extend(extra);
            ResolvedTemplate {
                name,
                search_paths,
                inline: Some(text.clone()),
            }
        }
    };

    debug!(
        "Resolved template '{}' with search paths {:?}",
        resolved.name, resolved.search_paths
    );
    Ok(resolved)
}

/// Synthetic engine name for a stdin template.
///
/// The extension is borrowed from the output destination when that
/// destination has one of the escape extensions, so Smart escaping can key
/// off it; otherwise plain text.
pub fn stdin_template_name(output: &OutputSink, escape_exts: &[String]) -> String {
    let mut ext = "txt".to_string();
    if let OutputSink::File(path) = output {
        if let Some(candidate) = path.extension().and_then(|e| e.to_str()) {
            let candidate = candidate.to_lowercase();
            if escape_exts.iter().any(|e| *e == candidate) {
                ext = candidate;
            }
        }
    }
    format!("{STDIN_TEMPLATE_BASENAME}.{ext}")
}

fn validated_search_paths(paths: &[PathBuf]) -> PipelineResult<Vec<PathBuf>> {
    paths
        .iter()
        .map(|raw| {
            if !raw.is_dir() {
                return Err(PipelineError::Usage(format!(
                    "search path must be an existing directory: {}",
                    raw.display()
                )));
            }
            Ok(raw.canonicalize().unwrap_or_else(|_| raw.to_path_buf()))
        })
        .collect()
}
