//! Render orchestration.
//!
//! One pass: load variable sources, assemble the context, resolve the
//! template, build the environment, render, write. Any failure aborts the
//! remaining stages; output is only written after the render has fully
//! completed in memory.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use minijinja::ErrorKind;
use tracing::{debug, info};

use jinjet_vars::{assemble_context, load_module, load_vars_file, Context};

use crate::env::{apply_newline_sequence, build_environment, EnvironmentConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::source::{resolve_template, TemplateSource};

/// Destination for rendered output.
#[derive(Debug, Clone, Default)]
pub enum OutputSink {
    #[default]
    Stdout,
    /// Write to a file; parent directories are created as needed.
    File(PathBuf),
}

/// Everything one invocation needs. Built by the CLI layer; the repeatable
/// flag groups keep their command-line order.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: TemplateSource,
    /// Module paths, lowest precedence tier.
    pub modules: Vec<PathBuf>,
    /// Vars file paths, middle tier.
    pub vars_files: Vec<PathBuf>,
    /// Explicit `KEY=VALUE` pairs, highest tier.
    pub pairs: Vec<(String, String)>,
    /// Extra include/import directories.
    pub search_paths: Vec<PathBuf>,
    pub config: EnvironmentConfig,
    pub output: OutputSink,
}

/// Run the pipeline and return the rendered text without writing it.
pub fn render(request: &RenderRequest) -> PipelineResult<String> {
    let modules = request
        .modules
        .iter()
        .map(|path| load_module(path))
        .collect::<Result<Vec<Context>, _>>()?;
    let vars_files = request
        .vars_files
        .iter()
        .map(|path| load_vars_file(path))
        .collect::<Result<Vec<Context>, _>>()?;
    let context = assemble_context(modules, vars_files, request.pairs.clone());
    debug!("Assembled context with {} variables", context.len());

    let resolved = resolve_template(
        &request.source,
        &request.output,
        &request.search_paths,
        &request.config.escape_exts,
    )?;

    let env = build_environment(&request.config, &resolved)?;
    let template = env
        .get_template(&resolved.name)
        .map_err(|err| classify_engine_error(&resolved.name, err))?;
    let rendered = template
        .render(&context)
        .map_err(|err| classify_engine_error(&resolved.name, err))?;
    info!("Rendered template '{}'", resolved.name);

    Ok(apply_newline_sequence(rendered, request.config.newline))
}

/// Run the pipeline and write the result to the configured sink.
pub fn execute(request: &RenderRequest) -> PipelineResult<()> {
    let rendered = render(request)?;
    write_output(&request.output, &rendered)
}

/// Write rendered text, creating parent directories for file sinks.
pub fn write_output(sink: &OutputSink, rendered: &str) -> PipelineResult<()> {
    match sink {
        OutputSink::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| PipelineError::OutputWrite {
                    path: PathBuf::from("-"),
                    source,
                })
        }
        OutputSink::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| PipelineError::OutputWrite {
                    path: path.clone(),
                    source,
                })?;
            }
            fs::write(path, rendered).map_err(|source| PipelineError::OutputWrite {
                path: path.clone(),
                source,
            })
        }
    }
}

/// Map an engine failure onto the pipeline taxonomy: unresolved names
/// (missing template or include) are resolution errors, everything else is
/// a render error.
fn classify_engine_error(name: &str, err: minijinja::Error) -> PipelineError {
    if matches!(err.kind(), ErrorKind::TemplateNotFound) {
        PipelineError::Resolution {
            message: err.to_string(),
            source: Some(err),
        }
    } else {
        PipelineError::Render {
            name: name.to_string(),
            message: err.to_string(),
            source: err,
        }
    }
}
