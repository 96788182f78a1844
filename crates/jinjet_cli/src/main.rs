//! jinjet CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Usage error
//! - 3: Module load error
//! - 4: Vars file error
//! - 5: Template resolution error
//! - 6: Render error
//! - 7: Output write error

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

use cli::Cli;
use jinjet_render::{
    default_escape_exts, execute, parse_escape_exts, EnvironmentConfig, OutputSink, PipelineError,
    RenderRequest, TemplateSource,
};

/// CI-friendly exit codes, one per error category.
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const MODULE_LOAD: u8 = 3;
    pub const VARS_PARSE: u8 = 4;
    pub const TEMPLATE_RESOLUTION: u8 = 5;
    pub const RENDER: u8 = 6;
    pub const OUTPUT_WRITE: u8 = 7;
}

#[tokio::main]
async fn main() -> ExitCode {
    // Rendered output goes to stdout; diagnostics stay on stderr and are
    // quiet unless RUST_LOG opts in.
    let log_result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .try_init();
    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();
    let traceback = cli.traceback;

    match run(cli).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(err) => {
            if traceback {
                eprintln!("error: {err:?}");
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::from(categorize_error(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let source = if cli.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read template from stdin")?;
        TemplateSource::Inline(text)
    } else {
        match cli.template {
            Some(path) => TemplateSource::File(path),
            None => {
                return Err(
                    PipelineError::Usage("provide a TEMPLATE path or use --stdin".into()).into(),
                )
            }
        }
    };

    let escape_exts = match &cli.autoescape_exts {
        Some(raw) => parse_escape_exts(raw)?,
        None => default_escape_exts(),
    };

    let config = EnvironmentConfig {
        escape: cli.autoescape.into(),
        escape_exts,
        undefined: cli.undefined.into(),
        trim_blocks: cli.trim_blocks,
        lstrip_blocks: cli.lstrip_blocks,
        keep_trailing_newline: cli.keep_trailing_newline,
        newline: cli.newline_sequence,
        enable_async: cli.enable_async,
    };

    let output = match cli.output {
        Some(path) if path.as_os_str() != "-" => OutputSink::File(path),
        _ => OutputSink::Stdout,
    };

    let request = RenderRequest {
        source,
        modules: cli.modules,
        vars_files: cli.vars_files,
        pairs: cli.vars,
        search_paths: cli.searchpath,
        config,
        output,
    };
    debug!(
        "Rendering with {} modules, {} vars files, {} pairs",
        request.modules.len(),
        request.vars_files.len(),
        request.pairs.len()
    );

    if request.config.enable_async {
        tokio::task::spawn_blocking(move || execute(&request))
            .await
            .context("render task failed")??;
    } else {
        execute(&request)?;
    }
    Ok(())
}

/// Map a pipeline failure to its exit code.
fn categorize_error(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Usage(_)) => ExitCodes::USAGE,
        Some(PipelineError::Module(_)) => ExitCodes::MODULE_LOAD,
        Some(PipelineError::VarsFile(_)) => ExitCodes::VARS_PARSE,
        Some(PipelineError::Resolution { .. }) => ExitCodes::TEMPLATE_RESOLUTION,
        Some(PipelineError::Render { .. }) => ExitCodes::RENDER,
        Some(PipelineError::OutputWrite { .. }) => ExitCodes::OUTPUT_WRITE,
        None => ExitCodes::GENERAL_ERROR,
    }
}
