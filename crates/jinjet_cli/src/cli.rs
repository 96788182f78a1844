//! CLI argument definitions.
//!
//! The flag surface mirrors the render pipeline one-to-one: a source
//! (template path or stdin), three ordered variable groups, search paths,
//! and the engine behavior switches.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use jinjet_render::{EscapeMode, NewlineSequence, UndefinedPolicy};

const EXAMPLES: &str = "\
Examples:
  jinjet template.j2 -D name=World
  jinjet --stdin -D user=alice < template.j2
  cat ../template.j2 | jinjet --stdin -s ../includes
  jinjet emails/welcome.html --vars vars.yaml -m extras.rhai -o out.html
";

/// Render a Jinja template.
#[derive(Parser)]
#[command(name = "jinjet")]
#[command(version, about = "Render a Jinja template")]
#[command(after_help = EXAMPLES)]
#[command(group = ArgGroup::new("source").required(true).args(["template", "stdin"]))]
pub struct Cli {
    /// Path to a template file
    pub template: Option<PathBuf>,

    /// Read template from STDIN (heredoc/pipe)
    #[arg(long)]
    pub stdin: bool,

    /// Set a string variable (can repeat). Highest precedence
    #[arg(
        short = 'D',
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value
    )]
    pub vars: Vec<(String, String)>,

    /// Load variables from FILE [json|yaml|toml|ini] (can repeat).
    /// Top-level must be a mapping
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_files: Vec<PathBuf>,

    /// Evaluate a Rhai file; its top-level bindings become variables
    /// (can repeat)
    #[arg(short = 'm', long = "module", value_name = "PATH")]
    pub modules: Vec<PathBuf>,

    /// Add a directory to look for included/imported templates (can
    /// repeat). Always includes the template's directory; defaults to the
    /// working directory when --stdin is used
    #[arg(short = 's', long = "searchpath", value_name = "PATH")]
    pub searchpath: Vec<PathBuf>,

    /// HTML/XML escaping policy. smart chooses by extension; on always;
    /// off never
    #[arg(long, value_enum, default_value_t = EscapeArg::Smart)]
    pub autoescape: EscapeArg,

    /// Override extensions used by smart autoescape
    /// (default: html,htm,xml,xhtml)
    #[arg(long = "autoescape-exts", value_name = "EXT,EXT")]
    pub autoescape_exts: Option<String>,

    /// How to handle missing variables
    #[arg(long, value_enum, default_value_t = UndefinedArg::Strict)]
    pub undefined: UndefinedArg,

    /// Strip the first newline after a block
    #[arg(long)]
    pub trim_blocks: bool,

    /// Strip leading spaces/tabs from the start of a line to a block
    #[arg(long)]
    pub lstrip_blocks: bool,

    /// Keep a single trailing newline at the end of the output
    #[arg(long)]
    pub keep_trailing_newline: bool,

    /// Newline characters to use in output: \n, \r\n, \r (or LF/CRLF/CR)
    #[arg(
        long = "newline-sequence",
        value_name = "SEQ",
        default_value = "\\n",
        value_parser = parse_newline_sequence
    )]
    pub newline_sequence: NewlineSequence,

    /// Run the render on the blocking thread pool
    #[arg(long = "enable-async")]
    pub enable_async: bool,

    /// Write output to PATH ('-' for stdout). Existing files will be
    /// overwritten
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Show the full error chain on failures
    #[arg(long)]
    pub traceback: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EscapeArg {
    Smart,
    On,
    Off,
}

impl From<EscapeArg> for EscapeMode {
    fn from(arg: EscapeArg) -> Self {
        match arg {
            EscapeArg::Smart => EscapeMode::Smart,
            EscapeArg::On => EscapeMode::On,
            EscapeArg::Off => EscapeMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UndefinedArg {
    Strict,
    Default,
    Debug,
    Chain,
}

impl From<UndefinedArg> for UndefinedPolicy {
    fn from(arg: UndefinedArg) -> Self {
        match arg {
            UndefinedArg::Strict => UndefinedPolicy::Strict,
            UndefinedArg::Default => UndefinedPolicy::Default,
            UndefinedArg::Debug => UndefinedPolicy::Debug,
            UndefinedArg::Chain => UndefinedPolicy::Chain,
        }
    }
}

fn parse_key_value(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some(("", _)) => Err("variable key cannot be empty".to_string()),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got: {pair}")),
    }
}

fn parse_newline_sequence(token: &str) -> Result<NewlineSequence, String> {
    NewlineSequence::from_token(token)
        .ok_or_else(|| "accepts one of \\n, \\r\\n, or \\r (also LF/CRLF/CR)".to_string())
}
