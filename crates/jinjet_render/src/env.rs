//! Engine environment configuration and construction.
//!
//! [`EnvironmentConfig`] is the closed set of engine options for one
//! invocation; [`build_environment`] maps it onto a MiniJinja environment
//! wired to a resolved template.

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};

use crate::error::{PipelineError, PipelineResult};
use crate::escape::{default_escape_exts, escape_active, EscapeMode};
use crate::source::ResolvedTemplate;

/// How undefined variables behave during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Fail the render on any use of an undefined variable.
    #[default]
    Strict,
    /// Render undefined as empty and treat it as falsy.
    Default,
    /// Accepted for CLI compatibility; renders with `Default` semantics.
    Debug,
    /// Allow attribute/index chains on undefined values.
    Chain,
}

/// Newline sequence used in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineSequence {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl NewlineSequence {
    /// Parse a CLI token: `\n`, `\r\n`, `\r` (escaped or literal) or
    /// `LF`/`CRLF`/`CR` in any case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "\\n" | "\n" => Some(Self::Lf),
            "\\r\\n" | "\r\n" => Some(Self::CrLf),
            "\\r" | "\r" => Some(Self::Cr),
            _ => match token.to_ascii_lowercase().as_str() {
                "lf" => Some(Self::Lf),
                "crlf" => Some(Self::CrLf),
                "cr" => Some(Self::Cr),
                _ => None,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }
}

/// Engine options for one invocation. Constructed once; immutable after.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Escaping policy.
    pub escape: EscapeMode,
    /// Extensions considered markup by [`EscapeMode::Smart`].
    pub escape_exts: Vec<String>,
    /// Undefined-variable policy.
    pub undefined: UndefinedPolicy,
    /// Strip the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip leading whitespace from a line up to a block tag.
    pub lstrip_blocks: bool,
    /// Keep a single trailing newline at the end of the output.
    pub keep_trailing_newline: bool,
    /// Newline sequence applied to the rendered output.
    pub newline: NewlineSequence,
    /// Run the render call on the blocking thread pool.
    pub enable_async: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            escape: EscapeMode::Smart,
            escape_exts: default_escape_exts(),
            undefined: UndefinedPolicy::Strict,
            trim_blocks: false,
            lstrip_blocks: false,
            keep_trailing_newline: false,
            newline: NewlineSequence::Lf,
            enable_async: false,
        }
    }
}

/// Build the engine environment for a resolved template.
///
/// The environment resolves the inline template (if any) and everything
/// else by name through the resolved search directories. Template sources
/// are canonicalized to `\n` newlines before parsing; the configured
/// newline sequence is applied to the rendered text afterwards.
pub fn build_environment(
    config: &EnvironmentConfig,
    resolved: &ResolvedTemplate,
) -> PipelineResult<Environment<'static>> {
    let mut env = Environment::new();
    env.set_undefined_behavior(match config.undefined {
        UndefinedPolicy::Strict => UndefinedBehavior::Strict,
        UndefinedPolicy::Default | UndefinedPolicy::Debug => UndefinedBehavior::Lenient,
        UndefinedPolicy::Chain => UndefinedBehavior::Chainable,
    });
    env.set_trim_blocks(config.trim_blocks);
    env.set_lstrip_blocks(config.lstrip_blocks);
    env.set_keep_trailing_newline(config.keep_trailing_newline);

    let mode = config.escape;
    let escape_exts = config.escape_exts.clone();
    env.set_auto_escape_callback(move |name: &str| {
        if escape_active(mode, name, &escape_exts) {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });

    let search_paths = resolved.search_paths.clone();
    env.set_loader(move |name: &str| -> Result<Option<String>, minijinja::Error> {
        // Lookup names must stay inside the search directories.
        if name.split(['/', '\\']).any(|segment| segment == "..") {
            return Ok(None);
        }
        for dir in &search_paths {
            let candidate = dir.join(name);
            if candidate.is_file() {
                let text = std::fs::read_to_string(&candidate).map_err(|err| {
                    minijinja::Error::new(
                        ErrorKind::InvalidOperation,
                        format!("failed to read template {}", candidate.display()),
                    )
                    .with_source(err)
                })?;
                return Ok(Some(normalize_newlines(&text)));
            }
        }
        Ok(None)
    });

    if let Some(text) = &resolved.inline {
        let normalized = normalize_newlines(text);
        env.add_template_owned(resolved.name.clone(), normalized)
            .map_err(|err| {
                let message = err.to_string();
                PipelineError::Render {
                    name: resolved.name.clone(),
                    message,
                    source: err,
                }
            })?;
    }

    Ok(env)
}

/// Canonicalize all newlines to `\n`.
pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Rewrite the rendered text's newlines to the configured sequence.
///
/// `\n` is a no-op so newlines embedded in variable values pass through
/// untouched in the default configuration.
pub(crate) fn apply_newline_sequence(text: String, newline: NewlineSequence) -> String {
    match newline {
        NewlineSequence::Lf => text,
        _ => normalize_newlines(&text).replace('\n', newline.as_str()),
    }
}
