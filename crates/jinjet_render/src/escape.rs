//! Escaping policy.
//!
//! The decision is per template name, so includes get the same
//! extension-based treatment as the template that pulls them in.

use crate::error::{PipelineError, PipelineResult};

/// Default extensions treated as markup under [`EscapeMode::Smart`].
pub const DEFAULT_ESCAPE_EXTS: &[&str] = &["html", "htm", "xml", "xhtml"];

/// Suffixes that mark a file as a template. One trailing suffix is
/// stripped before reading the extension, so `page.html.j2` keeps its
/// `html` decision.
const TEMPLATE_SUFFIXES: &[&str] = &["j2", "jinja", "jinja2"];

/// HTML/XML escaping policy for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Escape iff the template's effective extension is in the set.
    #[default]
    Smart,
    /// Always escape.
    On,
    /// Never escape.
    Off,
}

/// The default escape extension set as owned strings.
pub fn default_escape_exts() -> Vec<String> {
    DEFAULT_ESCAPE_EXTS.iter().map(|ext| ext.to_string()).collect()
}

/// Parse a comma-separated extension list (as given to
/// `--autoescape-exts`). Entries are trimmed, lowercased, and stripped of
/// a leading dot; an empty list is a usage error.
pub fn parse_escape_exts(raw: &str) -> PipelineResult<Vec<String>> {
    let exts: Vec<String> = raw
        .split(',')
        .map(|segment| segment.trim().trim_start_matches('.').to_lowercase())
        .filter(|segment| !segment.is_empty())
        .collect();
    if exts.is_empty() {
        return Err(PipelineError::Usage(
            "--autoescape-exts requires at least one extension".to_string(),
        ));
    }
    Ok(exts)
}

/// Extension used for escaping decisions: the final dot segment after
/// stripping one trailing template suffix, lowercased.
pub fn effective_extension(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let mut stem = lower.as_str();
    if let Some((rest, ext)) = stem.rsplit_once('.') {
        if TEMPLATE_SUFFIXES.contains(&ext) {
            stem = rest;
        }
    }
    stem.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

/// Decide whether autoescaping is active for a template name.
pub fn escape_active(mode: EscapeMode, template_name: &str, escape_exts: &[String]) -> bool {
    match mode {
        EscapeMode::On => true,
        EscapeMode::Off => false,
        EscapeMode::Smart => effective_extension(template_name)
            .map(|ext| escape_exts.iter().any(|candidate| *candidate == ext))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_and_off_ignore_extension() {
        let exts = default_escape_exts();
        assert!(escape_active(EscapeMode::On, "plain.txt", &exts));
        assert!(!escape_active(EscapeMode::Off, "page.html", &exts));
    }

    #[test]
    fn test_smart_uses_extension_set() {
        let exts = default_escape_exts();
        assert!(escape_active(EscapeMode::Smart, "page.html", &exts));
        assert!(escape_active(EscapeMode::Smart, "feed.XML", &exts));
        assert!(!escape_active(EscapeMode::Smart, "notes.txt", &exts));
        assert!(!escape_active(EscapeMode::Smart, "noext", &exts));
    }

    #[test]
    fn test_smart_sees_through_template_suffix() {
        let exts = default_escape_exts();
        assert!(escape_active(EscapeMode::Smart, "page.html.j2", &exts));
        assert!(escape_active(EscapeMode::Smart, "page.htm.jinja", &exts));
        assert!(!escape_active(EscapeMode::Smart, "notes.txt.j2", &exts));
        assert!(!escape_active(EscapeMode::Smart, "template.j2", &exts));
    }

    #[test]
    fn test_parse_escape_exts() {
        let exts = parse_escape_exts("Html, .svg ,tera").unwrap();
        assert_eq!(exts, vec!["html", "svg", "tera"]);
        assert!(parse_escape_exts(" , ").is_err());
    }
}
