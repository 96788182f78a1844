//! Vars file loading.
//!
//! Dispatch is by file extension through a registry table; every parser
//! must produce a mapping at the root. Adding a format means adding one
//! entry to [`FORMATS`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use minijinja::value::Value;
use tracing::debug;

use crate::context::Context;
use crate::error::VarsFileError;

/// Extensions accepted by [`load_vars_file`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini"];

/// Fixed key an ini file's default section is stored under.
pub const INI_DEFAULT_SECTION: &str = "DEFAULT";

type ParseFn = fn(&str, &Path) -> Result<Context, VarsFileError>;

const FORMATS: &[(&[&str], ParseFn)] = &[
    (&["json"], parse_json),
    (&["yaml", "yml"], parse_yaml),
    (&["toml"], parse_toml),
    (&["ini"], parse_ini),
];

/// Load one vars file into a context mapping.
///
/// The extension match is case-insensitive. Reading is the only side
/// effect; a failure in any file aborts with a typed [`VarsFileError`].
pub fn load_vars_file(path: &Path) -> Result<Context, VarsFileError> {
    if !path.exists() {
        return Err(VarsFileError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(VarsFileError::NotAFile(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    let parse = FORMATS
        .iter()
        .find(|(exts, _)| exts.contains(&ext.as_str()))
        .map(|(_, parse)| *parse)
        .ok_or_else(|| VarsFileError::UnsupportedFormat {
            path: path.to_path_buf(),
            expected: SUPPORTED_EXTENSIONS.join(", "),
        })?;

    let text = fs::read_to_string(path).map_err(|source| VarsFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let context = parse(&text, path)?;
    debug!("Loaded {} variables from {}", context.len(), path.display());
    Ok(context)
}

fn parse_json(text: &str, path: &Path) -> Result<Context, VarsFileError> {
    let data: serde_json::Value =
        serde_json::from_str(text).map_err(|err| VarsFileError::Malformed {
            format: "json",
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    match data {
        serde_json::Value::Null => Err(VarsFileError::Empty(path.to_path_buf())),
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, Value::from_serialize(&value)))
            .collect()),
        _ => Err(VarsFileError::NotAMapping(path.to_path_buf())),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(text: &str, path: &Path) -> Result<Context, VarsFileError> {
    if text.trim().is_empty() {
        return Err(VarsFileError::Empty(path.to_path_buf()));
    }
    let data: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|err| VarsFileError::Malformed {
            format: "yaml",
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    match data {
        serde_yaml::Value::Null => Err(VarsFileError::Empty(path.to_path_buf())),
        serde_yaml::Value::Mapping(map) => {
            let mut context = Context::new();
            for (key, value) in map {
                let key = key.as_str().ok_or_else(|| VarsFileError::Malformed {
                    format: "yaml",
                    path: path.to_path_buf(),
                    message: "mapping keys must be strings".to_string(),
                })?;
                context.insert(key.to_string(), Value::from_serialize(&value));
            }
            Ok(context)
        }
        _ => Err(VarsFileError::NotAMapping(path.to_path_buf())),
    }
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_text: &str, path: &Path) -> Result<Context, VarsFileError> {
    Err(VarsFileError::MissingDependency {
        format: "yaml",
        path: path.to_path_buf(),
        hint: "rebuild jinjet with the `yaml` feature (serde_yaml) enabled",
    })
}

#[cfg(feature = "toml")]
fn parse_toml(text: &str, path: &Path) -> Result<Context, VarsFileError> {
    let data: toml::Value = toml::from_str(text).map_err(|err| VarsFileError::Malformed {
        format: "toml",
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    match data {
        toml::Value::Table(table) => Ok(table
            .into_iter()
            .map(|(key, value)| (key, Value::from_serialize(&value)))
            .collect()),
        _ => Err(VarsFileError::NotAMapping(path.to_path_buf())),
    }
}

#[cfg(not(feature = "toml"))]
fn parse_toml(_text: &str, path: &Path) -> Result<Context, VarsFileError> {
    Err(VarsFileError::MissingDependency {
        format: "toml",
        path: path.to_path_buf(),
        hint: "rebuild jinjet with the `toml` feature enabled",
    })
}

fn parse_ini(text: &str, path: &Path) -> Result<Context, VarsFileError> {
    let ini = ini::Ini::load_from_str(text).map_err(|err| VarsFileError::Malformed {
        format: "ini",
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut default: BTreeMap<String, String> = BTreeMap::new();
    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (section, properties) in ini.iter() {
        let entries: BTreeMap<String, String> = properties
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        match section {
            None => default.extend(entries),
            Some(name) if name == INI_DEFAULT_SECTION => default.extend(entries),
            Some(name) => {
                sections.insert(name.to_string(), entries);
            }
        }
    }

    // The default section is always present, even when empty.
    let mut context = Context::new();
    context.insert(
        INI_DEFAULT_SECTION.to_string(),
        Value::from_serialize(&default),
    );
    for (name, entries) in sections {
        context.insert(name, Value::from_serialize(&entries));
    }
    Ok(context)
}
