//! Context assembly.
//!
//! Variables arrive from three ranked origins: scripted modules, vars
//! files, and explicit `KEY=VALUE` pairs. The assembler folds them into one
//! mapping under the fixed precedence order modules < files < pairs.

use std::collections::BTreeMap;

use minijinja::value::Value;

/// Final mapping handed to the template engine.
///
/// Values are arbitrary engine values: strings, numbers, booleans,
/// callables, or nested structures. Keys beginning with an underscore are
/// ordinary keys.
pub type Context = BTreeMap<String, Value>;

/// Merge variable payloads under the fixed precedence order.
///
/// Module payloads are folded first (in the order given), then vars-file
/// payloads, then explicit pairs; each later payload overwrites same-named
/// keys from everything before it, and within a group the last-listed
/// occurrence wins. Overwritten keys are replaced wholesale — nested
/// structures are never merged and values are never coerced.
pub fn assemble_context(
    modules: Vec<Context>,
    vars_files: Vec<Context>,
    pairs: Vec<(String, String)>,
) -> Context {
    let mut context = Context::new();
    for payload in modules {
        context.extend(payload);
    }
    for payload in vars_files {
        context.extend(payload);
    }
    for (key, value) in pairs {
        context.insert(key, Value::from(value));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(entries: &[(&str, &str)]) -> Context {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), Value::from(*value)))
            .collect()
    }

    #[test]
    fn test_tier_precedence() {
        let modules = vec![payload(&[("shared", "module"), ("module_only", "m")])];
        let files = vec![payload(&[("shared", "file"), ("file_only", "f")])];
        let pairs = vec![("shared".to_string(), "pair".to_string())];

        let context = assemble_context(modules, files, pairs);
        assert_eq!(context["shared"], Value::from("pair"));
        assert_eq!(context["module_only"], Value::from("m"));
        assert_eq!(context["file_only"], Value::from("f"));
    }

    #[test]
    fn test_last_listed_wins_within_tier() {
        let files = vec![payload(&[("key", "first")]), payload(&[("key", "second")])];
        let context = assemble_context(Vec::new(), files, Vec::new());
        assert_eq!(context["key"], Value::from("second"));

        let pairs = vec![
            ("key".to_string(), "one".to_string()),
            ("key".to_string(), "two".to_string()),
        ];
        let context = assemble_context(Vec::new(), Vec::new(), pairs);
        assert_eq!(context["key"], Value::from("two"));
    }

    #[test]
    fn test_overwrite_is_wholesale() {
        let nested = Value::from_serialize(&serde_json::json!({"a": 1, "b": 2}));
        let modules = vec![Context::from([("cfg".to_string(), nested)])];
        let pairs = vec![("cfg".to_string(), "flat".to_string())];

        let context = assemble_context(modules, Vec::new(), pairs);
        assert_eq!(context["cfg"], Value::from("flat"));
    }

    #[test]
    fn test_files_overwrite_modules() {
        let modules = vec![payload(&[("key", "module")])];
        let files = vec![payload(&[("key", "file")])];
        let context = assemble_context(modules, files, Vec::new());
        assert_eq!(context["key"], Value::from("file"));
    }
}
