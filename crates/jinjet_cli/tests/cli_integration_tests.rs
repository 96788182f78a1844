//! End-to-end tests for the jinjet binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn jinjet() -> Command {
    Command::cargo_bin("jinjet").unwrap()
}

#[test]
fn test_file_template_merges_context_sources() {
    let dir = tempdir().unwrap();

    let module_path = dir.path().join("extras.rhai");
    fs::write(
        &module_path,
        "let module_value = \"from-module\";\nlet _private = \"secret\";\nlet from_module_only = 42;\n",
    )
    .unwrap();

    let vars_path = dir.path().join("vars.json");
    fs::write(&vars_path, r#"{"module_value": "from-file", "from_file": "file"}"#).unwrap();

    let includes = dir.path().join("includes");
    fs::create_dir(&includes).unwrap();
    fs::write(includes.join("partial.txt"), "partial={{ extra }}").unwrap();

    let template = dir.path().join("template.txt");
    fs::write(
        &template,
        "module={{ module_value }}\nfile={{ from_file }}\nprivate={{ _private }}\nfrom_module_only={{ from_module_only }}\n{% include 'partial.txt' %}",
    )
    .unwrap();

    jinjet()
        .arg(&template)
        .arg("--module")
        .arg(&module_path)
        .arg("--vars")
        .arg(&vars_path)
        .args(["-D", "module_value=from-cli", "-D", "extra=EX"])
        .arg("--searchpath")
        .arg(&includes)
        .assert()
        .success()
        .stdout("module=from-cli\nfile=file\nprivate=secret\nfrom_module_only=42\npartial=EX");
}

#[test]
fn test_stdin_smart_autoescape_infers_from_output_extension() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("out.html");

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-D", "name=<World>", "-o"])
        .arg(&output_path)
        .write_stdin("{{ name }}")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output_path).unwrap(), "&lt;World&gt;");
}

#[test]
fn test_stdin_smart_autoescape_disables_without_hint() {
    let dir = tempdir().unwrap();

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-D", "name=<World>"])
        .write_stdin("{{ name }}")
        .assert()
        .success()
        .stdout("<World>");
}

#[test]
fn test_newline_sequence_crlf() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("out.txt");

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "--newline-sequence", "\\r\\n", "--keep-trailing-newline", "-o"])
        .arg(&output_path)
        .write_stdin("line1\nline2\n")
        .assert()
        .success();

    assert_eq!(fs::read(&output_path).unwrap(), b"line1\r\nline2\r\n");
}

#[test]
fn test_module_functions_usable_in_templates() {
    let dir = tempdir().unwrap();
    let module_path = dir.path().join("helpers.rhai");
    fs::write(&module_path, "fn shout(text) {\n    text.to_upper()\n}\n").unwrap();

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-m"])
        .arg(&module_path)
        .write_stdin("{{ shout('quiet') }}")
        .assert()
        .success()
        .stdout("QUIET");
}

#[test]
fn test_undefined_default_substitutes_empty() {
    let dir = tempdir().unwrap();

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "--undefined", "default"])
        .write_stdin("x={{ unset }}")
        .assert()
        .success()
        .stdout("x=");
}

#[test]
fn test_missing_source_is_usage_error() {
    jinjet().assert().failure().code(2);
}

#[test]
fn test_both_sources_is_usage_error() {
    jinjet().args(["template.j2", "--stdin"]).assert().failure().code(2);
}

#[test]
fn test_bad_var_syntax_is_usage_error() {
    jinjet()
        .args(["--stdin", "-D", "not-a-pair"])
        .write_stdin("hi")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_missing_module_exit_code() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-m", "absent.rhai"])
        .write_stdin("hi")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("absent.rhai"));
}

#[test]
fn test_non_mapping_vars_exit_code() {
    let dir = tempdir().unwrap();
    let vars_path = dir.path().join("vars.json");
    fs::write(&vars_path, "[1, 2, 3]").unwrap();

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "--vars"])
        .arg(&vars_path)
        .write_stdin("hi")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("mapping"));
}

#[test]
fn test_missing_template_exit_code() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .arg("absent.j2")
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("absent.j2"));
}

#[test]
fn test_strict_undefined_exit_code() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .arg("--stdin")
        .write_stdin("{{ unset }}")
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_unwritable_output_exit_code() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();

    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-o"])
        .arg(blocker.join("out.txt"))
        .write_stdin("hi")
        .assert()
        .failure()
        .code(7);
}

#[test]
fn test_traceback_shows_error_chain() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "--traceback"])
        .write_stdin("{{ unset }}")
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("Failed to render"));
}

#[test]
fn test_output_dash_means_stdout() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "-o", "-", "-D", "name=x"])
        .write_stdin("hi {{ name }}")
        .assert()
        .success()
        .stdout("hi x");
}

#[test]
fn test_enable_async_renders_identically() {
    let dir = tempdir().unwrap();
    jinjet()
        .current_dir(dir.path())
        .args(["--stdin", "--enable-async", "-D", "name=x"])
        .write_stdin("hi {{ name }}")
        .assert()
        .success()
        .stdout("hi x");
}
