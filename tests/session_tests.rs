//! Scripted sessions from a schema file to the written env file

use std::fs;

use envwiz::prompt::{KeyName, KeyPress, PlainRenderer, ScriptedKeys};
use envwiz::schema::parse_schema;
use envwiz::session::FieldStatus;
use envwiz::{ConfigStore, Session};
use tempfile::tempdir;

const SCHEMA: &str = r#"
[fields]
APP_NAME = { type = "string", default = "demo", description = "Display name" }
LOG_LEVEL = ["debug", "info", "warn"]
API_TOKEN = "string!"
DEBUG = "boolean?"
"#;

fn run(content: &str, keys: ScriptedKeys) -> (String, String, envwiz::SessionReport) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    if !content.is_empty() {
        fs::write(&path, content).unwrap();
    }
    let fields = parse_schema(SCHEMA).unwrap();
    let mut store = ConfigStore::new(&path);
    let mut keys = keys;
    let mut renderer = PlainRenderer::new(Vec::new());

    let report = Session::new(&fields, &mut store)
        .run(&mut keys, &mut renderer)
        .unwrap();

    let written = fs::read_to_string(&path).unwrap_or_default();
    let output = String::from_utf8(renderer.into_inner()).unwrap();
    (written, output, report)
}

#[test]
fn test_full_session_updates_in_place() {
    let keys = ScriptedKeys::new()
        // APP_NAME: accept default
        .enter()
        // LOG_LEVEL: current is warn, move up to info
        .named(KeyName::Up)
        .enter()
        // API_TOKEN: type a replacement
        .text("new")
        .enter()
        // DEBUG: leave the free-entry slot and pick skip
        .named(KeyName::Down)
        .enter();

    let (written, output, report) = run("# app\nLOG_LEVEL=warn\nAPI_TOKEN=old-token\n", keys);

    assert_eq!(
        written,
        "# app\nLOG_LEVEL=info\nAPI_TOKEN=new\n\nAPP_NAME=demo\n"
    );
    assert!(!report.cancelled);
    assert_eq!(report.status("DEBUG"), Some(&FieldStatus::Skipped));
    assert_eq!(report.written(), 3);

    assert!(output.contains("Display name"));
    assert!(output.contains("✔ LOG_LEVEL = info"));
    assert!(output.contains("✔ API_TOKEN = ***"));
    assert!(output.contains("↷ DEBUG skipped"));
    assert!(!output.contains("old-token"));
}

#[test]
fn test_invalid_input_is_shown_and_corrected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    let fields = parse_schema("[fields]\nPORT = \"number\"\n").unwrap();
    let mut store = ConfigStore::new(&path);

    let mut keys = ScriptedKeys::new()
        .text("abc")
        .enter()
        .named(KeyName::Backspace)
        .named(KeyName::Backspace)
        .named(KeyName::Backspace)
        .text("80")
        .enter();
    let mut renderer = PlainRenderer::new(Vec::new());
    Session::new(&fields, &mut store)
        .run(&mut keys, &mut renderer)
        .unwrap();

    let output = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(output.contains("✗ PORT must be a number, got 'abc'"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "PORT=80\n");
}

#[test]
fn test_cancel_mid_session_leaves_rest_untouched() {
    let keys = ScriptedKeys::new()
        .enter()
        .key(KeyPress::ctrl('d'));
    let content = "LOG_LEVEL=warn\n";
    let (written, output, report) = run(content, keys);

    assert!(report.cancelled);
    assert_eq!(written, "LOG_LEVEL=warn\n\nAPP_NAME=demo\n");
    assert!(output.contains("✗ LOG_LEVEL cancelled"));
}

#[test]
fn test_exhausted_input_counts_as_cancel() {
    let (written, _output, report) = run("", ScriptedKeys::new());
    assert!(report.cancelled);
    assert_eq!(written, "");
}
