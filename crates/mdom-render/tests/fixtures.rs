//! Directory-driven rendering tests.
//!
//! Every directory under `tests/fixtures/` holds an `input.md`, the expected
//! static markup in `output.html` and optionally a `config.json` with render
//! settings (`sanitize`, `allow_dangerous_html`, `key_prefix`, `gfm`).

use std::fs;
use std::path::{Path, PathBuf};

use mdom_render::{HypertextOptions, ParseOptions, RenderOptions, Renderer, to_static_markup};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_options(dir: &Path) -> RenderOptions {
    let options = RenderOptions::default();
    let path = dir.join("config.json");
    if !path.exists() {
        return options;
    }
    let config: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let flag = |name: &str, default: bool| {
        config
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    };

    let mut options = options
        .with_sanitize(flag("sanitize", true))
        .with_hypertext(HypertextOptions {
            allow_dangerous_html: flag("allow_dangerous_html", false),
        })
        .with_parse(ParseOptions {
            gfm: flag("gfm", true),
        });
    if let Some(prefix) = config.get("key_prefix").and_then(Value::as_str) {
        options = options.with_key_prefix(prefix);
    }
    options
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let input = fs::read_to_string(dir.join("input.md")).unwrap();
    let expected = fs::read_to_string(dir.join("output.html")).unwrap();

    let renderer = Renderer::new(load_options(&dir));
    let element = renderer
        .render_markdown(&input)
        .unwrap_or_else(|e| panic!("fixture {name} failed to render: {e}"));

    assert_eq!(
        to_static_markup(&element),
        expected.trim_end_matches('\n'),
        "fixture {name}"
    );
    assert_eq!(
        element.key.as_deref(),
        Some(renderer.options().key_prefix.as_str()),
        "fixture {name}"
    );
}

#[test]
fn test_heading() {
    run_fixture("heading");
}

#[test]
fn test_inline() {
    run_fixture("inline");
}

#[test]
fn test_blocks() {
    run_fixture("blocks");
}

#[test]
fn test_tight_list() {
    run_fixture("tight-list");
}

#[test]
fn test_task_list() {
    run_fixture("task-list");
}

#[test]
fn test_code_sanitized() {
    run_fixture("code-sanitized");
}

#[test]
fn test_code_unsanitized() {
    run_fixture("code-unsanitized");
}

#[test]
fn test_raw_html() {
    run_fixture("raw-html");
}

#[test]
fn test_unsafe_link() {
    run_fixture("unsafe-link");
}

#[test]
fn test_table() {
    run_fixture("table");
}

#[test]
fn test_key_prefix() {
    run_fixture("key-prefix");
}

#[test]
fn test_all_fixtures_have_tests() {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "blocks",
            "code-sanitized",
            "code-unsanitized",
            "heading",
            "inline",
            "key-prefix",
            "raw-html",
            "table",
            "task-list",
            "tight-list",
            "unsafe-link",
        ]
    );
}
