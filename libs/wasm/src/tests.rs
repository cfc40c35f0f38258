//! Tests for the WASM-facing pipeline helpers.

use super::*;
use serde_json::Value as Json;

fn json(text: &str) -> Json {
    serde_json::from_str(text).expect("helpers return valid JSON")
}

/// Confirms tokens come back as a JSON array.
#[test]
fn lex_returns_token_array() {
    let tokens = json(&lex_internal("const a = 1").expect("lexing succeeds"));
    let tokens = tokens.as_array().expect("array");
    assert!(tokens.len() >= 4);
}

/// Ensures lexing failures keep their stage and byte range.
#[test]
fn lex_rejects_unknown_character() {
    let diag = lex_internal("const a = @").unwrap_err();
    assert_eq!(diag.stage(), Stage::Lexical);
    assert_eq!(diag.severity(), Severity::Error);
    assert_eq!((diag.start(), diag.end()), (10, 11));
}

#[test]
fn parse_rejects_invalid_source() {
    let diag = parse_internal("const = 1").unwrap_err();
    assert_eq!(diag.stage(), Stage::Syntax);
    assert!(!diag.message().is_empty());
}

/// Tests the JSON program survives parse → execute.
#[test]
fn execute_parsed_program() {
    let program = parse_internal("const a = 2 * 3\nconst s = startSketchAt([0, 0]) |> line([1, 1], %)")
        .expect("parse succeeds");
    let memory = json(&execute_internal(&program, "{}").expect("execution succeeds"));
    assert_eq!(memory["root"]["a"], serde_json::json!({ "type": "Number", "value": 6.0 }));
    assert_eq!(memory["root"]["s"]["type"], "SketchGroup");
}

/// Seeded memory feeds the program's free names.
#[test]
fn execute_with_seed_memory() {
    let seed = parse_internal("const width = 4").unwrap();
    let seeded = execute_internal(&seed, "").unwrap();
    let program = parse_internal("const area = width * width").unwrap();
    let memory = json(&execute_internal(&program, &seeded).unwrap());
    assert_eq!(memory["root"]["area"]["value"], 16.0);
}

#[test]
fn execute_reports_runtime_errors() {
    let program = parse_internal("const a = 1 / 0").unwrap();
    let diag = execute_internal(&program, "{}").unwrap_err();
    assert_eq!(diag.stage(), Stage::Runtime);
    assert_eq!((diag.start(), diag.end()), (10, 15));
}

#[test]
fn malformed_json_is_an_input_error() {
    let diag = recast_internal("{ not json").unwrap_err();
    assert_eq!(diag.stage(), Stage::Input);
    assert!(diag.message().starts_with("invalid program"));
}

#[test]
fn recast_formats_program() {
    let program = parse_internal("const   a=[1,2]").unwrap();
    assert_eq!(recast_internal(&program).unwrap(), "const a = [1, 2]\n");
}

/// Paths found by offset resolve back to the node's range.
#[test]
fn path_and_range_agree() {
    let program = parse_internal("const a = 1 + 2").unwrap();
    let path = path_of_internal(&program, 14).unwrap();
    let span = json(&range_of_internal(&program, &path).unwrap());
    assert_eq!(span, serde_json::json!({ "start": 14, "end": 15 }));

    let left = json(&range_of_internal(&program, r#"["body",0,"init","left"]"#).unwrap());
    assert_eq!(left, serde_json::json!({ "start": 10, "end": 11 }));
}

#[test]
fn unresolvable_path_is_a_path_error() {
    let program = parse_internal("const a = 1").unwrap();
    let diag = range_of_internal(&program, r#"["body",3]"#).unwrap_err();
    assert_eq!(diag.stage(), Stage::Path);

    let diag = path_of_internal(&program, 99).unwrap_err();
    assert_eq!(diag.stage(), Stage::Path);
    assert_eq!(diag.start(), 99);
}
