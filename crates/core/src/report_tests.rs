// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn valid_report_parses() {
    let value = json!({
        "name": "Snake",
        "summary": "classic snake",
        "entry_point": "./index.html",
    });
    let report = JobReport::from_structured(&value).unwrap();
    assert_eq!(report.name, "Snake");
    assert_eq!(report.entry_file(), "index.html");
}

#[test]
fn missing_entry_point_defaults() {
    let report =
        JobReport::from_structured(&json!({ "name": "Snake", "summary": "s" })).unwrap();
    assert_eq!(report.entry_point, DEFAULT_ENTRY_POINT);
}

#[test]
fn missing_summary_is_malformed() {
    let err = JobReport::from_structured(&json!({ "name": "Snake" })).unwrap_err();
    assert!(matches!(err, ReportValidationError::Malformed(_)));
}

#[yare::parameterized(
    name        = { json!({ "name": " ", "summary": "s", "entry_point": "index.html" }), "name" },
    summary     = { json!({ "name": "n", "summary": "", "entry_point": "index.html" }), "summary" },
    entry_point = { json!({ "name": "n", "summary": "s", "entry_point": "" }), "entry_point" },
)]
fn empty_fields_rejected(value: serde_json::Value, field: &str) {
    match JobReport::from_structured(&value) {
        Err(ReportValidationError::EmptyField(f)) => assert_eq!(f, field),
        other => panic!("expected EmptyField, got {other:?}"),
    }
}

#[test]
fn non_object_rejected() {
    let err = JobReport::from_structured(&json!("done")).unwrap_err();
    assert!(matches!(err, ReportValidationError::NotAnObject));
}

#[test]
fn degraded_report_uses_prompt_and_placeholder() {
    let report = JobReport::degraded("make me a minesweeper game using phaser.js please now");
    assert_eq!(report.name, "make me a minesweeper game using");
    assert_eq!(report.summary, NO_SUMMARY);
    assert_eq!(report.entry_point, "index.html");
}

#[yare::parameterized(
    plain  = { "index.html",          "index.html" },
    dotted = { "./game/index.html",   "game/index.html" },
    rooted = { "/index.html",         "index.html" },
)]
fn entry_file_is_relative(entry: &str, expected: &str) {
    assert_eq!(JobReport::new("n", "s", entry).entry_file(), expected);
}

#[test]
fn blank_prompt_names_untitled() {
    assert_eq!(name_from_prompt("   "), "untitled");
}

#[test]
fn genre_is_optional_and_capped() {
    let plain = JobReport::from_structured(&json!({ "name": "Snake", "summary": "s" })).unwrap();
    assert!(plain.genre_tags().is_empty());
    assert!(serde_json::to_value(&plain).unwrap().get("genre").is_none());

    let tagged = JobReport::new("Snake", "s", "index.html")
        .with_genre(vec!["".into(), "RPG".into(), "rpg".into(), "Fishing".into(), "Horror".into()]);
    assert_eq!(tagged.genre_tags(), vec!["RPG".to_string(), "Fishing".to_string()]);
}
