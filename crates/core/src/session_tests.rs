// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::FakeClock;

#[test]
fn now_formats_wall_clock() {
    let clock = FakeClock::new();
    assert_eq!(SessionTimestamp::now(&clock).as_str(), "20251123_005659");
}

#[yare::parameterized(
    project_path   = { "projects/20251123_005659/4/index.html", Some("20251123_005659") },
    legacy_path    = { "20240101_120000/1/index.html",          Some("20240101_120000") },
    art_url        = { "https://cdn.example.com/cartridge_arts/20250102_030405/9/cover_art.png", Some("20250102_030405") },
    short_date     = { "projects/2025112_005659/4/index.html",  None },
    no_underscore  = { "projects/20251123005659/4/index.html",  None },
    empty          = { "",                                      None },
)]
fn extract_session_token(input: &str, expected: Option<&str>) {
    assert_eq!(SessionTimestamp::extract(input).as_ref().map(|s| s.as_str()), expected);
}

#[yare::parameterized(
    exact       = { "20251123_005659",  true },
    with_prefix = { "x20251123_005659", false },
    with_suffix = { "20251123_005659/", false },
    garbage     = { "manifest.json",    false },
)]
fn parse_requires_exact_token(input: &str, ok: bool) {
    assert_eq!(SessionTimestamp::parse(input).is_some(), ok);
}

#[test]
fn serializes_as_plain_string() {
    let ts = SessionTimestamp::parse("20251123_005659").unwrap();
    assert_eq!(serde_json::to_string(&ts).unwrap(), "\"20251123_005659\"");
}
