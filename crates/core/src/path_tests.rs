// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn session() -> SessionTimestamp {
    SessionTimestamp::parse("20251123_005659").unwrap()
}

#[test]
fn job_prefix_layout() {
    let path = ObjectPath::job(Category::CartridgeArts, &session(), JobId::new(7));
    assert_eq!(path.as_str(), "cartridge_arts/20251123_005659/7");
}

#[yare::parameterized(
    plain        = { "index.html",         "projects/20251123_005659/3/index.html" },
    dot_slash    = { "./index.html",       "projects/20251123_005659/3/index.html" },
    leading      = { "/assets/a.png",      "projects/20251123_005659/3/assets/a.png" },
    backslashes  = { "assets\\b.png",      "projects/20251123_005659/3/assets/b.png" },
    empty        = { "",                   "projects/20251123_005659/3" },
)]
fn join_normalizes(rel: &str, expected: &str) {
    let base = ObjectPath::job(Category::Projects, &session(), JobId::new(3));
    assert_eq!(base.join(rel).as_str(), expected);
}

#[test]
fn parse_round_trips_components() {
    let parsed = ObjectPath::parse("projects/20251123_005659/12/assets/x.png").unwrap();
    assert_eq!(parsed.category, Category::Projects);
    assert_eq!(parsed.session, session());
    assert_eq!(parsed.job_id, JobId::new(12));
    assert_eq!(parsed.rest, "assets/x.png");
}

#[yare::parameterized(
    unknown_category = { "games/20251123_005659/1/index.html" },
    bad_session      = { "projects/latest/1/index.html" },
    bad_id           = { "projects/20251123_005659/abc/index.html" },
    manifest         = { "projects/manifest.json" },
)]
fn parse_rejects(path: &str) {
    assert!(ObjectPath::parse(path).is_none());
}

#[test]
fn category_strings() {
    for category in Category::ALL {
        assert_eq!(Category::parse(category.as_str()), Some(category));
        assert_eq!(category.to_string(), category.as_str());
    }
}
