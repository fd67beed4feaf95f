// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static validation of generated HTML documents.
//!
//! Inline scripts are scanned for bare function calls whose names are never
//! declared in any script on the page and are not well-known globals.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Errors from validation
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for static validation of an HTML document.
#[async_trait]
pub trait Validator: Clone + Send + Sync + 'static {
    /// Human-readable issues found in the document at `html_path`.
    async fn validate(&self, html_path: &Path) -> Result<Vec<String>, ValidateError>;
}

/// Regex-based undefined-symbol checker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptValidator;

#[async_trait]
impl Validator for ScriptValidator {
    async fn validate(&self, html_path: &Path) -> Result<Vec<String>, ValidateError> {
        let html = tokio::fs::read_to_string(html_path)
            .await
            .map_err(|e| ValidateError::Read { path: html_path.to_path_buf(), source: e })?;
        let issues = check_html(&html);
        tracing::debug!(path = %html_path.display(), issues = issues.len(), "validated document");
        Ok(issues)
    }
}

const GLOBALS: &[&str] = &[
    "Array", "Audio", "Boolean", "Date", "Error", "Image", "JSON", "Map", "Math", "Number",
    "Object", "Phaser", "Promise", "RegExp", "Set", "String", "Symbol", "alert", "cancelAnimationFrame",
    "clearInterval", "clearTimeout", "console", "decodeURIComponent", "document", "encodeURIComponent",
    "fetch", "isNaN", "localStorage", "parseFloat", "parseInt", "require", "requestAnimationFrame",
    "setInterval", "setTimeout", "window",
];

const KEYWORDS: &[&str] = &[
    "async", "await", "catch", "delete", "do", "else", "for", "function", "if", "in", "of",
    "return", "super", "switch", "this", "try", "typeof", "void", "while", "with", "yield",
];

static SCRIPT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").ok());
static DECLARATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:function\*?|class|const|let|var)\s+([A-Za-z_$][\w$]*)").ok());
static PARAMS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:function\s*[\w$]*\s*\(([^)]*)\)|\(([^)]*)\)\s*=>|\b([A-Za-z_$][\w$]*)\s*=>)").ok()
});
static METHOD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:async\s+|static\s+)*([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*\{").ok());
static CALL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*\(").ok());
static IDENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*").ok());

/// Inline script bodies, skipping `<script src=...>` tags.
pub fn inline_scripts(html: &str) -> Vec<&str> {
    let Some(re) = SCRIPT.as_ref() else { return Vec::new() };
    re.captures_iter(html)
        .filter(|c| !c.get(1).is_some_and(|attrs| attrs.as_str().to_ascii_lowercase().contains("src=")))
        .filter_map(|c| c.get(2).map(|m| m.as_str()))
        .collect()
}

/// Report undefined symbols as `undefined symbol `name` (script N, line L)`.
pub fn check_html(html: &str) -> Vec<String> {
    let scripts: Vec<String> = inline_scripts(html).into_iter().map(blank_literals).collect();

    let mut declared: HashSet<&str> = GLOBALS.iter().chain(KEYWORDS).copied().collect();
    for script in &scripts {
        declared.extend(declared_names(script));
    }

    let Some(call_re) = CALL.as_ref() else { return Vec::new() };
    let mut issues = Vec::new();
    for (n, script) in scripts.iter().enumerate() {
        let mut reported = HashSet::new();
        for (line_no, line) in script.lines().enumerate() {
            for cap in call_re.captures_iter(line) {
                let Some(m) = cap.get(1) else { continue };
                let name = m.as_str();
                if line[..m.start()].ends_with('.') {
                    continue;
                }
                if declared.contains(name) || !reported.insert(name) {
                    continue;
                }
                issues.push(format!(
                    "undefined symbol `{name}` (script {}, line {})",
                    n + 1,
                    line_no + 1
                ));
            }
        }
    }
    issues
}

fn declared_names(script: &str) -> Vec<&str> {
    let mut names = Vec::new();
    if let Some(re) = DECLARATION.as_ref() {
        names.extend(re.captures_iter(script).filter_map(|c| c.get(1)).map(|m| m.as_str()));
    }
    let Some(ident) = IDENT.as_ref() else { return names };
    if let Some(re) = METHOD.as_ref() {
        for cap in re.captures_iter(script) {
            names.extend(cap.get(1).map(|m| m.as_str()));
            if let Some(params) = cap.get(2) {
                names.extend(ident.find_iter(params.as_str()).map(|m| m.as_str()));
            }
        }
    }
    if let Some(re) = PARAMS.as_ref() {
        for cap in re.captures_iter(script) {
            for group in [cap.get(1), cap.get(2), cap.get(3)].into_iter().flatten() {
                names.extend(ident.find_iter(group.as_str()).map(|m| m.as_str()));
            }
        }
    }
    names
}

/// Replace comment and string contents with spaces, keeping newlines so
/// line numbers survive.
fn blank_literals(src: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Code,
        LineComment,
        BlockComment,
        Str(char),
    }

    let mut out = String::with_capacity(src.len());
    let mut mode = Mode::Code;
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match mode {
            Mode::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    mode = Mode::LineComment;
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'*') => {
                    mode = Mode::BlockComment;
                    out.push(' ');
                }
                '"' | '\'' | '`' => {
                    mode = Mode::Str(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    mode = Mode::Code;
                    out.push_str("  ");
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
            Mode::Str(quote) => {
                if c == '\\' {
                    out.push(' ');
                    if let Some(escaped) = chars.next() {
                        out.push(if escaped == '\n' { '\n' } else { ' ' });
                    }
                } else if c == quote {
                    mode = Mode::Code;
                    out.push(c);
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
        }
    }
    out
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ValidateError, Validator};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Fake validator returning a fixed issue list.
    #[derive(Clone, Default)]
    pub struct FakeValidator {
        issues: Arc<Mutex<Vec<String>>>,
        calls: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl FakeValidator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_issues(self, issues: Vec<String>) -> Self {
            *self.issues.lock() = issues;
            self
        }

        pub fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Validator for FakeValidator {
        async fn validate(&self, html_path: &Path) -> Result<Vec<String>, ValidateError> {
            self.calls.lock().push(html_path.to_path_buf());
            Ok(self.issues.lock().clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeValidator;

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
