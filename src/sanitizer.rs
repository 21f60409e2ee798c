// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pattern-based neutralization of dangerous substrings.
//!
//! This is a best-effort denylist, not an HTML sanitizer. It is only safe in
//! combination with the allow-list checks in [`crate::locator`] for URLs, and
//! for text it must never be relied on to make markup renderable.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Class of untrusted input, selecting the sanitization rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    #[default]
    Text,
    Filename,
}

static DANGEROUS_PROTOCOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:|data:|vbscript:").unwrap());

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").unwrap());

static JAVASCRIPT_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static FILENAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.\.|[<>:"|?*/\\]"#).unwrap());

/// Stateless sanitizer keyed by [`InputKind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentSanitizer;

impl ContentSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Trim and strip the substrings dangerous for `kind`.
    ///
    /// Passes repeat until the value is stable, so removals that splice a new
    /// match together (`javajavascript:script:`) are removed too, and
    /// `sanitize(sanitize(x, k), k) == sanitize(x, k)`.
    pub fn sanitize(&self, input: &str, kind: InputKind) -> String {
        let mut current = input.trim().to_string();
        loop {
            let next = match kind {
                InputKind::Url => sanitize_url_pass(&current),
                InputKind::Text => sanitize_text_pass(&current),
                InputKind::Filename => FILENAME_UNSAFE.replace_all(&current, "").into_owned(),
            };
            let next = next.trim().to_string();
            // Every changing pass strictly shortens the value
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

fn sanitize_url_pass(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input, "");
    let out = DANGEROUS_PROTOCOLS.replace_all(&out, "");
    EVENT_HANDLER.replace_all(&out, "").into_owned()
}

fn sanitize_text_pass(input: &str) -> String {
    let out = HTML_TAG.replace_all(input, "");
    let out = JAVASCRIPT_PROTOCOL.replace_all(&out, "");
    EVENT_HANDLER.replace_all(&out, "").into_owned()
}
