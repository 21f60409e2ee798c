// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Read-only classifier for dangerous constructs.
//!
//! Lets callers reject outright (policy) before or instead of neutralizing
//! with [`crate::sanitizer::ContentSanitizer`] (mechanism).

use regex::RegexSet;
use serde::Serialize;
use std::sync::LazyLock;

/// Category of dangerous construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerKind {
    ScriptTag,
    JavascriptProtocol,
    DataProtocol,
    VbscriptProtocol,
    EventHandler,
    IframeTag,
    ObjectTag,
    EmbedTag,
}

// Order must match `PATTERNS` below.
const KINDS: [DangerKind; 8] = [
    DangerKind::ScriptTag,
    DangerKind::JavascriptProtocol,
    DangerKind::DataProtocol,
    DangerKind::VbscriptProtocol,
    DangerKind::EventHandler,
    DangerKind::IframeTag,
    DangerKind::ObjectTag,
    DangerKind::EmbedTag,
];

static PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)<script\b[^>]*>",
        r"(?i)javascript:",
        r"(?i)data:",
        r"(?i)vbscript:",
        r"(?i)\bon[a-z]+\s*=",
        r"(?i)<iframe\b[^>]*>",
        r"(?i)<object\b[^>]*>",
        r"(?i)<embed\b[^>]*>",
    ])
    .unwrap()
});

/// Stateless detector over a fixed pattern set.
#[derive(Debug, Default, Clone, Copy)]
pub struct DangerDetector;

impl DangerDetector {
    pub fn new() -> Self {
        Self
    }

    /// True if any dangerous construct is present.
    pub fn contains_dangerous_content(&self, input: &str) -> bool {
        PATTERNS.is_match(input)
    }

    /// Every category present in `input`, in a fixed order.
    pub fn detect(&self, input: &str) -> Vec<DangerKind> {
        PATTERNS.matches(input).into_iter().map(|i| KINDS[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_each_category() {
        let detector = DangerDetector::new();
        let cases = [
            ("<script>alert(1)</script>", DangerKind::ScriptTag),
            ("<SCRIPT src=\"x.js\" defer>", DangerKind::ScriptTag),
            ("JavaScript:alert(1)", DangerKind::JavascriptProtocol),
            ("data:text/html;base64,AAAA", DangerKind::DataProtocol),
            ("vbscript:msgbox", DangerKind::VbscriptProtocol),
            ("<img src=x onerror=alert(1)>", DangerKind::EventHandler),
            ("<div ONCLICK = 'x'>", DangerKind::EventHandler),
            ("<iframe src=\"https://evil.example\">", DangerKind::IframeTag),
            ("<object data=\"x\">", DangerKind::ObjectTag),
            ("<EMBED type=\"x\">", DangerKind::EmbedTag),
        ];
        for (input, kind) in cases {
            assert!(detector.contains_dangerous_content(input), "{input}");
            assert!(detector.detect(input).contains(&kind), "{input} missing {kind:?}");
        }
    }

    #[test]
    fn test_clean_inputs_pass() {
        let detector = DangerDetector::new();
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=10",
            "just some words about a video",
            "my-holiday-clip.mp4",
        ] {
            assert!(!detector.contains_dangerous_content(input), "{input}");
            assert!(detector.detect(input).is_empty());
        }
    }

    #[test]
    fn test_detect_reports_all_matches() {
        let detector = DangerDetector::new();
        let kinds = detector.detect("<iframe onload=x src=\"javascript:y\">");
        assert_eq!(
            kinds,
            vec![
                DangerKind::JavascriptProtocol,
                DangerKind::EventHandler,
                DangerKind::IframeTag
            ]
        );
    }
}
