// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Video reference extraction and origin allow-listing.
//!
//! Extraction tries a fixed, ordered list of URL shapes and only ever returns
//! an exact 11-character identifier. Origin checks run on the parsed host,
//! never on a substring of the raw URL.

use crate::config::ValidationConfig;
use crate::error::ErrorCode;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Exact length of a video identifier.
pub const REFERENCE_LENGTH: usize = 11;

static REFERENCE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// Extraction patterns in priority order.
static EXTRACTION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // watch?v=, short link, embed path
        Regex::new(r"(?:(?i:youtube\.com)/watch\?v=|(?i:youtu\.be)/|(?i:youtube\.com)/embed/)([^&\n?#]+)")
            .unwrap(),
        // v= anywhere in the watch query
        Regex::new(r"(?i:youtube\.com)/watch\?(?:[^#\n]*&)?v=([^&\n?#]+)").unwrap(),
        // legacy /v/, shorts and privacy-enhanced embed paths
        Regex::new(r"(?:(?i:youtube\.com)/(?:v|shorts)/|(?i:youtube-nocookie\.com)/embed/)([^&\n?#/]+)")
            .unwrap(),
    ]
});

/// A validated 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceReference(String);

impl ResourceReference {
    /// Accept `value` only if it is exactly 11 characters of `[a-zA-Z0-9_-]`.
    pub fn parse(value: &str) -> Option<Self> {
        is_valid_reference(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourceReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True iff `value` matches `^[a-zA-Z0-9_-]{11}$`.
pub fn is_valid_reference(value: &str) -> bool {
    value.len() == REFERENCE_LENGTH && REFERENCE_FORMAT.is_match(value)
}

/// Lower-cased host allow-list. A host matches an entry exactly or as a
/// subdomain of it; substring containment (`youtube.com.evil.com`) never
/// matches.
#[derive(Debug, Clone)]
pub struct DomainAllowList {
    domains: Vec<String>,
}

impl DomainAllowList {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_end_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn contains_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Extracts references from accepted URLs and checks URL origins.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    allow_list: DomainAllowList,
    blocked_protocols: Vec<String>,
    max_url_length: usize,
}

impl ResourceLocator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            allow_list: DomainAllowList::new(&config.allowed_domains),
            blocked_protocols: config
                .blocked_protocols
                .iter()
                .map(|p| normalize_protocol(p))
                .collect(),
            max_url_length: config.max_url_length,
        }
    }

    /// Extract the video reference, or `None`. Never truncates or coerces.
    pub fn extract_reference(&self, url: &str) -> Option<ResourceReference> {
        let lowered = url.to_lowercase();
        if ["<script", "javascript:", "data:"]
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            debug!("Refusing extraction from input with script markers");
            return None;
        }

        EXTRACTION_PATTERNS.iter().find_map(|pattern| {
            pattern
                .captures(url)
                .and_then(|caps| caps.get(1))
                .and_then(|m| ResourceReference::parse(m.as_str()))
        })
    }

    /// True if the URL is short enough, parses, uses an allowed scheme and
    /// its host is on the allow-list.
    pub fn is_allowed_url(&self, url: &str) -> bool {
        self.check_url(url).is_empty()
    }

    /// The specific reasons `url` is not allowed, in check order.
    pub fn check_url(&self, url: &str) -> Vec<ErrorCode> {
        let mut errors = Vec::new();

        if url.chars().count() > self.max_url_length {
            errors.push(ErrorCode::UrlTooLong);
        }
        if self.has_blocked_protocol(url) {
            errors.push(ErrorCode::InvalidProtocol);
        }

        match Url::parse(url) {
            Ok(parsed) => {
                let scheme_error = !matches!(parsed.scheme(), "http" | "https")
                    || self.is_blocked_scheme(parsed.scheme());
                if scheme_error && !errors.contains(&ErrorCode::InvalidProtocol) {
                    errors.push(ErrorCode::InvalidProtocol);
                }
                match parsed.host_str() {
                    Some(host) if self.allow_list.contains_host(host) => {}
                    host => {
                        debug!(?host, "Host not on allow-list");
                        errors.push(ErrorCode::DomainNotAllowed);
                    }
                }
            }
            Err(err) => {
                debug!(error = %err, "URL failed to parse");
                errors.push(ErrorCode::DomainNotAllowed);
            }
        }

        errors
    }

    /// True if the text before the first `:` names a blocked protocol.
    pub fn has_blocked_protocol(&self, input: &str) -> bool {
        input
            .trim()
            .split_once(':')
            .is_some_and(|(scheme, _)| self.is_blocked_scheme(scheme))
    }

    pub fn max_url_length(&self) -> usize {
        self.max_url_length
    }

    fn is_blocked_scheme(&self, scheme: &str) -> bool {
        let scheme = normalize_protocol(scheme);
        self.blocked_protocols.iter().any(|p| *p == scheme)
    }
}

/// Lower-case, strip whitespace and the trailing colon.
fn normalize_protocol(protocol: &str) -> String {
    protocol
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .trim_end_matches(':')
        .to_lowercase()
}
