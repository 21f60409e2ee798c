// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission validator: the single entry point used by callers.
//!
//! Composes rate limiting, danger detection, sanitization, origin checks and
//! reference extraction:
//!
//! 1. rate limit (short-circuits everything)
//! 2. raw input length (short-circuits, bounds later pattern matching)
//! 3. dangerous content
//! 4. sanitize as URL
//! 5. URL length and protocol
//! 6. domain allow-list
//! 7. reference extraction
//!
//! Steps 3 to 7 accumulate every error they find.

use crate::config::Config;
use crate::detector::DangerDetector;
use crate::embed::EmbedUrlBuilder;
use crate::error::{EmbedError, ErrorCode};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::locator::{ResourceLocator, ResourceReference};
use crate::sanitizer::{ContentSanitizer, InputKind};
use crate::token::{Token, TokenGenerator};
use crate::upload::{FileCandidate, FileValidator};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of validating one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub accepted: bool,
    pub sanitized_value: String,
    pub errors: Vec<ErrorCode>,
}

impl ValidationResult {
    pub fn from_errors(sanitized_value: String, errors: Vec<ErrorCode>) -> Self {
        Self {
            accepted: errors.is_empty(),
            sanitized_value,
            errors,
        }
    }

    pub fn push_error(&mut self, code: ErrorCode) {
        self.errors.push(code);
        self.accepted = false;
    }

    pub fn is_valid(&self) -> bool {
        self.accepted
    }
}

/// Outcome of a URL submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub accepted: bool,
    pub sanitized_value: String,
    /// Present only when the submission is accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ResourceReference>,
    pub errors: Vec<ErrorCode>,
    /// Present only for `RateLimited`
    #[serde(skip)]
    pub retry_after: Option<Duration>,
}

impl SubmissionResult {
    fn rejected(error: ErrorCode) -> Self {
        Self {
            accepted: false,
            sanitized_value: String::new(),
            reference: None,
            errors: vec![error],
            retry_after: None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.errors.contains(&ErrorCode::RateLimited)
    }
}

/// Composes the engine components behind one handle.
///
/// Construct once at startup and share by reference (or `Arc`).
pub struct SubmissionValidator {
    limiter: RateLimiter,
    sanitizer: ContentSanitizer,
    detector: DangerDetector,
    locator: ResourceLocator,
    files: FileValidator,
    tokens: TokenGenerator,
    embed: EmbedUrlBuilder,
    max_input_length: usize,
}

impl SubmissionValidator {
    /// Build all components from configuration.
    pub fn new(config: &Config) -> Result<Self, EmbedError> {
        Ok(Self {
            limiter: RateLimiter::new(&config.rate_limit),
            sanitizer: ContentSanitizer::new(),
            detector: DangerDetector::new(),
            locator: ResourceLocator::new(&config.validation),
            files: FileValidator::new(&config.upload),
            tokens: TokenGenerator::new(),
            embed: EmbedUrlBuilder::new(&config.embed)?,
            max_input_length: config.validation.max_input_length,
        })
    }

    /// Replace the token generator.
    pub fn with_token_generator(mut self, tokens: TokenGenerator) -> Self {
        self.tokens = tokens;
        self
    }

    /// Is this caller allowed to submit, is the submission safe, and which
    /// video does it reference?
    pub fn validate_submission(
        &self,
        raw_input: &str,
        identifier: &str,
        now: Instant,
    ) -> SubmissionResult {
        if let RateLimitResult::Limited { retry_after } = self.limiter.check(identifier, now) {
            warn!(identifier, ?retry_after, "Submission rate limited");
            return SubmissionResult {
                retry_after: Some(retry_after),
                ..SubmissionResult::rejected(ErrorCode::RateLimited)
            };
        }

        if raw_input.chars().count() > self.max_input_length {
            debug!(identifier, "Submission exceeds maximum input length");
            return SubmissionResult::rejected(ErrorCode::InputTooLong);
        }

        let mut errors = Vec::new();

        let dangers = self.detector.detect(raw_input);
        if !dangers.is_empty() {
            warn!(identifier, ?dangers, "Dangerous content in submission");
            errors.push(ErrorCode::DangerousContent);
        }

        let sanitized = self.sanitizer.sanitize(raw_input, InputKind::Url);

        // The raw scheme is checked too: sanitization strips `javascript:`
        // and would otherwise hide it from the parsed-URL check.
        let mut url_errors = self.locator.check_url(&sanitized);
        if self.locator.has_blocked_protocol(raw_input)
            && !url_errors.contains(&ErrorCode::InvalidProtocol)
        {
            url_errors.push(ErrorCode::InvalidProtocol);
        }
        url_errors.sort_by_key(|code| check_order(*code));
        errors.extend(url_errors);

        let reference = self.locator.extract_reference(&sanitized);
        if reference.is_none() {
            errors.push(ErrorCode::NoReferenceFound);
        }

        let accepted = errors.is_empty();
        debug!(identifier, accepted, ?errors, "Submission validated");

        SubmissionResult {
            accepted,
            sanitized_value: sanitized,
            reference: if accepted { reference } else { None },
            errors,
            retry_after: None,
        }
    }

    /// Validate upload metadata against the configured limits.
    pub fn validate_file_upload(&self, file: Option<&FileCandidate>) -> ValidationResult {
        self.files.validate_upload(file)
    }

    /// Neutralize free text. The sanitized value is always returned; errors
    /// tell the caller whether anything had to be removed or refused.
    pub fn validate_text(&self, raw_input: &str) -> ValidationResult {
        if raw_input.chars().count() > self.max_input_length {
            return ValidationResult::from_errors(String::new(), vec![ErrorCode::InputTooLong]);
        }

        let mut errors = Vec::new();
        if self.detector.contains_dangerous_content(raw_input) {
            errors.push(ErrorCode::DangerousContent);
        }
        let sanitized = self.sanitizer.sanitize(raw_input, InputKind::Text);
        ValidationResult::from_errors(sanitized, errors)
    }

    /// Generate a random token.
    pub fn generate_token(&self, length: usize) -> Token {
        self.tokens.generate(length)
    }

    /// Build the embed URL for a reference.
    pub fn build_embed_url(&self, reference: &str) -> Result<String, EmbedError> {
        self.embed.build_embed_url(reference)
    }

    /// Expose the limiter for periodic cleanup.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Sanitize input of any class.
    pub fn sanitize(&self, input: &str, kind: InputKind) -> String {
        self.sanitizer.sanitize(input, kind)
    }
}

fn check_order(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::UrlTooLong => 0,
        ErrorCode::InvalidProtocol => 1,
        ErrorCode::DomainNotAllowed => 2,
        _ => 3,
    }
}
