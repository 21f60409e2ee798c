// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the HTTP service.

use crate::error::ErrorCode;
use crate::token::TokenStrength;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Service metrics, registered on a private registry.
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    rejections: IntCounterVec,
    uploads: IntCounterVec,
    tokens: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("embed_guard_submissions_total", "URL submissions by outcome"),
            &["outcome"],
        )?;
        let rejections = IntCounterVec::new(
            Opts::new("embed_guard_rejections_total", "Validation errors by code"),
            &["code"],
        )?;
        let uploads = IntCounterVec::new(
            Opts::new("embed_guard_uploads_total", "Upload validations by outcome"),
            &["outcome"],
        )?;
        let tokens = IntCounterVec::new(
            Opts::new("embed_guard_tokens_total", "Generated tokens by entropy strength"),
            &["strength"],
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(rejections.clone()))?;
        registry.register(Box::new(uploads.clone()))?;
        registry.register(Box::new(tokens.clone()))?;

        Ok(Self {
            registry,
            submissions,
            rejections,
            uploads,
            tokens,
        })
    }

    /// Count a submission and each of its error codes.
    pub fn observe_submission(&self, accepted: bool, errors: &[ErrorCode]) {
        let outcome = if accepted {
            "accepted"
        } else if errors.contains(&ErrorCode::RateLimited) {
            "rate_limited"
        } else {
            "rejected"
        };
        self.submissions.with_label_values(&[outcome]).inc();
        self.observe_errors(errors);
    }

    pub fn observe_upload(&self, accepted: bool, errors: &[ErrorCode]) {
        let outcome = if accepted { "accepted" } else { "rejected" };
        self.uploads.with_label_values(&[outcome]).inc();
        self.observe_errors(errors);
    }

    pub fn observe_errors(&self, errors: &[ErrorCode]) {
        for code in errors {
            self.rejections.with_label_values(&[code.as_str()]).inc();
        }
    }

    pub fn observe_token(&self, strength: TokenStrength) {
        self.tokens.with_label_values(&[strength.as_str()]).inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
