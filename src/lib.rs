// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Embed Guard
//!
//! This crate decides whether untrusted input is safe to act on before an
//! application turns it into a video embed:
//!
//! - Per-caller sliding-window rate limiting (10 per minute default)
//! - Dangerous content detection and class-specific sanitization
//! - Domain allow-listing on the parsed URL host
//! - Exact 11-character video reference extraction
//! - Fixed-parameter embed URL construction
//! - Upload metadata validation and random token generation
//!
//! The sanitizer and detector are regex denylists and therefore incomplete
//! against a general XSS threat model. Treat this crate as an allow-list URL
//! validator plus a best-effort text neutralizer, never as an HTML sanitizer
//! for rendering untrusted markup.

pub mod config;
pub mod detector;
pub mod embed;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod locator;
pub mod metrics;
pub mod sanitizer;
pub mod token;
pub mod upload;
pub mod validator;

pub use config::Config;
pub use error::{EmbedError, ErrorCode};
pub use limiter::{RateLimitResult, RateLimiter};
pub use locator::ResourceReference;
pub use sanitizer::InputKind;
pub use upload::FileCandidate;
pub use validator::{SubmissionResult, SubmissionValidator, ValidationResult};
