// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for the validation engine.
//!
//! Validation failures are data: they are collected as [`ErrorCode`]s inside
//! results and never raised. [`EmbedError`] is the only error returned through
//! `Result` on the engine API and signals a caller contract violation.
//! Display strings are plain text so they can never carry markup back out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable validation error code.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[error("too many requests, try again later")]
    RateLimited,

    #[error("input contains potentially dangerous content")]
    DangerousContent,

    #[error("URL protocol is not allowed")]
    InvalidProtocol,

    #[error("URL exceeds the maximum length")]
    UrlTooLong,

    #[error("input exceeds the maximum length")]
    InputTooLong,

    #[error("URL domain is not allowed")]
    DomainNotAllowed,

    #[error("no video reference found in URL")]
    NoReferenceFound,

    #[error("file exceeds the maximum size")]
    InvalidFileSize,

    #[error("file type is not allowed")]
    InvalidFileType,

    #[error("file name is not allowed")]
    InvalidFileName,

    #[error("no file provided")]
    MissingFile,

    #[error("video reference is malformed")]
    InvalidReference,
}

impl ErrorCode {
    /// Stable label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "RateLimited",
            Self::DangerousContent => "DangerousContent",
            Self::InvalidProtocol => "InvalidProtocol",
            Self::UrlTooLong => "UrlTooLong",
            Self::InputTooLong => "InputTooLong",
            Self::DomainNotAllowed => "DomainNotAllowed",
            Self::NoReferenceFound => "NoReferenceFound",
            Self::InvalidFileSize => "InvalidFileSize",
            Self::InvalidFileType => "InvalidFileType",
            Self::InvalidFileName => "InvalidFileName",
            Self::MissingFile => "MissingFile",
            Self::InvalidReference => "InvalidReference",
        }
    }
}

/// Embed URL construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// The reference does not match the 11-character identifier pattern.
    #[error("invalid video reference")]
    InvalidReference,

    /// The configured application origin is not an http(s) origin.
    #[error("invalid embed origin: {0}")]
    InvalidOrigin(String),
}

impl EmbedError {
    /// Code reported to HTTP callers.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidReference
    }
}
