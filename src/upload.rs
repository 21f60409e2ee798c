// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metadata-only validation of upload candidates.
//!
//! Size and type are the caller-declared values; file content is never read.

use crate::config::UploadConfig;
use crate::error::ErrorCode;
use crate::sanitizer::{ContentSanitizer, InputKind};
use crate::validator::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Declared metadata of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCandidate {
    pub declared_size: u64,
    pub declared_mime_type: String,
    pub name: String,
}

/// File metadata validator.
#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_types: HashSet<String>,
    allowed_extensions: HashSet<String>,
    max_size_bytes: u64,
    sanitizer: ContentSanitizer,
}

impl FileValidator {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            allowed_types: config
                .allowed_mime_types
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_size_bytes: config.max_file_size_bytes,
            sanitizer: ContentSanitizer::new(),
        }
    }

    /// Validate against explicit limits. All violations are reported.
    pub fn validate(
        &self,
        file: Option<&FileCandidate>,
        allowed_types: &HashSet<String>,
        max_size_bytes: u64,
    ) -> ValidationResult {
        let Some(file) = file else {
            debug!("Upload missing file");
            return ValidationResult::from_errors(String::new(), vec![ErrorCode::MissingFile]);
        };

        let mut errors = Vec::new();

        if file.declared_size > max_size_bytes {
            debug!(size = file.declared_size, max = max_size_bytes, "Upload too large");
            errors.push(ErrorCode::InvalidFileSize);
        }

        if !allowed_types.is_empty() && !type_allowed(&file.declared_mime_type, allowed_types) {
            debug!(mime = %file.declared_mime_type, "Upload type not allowed");
            errors.push(ErrorCode::InvalidFileType);
        }

        if has_path_components(&file.name) {
            debug!(name = ?file.name, "Upload name contains path components");
            errors.push(ErrorCode::InvalidFileName);
        }

        let sanitized = self.sanitizer.sanitize(&file.name, InputKind::Filename);
        ValidationResult::from_errors(sanitized, errors)
    }

    /// Validate against the configured limits, including the extension list.
    pub fn validate_upload(&self, file: Option<&FileCandidate>) -> ValidationResult {
        let mut result = self.validate(file, &self.allowed_types, self.max_size_bytes);

        if let Some(file) = file {
            if file.name.trim().is_empty() && !result.errors.contains(&ErrorCode::InvalidFileName) {
                result.push_error(ErrorCode::InvalidFileName);
            }
            if !self.allowed_extensions.is_empty()
                && !extension_allowed(&file.name, &self.allowed_extensions)
                && !result.errors.contains(&ErrorCode::InvalidFileType)
            {
                debug!(name = ?file.name, "Upload extension not allowed");
                result.push_error(ErrorCode::InvalidFileType);
            }
        }

        result
    }
}

fn has_path_components(name: &str) -> bool {
    name.contains("..") || name.contains('/') || name.contains('\\')
}

/// Compare on the bare media type, ignoring case and parameters.
fn type_allowed(mime: &str, allowed: &HashSet<String>) -> bool {
    let bare = mime.split(';').next().unwrap_or(mime).trim();
    allowed.iter().any(|t| t.trim().eq_ignore_ascii_case(bare))
}

fn extension_allowed(name: &str, allowed: &HashSet<String>) -> bool {
    match name.trim().rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => allowed.contains(&ext.to_ascii_lowercase()),
        _ => false,
    }
}
