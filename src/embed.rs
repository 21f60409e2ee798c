// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Embed URL construction.
//!
//! The query parameter set is closed:
//!
//! | parameter         | value              | effect                         |
//! |-------------------|--------------------|--------------------------------|
//! | `enablejsapi`     | `0`                | no IFrame script API           |
//! | `rel`             | `0`                | related videos from same channel only |
//! | `disablekb`       | `1`                | keyboard controls off          |
//! | `modestbranding`  | `1`                | minimal branding               |
//! | `iv_load_policy`  | `3`                | annotations off                |
//! | `playsinline`     | `1`                | inline playback on mobile      |
//! | `origin`          | application origin | pins the embedding origin      |
//! | `widget_referrer` | application origin | pins the referrer              |

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::locator::is_valid_reference;
use tracing::warn;
use url::Url;

/// Privacy-enhanced embed endpoint.
pub const EMBED_ENDPOINT: &str = "https://www.youtube-nocookie.com/embed/";

const FIXED_PARAMS: [(&str, &str); 6] = [
    ("enablejsapi", "0"),
    ("rel", "0"),
    ("disablekb", "1"),
    ("modestbranding", "1"),
    ("iv_load_policy", "3"),
    ("playsinline", "1"),
];

/// Builds embed URLs for validated references.
#[derive(Debug, Clone)]
pub struct EmbedUrlBuilder {
    origin: String,
}

impl EmbedUrlBuilder {
    /// Create a builder pinned to the configured application origin.
    pub fn new(config: &EmbedConfig) -> Result<Self, EmbedError> {
        let parsed = Url::parse(&config.origin)
            .map_err(|_| EmbedError::InvalidOrigin(config.origin.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(EmbedError::InvalidOrigin(config.origin.clone()));
        }
        Ok(Self {
            origin: parsed.origin().ascii_serialization(),
        })
    }

    /// Build the embed URL for `reference`.
    ///
    /// The reference is re-validated here regardless of where it came from.
    pub fn build_embed_url(&self, reference: &str) -> Result<String, EmbedError> {
        if !is_valid_reference(reference) {
            warn!("Refusing to build embed URL for malformed reference");
            return Err(EmbedError::InvalidReference);
        }

        let mut url = Url::parse(EMBED_ENDPOINT)
            .and_then(|base| base.join(reference))
            .map_err(|_| EmbedError::InvalidReference)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in FIXED_PARAMS {
                query.append_pair(key, value);
            }
            query.append_pair("origin", &self.origin);
            query.append_pair("widget_referrer", &self.origin);
        }
        Ok(url.into())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}
