// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Random token generation over `[A-Za-z0-9]`.
//!
//! Tokens come from the operating system CSPRNG. Only when that source fails
//! does generation fall back to a time-seeded `SmallRng`; such tokens are
//! tagged [`TokenStrength::NonCryptographic`] and are NOT suitable for CSRF
//! protection or any other secret.

use rand::distributions::Alphanumeric;
use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Default token length.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of 62 below 256; bytes at or above it are rejected to keep
/// the distribution uniform.
const REJECTION_BOUND: u8 = 248;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Strength of the entropy behind a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStrength {
    Cryptographic,
    NonCryptographic,
}

impl TokenStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cryptographic => "cryptographic",
            Self::NonCryptographic => "non_cryptographic",
        }
    }
}

/// A generated token and where its entropy came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub strength: TokenStrength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntropySource {
    Os,
    Fallback,
}

/// Token generator.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    source: EntropySource,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    /// Generator backed by the OS CSPRNG, with fallback on failure.
    pub fn new() -> Self {
        Self {
            source: EntropySource::Os,
        }
    }

    /// Generator that always uses the non-cryptographic fallback.
    pub fn non_cryptographic() -> Self {
        Self {
            source: EntropySource::Fallback,
        }
    }

    /// Generate a token string of `length` characters.
    pub fn generate_token(&self, length: usize) -> String {
        self.generate(length).value
    }

    /// Generate a token and report its strength.
    pub fn generate(&self, length: usize) -> Token {
        if self.source == EntropySource::Os {
            match os_token(length) {
                Ok(value) => {
                    return Token {
                        value,
                        strength: TokenStrength::Cryptographic,
                    }
                }
                Err(err) => {
                    warn!(error = %err, "OS random source unavailable, using non-cryptographic fallback");
                }
            }
        }

        Token {
            value: fallback_token(length),
            strength: TokenStrength::NonCryptographic,
        }
    }
}

fn os_token(length: usize) -> Result<String, rand::Error> {
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while out.len() < length {
        OsRng.try_fill_bytes(&mut buf)?;
        for &byte in buf.iter().filter(|b| **b < REJECTION_BOUND) {
            if out.len() == length {
                break;
            }
            out.push(ALPHABET[(byte % 62) as usize] as char);
        }
    }
    Ok(out)
}

fn fallback_token(length: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut rng = SmallRng::seed_from_u64(nanos ^ counter.rotate_left(32));
    (0..length)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
