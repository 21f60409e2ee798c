// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack simulation patterns for security testing.

use std::time::Duration;

/// Kind of payload an attacker submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Legitimate video URLs
    ValidUrls,
    /// Script, protocol and event-handler injections
    Injection,
    /// URLs whose host only looks like an allowed domain
    LookalikeDomain,
    /// Allowed domains with malformed video references
    MalformedReference,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Simulated requests per second
    pub requests_per_second: f64,
    /// Number of unique caller identifiers
    pub unique_identifiers: usize,
    /// What is submitted
    pub payload: Payload,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 10.0,
            unique_identifiers: 1,
            payload: Payload::ValidUrls,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single caller flood.
    pub fn single_caller_flood() -> Self {
        Self {
            total_requests: 200,
            requests_per_second: 100.0,
            ..Default::default()
        }
    }

    /// Distributed flood - many callers, each under the ceiling.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            requests_per_second: 50.0,
            unique_identifiers: 100,
            ..Default::default()
        }
    }

    /// Injection payloads spread over callers so the limiter never fires.
    pub fn injection_attack() -> Self {
        Self {
            total_requests: 200,
            requests_per_second: 20.0,
            unique_identifiers: 50,
            payload: Payload::Injection,
        }
    }

    /// Open-redirect style look-alike domains.
    pub fn lookalike_domains() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 10.0,
            unique_identifiers: 25,
            payload: Payload::LookalikeDomain,
        }
    }

    /// Reference tampering on allowed domains.
    pub fn malformed_references() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 10.0,
            unique_identifiers: 25,
            payload: Payload::MalformedReference,
        }
    }

    /// Slow drip - one request every seven seconds stays under 10 per minute.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 60,
            requests_per_second: 1.0 / 7.0,
            ..Default::default()
        }
    }

    /// Simulated duration of the attack.
    pub fn expected_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_requests as f64 / self.requests_per_second)
    }

    /// Simulated offset of request `index` from the start.
    pub fn offset(&self, index: usize) -> Duration {
        Duration::from_secs_f64(index as f64 / self.requests_per_second)
    }

    /// Upper bound on accepted requests for a single caller: the ceiling per
    /// started window.
    pub fn max_allowed_per_caller(&self, ceiling: usize, window: Duration) -> usize {
        let windows = (self.expected_duration().as_secs_f64() / window.as_secs_f64()).ceil();
        ceiling * (windows.max(1.0) as usize)
    }
}
