// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter keyed by caller identifier.
//!
//! Each identifier owns a history of request instants. On every check the
//! history is filtered down to the live window `(now - window, now]`; if the
//! surviving count has reached the ceiling the request is limited and not
//! recorded, otherwise `now` is appended. History is filtered rather than
//! popped from the front, so out-of-order instants are tolerated.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed and has been recorded
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until the oldest live request leaves the window
        reset_in: Duration,
    },
    /// Request is rate limited and was not recorded
    Limited {
        /// Time until a slot frees up
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitResult::Limited { .. })
    }
}

/// Thread-safe sliding-window rate limiter.
///
/// A single mutex guards the whole map so check-then-record is atomic across
/// concurrent callers.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    history: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests_per_window as usize,
            window: config.window_duration(),
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Check the limit for `identifier` at `now`, recording the attempt if allowed.
    pub fn check(&self, identifier: &str, now: Instant) -> RateLimitResult {
        let mut history = self.lock();
        let entries = history.entry(identifier.to_string()).or_default();
        evict(entries, now, self.window);

        if entries.len() >= self.max_requests {
            let retry_after = self.time_until_slot(entries, now);
            debug!(identifier, live = entries.len(), ?retry_after, "Rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        entries.push(now);
        RateLimitResult::Allowed {
            remaining: (self.max_requests - entries.len()) as u32,
            reset_in: self.time_until_slot(entries, now),
        }
    }

    /// Atomic check-then-record; `true` means the request was refused.
    ///
    /// An admitted request is already recorded. Do not follow it with
    /// [`RateLimiter::record`].
    pub fn is_limited(&self, identifier: &str, now: Instant) -> bool {
        self.check(identifier, now).is_limited()
    }

    /// Record an attempt that was admitted through some other path.
    ///
    /// [`RateLimiter::check`] and [`RateLimiter::is_limited`] record on
    /// admission; calling this after them counts the request twice.
    pub fn record(&self, identifier: &str, now: Instant) {
        let mut history = self.lock();
        let entries = history.entry(identifier.to_string()).or_default();
        evict(entries, now, self.window);
        entries.push(now);
    }

    /// Number of live requests for `identifier` at `now`, without recording.
    pub fn live_count(&self, identifier: &str, now: Instant) -> usize {
        let history = self.lock();
        history
            .get(identifier)
            .map(|entries| entries.iter().filter(|t| is_live(**t, now, self.window)).count())
            .unwrap_or(0)
    }

    /// Evict stale entries and drop identifiers with no live history.
    pub fn cleanup(&self, now: Instant) {
        let mut history = self.lock();
        let before = history.len();
        history.retain(|_, entries| {
            evict(entries, now, self.window);
            !entries.is_empty()
        });
        debug!(before, after = history.len(), "Rate limiter cleanup");
    }

    /// Number of identifiers currently tracked.
    pub fn tracked_identifiers(&self) -> usize {
        self.lock().len()
    }

    fn time_until_slot(&self, entries: &[Instant], now: Instant) -> Duration {
        entries
            .iter()
            .min()
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    // Entries are plain instants, so a panic mid-update cannot leave them
    // inconsistent; recover the guard instead of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Instant>>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `t` is live at `now` iff `t` lies in `(now - window, now]`.
fn is_live(t: Instant, now: Instant, window: Duration) -> bool {
    match now.checked_duration_since(t) {
        Some(age) => age < window,
        None => false,
    }
}

fn evict(entries: &mut Vec<Instant>, now: Instant, window: Duration) {
    entries.retain(|t| is_live(*t, now, window));
}
