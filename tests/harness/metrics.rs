// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

use embed_guard::ErrorCode;
use std::collections::HashMap;
use std::time::Duration;

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Simulated duration of the attack
    simulated: Duration,
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Accepted requests by identifier
    allowed_per_identifier: HashMap<String, usize>,
    /// Count of requests by identifier
    requests_per_identifier: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    RateLimited,
    DangerousContent,
    InvalidUrl,
    NoReference,
}

impl Outcome {
    /// Classify by the first (highest priority) error code.
    pub fn from_errors(errors: &[ErrorCode]) -> Self {
        match errors.first() {
            None => Outcome::Allowed,
            Some(ErrorCode::RateLimited) => Outcome::RateLimited,
            Some(ErrorCode::DangerousContent) => Outcome::DangerousContent,
            Some(ErrorCode::NoReferenceFound) => Outcome::NoReference,
            Some(_) => Outcome::InvalidUrl,
        }
    }
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated attack duration.
    pub fn finish(&mut self, simulated: Duration) {
        self.simulated = simulated;
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, identifier: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .requests_per_identifier
            .entry(identifier.to_string())
            .or_insert(0) += 1;
        if outcome == Outcome::Allowed {
            *self
                .allowed_per_identifier
                .entry(identifier.to_string())
                .or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of blocked to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let allowed = self.count(Outcome::Allowed);
        (total - allowed) as f64 / total as f64
    }

    /// Most requests accepted for any single identifier.
    pub fn max_allowed_per_identifier(&self) -> usize {
        self.allowed_per_identifier.values().copied().max().unwrap_or(0)
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            allowed: self.count(Outcome::Allowed),
            rate_limited: self.count(Outcome::RateLimited),
            validation_failed: self.count(Outcome::DangerousContent)
                + self.count(Outcome::InvalidUrl)
                + self.count(Outcome::NoReference),
            simulated_ms: self.simulated.as_millis() as u64,
            block_rate: self.block_rate(),
            max_allowed_per_identifier: self.max_allowed_per_identifier(),
            median_latency_us: self.median_latency_us(),
            unique_identifiers: self.requests_per_identifier.len(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub allowed: usize,
    pub rate_limited: usize,
    pub validation_failed: usize,
    pub simulated_ms: u64,
    pub block_rate: f64,
    pub max_allowed_per_identifier: usize,
    pub median_latency_us: u64,
    pub unique_identifiers: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Simulated:         {} ms", self.simulated_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Allowed:           {}", self.allowed)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Validation Failed: {}", self.validation_failed)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Distribution ---")?;
        writeln!(f, "Unique Callers:    {}", self.unique_identifiers)?;
        writeln!(f, "Max Allowed/Caller:{}", self.max_allowed_per_identifier)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();

        metrics.record(Outcome::Allowed, "10.0.0.1", Duration::from_micros(100));
        metrics.record(Outcome::Allowed, "10.0.0.1", Duration::from_micros(150));
        metrics.record(Outcome::RateLimited, "10.0.0.1", Duration::from_micros(50));
        metrics.record(Outcome::Allowed, "10.0.0.2", Duration::from_micros(80));

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.count(Outcome::Allowed), 3);
        assert_eq!(metrics.max_allowed_per_identifier(), 2);
        assert_eq!(metrics.report().unique_identifiers, 2);
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(Outcome::from_errors(&[]), Outcome::Allowed);
        assert_eq!(
            Outcome::from_errors(&[ErrorCode::DangerousContent, ErrorCode::InvalidProtocol]),
            Outcome::DangerousContent
        );
        assert_eq!(
            Outcome::from_errors(&[ErrorCode::DomainNotAllowed]),
            Outcome::InvalidUrl
        );
    }
}
