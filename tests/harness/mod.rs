// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for embed guard attack simulation.
//!
//! Attacks run against a simulated clock: each request is stamped
//! `start + i / requests_per_second`, so window behavior is exercised without
//! sleeping.

pub mod attacks;
pub mod generators;
pub mod metrics;
