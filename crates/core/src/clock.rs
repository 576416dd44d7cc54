// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for cache TTLs and countdowns.
//!
//! Caches measure freshness with the monotonic [`Clock::now`]; crafting
//! countdowns compare upstream microsecond timestamps against
//! [`Clock::epoch_micros`].

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_micros(&self) -> i64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_micros(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or_default()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_micros: Arc<Mutex<i64>>,
}

impl FakeClock {
    /// Starts at a fixed wall-clock time (2025-08-11T12:00:00Z).
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            epoch_micros: Arc::new(Mutex::new(1_754_913_600_000_000)),
        }
    }

    /// Advance both the monotonic and wall clocks
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
        *self.epoch_micros.lock() += duration.as_micros() as i64;
    }

    pub fn set_epoch_micros(&self, micros: i64) {
        *self.epoch_micros.lock() = micros;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_micros(&self) -> i64 {
        *self.epoch_micros.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
