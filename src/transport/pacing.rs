//! Request pacing policies
//!
//! The transport asks its pacer how long to pause after each request and
//! sleeps for that long, regardless of how quickly the server answered.

use crate::ConfigError;
use std::time::Duration;

/// Decides the pause enforced after a request completes
pub trait Pacer: Send + Sync {
    /// Returns the duration to wait before the next request may be sent
    fn pause(&self) -> Duration;
}

/// Constant pause after every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Builds a delay from a requests-per-second budget
    ///
    /// Non-positive budgets are treated as "no pacing". A budget so small
    /// that its interval does not fit a `Duration` is rejected.
    pub fn from_rate(requests_per_second: f64) -> Result<Self, ConfigError> {
        if !(requests_per_second.is_finite() && requests_per_second > 0.0) {
            return Ok(Self::new(Duration::ZERO));
        }

        Duration::try_from_secs_f64(1.0 / requests_per_second)
            .map(Self::new)
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "requests-per-second {} gives no usable interval: {}",
                    requests_per_second, e
                ))
            })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pacer for FixedDelay {
    fn pause(&self) -> Duration {
        self.interval
    }
}
