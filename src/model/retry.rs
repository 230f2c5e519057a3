//! Exponential backoff with jitter for transient faults.

use rand::Rng;
use std::time::Duration;

/// Backoff profile: exponentially growing delay with a hard cap and a
/// small uniform jitter on top.
///
/// Two profiles are used by the client: a slower one for rate-limit and
/// overload responses, and a faster one for transport-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first retry.
    pub base: Duration,
    /// Upper bound on the exponential part of the delay.
    pub cap: Duration,
    /// Jitter added on top of the capped delay, drawn from `[0, jitter)`.
    pub jitter: Duration,
}

impl Backoff {
    /// Profile for HTTP 429/503 responses.
    pub fn rate_limit() -> Self {
        Self {
            base: Duration::from_millis(2000),
            cap: Duration::from_secs(10),
            jitter: Duration::from_millis(300),
        }
    }

    /// Profile for network/transport errors.
    pub fn transport() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(5),
            jitter: Duration::from_millis(200),
        }
    }

    /// Delay before retrying after the given 1-based attempt number:
    /// `min(base * 2^(attempt-1), cap)` plus random jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self
            .base
            .saturating_mul(1u32 << (attempt.saturating_sub(1)).min(16))
            .min(self.cap);

        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return exp;
        }
        let jitter = rand::rng().random_range(0..jitter_ms);
        exp + Duration::from_millis(jitter)
    }

    /// Remove the jitter component. Used by tests that assert exact delays.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = Duration::ZERO;
        self
    }

    /// Scale base and cap down to the millisecond range so tests do not
    /// spend wall-clock time sleeping.
    pub fn for_tests() -> Self {
        Self {
            base: Duration::from_millis(1),
            cap: Duration::from_millis(4),
            jitter: Duration::ZERO,
        }
    }
}
