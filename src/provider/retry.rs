// src/provider/retry.rs — Randomized exponential backoff for responders
//
// Wraps any Responder and retries transient failures: rate limits, server
// errors, timeouts, connection resets. Non-retriable errors pass through on the
// first attempt. Running out of attempts yields `RetriesExhausted`, which the
// scheduler treats as fatal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{ResponseRequest, Responder};
use crate::infra::errors::EvolveError;

const MAX_ATTEMPTS: u32 = 120;
const MIN_WAIT: Duration = Duration::from_secs(10);
const MAX_WAIT: Duration = Duration::from_secs(100);
const MULTIPLIER: f64 = 1.0;

/// Attempt budget and backoff schedule.
///
/// The wait before attempt `n + 1` (after `n` failures) is drawn uniformly from
/// `[min_wait, clamp(multiplier * 2^(n-1), min_wait, max_wait)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            min_wait: MIN_WAIT,
            max_wait: MAX_WAIT,
            multiplier: MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps. Handy for tests and local stubs.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_wait: Duration::ZERO,
            max_wait: Duration::ZERO,
            multiplier: MULTIPLIER,
        }
    }

    /// Upper bound of the wait after `failures` failed attempts (1-based).
    pub fn ceiling(&self, failures: u32) -> Duration {
        let exp = self.multiplier * 2f64.powi(failures.saturating_sub(1).min(1023) as i32);
        let secs = exp.clamp(self.min_wait.as_secs_f64(), self.max_wait.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Wait after `failures` failures given a uniform sample `unit` in [0, 1].
    pub fn delay_for(&self, failures: u32, unit: f64) -> Duration {
        let lo = self.min_wait.as_secs_f64();
        let hi = self.ceiling(failures).as_secs_f64();
        Duration::from_secs_f64(lo + (hi - lo) * unit.clamp(0.0, 1.0))
    }

    /// Wait honoring a server hint when one was given, kept inside the bounds.
    fn delay_after(&self, failures: u32, error: &EvolveError) -> Duration {
        match error {
            EvolveError::RateLimited { retry_after_ms, .. } if *retry_after_ms > 0 => {
                Duration::from_millis(*retry_after_ms).clamp(self.min_wait, self.max_wait)
            }
            _ => self.delay_for(failures, random_unit()),
        }
    }

    /// Run `op` until it succeeds or a failure is final.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, EvolveError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EvolveError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retriable() => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    tracing::error!(
                        responder = label,
                        attempts = attempt,
                        "Retry budget exhausted: {}",
                        e
                    );
                    return Err(EvolveError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_after(attempt, &e);
                    tracing::warn!(
                        responder = label,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after error: {}",
                        e
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// Uniform sample in [0, 1] from the OS RNG. Falls back to the midpoint.
fn random_unit() -> f64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64,
        Err(e) => {
            tracing::debug!("getrandom unavailable, using midpoint jitter: {}", e);
            0.5
        }
    }
}

/// A responder wrapper that applies a [`RetryPolicy`] to every call.
pub struct RetryResponder {
    inner: Arc<dyn Responder>,
    policy: RetryPolicy,
}

impl RetryResponder {
    pub fn new(inner: Arc<dyn Responder>) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: Arc<dyn Responder>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl Responder for RetryResponder {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, EvolveError> {
        let inner = &self.inner;
        self.policy
            .run(inner.id(), move || inner.respond(request))
            .await
    }
}
