//! Rate-limit retry with random exponential backoff
//!
//! Only [`LlmError::RateLimited`] is retried. Every other provider error is
//! returned on first occurrence.

use crate::config::RetryPolicy;
use cosmograph_llm::LlmError;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

impl RetryPolicy {
    /// Wait before retrying after failed attempt `attempt` (1-based)
    ///
    /// Uniformly random between the minimum wait and the exponential ceiling
    /// `min(max_wait, min_wait * 2^(attempt-1))`. A provider `retry_after`
    /// raises the result, capped at the maximum wait.
    pub fn backoff<R: Rng + ?Sized>(&self, attempt: u32, retry_after: Option<Duration>, rng: &mut R) -> Duration {
        let floor = self.min_wait_ms.min(self.max_wait_ms);
        let exponent = attempt.saturating_sub(1).min(32);
        let ceiling = floor
            .saturating_mul(1u64 << exponent)
            .clamp(floor, self.max_wait_ms);

        let mut delay = Duration::from_millis(rng.gen_range(floor..=ceiling));
        if let Some(hint) = retry_after {
            delay = delay.max(hint.min(self.max_wait()));
        }
        delay
    }

    /// Run `operation`, retrying rate-limit failures
    ///
    /// `sleep` is called with each computed delay.
    pub fn run<T, F, S>(&self, mut operation: F, sleep: S) -> Result<T, LlmError>
    where
        F: FnMut() -> Result<T, LlmError>,
        S: Fn(Duration),
    {
        let mut rng = rand::thread_rng();
        let mut attempt = 1;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) if error.is_rate_limit() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt, error.retry_after(), &mut rng);
                    warn!(
                        "Rate limited (attempt {}/{}), retrying in {:?}",
                        attempt, self.max_attempts, delay
                    );
                    sleep(delay);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
