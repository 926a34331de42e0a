//! Retry engine shared by the sentiment and summary stages
//!
//! Each attempt is raced against a hard timeout. A failure is either an
//! `LlmError` or output rejected by the caller's acceptance closure. Between
//! attempts the engine sleeps according to the policy's `Backoff`.

use rand::Rng;
use std::time::Duration;

use super::{LlmBackend, LlmError};
use crate::config::{SentimentConfig, SummaryConfig};

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * 2^(n-1) + jitter` after failed attempt `n`
    Exponential,
    /// `base * n` after failed attempt `n`
    Linear,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff: Backoff,
    /// Applied to the base delay when the failure was a rate limit
    pub rate_limit_multiplier: f64,
    pub max_jitter_ms: u64,
    pub timeout_secs: u64,
}

impl RetryPolicy {
    pub fn for_sentiment(config: &SentimentConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            backoff: Backoff::Exponential,
            rate_limit_multiplier: config.rate_limit_multiplier,
            max_jitter_ms: config.max_jitter_ms,
            timeout_secs: config.request_timeout_secs,
        }
    }

    pub fn for_summary(config: &SummaryConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            base_delay_ms: config.retry_delay_ms,
            backoff: Backoff::Linear,
            rate_limit_multiplier: 1.0,
            max_jitter_ms: 0,
            timeout_secs: config.request_timeout_secs,
        }
    }

    /// Single attempt, same timeout
    pub fn single_shot(&self) -> Self {
        Self { max_attempts: 1, ..self.clone() }
    }

    /// Sleep before the attempt following failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32, rate_limited: bool) -> Duration {
        let base = if rate_limited {
            (self.base_delay_ms as f64 * self.rate_limit_multiplier) as u64
        } else {
            self.base_delay_ms
        };

        let ms = match self.backoff {
            Backoff::Exponential => {
                base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
            }
            Backoff::Linear => base.saturating_mul(u64::from(attempt)),
        };

        let jitter = if self.max_jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        } else {
            0
        };

        Duration::from_millis(ms.saturating_add(jitter))
    }
}

/// Result of a retried call
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Accepted value, `None` when every attempt failed
    pub value: Option<T>,
    pub attempts: u32,
    pub last_failure: Option<String>,
}

impl<T> RetryOutcome<T> {
    /// Attempts beyond the first
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    pub fn succeeded(&self) -> bool {
        self.value.is_some()
    }
}

/// Call `backend` until `accept` takes the response or attempts run out.
///
/// `accept` returns `Err(reason)` to reject a response; rejections are retried
/// like transport errors. Non-retryable errors stop immediately.
pub async fn call_with_retry<T, F>(
    backend: &dyn LlmBackend,
    prompt: &str,
    policy: &RetryPolicy,
    mut accept: F,
) -> RetryOutcome<T>
where
    F: FnMut(String) -> Result<T, String>,
{
    let timeout = Duration::from_secs(policy.timeout_secs);
    let mut last_failure = None;
    let mut attempts = 0;

    for attempt in 1..=policy.max_attempts.max(1) {
        attempts = attempt;

        let result = match tokio::time::timeout(timeout, backend.generate(prompt)).await {
            Ok(r) => r,
            Err(_) => Err(LlmError::Timeout(policy.timeout_secs)),
        };

        let (reason, rate_limited) = match result {
            Ok(text) => match accept(text) {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "LLM call succeeded after retry");
                    }
                    return RetryOutcome { value: Some(value), attempts, last_failure };
                }
                Err(reason) => (format!("rejected: {reason}"), false),
            },
            Err(e) if !e.is_retryable() => {
                tracing::debug!(backend = backend.backend_name(), error = %e, "LLM not available");
                return RetryOutcome { value: None, attempts, last_failure: Some(e.to_string()) };
            }
            Err(e) => (e.to_string(), e.is_rate_limit()),
        };

        if attempt < policy.max_attempts {
            let delay = policy.delay_after(attempt, rate_limited);
            tracing::warn!(
                attempt,
                max_attempts = policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                rate_limited,
                reason = %reason,
                "LLM attempt failed, backing off"
            );
            last_failure = Some(reason);
            tokio::time::sleep(delay).await;
        } else {
            tracing::warn!(
                attempts = attempt,
                reason = %reason,
                "LLM attempts exhausted"
            );
            last_failure = Some(reason);
        }
    }

    RetryOutcome { value: None, attempts, last_failure }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedBackend;
    use crate::llm::DisabledBackend;

    fn fast_policy(backoff: Backoff) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 0,
            backoff,
            rate_limit_multiplier: 5.0,
            max_jitter_ms: 0,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy { base_delay_ms: 1000, ..fast_policy(Backoff::Exponential) };
        assert_eq!(policy.delay_after(1, false), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2, false), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3, false), Duration::from_millis(4000));
        assert_eq!(policy.delay_after(1, true), Duration::from_millis(5000));
    }

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy { base_delay_ms: 1000, ..fast_policy(Backoff::Linear) };
        assert_eq!(policy.delay_after(1, false), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2, false), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3, false), Duration::from_millis(3000));
    }

    #[test]
    fn test_jitter_bounded() {
        let policy = RetryPolicy {
            base_delay_ms: 100,
            max_jitter_ms: 50,
            ..fast_policy(Backoff::Exponential)
        };
        for _ in 0..20 {
            let d = policy.delay_after(1, false).as_millis();
            assert!((100..=150).contains(&d));
        }
    }

    #[tokio::test]
    async fn test_third_attempt_succeeds() {
        let backend = ScriptedBackend::new(vec![
            Err(LlmError::Timeout(5)),
            Err(LlmError::Status { status: 500, body: "boom".into() }),
            Ok("third".to_string()),
        ]);
        let outcome =
            call_with_retry(&backend, "p", &fast_policy(Backoff::Exponential), Ok).await;
        assert_eq!(outcome.value.as_deref(), Some("third"));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.retries(), 2);
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_rejected_output_is_retried() {
        let backend = ScriptedBackend::new(vec![Ok("short".into()), Ok("long enough".into())]);
        let outcome = call_with_retry(&backend, "p", &fast_policy(Backoff::Linear), |text| {
            if text.len() > 5 {
                Ok(text)
            } else {
                Err("too short".to_string())
            }
        })
        .await;
        assert_eq!(outcome.value.as_deref(), Some("long enough"));
        assert_eq!(outcome.retries(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_failure() {
        let backend = ScriptedBackend::new(vec![]);
        let outcome: RetryOutcome<String> =
            call_with_retry(&backend, "p", &fast_policy(Backoff::Exponential), Ok).await;
        assert!(!outcome.succeeded());
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.last_failure.is_some());
    }

    #[tokio::test]
    async fn test_unavailable_stops_immediately() {
        let outcome: RetryOutcome<String> =
            call_with_retry(&DisabledBackend, "p", &fast_policy(Backoff::Exponential), Ok).await;
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.value.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_call_times_out() {
        let backend = ScriptedBackend::hanging();
        let policy = RetryPolicy { max_attempts: 1, ..fast_policy(Backoff::Exponential) };
        let outcome: RetryOutcome<String> = call_with_retry(&backend, "p", &policy, Ok).await;
        assert!(outcome.value.is_none());
        assert!(outcome.last_failure.unwrap_or_default().contains("timed out"));
    }
}
