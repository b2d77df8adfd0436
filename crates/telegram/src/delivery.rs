//! Bounded-retry delivery for outbound notifications.
//!
//! Long-poll fetches never come through here: a failed poll is handled by
//! the next loop tick, so retrying it would only pile requests up.

use std::time::Duration;

use serde_json::Value;

use crate::client::{BotApi, CallPolicy};

/// Attempt `method` up to `max_attempts` times, sleeping `retry_delay`
/// between failed attempts (never after the last one).
///
/// Returns `false` only once every attempt is exhausted; callers treat
/// that as "best-effort delivery failed" and carry on.
pub async fn deliver(
    api: &dyn BotApi,
    method: &str,
    payload: Value,
    max_attempts: u32,
    retry_delay: Duration,
) -> bool {
    for attempt in 1..=max_attempts {
        match api.call(method, payload.clone(), CallPolicy::Notify).await {
            Ok(_) => return true,
            Err(error) if attempt < max_attempts => {
                tracing::warn!(
                    method,
                    attempt,
                    max_attempts,
                    error = %error,
                    "delivery attempt failed, retrying"
                );
                tokio::time::sleep(retry_delay).await;
            }
            Err(error) => {
                tracing::error!(
                    method,
                    attempts = max_attempts,
                    error = %error,
                    "delivery failed after all attempts"
                );
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockApi, TelegramError};
    use serde_json::json;

    const DELAY: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_sleeps_never() {
        let mock = MockApi::new();
        mock.push_ok(json!(true));

        let started = tokio::time::Instant::now();
        assert!(deliver(&mock, "sendMessage", json!({}), 3, DELAY).await);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_with_two_delays() {
        let mock = MockApi::new();
        mock.push_err(TelegramError::Network("timed out".into()));
        mock.push_err(TelegramError::Http(502));
        mock.push_ok(json!(true));

        let started = tokio::time::Instant::now();
        assert!(deliver(&mock, "sendMessage", json!({}), 3, DELAY).await);
        // exactly two inter-attempt sleeps
        assert_eq!(started.elapsed(), DELAY * 2);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_false_after_exact_attempts() {
        let mock = MockApi::new();
        for _ in 0..5 {
            mock.push_err(TelegramError::Protocol("ok flag false or missing".into()));
        }

        let started = tokio::time::Instant::now();
        assert!(!deliver(&mock, "sendMessage", json!({}), 3, DELAY).await);
        assert_eq!(mock.call_count(), 3);
        // no sleep after the final attempt
        assert_eq!(started.elapsed(), DELAY * 2);
    }

    #[tokio::test]
    async fn zero_attempts_is_a_failure() {
        let mock = MockApi::new();
        assert!(!deliver(&mock, "sendMessage", json!({}), 0, DELAY).await);
        assert_eq!(mock.call_count(), 0);
    }
}
