//! HTTP transport against the Bot API.
//!
//! One method call = one JSON POST to `{base}/bot{token}/{method}`. The
//! transport never panics on an expected failure: every outcome is folded
//! into [`TelegramError`] and the in-flight connection is dropped with the
//! request future on every exit path.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

use crate::api::ApiEnvelope;

/// Connect budget for every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Total budget for fire-and-forget notification sends.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
/// Slack added on top of the server-side long-poll window so the client
/// deadline always falls after the server's.
const POLL_MARGIN_SECS: u64 = 2;

/// Error type for Bot API calls.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// Connect failure, request timeout, or any other transport fault.
    #[error("network failure: {0}")]
    Network(String),
    /// The endpoint answered with a non-success status.
    #[error("http status {0}")]
    Http(u16),
    /// Empty or undecodable body, or an envelope with `ok` false/missing.
    #[error("protocol failure: {0}")]
    Protocol(String),
}

/// Timeout policy for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPolicy {
    /// Short bounded policy for outbound notifications.
    Notify,
    /// Long-poll fetch: total budget is `poll_secs` + a fixed margin.
    LongPoll { poll_secs: u64 },
}

impl CallPolicy {
    fn total_timeout(self) -> Duration {
        match self {
            Self::Notify => NOTIFY_TIMEOUT,
            Self::LongPoll { poll_secs } => Duration::from_secs(poll_secs + POLL_MARGIN_SECS),
        }
    }
}

/// Transport seam. The runtime and the delivery layer talk to this trait;
/// tests substitute [`MockApi`].
pub trait BotApi: Send + Sync {
    /// POST one Bot API method and return the envelope's `result` field.
    fn call(
        &self,
        method: &str,
        payload: Value,
        policy: CallPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<Value, TelegramError>> + Send + '_>>;
}

/// Production transport over reqwest.
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Build a client for the given API base (scheme + host) and bot token.
    pub fn new(base_url: &str, token: &str) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call_inner(
        &self,
        method: &str,
        payload: Value,
        policy: CallPolicy,
    ) -> Result<Value, TelegramError> {
        let resp = self
            .client
            .post(self.endpoint(method))
            .timeout(policy.total_timeout())
            .json(&payload)
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TelegramError::Http(status.as_u16()));
        }

        let envelope: ApiEnvelope = resp
            .json()
            .await
            .map_err(|e| TelegramError::Protocol(e.to_string()))?;

        if !envelope.ok {
            return Err(TelegramError::Protocol(
                envelope
                    .description
                    .unwrap_or_else(|| "ok flag false or missing".to_owned()),
            ));
        }
        Ok(envelope.result)
    }
}

impl BotApi for TelegramClient {
    fn call(
        &self,
        method: &str,
        payload: Value,
        policy: CallPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<Value, TelegramError>> + Send + '_>> {
        let method = method.to_owned();
        Box::pin(async move { self.call_inner(&method, payload, policy).await })
    }
}

/// Recorded call made through a [`MockApi`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub payload: Value,
    pub policy: CallPolicy,
}

/// Mock transport for testing — replays scripted outcomes in order and
/// records every call. Once the script runs dry it answers `Ok([])`,
/// which doubles as an empty `getUpdates` batch.
#[derive(Default)]
pub struct MockApi {
    outcomes: std::sync::Mutex<std::collections::VecDeque<Result<Value, TelegramError>>>,
    calls: std::sync::Mutex<Vec<RecordedCall>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next outcome as a success carrying `result`.
    pub fn push_ok(&self, result: Value) {
        self.outcomes.lock().unwrap().push_back(Ok(result));
    }

    /// Script the next outcome as a failure.
    pub fn push_err(&self, error: TelegramError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Methods of every call made so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl BotApi for MockApi {
    fn call(
        &self,
        method: &str,
        payload: Value,
        policy: CallPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<Value, TelegramError>> + Send + '_>> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_owned(),
            payload,
            policy,
        });
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())));
        Box::pin(async move { outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_token_and_method() {
        let c = TelegramClient::new("https://api.telegram.org", "123:abc").unwrap();
        assert_eq!(
            c.endpoint("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let c = TelegramClient::new("https://api.telegram.org/", "t").unwrap();
        assert_eq!(c.endpoint("getUpdates"), "https://api.telegram.org/bott/getUpdates");
    }

    #[test]
    fn long_poll_budget_exceeds_poll_window() {
        assert_eq!(
            CallPolicy::LongPoll { poll_secs: 1 }.total_timeout(),
            Duration::from_secs(3)
        );
        assert_eq!(CallPolicy::Notify.total_timeout(), NOTIFY_TIMEOUT);
    }

    #[tokio::test]
    async fn mock_replays_script_then_empty() {
        let mock = MockApi::new();
        mock.push_ok(serde_json::json!({"message_id": 1}));
        mock.push_err(TelegramError::Http(502));

        let first = mock
            .call("sendMessage", Value::Null, CallPolicy::Notify)
            .await;
        assert!(first.is_ok());
        let second = mock
            .call("sendMessage", Value::Null, CallPolicy::Notify)
            .await;
        assert!(matches!(second, Err(TelegramError::Http(502))));
        let drained = mock
            .call("getUpdates", Value::Null, CallPolicy::LongPoll { poll_secs: 1 })
            .await;
        assert_eq!(drained.unwrap(), Value::Array(Vec::new()));

        assert_eq!(mock.methods(), ["sendMessage", "sendMessage", "getUpdates"]);
    }
}
