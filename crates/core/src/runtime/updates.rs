//! Long-poll update consumption.

use voltwatch_telegram::api::{GetUpdates, Update};
use voltwatch_telegram::client::{BotApi, CallPolicy, TelegramError};

/// Monotonic cursor over the remote update stream. The next fetch always
/// requests ids strictly greater than the last acknowledged one.
#[derive(Debug)]
pub struct UpdateCursor {
    last_update_id: i64,
}

impl UpdateCursor {
    pub fn new() -> Self {
        Self { last_update_id: 0 }
    }

    pub fn last_update_id(&self) -> i64 {
        self.last_update_id
    }

    /// Fetch updates past the cursor, in ascending id order.
    ///
    /// Any transport, protocol, or shape failure collapses to an empty
    /// batch with the cursor unchanged — the next tick is the retry. On
    /// success the cursor advances past every returned id before the
    /// caller dispatches any of them (at-least-once acknowledgment), so
    /// a failing dispatch can never bring an update back.
    pub async fn poll_once(&mut self, api: &dyn BotApi, poll_secs: u64) -> Vec<Update> {
        let request = GetUpdates::after(self.last_update_id, poll_secs);
        let payload = match serde_json::to_value(&request) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(error = %error, "failed to encode getUpdates request");
                return Vec::new();
            }
        };

        let result = match api
            .call("getUpdates", payload, CallPolicy::LongPoll { poll_secs })
            .await
        {
            Ok(result) => result,
            Err(TelegramError::Network(reason)) => {
                tracing::debug!(reason, "update poll failed, no updates this tick");
                return Vec::new();
            }
            Err(error) => {
                tracing::warn!(error = %error, "update poll rejected, no updates this tick");
                return Vec::new();
            }
        };

        let mut updates: Vec<Update> = match serde_json::from_value(result) {
            Ok(updates) => updates,
            Err(error) => {
                tracing::warn!(error = %error, "malformed getUpdates result, no updates this tick");
                return Vec::new();
            }
        };

        // ids at or below the cursor were already acknowledged
        let acknowledged = self.last_update_id;
        updates.retain(|u| u.update_id > acknowledged);
        updates.sort_by_key(|u| u.update_id);
        if let Some(newest) = updates.last() {
            self.last_update_id = newest.update_id;
        }
        updates
    }
}

impl Default for UpdateCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voltwatch_telegram::client::MockApi;

    #[tokio::test]
    async fn advances_to_max_returned_id() {
        let api = MockApi::new();
        api.push_ok(json!([
            {"update_id": 7, "callback_query": {"id": "a", "data": "refresh_battery"}},
            {"update_id": 9}
        ]));

        let mut cursor = UpdateCursor::new();
        let updates = cursor.poll_once(&api, 1).await;
        assert_eq!(updates.len(), 2);
        assert_eq!(cursor.last_update_id(), 9);
    }

    #[tokio::test]
    async fn requests_offset_one_past_cursor() {
        let api = MockApi::new();
        api.push_ok(json!([{"update_id": 12}]));

        let mut cursor = UpdateCursor::new();
        cursor.poll_once(&api, 1).await;
        cursor.poll_once(&api, 1).await;

        let calls = api.calls();
        assert_eq!(calls[0].payload["offset"], 1);
        assert_eq!(calls[1].payload["offset"], 13);
        assert_eq!(calls[0].payload["allowed_updates"], json!(["callback_query"]));
        assert_eq!(
            calls[0].policy,
            CallPolicy::LongPoll { poll_secs: 1 }
        );
    }

    #[tokio::test]
    async fn transport_failure_yields_empty_and_keeps_cursor() {
        let api = MockApi::new();
        api.push_ok(json!([{"update_id": 4}]));
        api.push_err(TelegramError::Network("unreachable".into()));

        let mut cursor = UpdateCursor::new();
        cursor.poll_once(&api, 1).await;
        let updates = cursor.poll_once(&api, 1).await;
        assert!(updates.is_empty());
        assert_eq!(cursor.last_update_id(), 4);
    }

    #[tokio::test]
    async fn malformed_result_yields_empty_and_keeps_cursor() {
        let api = MockApi::new();
        api.push_ok(json!({"unexpected": "shape"}));

        let mut cursor = UpdateCursor::new();
        let updates = cursor.poll_once(&api, 1).await;
        assert!(updates.is_empty());
        assert_eq!(cursor.last_update_id(), 0);
    }

    #[tokio::test]
    async fn stale_ids_are_never_returned_again() {
        let api = MockApi::new();
        api.push_ok(json!([{"update_id": 4}, {"update_id": 6}]));
        // a misbehaving server replays old ids out of order
        api.push_ok(json!([{"update_id": 6}, {"update_id": 5}, {"update_id": 9}]));

        let mut cursor = UpdateCursor::new();
        cursor.poll_once(&api, 1).await;
        assert_eq!(cursor.last_update_id(), 6);

        let second: Vec<i64> = cursor
            .poll_once(&api, 1)
            .await
            .iter()
            .map(|u| u.update_id)
            .collect();
        assert_eq!(second, vec![9]);
        assert_eq!(cursor.last_update_id(), 9);
    }
}
