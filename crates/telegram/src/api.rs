//! Bot API wire types.
//!
//! Request bodies are plain `Serialize` structs POSTed as JSON; responses
//! arrive wrapped in the `{ok, result, description}` envelope that
//! [`crate::client`] unwraps before handing `result` back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Callback payload carried by the inline refresh button.
pub const REFRESH_CALLBACK: &str = "refresh_battery";

/// Label shown on the inline refresh button.
pub const REFRESH_LABEL: &str = "🔄 Refresh Data";

// ── Request bodies ──

/// `sendMessage` body. Always HTML parse mode; the optional keyboard is
/// attached only to status reports, never to critical warnings.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl<'a> SendMessage<'a> {
    pub fn html(chat_id: &'a str, text: &'a str) -> Self {
        Self {
            chat_id,
            text,
            parse_mode: "HTML",
            reply_markup: None,
        }
    }

    /// Attach the single-button refresh keyboard.
    pub fn with_refresh_button(mut self) -> Self {
        self.reply_markup = Some(ReplyMarkup::refresh());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ReplyMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl ReplyMarkup {
    /// One row, one button: the refresh control.
    pub fn refresh() -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: REFRESH_LABEL.to_owned(),
                callback_data: REFRESH_CALLBACK.to_owned(),
            }]],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

/// `answerCallbackQuery` body — clears the button's spinner client-side.
#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
    pub text: &'a str,
    pub show_alert: bool,
}

impl<'a> AnswerCallbackQuery<'a> {
    pub fn new(callback_query_id: &'a str, text: &'a str) -> Self {
        Self {
            callback_query_id,
            text,
            show_alert: false,
        }
    }
}

/// `getUpdates` body. The offset is one past the last acknowledged
/// update id; only callback-query updates are requested.
#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: [&'static str; 1],
}

impl GetUpdates {
    pub fn after(last_update_id: i64, timeout: u64) -> Self {
        Self {
            offset: last_update_id + 1,
            timeout,
            allowed_updates: ["callback_query"],
        }
    }
}

// ── Response types ──

/// Top-level Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of a `getUpdates` result. Ids increase monotonically and
/// are never reused.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// The callback press this bot reacts to, if that is what this
    /// update carries. Anything else is ignored by the caller.
    pub fn refresh_press(&self) -> Option<&CallbackQuery> {
        self.callback_query
            .as_ref()
            .filter(|q| q.data.as_deref() == Some(REFRESH_CALLBACK))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
}
