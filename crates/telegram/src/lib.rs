//! Telegram Bot API client for voltwatch.
//!
//! Thin, typed wrapper over the handful of Bot API methods the monitor
//! needs: `sendMessage`, `answerCallbackQuery`, and long-polled
//! `getUpdates`. Transport and retry policy live here; what to send and
//! when is decided by `voltwatch-core`.

pub mod api;
pub mod client;
pub mod delivery;
