//! The monitor daemon: owns all loop state and drives the tick cadence.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use voltwatch_telegram::api::{AnswerCallbackQuery, SendMessage};
use voltwatch_telegram::client::BotApi;
use voltwatch_telegram::delivery;

use super::hourly::HourlyGate;
use super::loop_control::{self, LoopPhase};
use super::shutdown::ShutdownGuard;
use super::updates::UpdateCursor;
use crate::battery::{BatteryProbe, BatterySnapshot};
use crate::config::WatchCfg;
use crate::report;

/// Minimum wall time between update polls, independent of tick cadence.
const POLL_GATE: Duration = Duration::from_secs(1);

/// Long-running monitor loop. All mutable state (update cursor, hourly
/// gate, pacing) lives here and is touched only between ticks — there is
/// no concurrent access and nothing to lock.
pub struct Runtime {
    cfg: Arc<WatchCfg>,
    api: Arc<dyn BotApi>,
    probe: Arc<dyn BatteryProbe>,
    shutdown: ShutdownGuard,
    cursor: UpdateCursor,
    gate: HourlyGate,
    phase: LoopPhase,
    last_poll: Option<Instant>,
    tick_count: u64,
}

impl Runtime {
    pub fn new(cfg: Arc<WatchCfg>, api: Arc<dyn BotApi>, probe: Arc<dyn BatteryProbe>) -> Self {
        Self {
            cfg,
            api,
            probe,
            shutdown: ShutdownGuard::new(),
            cursor: UpdateCursor::new(),
            gate: HourlyGate::new(),
            phase: LoopPhase::Steady,
            last_poll: None,
            tick_count: 0,
        }
    }

    /// Cancellation token for external shutdown.
    pub fn token(&self) -> CancellationToken {
        self.shutdown.token()
    }

    /// Send the startup report and tick until cancelled.
    pub async fn run(&mut self) {
        self.shutdown.spawn_signal_listener();
        let token = self.shutdown.token();

        tracing::info!("battery monitor started");

        match self.report_battery().await {
            Ok(()) => tracing::info!("initial battery status sent"),
            Err(error) => tracing::error!(error = ?error, "failed to send initial status"),
        }

        loop {
            let interval = self.phase.interval(&self.cfg);
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(tick_count = self.tick_count, "shutdown signal received, exiting loop");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    self.tick_count += 1;
                    let failed = match self.tick().await {
                        Ok(()) => false,
                        Err(error) => {
                            tracing::error!(error = ?error, "tick failed, cooling down");
                            true
                        }
                    };
                    self.phase = loop_control::next_phase(failed);
                }
            }
        }

        tracing::info!("battery monitor stopped");
    }

    /// One iteration: consume pending updates, then the hourly gate.
    /// Nothing below this boundary may kill the process — an error
    /// escaping here costs one cooldown interval and the loop carries on.
    async fn tick(&mut self) -> anyhow::Result<()> {
        self.poll_updates().await?;
        self.maybe_fire_hourly().await?;
        Ok(())
    }

    async fn poll_updates(&mut self) -> anyhow::Result<()> {
        if self.last_poll.is_some_and(|at| at.elapsed() < POLL_GATE) {
            return Ok(());
        }
        self.last_poll = Some(Instant::now());

        let updates = self
            .cursor
            .poll_once(self.api.as_ref(), self.cfg.poll_timeout_secs)
            .await;
        for update in updates {
            let Some(press) = update.refresh_press() else {
                continue;
            };
            // the cursor is already past this id; a failure below must
            // not bring the update back
            self.handle_refresh(&press.id).await;
        }
        Ok(())
    }

    async fn handle_refresh(&self, callback_id: &str) {
        self.answer_callback(callback_id, "Processing...").await;
        match self.report_battery().await {
            Ok(()) => tracing::info!("battery status refreshed"),
            Err(error) => {
                tracing::error!(error = ?error, "refresh failed");
                self.answer_callback(callback_id, "Error!").await;
            }
        }
    }

    /// Acknowledge a button press. Best-effort: a failed ack only logs,
    /// the report is produced regardless.
    async fn answer_callback(&self, callback_id: &str, text: &str) {
        let ack = AnswerCallbackQuery::new(callback_id, text);
        let Ok(payload) = serde_json::to_value(&ack) else {
            return;
        };
        delivery::deliver(
            self.api.as_ref(),
            "answerCallbackQuery",
            payload,
            self.cfg.retry_max_attempts,
            self.retry_delay(),
        )
        .await;
    }

    /// Snapshot → status message with the refresh control → critical
    /// threshold check.
    async fn report_battery(&self) -> anyhow::Result<()> {
        let battery = self.probe.read();
        let text = report::format_status(&battery);
        let message = SendMessage::html(&self.cfg.chat_id, &text).with_refresh_button();
        let payload = serde_json::to_value(&message)?;
        delivery::deliver(
            self.api.as_ref(),
            "sendMessage",
            payload,
            self.cfg.retry_max_attempts,
            self.retry_delay(),
        )
        .await;
        self.alert_if_critical(&battery).await?;
        Ok(())
    }

    async fn alert_if_critical(&self, battery: &BatterySnapshot) -> anyhow::Result<()> {
        if !battery.is_critical(self.cfg.critical_threshold) {
            return Ok(());
        }
        tracing::warn!(percentage = %battery.percentage, "critical battery level");
        let text = report::format_critical_warning(battery);
        let message = SendMessage::html(&self.cfg.chat_id, &text);
        let payload = serde_json::to_value(&message)?;
        delivery::deliver(
            self.api.as_ref(),
            "sendMessage",
            payload,
            self.cfg.retry_max_attempts,
            self.retry_delay(),
        )
        .await;
        Ok(())
    }

    async fn maybe_fire_hourly(&mut self) -> anyhow::Result<()> {
        let now = chrono::Local::now();
        let (hour, minute, epoch) = (now.hour(), now.minute(), now.timestamp());
        if !self.gate.should_fire(hour, minute, epoch, self.cfg.send_minute) {
            return Ok(());
        }

        // close the re-entry window before any network call
        self.gate.mark_attempt(epoch);
        let outcome = self.report_battery().await;
        // the hour is spent either way; a failed send waits for the next
        self.gate.mark_fired(hour);
        match outcome {
            Ok(()) => tracing::info!(hour, "hourly report sent"),
            Err(error) => tracing::error!(hour, error = ?error, "hourly report failed"),
        }
        Ok(())
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.cfg.retry_delay_secs)
    }
}
