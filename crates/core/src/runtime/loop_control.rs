use std::time::Duration;

use crate::config::WatchCfg;

/// Sleep selection for the next loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Normal tick cadence.
    Steady,
    /// One long pause after an uncaught tick failure.
    Cooldown,
}

impl LoopPhase {
    pub fn interval(self, cfg: &WatchCfg) -> Duration {
        match self {
            Self::Steady => Duration::from_millis(cfg.tick_ms),
            Self::Cooldown => Duration::from_secs(cfg.error_cooldown_secs),
        }
    }
}

/// Determines the next phase from how the last tick ended.
pub fn next_phase(last_tick_failed: bool) -> LoopPhase {
    if last_tick_failed {
        LoopPhase::Cooldown
    } else {
        LoopPhase::Steady
    }
}
