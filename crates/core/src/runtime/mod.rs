mod daemon;
mod hourly;
mod loop_control;
mod shutdown;
mod updates;

pub use daemon::Runtime;
pub use hourly::HourlyGate;
pub use loop_control::LoopPhase;
pub use shutdown::ShutdownGuard;
pub use updates::UpdateCursor;
