use std::path::PathBuf;
use std::str::FromStr;

/// All monitor parameters. [`Default`] carries the baseline values;
/// [`WatchCfg::from_env`] overlays `VOLTWATCH_*` environment variables
/// on top and insists on the two credentials that have no default.
#[derive(Debug, Clone)]
pub struct WatchCfg {
    /// Bot credential embedded in every API URL.
    pub bot_token: String,
    /// The single chat every report goes to.
    pub chat_id: String,
    /// Bot API base (scheme + host).
    pub api_base: String,

    // reporting
    /// Minute of the hour at which the scheduled report fires.
    pub send_minute: u32,
    /// Percentage at or below which the urgent alert is issued.
    pub critical_threshold: u8,

    // delivery
    pub retry_max_attempts: u32,
    pub retry_delay_secs: u64,

    // loop cadence
    pub tick_ms: u64,
    /// Server-side long-poll window for update fetches.
    pub poll_timeout_secs: u64,
    /// Pause after an uncaught tick failure before ticking resumes.
    pub error_cooldown_secs: u64,

    // logging
    /// JSON log file; stderr only when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for WatchCfg {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: "https://api.telegram.org".to_owned(),
            send_minute: 0,
            critical_threshold: 15,
            retry_max_attempts: 3,
            retry_delay_secs: 5,
            tick_ms: 100,
            poll_timeout_secs: 1,
            error_cooldown_secs: 30,
            log_file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

impl WatchCfg {
    /// Load config from the environment. Unset or unparsable tunables
    /// keep their defaults; a missing credential is a startup failure.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            bot_token: require("VOLTWATCH_BOT_TOKEN")?,
            chat_id: require("VOLTWATCH_CHAT_ID")?,
            api_base: std::env::var("VOLTWATCH_API_BASE").unwrap_or(d.api_base),
            send_minute: get_or("VOLTWATCH_SEND_MINUTE", d.send_minute),
            critical_threshold: get_or("VOLTWATCH_CRITICAL_THRESHOLD", d.critical_threshold),
            retry_max_attempts: get_or("VOLTWATCH_RETRY_MAX_ATTEMPTS", d.retry_max_attempts),
            retry_delay_secs: get_or("VOLTWATCH_RETRY_DELAY_SECS", d.retry_delay_secs),
            tick_ms: get_or("VOLTWATCH_TICK_MS", d.tick_ms),
            poll_timeout_secs: get_or("VOLTWATCH_POLL_TIMEOUT_SECS", d.poll_timeout_secs),
            error_cooldown_secs: get_or("VOLTWATCH_ERROR_COOLDOWN_SECS", d.error_cooldown_secs),
            log_file: std::env::var("VOLTWATCH_LOG_FILE").ok().map(PathBuf::from),
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

fn get_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
