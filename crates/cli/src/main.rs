use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use voltwatch_core::battery::SysfsProbe;
use voltwatch_core::config::WatchCfg;
use voltwatch_core::runtime::Runtime;
use voltwatch_telegram::client::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = WatchCfg::from_env().context("loading configuration")?;
    init_tracing(cfg.log_file.as_deref()).context("installing log sink")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "voltwatch starting");

    let client =
        TelegramClient::new(&cfg.api_base, &cfg.bot_token).context("building telegram client")?;

    let mut runtime = Runtime::new(Arc::new(cfg), Arc::new(client), Arc::new(SysfsProbe::new()));
    runtime.run().await;
    Ok(())
}

/// Pretty stderr logging by default; JSON lines to a file when one is
/// configured.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating log directory for {}", path.display()))?;
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true).with_writer(Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}
