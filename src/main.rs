use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use retrodesk_lib::config::DesktopConfig;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "retrodesk.log";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let path = DesktopConfig::default_path();
    let config = DesktopConfig::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    init_logging(&config);
    tracing::info!("Config loaded from {}", path.display());

    retrodesk_lib::run(config).await
}

/// The terminal belongs to the desktop, so logs go to a file in the data dir
fn init_logging(config: &DesktopConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retrodesk=info"));

    let log_file = fs::create_dir_all(&config.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.data_dir.join(LOG_FILE))
    });

    match log_file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
