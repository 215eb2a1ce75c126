use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Daily-rolling log files go here; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    /// Used when `RUST_LOG` is not set.
    pub default_filter: String,
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs the global subscriber. Call once, before the UI launches.
pub fn init(config: LoggingConfig) -> Result<()> {
    let mut layers = Vec::new();

    layers.push(
        fmt::layer()
            .with_target(true)
            .with_filter(env_filter(&config.default_filter))
            .boxed(),
    );

    if let Some(log_dir) = &config.log_dir {
        let file_appender = tracing_appender::rolling::daily(log_dir, "petition-viewer.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        // The guard flushes on drop and has to live as long as the process.
        std::mem::forget(guard);

        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter(&config.default_filter))
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::info!(
        log_dir = ?config.log_dir,
        filter = %config.default_filter,
        "logging initialized"
    );
    Ok(())
}
