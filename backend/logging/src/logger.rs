//! Structured Logger
//!
//! Console output plus a daily-rolling NDJSON file. If the log directory
//! cannot be created the bot still starts, logging to the console only.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "wardrobe.log";

/// Initialize the global logger. `RUST_LOG` wins over `level` when set.
///
/// Files land in `log_dir` as `wardrobe.log.YYYY-MM-DD`.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let log_dir = log_dir.as_ref();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let dir_error = std::fs::create_dir_all(log_dir).err();
    let file_layer = dir_error.is_none().then(|| {
        fmt::layer()
            .json()
            .with_writer(RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX))
            .with_ansi(false)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Some(err) = dir_error {
        tracing::warn!(dir = %log_dir.display(), error = %err, "File logging disabled");
    }
}
