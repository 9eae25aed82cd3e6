//! Tracing subscriber setup shared by the binary.
//!
//! Records go to the console (text or JSON) and, when `LOG_FILE` is set, to
//! that file as well. The file is rotated by size: once it reaches
//! `log_max_bytes` it becomes `<file>.1`, older copies shift up, and at most
//! `log_backup_count` of them are kept.

use std::io;
use std::sync::Mutex;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, LogFormat};
use crate::error::AppError;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "homework_bot=debug,homework_poller=debug,homework_engine=debug,homework_notifier=debug,homework_decoders=debug,homework_common=info";

/// Install the global tracing subscriber.
pub fn init_tracing(config: &AppConfig) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    let file_layer = match &config.log_file {
        Some(path) => {
            let appender = rolling_appender(path, config.log_max_bytes, config.log_backup_count)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(appender)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    if let Some(path) = &config.log_file {
        tracing::debug!(
            path = %path,
            max_bytes = config.log_max_bytes,
            backups = config.log_backup_count,
            "File logging enabled"
        );
    }

    Ok(())
}

/// Size-rotated appender for the log file.
fn rolling_appender(
    path: &str,
    max_bytes: u64,
    backups: usize,
) -> io::Result<BasicRollingFileAppender> {
    BasicRollingFileAppender::new(
        path,
        RollingConditionBasic::new().max_size(max_bytes),
        backups,
    )
}

/// Console-only subscriber for failures that happen before the configuration
/// is available.
pub fn init_console() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
