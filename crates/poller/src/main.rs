use anyhow::Context;

use homework_common::config::AppConfig;
use homework_common::error::AppError;
use homework_common::logging;
use homework_common::traits::TokioSleeper;
use homework_engine::watcher::HomeworkWatcher;
use homework_notifier::telegram::TelegramTransport;
use homework_notifier::{Notifier, RetryPolicy};
use homework_poller::poller::StatusPoller;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration; logging depends on it
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init_console();
            tracing::error!(error = %e, "Invalid configuration");
            return Err(AppError::from(e).into());
        }
    };

    logging::init_tracing(&config).context("Failed to initialize logging")?;

    tracing::info!("Homework bot starting...");

    // Messaging client: any failure here is fatal
    let transport = TelegramTransport::connect(
        &config.telegram_api_url,
        &config.telegram_token,
        &config.telegram_chat_id,
        config.http_timeout(),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize Telegram client");
        AppError::from(e)
    })?;

    let poller = StatusPoller::new(
        &config.praktikum_api_url,
        &config.praktikum_token,
        config.http_timeout(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize status client");
        AppError::from(e)
    })?;

    let policy = RetryPolicy::unlimited(config.retry_interval())
        .with_max_attempts(config.delivery_max_attempts);
    let notifier = Notifier::new(transport, TokioSleeper, policy);
    let watcher = HomeworkWatcher::new(poller, notifier, TokioSleeper, config.poll_interval());

    let start = chrono::Utc::now().timestamp();

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        () = watcher.run(start) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Homework bot stopped.");
    Ok(())
}
