use homework_common::config::AppConfig;
use homework_notifier::TelegramNotifier;
use homework_poller::api::PracticumClient;
use homework_poller::poller::StatusPoller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homework_poller=info,homework_notifier=info".into()),
        )
        .json()
        .init();

    tracing::info!("Homework status bot starting...");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::debug!(credentials = ?config.credentials, "Configuration loaded");

    let api = PracticumClient::new(
        config.api_endpoint.clone(),
        config.credentials.api_token.clone(),
        config.request_timeout(),
    )?;

    let notifier = TelegramNotifier::new(
        config.telegram_api_url.clone(),
        config.credentials.messaging_token.clone(),
        config.request_timeout(),
    )?;

    let mut poller = StatusPoller::new(
        api,
        notifier,
        config.credentials.clone(),
        config.poll_interval(),
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Homework status bot stopped.");
    Ok(())
}
