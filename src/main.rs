use std::sync::Arc;

use log::{info, warn};

use waba_relay::config::{Config, CredentialStore};
use waba_relay::handlers::AppState;
use waba_relay::relay::Relay;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::from_env();
    if config.token.is_empty() || config.phone_number_id.is_empty() {
        warn!(
            "WABA credentials not fully configured; set WABA_TOKEN and \
             WABA_PHONE_NUMBER_ID or supply them via POST /update-token"
        );
    }

    let credentials = Arc::new(CredentialStore::new(
        config.token.clone(),
        config.phone_number_id.clone(),
    ));
    let relay = Relay::new(
        config.api_base.clone(),
        config.request_timeout_secs,
        credentials.clone(),
    )?;
    let state = Arc::new(AppState { relay, credentials });

    let app = waba_relay::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on http://localhost:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
