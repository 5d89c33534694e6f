use axum::Router;
use axum_helpers::JwtAuth;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{
    handlers::{router, AuthState},
    InMemoryUserRepository, OtpEngine, UserService,
};
use notifications::{Dispatcher, SmsChannel, SmtpChannel};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let jwt_auth = JwtAuth::new(&config.jwt);

    // Notification channels are optional: a deployment without SMTP or
    // an SMS gateway still starts, it just skips that channel.
    let mut notifier = Dispatcher::new();
    match SmtpChannel::from_env() {
        Ok(channel) => {
            info!("SMTP channel configured");
            notifier = notifier.with_email(Arc::new(channel));
        }
        Err(e) => {
            tracing::warn!("SMTP channel disabled: {}", e);
        }
    }
    match SmsChannel::from_env() {
        Ok(channel) => {
            info!("SMS channel configured");
            notifier = notifier.with_sms(Arc::new(channel));
        }
        Err(e) => {
            tracing::warn!("SMS channel disabled: {}", e);
        }
    }

    let repository = Arc::new(InMemoryUserRepository::new());
    let service = UserService::new(repository, OtpEngine::default(), notifier);
    let state = AuthState { service, jwt_auth };

    let app = Router::new()
        .nest("/user", router(state))
        .layer(TraceLayer::new_for_http());

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Shop API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shop API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
