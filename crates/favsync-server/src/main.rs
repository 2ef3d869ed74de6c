mod api;
mod middleware;

use std::sync::Arc;

use favsync_shopify::ShopifyAdminClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::ApiKeyState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = favsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(config = ?config, "loaded configuration");

    let api_key = ApiKeyState::new(config.api_secret_key.as_deref());
    if !api_key.is_configured() {
        tracing::warn!("API_SECRET_KEY is not set; every /api request will be rejected");
    }

    let client = ShopifyAdminClient::new(
        &config.shopify_shop,
        &config.shopify_api_version,
        &config.shopify_access_token,
        config.shopify_timeout_secs,
        &config.user_agent,
    )?;
    let state = AppState {
        backend: Arc::new(client),
        expose_error_details: config.env.exposes_error_details(),
    };
    let app = build_app(state, api_key);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "favsync-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
