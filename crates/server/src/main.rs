mod config;
mod error;
mod routes;
mod state;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("geolens_server=info,geolens_core=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = routes::router(state, Duration::from_secs(config.request_timeout));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, environment = %config.environment, "starting GeoLens server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
