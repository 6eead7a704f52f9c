use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use delivery_logistics::config::relay::RelayConfig;
use delivery_logistics::relay::{create_relay_app, RelayState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env()?;
    info!("🔁 Relay forwarding to {}", config.api_url);

    let state = RelayState::new(config.clone())?;

    let addr: SocketAddr = config.server_url().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Relay listening on http://{}", addr);

    axum::serve(listener, create_relay_app(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("❌ Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
            info!("🛑 Shutting down relay...");
        })
        .await?;

    Ok(())
}
