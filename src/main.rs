use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use delivery_logistics::config::{EnvironmentConfig, StorageBackend};
use delivery_logistics::controllers::account_controller::AccountController;
use delivery_logistics::create_app;
use delivery_logistics::database::DatabaseConnection;
use delivery_logistics::repositories::Repositories;
use delivery_logistics::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    info!("🚚 Delivery Logistics API");
    info!("========================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Environment: {}", config.environment);

    let repositories = match config.storage {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres backend"))?;
            let connection = DatabaseConnection::new(database).await.map_err(|e| {
                error!("❌ Error connecting to the database: {}", e);
                e
            })?;
            Repositories::postgres(connection.pool().clone())
        }
        StorageBackend::Memory => {
            warn!("⚠️ Using in-memory storage, data is lost on restart");
            Repositories::memory()
        }
    };

    let state = AppState::new(config.clone(), repositories)?;

    if let Some(staff) = &config.staff_bootstrap {
        AccountController::new(&state)
            .ensure_staff_account(&staff.username, &staff.password)
            .await?;
    }

    let app = create_app(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   POST /register, /login, /token/refresh   GET /me");
    info!("   GET|POST /quotes   GET|PUT|DELETE /quote/:id   GET /staff/quotes");
    info!("   GET|POST /orders   GET /orders/track/:tracking_number   GET|PUT|DELETE /order/:id");
    info!("   PUT /order/:id/status   PUT /order/:id/rider   GET /staff/orders");
    info!("   GET|POST /invoices   GET|PUT|DELETE /invoice/:id   GET /staff/invoices");
    info!("   GET|POST /riders   GET|PUT|DELETE /rider/:id   GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down..."),
        _ = terminate => info!("🛑 SIGTERM received, shutting down..."),
    }
}
