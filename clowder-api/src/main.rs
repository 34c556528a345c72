//! Clowder API server binary
//!
//! Wires configuration, the database pool, and the breed validator into
//! the router, then serves until the process is interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clowder_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, BreedCatalogConfig, BreedValidator,
    DbClient, DbConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing();

    let db = DbClient::from_config(&DbConfig::from_env())?;
    db.ensure_schema().await?;

    let breeds = Arc::new(BreedValidator::new(&BreedCatalogConfig::from_env())?);

    let app: Router = create_api_router(db, breeds, &ApiConfig::from_env());

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Clowder API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Bind address from `CLOWDER_API_BIND` plus `PORT`/`CLOWDER_API_PORT`,
/// defaulting to 0.0.0.0:8000.
fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("CLOWDER_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("CLOWDER_API_PORT").ok())
        .unwrap_or_else(|| "8000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::validation_failed(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::validation_failed(format!("Invalid bind address {}: {}", addr, e)))
}
