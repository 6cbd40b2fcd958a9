//! HTTP API entry point for Coastwatch.

use std::path::PathBuf;

use coastwatch::api::{AppState, build_router};
use coastwatch::error::Result;
use coastwatch::models::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_ENV: &str = "COASTWATCH_CONFIG";
const BIND_ENV: &str = "COASTWATCH_BIND";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/config.toml"));
    let config = Config::load_or_default(&config_path);
    config.validate()?;

    let bind = std::env::var(BIND_ENV).unwrap_or_else(|_| config.api.bind.clone());
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Coastwatch API listening on {}", bind);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
