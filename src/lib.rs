use std::time::Duration;

use crate::error::AppResult;
use crate::model::{DbConnection, ModelManager};

pub mod config;
pub use config::{Config, ConfigError, ConfigResult, Store};

pub mod action;
pub mod course;
pub mod error;
pub mod model;
pub mod progress;
pub mod utils;

static APPLICATION_NAME: &str = "lectern";

/// Connects to the database named in the config file and applies migrations.
pub async fn build_store(use_local: bool) -> AppResult<ModelManager> {
    let config = Config::get_or_init(use_local).await?;
    build_store_with_uri(config.store().database_uri(), config.store().timeout()).await
}

pub async fn build_store_with_uri(uri: &str, timeout: Duration) -> AppResult<ModelManager> {
    let db = DbConnection::connect(uri, timeout)?;
    db.migrate().await?;
    Ok(ModelManager::new(db, timeout))
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
