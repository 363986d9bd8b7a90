//! Database connection pool setup

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use rently_shared::config::database::DatabaseConfig;

use crate::InfrastructureError;

/// Build a MySQL connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, InfrastructureError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        event = "database_pool_created",
        "Connected to MySQL"
    );
    Ok(pool)
}
