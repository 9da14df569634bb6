//! Database bootstrap for the backend service

use anyhow::Result;
use common::{
    database::{DatabaseConfig, health_check, init_pool},
    error::DatabaseError,
};
use sqlx::{PgPool, migrate::Migrator};
use tracing::info;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the pool, verify connectivity and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = init_pool(config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    Ok(pool)
}
