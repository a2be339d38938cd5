use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers;
use crate::config::DatabaseConfig;

/// Opens the single shared connection handle and brings the `todos` table in
/// line with the entity definition. Any failure here is fatal to startup.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let registry = providers::default_registry()?;
    let provider = registry.provider_for_url(&cfg.url)?;

    info!(provider = provider.id().as_str(), "connecting to database");
    let db = provider
        .connect(cfg)
        .await
        .context("failed to connect to database")?;
    provider
        .post_connect(&db, cfg)
        .await
        .context("failed to prepare database connection")?;

    info!("syncing database schema from entities");
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;
    Ok(db)
}
