use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{config::AppConfig, db::connection, routes::app, state::AppState};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: Some("sqlite::memory:".to_string()),
        ..AppConfig::default()
    }
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db)
}

/// The full middleware stack over `db`, usually a prepared `MockDatabase`.
pub fn test_app(db: DatabaseConnection) -> Router {
    app(test_state(db))
}

/// An app whose storage answers nothing; any storage call fails.
pub fn test_router() -> Router {
    test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

/// State over a fresh in-memory SQLite database with the schema synced.
///
/// The pool is pinned to one connection: every SQLite `:memory:` connection
/// opens its own empty database.
pub async fn sqlite_state() -> anyhow::Result<Arc<AppState>> {
    let cfg = AppConfig {
        database_url: Some("sqlite::memory:".to_string()),
        db_max_connections: 1,
        db_min_idle: 1,
        ..AppConfig::default()
    };
    let db = connection::connect(&cfg.database()).await?;
    Ok(AppState::new(cfg, db))
}
