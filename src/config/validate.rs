use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.host.trim().is_empty() {
        errors.push("HOST must not be empty".to_string());
    }

    if cfg.port == 0 {
        errors.push("PORT must be > 0".to_string());
    }

    match cfg.database_url.as_deref().map(str::trim) {
        None | Some("") => errors.push("DATABASE_URL must be set".to_string()),
        Some(_) => {}
    }

    if cfg.db_max_connections == 0 {
        errors.push("DB_MAX_CONNECTIONS must be > 0".to_string());
    }

    if cfg.db_min_idle > cfg.db_max_connections {
        errors.push(format!(
            "DB_MIN_IDLE ({}) must be <= DB_MAX_CONNECTIONS ({})",
            cfg.db_min_idle, cfg.db_max_connections
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
