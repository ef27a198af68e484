use std::time::Duration;

use configs::{DatabaseConfig, PLACEHOLDER_DATABASE_URL};
use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").unwrap_or_else(|_| PLACEHOLDER_DATABASE_URL.to_string())
});

/// Eager connection against `DATABASE_URL`, used by migrations and DB tests.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(DATABASE_URL.as_str()).await?;
    Ok(db)
}

/// Build a pool that does not touch the network until the first query.
///
/// A placeholder URL therefore never fails here; the error surfaces on the
/// first statement instead.
pub async fn connect_lazy(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging)
        .connect_lazy(true);
    Database::connect(opts).await
}
