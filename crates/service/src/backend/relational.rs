use configs::{DatabaseConfig, StorageConfig};
use sea_orm::DatabaseConnection;

use super::storage::StorageClient;
use super::BackendError;

/// Relational store plus its object storage, handed out as one handle.
pub struct RelationalClient {
    pub db: DatabaseConnection,
    pub storage: StorageClient,
}

impl RelationalClient {
    /// Builds the handle without contacting the database; the pool connects
    /// on its first query.
    pub async fn connect(db: &DatabaseConfig, storage: &StorageConfig) -> Result<Self, BackendError> {
        let db = models::db::connect_lazy(db)
            .await
            .map_err(|e| BackendError::Db(e.to_string()))?;
        let storage = StorageClient::new(storage)?;
        Ok(Self { db, storage })
    }
}
