use async_trait::async_trait;

use super::{StorageBackend, StoreError};
use crate::db::Db;

/// Documents table in a SQLite database managed through sea-orm.
#[derive(Clone)]
pub struct SqliteBackend {
    db: Db,
}

impl SqliteBackend {
    #[must_use]
    pub const fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn connect(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> anyhow::Result<Self> {
        let db = Db::open(db_url, max_connections, min_connections).await?;
        Ok(Self::new(db))
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.db.documents().get(key).await?)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        Ok(self.db.documents().put(key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.db.documents().delete(key).await?)
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.documents().keys().await?)
    }
}
