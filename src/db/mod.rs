//! SQLite connection and migrations behind the document store.

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

use repositories::documents::DocumentRepository;

#[derive(Clone)]
pub struct Db {
    pub conn: DatabaseConnection,
}

/// Creates the database file and its directory for file-backed URLs so the
/// first start works on an empty data dir.
async fn ensure_database_file(db_url: &str) -> Result<()> {
    if db_url.contains(":memory:") {
        return Ok(());
    }

    let path = Path::new(db_url.trim_start_matches("sqlite:"));
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if !path.exists() {
        tokio::fs::File::create(path).await?;
    }
    Ok(())
}

impl Db {
    /// Opens the pool and brings the `documents` table up to date.
    pub async fn open(db_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        ensure_database_file(db_url).await?;

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections.min(max_connections))
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        migrator::Migrator::up(&conn, None).await?;

        info!(url = db_url, max_connections, "Document database ready");
        Ok(Self { conn })
    }

    #[must_use]
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.conn.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_database_file() {
        let dir = std::env::temp_dir().join(format!("planetstream-db-{}", uuid::Uuid::new_v4()));
        let file = dir.join("nested").join("store.db");
        let url = format!("sqlite:{}", file.display());

        let db = Db::open(&url, 1, 1).await.unwrap();
        assert!(file.exists());

        db.documents().put("k", "[]".to_string()).await.unwrap();
        assert_eq!(db.documents().get("k").await.unwrap().as_deref(), Some("[]"));

        drop(db);
        let _ = std::fs::remove_dir_all(dir);
    }
}
