use std::sync::Arc;

use tracing::info;

use crate::clients::http_client;
use crate::clients::jikan::JikanClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::{Config, StorageBackendKind};
use crate::services::{
    CatalogueService, ContentService, DocumentContentService, DocumentSettingsService,
    MetadataSource, RemoteMetadata, SettingsService,
};
use crate::store::{DocumentStore, SqliteBackend};

/// Opens the document store selected in the configuration.
pub async fn open_store(config: &Config) -> anyhow::Result<DocumentStore> {
    match config.storage.backend {
        StorageBackendKind::Memory => {
            info!("Using in-memory document store");
            Ok(DocumentStore::in_memory())
        }
        StorageBackendKind::Sqlite => {
            let backend = SqliteBackend::connect(
                &config.storage.database_path,
                config.storage.max_db_connections,
                config.storage.min_db_connections,
            )
            .await?;
            info!("Using SQLite document store at {}", config.storage.database_path);
            Ok(DocumentStore::new(Arc::new(backend)))
        }
    }
}

/// TMDB + Jikan behind one pooled HTTP client.
pub fn remote_metadata(config: &Config) -> anyhow::Result<Arc<dyn MetadataSource>> {
    let client = http_client(config.tmdb.request_timeout_seconds)?;
    let tmdb = TmdbClient::new(client.clone(), &config.tmdb);
    let jikan = JikanClient::new(client, &config.jikan);

    Ok(Arc::new(RemoteMetadata::new(tmdb, jikan)))
}

/// Services shared by the HTTP API and the CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: DocumentStore,

    pub metadata: Arc<dyn MetadataSource>,

    pub catalogue: Arc<CatalogueService>,

    pub content: Arc<dyn ContentService>,

    pub settings: Arc<dyn SettingsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = open_store(&config).await?;
        let metadata = remote_metadata(&config)?;
        Ok(Self::with_parts(config, store, metadata))
    }

    /// Wires the services over an already opened store and metadata source.
    #[must_use]
    pub fn with_parts(
        config: Config,
        store: DocumentStore,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        let catalogue = Arc::new(CatalogueService::new(
            store.clone(),
            metadata.clone(),
            config.catalogue.clone(),
        ));
        let content: Arc<dyn ContentService> =
            Arc::new(DocumentContentService::new(store.clone(), metadata.clone()));
        let settings: Arc<dyn SettingsService> =
            Arc::new(DocumentSettingsService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            metadata,
            catalogue,
            content,
            settings,
        }
    }
}
