use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::mail::Mailer;
use crate::storage::{ImageHostStorage, LocalStorage, StorageBackend};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub storage: Option<Arc<dyn StorageBackend>>,
    pub mailer: Option<Mailer>,
}

impl AppState {
    /// Wire up the storage backend and mailer the config asks for.
    pub fn new(db: DbPool, config: Config) -> Self {
        let client = reqwest::Client::new();

        let storage: Arc<dyn StorageBackend> = match config.storage.image_host.credentials() {
            Some((url, key)) => {
                tracing::info!("Storing uploads on image host {}", url);
                Arc::new(ImageHostStorage::new(client.clone(), url, key))
            }
            None => {
                tracing::info!("Storing uploads in {}", config.uploads_path().display());
                Arc::new(LocalStorage::new(config.uploads_path()))
            }
        };

        let mailer = Mailer::from_config(client, &config.mail);
        if mailer.is_none() {
            tracing::info!("No email API key; contact messages will only be logged");
        }

        Self {
            db,
            config,
            storage: Some(storage),
            mailer,
        }
    }

    pub fn storage(&self) -> Option<&dyn StorageBackend> {
        self.storage.as_deref()
    }

    /// Whether uploads land in the local directory served at `/uploads`.
    pub fn serves_local_uploads(&self) -> bool {
        self.storage().map(|s| s.name()) == Some("local")
    }
}
