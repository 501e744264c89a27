use std::sync::Arc;

use storage::repository::Storage;
use tutor_core::Validator;

use crate::challenge_registry::{ChallengeRegistry, ChallengeSource, UrlSource};
use crate::config::{CatalogConfig, SessionConfig};
use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;
use crate::sessions::SessionController;

/// Assembles the long-lived tutorial services once per process.
#[derive(Clone)]
pub struct AppServices {
    registry: Arc<ChallengeRegistry>,
    validator: Arc<Validator>,
    progress: ProgressStore,
    session_config: SessionConfig,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the configured catalog.
    ///
    /// A catalog that fails to load is replaced by the built-in challenges;
    /// only storage initialization can fail here.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: &CatalogConfig,
        session_config: SessionConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, &UrlSource::new(), catalog, session_config).await)
    }

    /// Build services over an existing `Storage` and challenge source.
    pub async fn from_storage(
        storage: &Storage,
        source: &dyn ChallengeSource,
        catalog: &CatalogConfig,
        session_config: SessionConfig,
    ) -> Self {
        let registry = ChallengeRegistry::load(source, catalog.locations()).await;
        Self::from_parts(
            registry,
            Validator::with_builtin_rules(),
            ProgressStore::new(Arc::clone(&storage.progress)),
            session_config,
        )
    }

    /// In-memory storage with the built-in catalog.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_parts(
            ChallengeRegistry::builtin(),
            Validator::with_builtin_rules(),
            ProgressStore::new(Arc::clone(&Storage::in_memory().progress)),
            SessionConfig::default(),
        )
    }

    #[must_use]
    pub fn from_parts(
        registry: ChallengeRegistry,
        validator: Validator,
        progress: ProgressStore,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            validator: Arc::new(validator),
            progress,
            session_config,
        }
    }

    /// A fresh, not yet booted session over these services.
    #[must_use]
    pub fn session(&self) -> SessionController {
        SessionController::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.validator),
            self.progress.clone(),
            self.session_config,
        )
    }

    #[must_use]
    pub fn registry(&self) -> Arc<ChallengeRegistry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn validator(&self) -> Arc<Validator> {
        Arc::clone(&self.validator)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }
}
