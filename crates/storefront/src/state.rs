//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use fixev_core::{
    CartEngine, CartLine, CartRepository, Catalog, CatalogError, Inr, StorageError, Submitter,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::StorefrontConfig;
use crate::services::LoggingSubmitter;
use crate::storage::FileCartRepository;

/// Cart slot as held by the state.
pub type SharedRepository = Arc<dyn CartRepository>;

/// The single cart of this running instance.
pub type SharedCart = CartEngine<SharedRepository>;

/// Error building application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart sits behind an async mutex so each
/// request applies its change and renders against a consistent snapshot.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<SharedCart>,
    submitter: Arc<dyn Submitter>,
}

impl AppState {
    /// Assemble state from its parts, rehydrating the cart from `repository`.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        repository: SharedRepository,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        let mut cart = CartEngine::rehydrate(repository, &catalog);
        cart.subscribe(|lines: &[CartLine], subtotal: Inr| {
            tracing::debug!(lines = lines.len(), subtotal = subtotal.rupees(), "Cart changed");
        });
        tracing::info!(
            lines = cart.lines().len(),
            items = cart.item_count(),
            "Cart rehydrated"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
                submitter,
            }),
        }
    }

    /// Build state from configuration: catalog file or built-in catalog,
    /// file-backed cart slot and the logging submitter.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the catalog file cannot be read or is invalid,
    /// or the data directory cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    StateError::CatalogFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                let catalog = Catalog::from_json(&json)?;
                tracing::info!(path = %path.display(), "Catalog loaded from file");
                catalog
            }
            None => Catalog::builtin(),
        };

        let repository = FileCartRepository::open(&config.data_dir)?;
        tracing::info!(path = %repository.path().display(), "Cart slot opened");

        Ok(Self::new(
            config,
            catalog,
            Arc::new(repository),
            Arc::new(LoggingSubmitter),
        ))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart for one request.
    pub async fn cart(&self) -> MutexGuard<'_, SharedCart> {
        self.inner.cart.lock().await
    }

    #[must_use]
    pub fn submitter(&self) -> &dyn Submitter {
        self.inner.submitter.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fixev_core::InMemoryCartRepository;

    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|_| None).unwrap()
    }

    #[tokio::test]
    async fn test_new_rehydrates_cart() {
        let repository = InMemoryCartRepository::with_payload(r#"[{"id":"p3","quantity":2}]"#);
        let state = AppState::new(
            config(),
            Catalog::builtin(),
            Arc::new(repository),
            Arc::new(LoggingSubmitter),
        );

        let cart = state.cart().await;
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().rupees(), 25600);
    }

    #[tokio::test]
    async fn test_changes_reach_shared_repository() {
        let repository = InMemoryCartRepository::new();
        let state = AppState::new(
            config(),
            Catalog::builtin(),
            Arc::new(repository.clone()),
            Arc::new(LoggingSubmitter),
        );

        let item = state.catalog().product("p4").unwrap().clone();
        state.cart().await.add(&item, 1);

        assert!(repository.payload().unwrap().contains("\"p4\""));
    }

    #[test]
    fn test_missing_catalog_file() {
        let mut config = config();
        config.catalog_path = Some(PathBuf::from("/nonexistent/fixev-catalog.json"));
        assert!(matches!(
            AppState::from_config(config),
            Err(StateError::CatalogFile { .. })
        ));
    }
}
