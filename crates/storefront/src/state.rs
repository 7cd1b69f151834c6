//! Application state shared across the storefront.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::config::{ConfigError, StorefrontConfig};
use crate::notify::NotificationQueue;
use crate::storage::LocalStore;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot create storage directory: {0}")]
    Storage(#[from] std::io::Error),
}

/// Application state tying the stores together.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, cart, auth, and notification stores plus the shared API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    storage: LocalStore,
    catalog: CatalogStore,
    cart: CartStore,
    auth: AuthStore,
    notifications: NotificationQueue,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Restores any persisted cart lines immediately; the catalog stays
    /// empty until [`CatalogStore::initialize_data`] runs and the session
    /// until [`AuthStore::check_auth_status`] runs - see [`Self::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(&config);
        let storage = LocalStore::new(&config.storage_dir)?;
        let catalog = CatalogStore::new(api.clone());
        let cart = CartStore::new(storage.clone());
        let auth = AuthStore::new(storage.clone(), config.auth_latency);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                storage,
                catalog,
                cart,
                auth,
                notifications: NotificationQueue::new(),
            }),
        })
    }

    /// Create application state from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is invalid or the
    /// storage directory cannot be created.
    pub fn from_env() -> Result<Self, StateError> {
        Self::new(StorefrontConfig::from_env()?)
    }

    /// Run startup: restore any persisted session and load the catalog.
    ///
    /// Static catalog data is visible when this returns; the background
    /// API refresh continues on its own. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) {
        self.inner.auth.check_auth_status();
        self.inner.catalog.initialize_data();
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the persistent key-value store.
    #[must_use]
    pub fn storage(&self) -> &LocalStore {
        &self.inner.storage
    }

    /// Get a reference to the product catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the shopping cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the account and order store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a reference to the notification queue.
    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.inner.notifications
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            storage_dir: dir.to_path_buf(),
            auth_latency: Duration::ZERO,
            ..StorefrontConfig::default()
        }
    }

    #[test]
    fn test_state_wires_shared_storage() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(test_config(dir.path())).unwrap();

        // cart mutations land in the same store the state exposes
        assert_eq!(state.cart().total_items(), 0);
        assert!(!state.auth().is_authenticated());
        assert!(state.notifications().active().is_empty());
        assert_eq!(state.config().storage_dir, dir.path());
    }

    #[test]
    fn test_state_clone_shares_stores() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(test_config(dir.path())).unwrap();
        let clone = state.clone();

        state
            .notifications()
            .push("hello", crate::notify::NotificationKind::Info);
        assert_eq!(clone.notifications().active().len(), 1);
    }
}
