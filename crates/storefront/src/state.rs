//! Application state shared across commands.

use std::sync::Arc;

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::cart::{CartStore, FileSlot};
use crate::config::StorefrontConfig;
use crate::models::session::keys;

/// Application state.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the backend client and the durable client-side slots.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Slot holding the cart snapshot.
    #[must_use]
    pub fn cart_slot(&self) -> FileSlot {
        FileSlot::in_dir(&self.inner.config.data_dir, keys::CART)
    }

    /// Slot holding the remembered user.
    #[must_use]
    pub fn session_slot(&self) -> FileSlot {
        FileSlot::in_dir(&self.inner.config.data_dir, keys::CURRENT_USER)
    }

    /// Open the cart, rehydrated from its slot.
    #[must_use]
    pub fn open_cart(&self) -> CartStore<FileSlot> {
        let slot = self.cart_slot();
        debug!(path = %slot.path().display(), "opening cart");
        CartStore::open(slot)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish()
    }
}
