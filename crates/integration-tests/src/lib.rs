//! Integration tests for the IX storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ix-integration-tests
//! ```
//!
//! No backend is needed: HTTP collaborators are served by `mockito`, and
//! durable state lives in a temporary directory per test.
//!
//! # Test Categories
//!
//! - `cart_store` - Cart semantics and persistence across store instances
//! - `checkout_flow` - Catalog, login, checkout and logout end to end

use ix_storefront::config::StorefrontConfig;
use ix_storefront::state::AppState;
use mockito::ServerGuard;
use tempfile::TempDir;

/// A mock backend plus application state pointed at it.
pub struct TestContext {
    pub server: ServerGuard,
    pub state: AppState,
    data_dir: TempDir,
}

impl TestContext {
    /// Start a mock backend and build state with a fresh data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the configuration cannot be
    /// created.
    pub async fn new() -> Self {
        let server = mockito::Server::new_async().await;
        let data_dir = tempfile::tempdir().expect("create temp dir");

        let base_url = server.url();
        let dir = data_dir.path().display().to_string();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "IX_API_BASE_URL" => Some(base_url.clone()),
            "IX_DATA_DIR" => Some(dir.clone()),
            _ => None,
        })
        .expect("valid test configuration");
        let state = AppState::new(config).expect("build HTTP client");

        Self {
            server,
            state,
            data_dir,
        }
    }

    /// Directory holding the cart and session files.
    #[must_use]
    pub fn data_dir(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}
