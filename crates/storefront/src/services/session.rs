//! Session service: backend login state plus the remembered identity.

use secrecy::SecretString;
use thiserror::Error;
use tracing::{instrument, warn};

use ix_core::Username;

use crate::api::{ApiClient, ApiError};
use crate::cart::{CartStore, DurableSlot, StorageError};
use crate::models::CurrentUser;

/// Errors that can occur during login, registration or logout.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused the credentials or registration details.
    #[error("{0}")]
    Rejected(String),

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The identity could not be remembered.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Session service.
///
/// The slot remembers who is logged in across restarts; the backend session
/// itself lives in the client's cookie jar.
pub struct SessionService<'a, U> {
    api: &'a ApiClient,
    slot: &'a U,
}

impl<'a, U: DurableSlot> SessionService<'a, U> {
    /// Create a new session service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, slot: &'a U) -> Self {
        Self { api, slot }
    }

    /// The remembered user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        CurrentUser::load(self.slot)
    }

    /// Log in and remember the user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Rejected` for invalid credentials.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: Username,
        password: &SecretString,
    ) -> Result<CurrentUser, SessionError> {
        self.api
            .login(&username, password)
            .await
            .map_err(rejected_on_400)?;
        self.remember(username)
    }

    /// Create an account and remember the new user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Rejected` when the username is taken or a
    /// required field is missing.
    #[instrument(skip(self, email, password), fields(username = %username))]
    pub async fn register(
        &self,
        username: Username,
        email: Option<&str>,
        password: &SecretString,
    ) -> Result<CurrentUser, SessionError> {
        self.api
            .register(&username, email, password)
            .await
            .map_err(rejected_on_400)?;
        self.remember(username)
    }

    /// Log out: end the backend session, forget the user and clear the cart.
    ///
    /// Local state is cleared even when the backend request fails; the
    /// request error is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the request failed, otherwise the
    /// storage error from forgetting the user, if any.
    #[instrument(skip_all)]
    pub async fn logout<S: DurableSlot>(&self, cart: &mut CartStore<S>) -> Result<(), SessionError> {
        let request = self.api.logout().await;
        if let Err(e) = &request {
            warn!(error = %e, "logout request failed, clearing local state anyway");
        }

        cart.clear();
        let forgotten = CurrentUser::forget(self.slot);
        if let (Err(e), Err(_)) = (&forgotten, &request) {
            warn!(error = %e, "could not forget the logged-in user");
        }

        // The backend error takes precedence over the local one.
        request?;
        forgotten?;
        Ok(())
    }

    fn remember(&self, username: Username) -> Result<CurrentUser, SessionError> {
        let user = CurrentUser::new(username);
        user.save(self.slot)?;
        Ok(user)
    }
}

fn rejected_on_400(error: ApiError) -> SessionError {
    match error {
        ApiError::Api {
            status: 400,
            message,
        } => SessionError::Rejected(message),
        other => SessionError::Api(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ix_core::{Money, ProductId};
    use mockito::Server;

    use super::*;
    use crate::cart::{MemorySlot, ProductRef};
    use crate::config::tests::test_config;

    /// Session slot that cannot delete what it holds.
    struct StuckSlot;

    impl DurableSlot for StuckSlot {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Ok(Some(r#"{"username":"arjun"}"#.to_string()))
        }

        fn save(&self, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn remove(&self) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    fn arjun() -> Username {
        Username::parse("arjun").unwrap()
    }

    fn password() -> SecretString {
        SecretString::from("hunter22")
    }

    #[tokio::test]
    async fn test_login_remembers_user() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-login/")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let slot = MemorySlot::new();
        let service = SessionService::new(&api, &slot);

        let user = service.login(arjun(), &password()).await.unwrap();

        assert_eq!(user.username, arjun());
        assert_eq!(service.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_login_rejected_remembers_nothing() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-login/")
            .with_status(400)
            .with_body(r#"{"detail":"Invalid credentials"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let slot = MemorySlot::new();
        let service = SessionService::new(&api, &slot);

        let err = service.login(arjun(), &password()).await.unwrap_err();

        assert!(matches!(err, SessionError::Rejected(ref m) if m == "Invalid credentials"));
        assert_eq!(service.current_user(), None);
    }

    #[tokio::test]
    async fn test_register_remembers_user() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/register/")
            .with_status(201)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let slot = MemorySlot::new();
        let service = SessionService::new(&api, &slot);

        service
            .register(arjun(), Some("arjun@ix.in"), &password())
            .await
            .unwrap();

        assert_eq!(service.current_user().unwrap().username, arjun());
    }

    #[tokio::test]
    async fn test_logout_clears_cart_and_identity() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-logout/")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let slot = MemorySlot::new();
        CurrentUser::new(arjun()).save(&slot).unwrap();
        let mut cart = CartStore::open(MemorySlot::new());
        cart.add_one(ProductRef::new(ProductId::new(1), "Whey", Money::from_units(2499)));

        SessionService::new(&api, &slot)
            .logout(&mut cart)
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.slot().contents().as_deref(), Some("[]"));
        assert_eq!(slot.contents(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_when_request_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-logout/")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let slot = MemorySlot::new();
        CurrentUser::new(arjun()).save(&slot).unwrap();
        let mut cart = CartStore::open(MemorySlot::new());
        cart.add_one(ProductRef::new(ProductId::new(1), "Whey", Money::from_units(2499)));

        let err = SessionService::new(&api, &slot)
            .logout(&mut cart)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Api(ApiError::Api { status: 502, .. })));
        assert!(cart.is_empty());
        assert_eq!(slot.contents(), None);
    }

    #[tokio::test]
    async fn test_logout_reports_request_error_over_storage_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-logout/")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let mut cart = CartStore::open(MemorySlot::new());
        cart.add_one(ProductRef::new(ProductId::new(1), "Whey", Money::from_units(2499)));

        let err = SessionService::new(&api, &StuckSlot)
            .logout(&mut cart)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Api(ApiError::Api { status: 502, .. })));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_logout_reports_storage_error_after_successful_request() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/accounts/session-logout/")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&test_config(&server.url())).unwrap();
        let mut cart = CartStore::open(MemorySlot::new());
        cart.add_one(ProductRef::new(ProductId::new(1), "Whey", Money::from_units(2499)));

        let err = SessionService::new(&api, &StuckSlot)
            .logout(&mut cart)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Storage(StorageError::Unavailable(_))));
        assert!(cart.is_empty());
    }
}
