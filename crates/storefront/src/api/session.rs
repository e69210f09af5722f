//! Cookie-backed session endpoints.
//!
//! The backend keeps the logged-in identity in its session cookie, which the
//! client's jar carries on every later request.

use ix_core::Username;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use super::types::{LoginRequest, RegisterRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Start a session with username and password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 400 for invalid credentials, or
    /// another error if the request fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &Username, password: &SecretString) -> Result<(), ApiError> {
        let url = self.endpoint("api/accounts/session-login/")?;
        let body = LoginRequest {
            username: username.as_str(),
            password: password.expose_secret(),
        };
        Self::check(self.post(url).json(&body).send().await?).await?;
        info!("session started");
        Ok(())
    }

    /// Create an account; the backend logs the new user in on success.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 400 when the username is taken
    /// or fields are missing, or another error if the request fails.
    #[instrument(skip(self, email, password), fields(username = %username))]
    pub async fn register(
        &self,
        username: &Username,
        email: Option<&str>,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("api/accounts/register/")?;
        let body = RegisterRequest {
            username: username.as_str(),
            email: email.unwrap_or_default(),
            password: password.expose_secret(),
        };
        Self::check(self.post(url).json(&body).send().await?).await?;
        info!("account registered");
        Ok(())
    }

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint("api/accounts/session-logout/")?;
        Self::check(self.post(url).send().await?).await?;
        Ok(())
    }

    /// Health check; also picks up the CSRF cookie when the backend sets one.
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.endpoint("api/accounts/ping/")?;
        Self::check(self.get(url).send().await?).await?;
        Ok(())
    }
}
