//! Unified error handling.
//!
//! Provides a unified `AppError` type for callers that drive several
//! storefront operations in one flow, such as the CLI.

use thiserror::Error;

use ix_core::UsernameError;

use crate::api::ApiError;
use crate::cart::StorageError;
use crate::config::ConfigError;
use crate::services::{CheckoutError, SessionError};

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Login, registration or logout failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether logging in again may fix this error.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Checkout(CheckoutError::NotLoggedIn | CheckoutError::SessionExpired)
                | Self::Api(ApiError::Unauthorized { .. })
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
