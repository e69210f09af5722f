//! Checkout: turn the cart into an order.
//!
//! The cart is cleared only once the backend has created the order. Any
//! failure before that point leaves the cart and its snapshot untouched.

use thiserror::Error;
use tracing::{info, instrument, warn};

use ix_core::OrderId;

use crate::api::{ApiClient, ApiError, OrderConfirmation, OrderRequest, Placement};
use crate::cart::{CartStore, DurableSlot};
use crate::models::CurrentUser;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// No user is logged in.
    #[error("Log in to place an order")]
    NotLoggedIn,

    /// The backend no longer recognizes the session.
    #[error("Session expired, log in again")]
    SessionExpired,

    /// The backend rejected the order.
    #[error("Order rejected: {0}")]
    Validation(String),

    /// Any other backend failure.
    #[error("Order failed: {0}")]
    Api(#[from] ApiError),
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The backend confirmed the order.
    Placed(OrderConfirmation),
    /// The backend reported a server error after creating the order.
    PlacedPendingReview { order_id: Option<OrderId> },
}

/// Checkout service.
pub struct CheckoutService<'a> {
    api: &'a ApiClient,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Place an order for the cart's current contents.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` or `CheckoutError::NotLoggedIn`
    /// without contacting the backend. Backend failures map to
    /// `SessionExpired` (401/403), `Validation` (400) or `Api`.
    #[instrument(skip_all, fields(lines = cart.len(), total = %cart.total()))]
    pub async fn place_order<S: DurableSlot>(
        &self,
        cart: &mut CartStore<S>,
        user: Option<&CurrentUser>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let user = user.ok_or(CheckoutError::NotLoggedIn)?;

        let order = OrderRequest::from_cart(cart.items(), cart.total(), user.username.clone());
        let placement = self.api.place_order(&order).await.map_err(|e| match e {
            ApiError::Unauthorized { .. } => CheckoutError::SessionExpired,
            ApiError::Api {
                status: 400,
                message,
            } => CheckoutError::Validation(message),
            other => CheckoutError::Api(other),
        })?;

        cart.clear();

        Ok(match placement {
            Placement::Confirmed(confirmation) => {
                info!(order_id = %confirmation.id, "checkout complete");
                CheckoutOutcome::Placed(confirmation)
            }
            Placement::CreatedWithServerError { order_id } => {
                warn!(?order_id, "checkout completed with server error");
                CheckoutOutcome::PlacedPendingReview { order_id }
            }
        })
    }
}
