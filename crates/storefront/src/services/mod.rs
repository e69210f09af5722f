//! Business logic services for the storefront client.
//!
//! # Services
//!
//! - [`checkout`] - Turn the cart into an order and clear it on success
//! - [`session`] - Login, registration and logout, with the remembered
//!   identity kept in a durable slot

pub mod checkout;
pub mod session;

pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutService};
pub use session::{SessionError, SessionService};
