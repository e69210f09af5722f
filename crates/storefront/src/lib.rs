//! IX storefront client library.
//!
//! # Modules
//!
//! - [`cart`] - `CartStore`, the client-side cart with durable snapshots
//! - [`api`] - REST client for the catalog, orders and session endpoints
//! - [`services`] - Checkout and session flows built on the two
//! - [`config`] - Environment-driven configuration
//! - [`state`] - Shared application state for front ends such as the CLI

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
