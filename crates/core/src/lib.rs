//! IX Core - Shared types library.
//!
//! This crate provides common types used across all IX storefront components:
//! - `storefront` - Cart store and REST clients for the catalog, orders and session
//! - `cli` - Command-line front end for the cart and checkout
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money amounts and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
