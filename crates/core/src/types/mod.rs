//! Core types for the IX storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod username;

pub use id::*;
pub use money::{Money, MoneyError};
pub use username::{Username, UsernameError};
