//! Client-side shopping cart.
//!
//! [`CartStore`] is the single source of truth for cart contents within a
//! client session. It owns a [`DurableSlot`] and rewrites the whole cart
//! snapshot into it after every mutation, so the cart survives restarts.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//!
//! use ix_core::{Money, ProductId};
//! use ix_storefront::cart::{CartStore, MemorySlot, ProductRef};
//!
//! let mut cart = CartStore::open(MemorySlot::new());
//! let whey = ProductRef::new(ProductId::new(1), "Whey", Money::from_units(2499));
//!
//! cart.add_one(whey.clone());
//! cart.add_item(whey, NonZeroU32::new(2).unwrap_or(NonZeroU32::MIN));
//!
//! assert_eq!(cart.count(), 3);
//! assert_eq!(cart.total(), Money::from_units(7497));
//! ```

mod item;
pub mod snapshot;
mod storage;
mod store;

pub use item::{LineItem, ProductRef};
pub use storage::{CART_SLOT_KEY, DurableSlot, FileSlot, MemorySlot, StorageError};
pub use store::{CartStore, SubscriptionId};
