//! Session-related types.
//!
//! The backend keeps the authenticated session in a cookie; the client only
//! remembers who it logged in as, so later commands can name the order's user.

use ix_core::Username;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cart::{DurableSlot, StorageError};

/// Locally remembered user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Username the session was opened with.
    pub username: Username,
}

impl CurrentUser {
    #[must_use]
    pub const fn new(username: Username) -> Self {
        Self { username }
    }

    /// Read the remembered user from a slot.
    ///
    /// An unreadable slot or an undecodable value reads as logged out.
    pub fn load(slot: &impl DurableSlot) -> Option<Self> {
        let raw = match slot.load() {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read session slot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session record");
                None
            }
        }
    }

    /// Remember this user in a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn save(&self, slot: &impl DurableSlot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(self)
            .map_err(|e| StorageError::Unavailable(format!("cannot encode session: {e}")))?;
        slot.save(&raw)
    }

    /// Forget whoever is remembered in a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn forget(slot: &impl DurableSlot) -> Result<(), StorageError> {
        slot.remove()
    }
}

/// Slot keys for client-side state.
pub mod keys {
    /// Key for the remembered logged-in user.
    pub const CURRENT_USER: &str = "ix_session";

    /// Key for the cart snapshot.
    pub const CART: &str = crate::cart::CART_SLOT_KEY;
}
