//! The cart store.

use std::fmt;
use std::num::NonZeroU32;

use ix_core::{Money, ProductId};
use tracing::{debug, warn};

use super::item::{LineItem, ProductRef};
use super::snapshot;
use super::storage::DurableSlot;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[LineItem]) + Send>;

/// Single source of truth for cart contents.
///
/// Entries are unique by product id and keep the order of their first add.
/// Every mutation, including one that changes nothing, rewrites the full
/// snapshot to the slot and then notifies subscribers. Mutations never
/// fail: a slot that cannot be written is logged and the in-memory cart
/// stays authoritative.
pub struct CartStore<S> {
    items: Vec<LineItem>,
    slot: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: DurableSlot> CartStore<S> {
    /// Create a store over `slot`, rehydrating any saved cart.
    ///
    /// A slot that cannot be read, or that holds a malformed snapshot,
    /// yields an empty cart.
    pub fn open(slot: S) -> Self {
        let items = read_slot(&slot);
        debug!(items = items.len(), "cart opened");
        Self {
            items,
            slot,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|x| x.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `unit_price × quantity` over all entries.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|x| u64::from(x.quantity)).sum()
    }

    /// Add `quantity` of a product.
    ///
    /// An existing entry has its quantity increased and keeps the name,
    /// price and image captured when it was first added. A new product is
    /// appended at the end.
    pub fn add_item(&mut self, product: impl Into<ProductRef>, quantity: NonZeroU32) {
        let product = product.into();
        let quantity = quantity.get();

        if let Some(existing) = self.items.iter_mut().find(|x| x.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            debug!(product_id = %product.id, quantity = existing.quantity, "cart item incremented");
        } else {
            debug!(product_id = %product.id, quantity, "cart item added");
            self.items.push(LineItem::from_product(product, quantity));
        }
        self.commit();
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: impl Into<ProductRef>) {
        self.add_item(product, NonZeroU32::MIN);
    }

    /// Set the quantity for `id`, clamping anything below 1 up to 1.
    ///
    /// Unknown ids leave the cart unchanged.
    pub fn update_qty(&mut self, id: ProductId, quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|x| x.id == id) {
            item.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
            debug!(product_id = %id, quantity = item.quantity, "cart quantity updated");
        }
        self.commit();
    }

    /// Remove the entry for `id`, if present.
    pub fn remove_item(&mut self, id: ProductId) {
        let before = self.items.len();
        self.items.retain(|x| x.id != id);
        if self.items.len() != before {
            debug!(product_id = %id, "cart item removed");
        }
        self.commit();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("cart cleared");
        self.commit();
    }

    /// Replace in-memory state with whatever the slot currently holds.
    ///
    /// Picks up writes made by another store sharing the slot. Subscribers
    /// are notified; the slot is not rewritten.
    pub fn reload(&mut self) {
        self.items = read_slot(&self.slot);
        debug!(items = self.items.len(), "cart reloaded");
        self.notify();
    }

    /// The durable form of the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        snapshot::encode(&self.items)
    }

    /// Register a listener called with the current items after every
    /// mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[LineItem]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// The slot backing this store.
    #[must_use]
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        let json = match snapshot::encode(&self.items) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize cart; snapshot not written");
                return;
            }
        };
        if let Err(e) = self.slot.save(&json) {
            warn!(error = %e, "failed to persist cart snapshot");
        }
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.items);
        }
    }
}

fn read_slot<S: DurableSlot>(slot: &S) -> Vec<LineItem> {
    match slot.load() {
        Ok(raw) => snapshot::decode(raw.as_deref()),
        Err(e) => {
            warn!(error = %e, "failed to read cart snapshot; starting empty");
            Vec::new()
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("slot", &self.slot)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
