//! Cart line items and the product descriptor used to create them.

use ix_core::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// The product fields the cart captures when an item is added.
///
/// Anything that can describe a product (a catalog record, a CLI argument
/// set) converts into this before it reaches [`CartStore::add_item`].
///
/// [`CartStore::add_item`]: crate::cart::CartStore::add_item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    /// Already coerced: invalid prices arrive here as zero.
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductRef {
    /// Create a descriptor without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach a display image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One product entry in the cart with its requested quantity.
///
/// `name`, `unit_price` and `image` are captured at add-time and never
/// refreshed from the catalog afterwards. `quantity` is always at least 1
/// for items held by a [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    pub(crate) fn from_product(product: ProductRef, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.price,
            quantity,
            image: product.image,
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = LineItem::from_product(
            ProductRef::new(ProductId::new(1), "Creatine", Money::from_units(899)),
            4,
        );
        assert_eq!(item.line_total(), Money::from_units(3596));
    }

    #[test]
    fn test_wire_field_names() {
        let item = LineItem::from_product(
            ProductRef::new(ProductId::new(5), "Shaker", Money::from_units(300))
                .with_image("/media/shaker.jpg"),
            2,
        );
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["id"], 5);
        assert_eq!(json["name"], "Shaker");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["image"], "/media/shaker.jpg");
        assert!(json["price"].is_number());
        assert!(json.get("unit_price").is_none());
    }

    #[test]
    fn test_missing_image_is_omitted() {
        let item = LineItem::from_product(
            ProductRef::new(ProductId::new(5), "Shaker", Money::from_units(300)),
            1,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("image").is_none());
    }
}
