//! Request and response types for the storefront backend.

use chrono::{DateTime, Utc};
use ix_core::{CategoryId, Money, OrderId, ProductId, Username};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::cart::{LineItem, ProductRef};

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A catalog product.
///
/// Prices are decimal strings on the wire (`"2499.00"`) and are coerced
/// through [`Money`], so a malformed price reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

impl From<Product> for ProductRef {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
        }
    }
}

/// Product listing body: a bare array, or a paginated page with `results`.
///
/// Dispatches on the JSON shape by hand; `#[serde(untagged)]` buffering
/// cannot read arbitrary-precision numbers.
#[derive(Debug)]
pub(crate) struct ProductListBody(Vec<Product>);

impl ProductListBody {
    pub(crate) fn into_products(self) -> Vec<Product> {
        self.0
    }
}

impl<'de> Deserialize<'de> for ProductListBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let results = match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => list,
            Value::Object(mut page) => page
                .remove("results")
                .ok_or_else(|| de::Error::missing_field("results"))?,
            _ => {
                return Err(de::Error::custom(
                    "expected a product list or a page with results",
                ));
            }
        };
        Vec::<Product>::deserialize(results)
            .map(Self)
            .map_err(de::Error::custom)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One ordered product, as sent to and returned by the orders endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductId,
    pub price: Money,
    pub quantity: u32,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product: item.id,
            price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Body of `POST /api/orders/place/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub total_amount: Money,
    pub user: Username,
}

impl OrderRequest {
    /// Build an order from a snapshot of cart contents.
    #[must_use]
    pub fn from_cart(items: &[LineItem], total_amount: Money, user: Username) -> Self {
        Self {
            items: items.iter().map(OrderLine::from).collect(),
            total_amount,
            user,
        }
    }
}

/// A placed order, as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: OrderId,
    pub total_amount: Money,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `GET /api/orders/mine/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    pub count: usize,
    pub orders: Vec<OrderConfirmation>,
}

/// Outcome of an order placement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The backend confirmed the order.
    Confirmed(OrderConfirmation),
    /// The backend failed with a server error but reported the order as
    /// created; the caller should check order history.
    CreatedWithServerError { order_id: Option<OrderId> },
}

/// Server error body that may still report a created order.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServerErrorBody {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl ServerErrorBody {
    pub(crate) fn reports_created(&self) -> bool {
        self.order_id.is_some() || self.success == Some(true)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Body of `POST /api/accounts/session-login/`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/accounts/register/`.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_parses_backend_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Whey",
            "slug": "whey",
            "description": "24g protein",
            "price": "2499.00",
            "stock": 12,
            "image": "http://127.0.0.1:8000/media/whey.jpg",
            "is_active": true,
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-01T10:00:00Z",
            "category": {"id": 2, "name": "Protein", "slug": "protein"}
        }))
        .unwrap();

        assert_eq!(product.price, Money::from_units(2499));
        assert_eq!(product.category.unwrap().name, "Protein");
    }

    #[test]
    fn test_product_minimal_shape() {
        let product: Product =
            serde_json::from_value(json!({"id": 4, "name": "Tee", "price": "bad"})).unwrap();
        assert_eq!(product.price, Money::ZERO);
        assert_eq!(product.image, None);
    }

    #[test]
    fn test_product_list_body_variants() {
        let plain: ProductListBody =
            serde_json::from_value(json!([{"id": 1, "name": "a", "price": 1}])).unwrap();
        assert_eq!(plain.into_products().len(), 1);

        let page: ProductListBody = serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "results": [{"id": 1, "name": "a", "price": 1}, {"id": 2, "name": "b", "price": 2}]
        }))
        .unwrap();
        assert_eq!(page.into_products().len(), 2);

        assert!(serde_json::from_value::<ProductListBody>(json!({"count": 0})).is_err());
        assert!(serde_json::from_value::<ProductListBody>(json!("nope")).is_err());
    }

    #[test]
    fn test_product_list_body_keeps_exact_prices() {
        let body: ProductListBody = serde_json::from_str(
            r#"{"results":[{"id":3,"name":"Pallet","price":1234567890123456.78,"stock":1}]}"#,
        )
        .unwrap();
        let products = body.into_products();
        assert_eq!(products[0].id, ProductId::new(3));
        assert_eq!(products[0].price, "1234567890123456.78".parse().unwrap());
    }

    #[test]
    fn test_product_into_product_ref() {
        let product: Product = serde_json::from_value(
            json!({"id": 9, "name": "Shaker", "price": "300", "image": "/s.jpg"}),
        )
        .unwrap();
        let product_ref = ProductRef::from(&product);
        assert_eq!(product_ref.id, ProductId::new(9));
        assert_eq!(product_ref.price, Money::from_units(300));
        assert_eq!(product_ref.image.as_deref(), Some("/s.jpg"));
    }

    #[test]
    fn test_order_request_wire_shape() {
        let items = vec![LineItem {
            id: ProductId::new(1),
            name: "Whey".to_string(),
            unit_price: Money::from_units(2499),
            quantity: 3,
            image: None,
        }];
        let request = OrderRequest::from_cart(
            &items,
            Money::from_units(7497),
            Username::parse("arjun").unwrap(),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["user"], "arjun");
        assert_eq!(json["total_amount"], json!(7497));
        assert_eq!(json["items"][0]["product"], 1);
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["items"][0]["price"], json!(2499));
        assert!(json["items"][0].get("name").is_none());
    }

    #[test]
    fn test_order_confirmation_parses_backend_shape() {
        let confirmation: OrderConfirmation = serde_json::from_value(json!({
            "id": 17,
            "user_name": "arjun",
            "total_amount": "6747.30",
            "discount_amount": "749.70",
            "items": [{"product": 1, "price": "2499.00", "quantity": 3}],
            "created_at": "2025-03-04T05:06:07.123456Z"
        }))
        .unwrap();

        assert_eq!(confirmation.id, OrderId::new(17));
        assert_eq!(confirmation.total_amount.to_string(), "6747.30");
        assert_eq!(confirmation.discount_amount.to_string(), "749.70");
        assert_eq!(confirmation.items.len(), 1);
        assert!(confirmation.created_at.is_some());
    }

    #[test]
    fn test_server_error_body_reports_created() {
        let with_id: ServerErrorBody = serde_json::from_value(json!({"order_id": 3})).unwrap();
        assert!(with_id.reports_created());

        let with_flag: ServerErrorBody = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(with_flag.reports_created());

        let plain: ServerErrorBody = serde_json::from_value(json!({"detail": "boom"})).unwrap();
        assert!(!plain.reports_created());
    }
}
