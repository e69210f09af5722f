//! Durable snapshot codec.
//!
//! The snapshot is a JSON array of `{id, name, price, quantity, image}`
//! records. Decoding is best-effort and never fails: an absent slot,
//! non-JSON content and any non-array value all decode to an empty cart.
//! Inside an array, records without a usable `id` are dropped and the rest
//! are repaired so the cart invariants hold again.

use ix_core::{Money, ProductId};
use serde_json::Value;
use tracing::warn;

use super::item::LineItem;

/// Serialize cart items into the durable snapshot format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Rehydrate cart items from a stored snapshot.
///
/// Returns an empty cart for `None`, unparseable JSON, or a JSON value
/// that is not an array.
#[must_use]
pub fn decode(raw: Option<&str>) -> Vec<LineItem> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!(kind = value_kind(&other), "cart snapshot is not an array; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "cart snapshot is not valid JSON; starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Some(item) = decode_record(record) else {
            warn!(index, "dropping unreadable cart snapshot record");
            continue;
        };

        // Duplicate ids fold into the first occurrence.
        if let Some(existing) = items.iter_mut().find(|x| x.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }
    items
}

fn decode_record(record: &Value) -> Option<LineItem> {
    let record = record.as_object()?;
    let id = serde_json::from_value::<ProductId>(record.get("id")?.clone()).ok()?;

    Some(LineItem {
        id,
        name: record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        unit_price: record.get("price").map_or(Money::ZERO, Money::coerce),
        quantity: record.get("quantity").map_or(1, coerce_quantity),
        image: record
            .get("image")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

/// Whole, positive quantities pass through; anything else becomes 1.
fn coerce_quantity(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 1.0).map(f64_to_u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .filter(|q| *q >= 1)
        .map_or(1, |q| u32::try_from(q).unwrap_or(u32::MAX))
}

// Callers only pass finite values >= 1; `as` saturates above u64::MAX.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_u64(f: f64) -> u64 {
    f as u64
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
