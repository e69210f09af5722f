//! Local cart commands.

#![allow(clippy::print_stdout)]

use std::num::NonZeroU32;

use ix_core::{Money, ProductId};
use ix_storefront::AppError;
use ix_storefront::cart::{LineItem, ProductRef};
use ix_storefront::state::AppState;

/// Print the cart.
pub fn show(state: &AppState) {
    let cart = state.open_cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in cart.items() {
        print_line(item);
    }
    println!();
    println!("Items: {}", cart.count());
    println!("Total: ₹{}", cart.total());
}

/// Add a hand-described product.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a zero quantity or a negative price.
pub fn add(
    state: &AppState,
    id: ProductId,
    name: String,
    price: Money,
    image: Option<String>,
    qty: u32,
) -> Result<(), AppError> {
    let quantity = positive_quantity(qty)?;
    if price.amount().is_sign_negative() {
        return Err(AppError::BadRequest(format!("price must not be negative: {price}")));
    }

    let mut product = ProductRef::new(id, name, price);
    if let Some(image) = image {
        product = product.with_image(image);
    }

    let mut cart = state.open_cart();
    cart.add_item(product, quantity);
    print_summary(cart.count(), cart.total());
    Ok(())
}

/// Set a line's quantity.
pub fn update(state: &AppState, id: ProductId, qty: i64) {
    let mut cart = state.open_cart();
    if cart.get(id).is_none() {
        println!("Product {id} is not in the cart.");
        return;
    }
    cart.update_qty(id, qty);
    if let Some(item) = cart.get(id) {
        print_line(item);
    }
    print_summary(cart.count(), cart.total());
}

/// Remove a line.
pub fn remove(state: &AppState, id: ProductId) {
    let mut cart = state.open_cart();
    if cart.get(id).is_none() {
        println!("Product {id} is not in the cart.");
        return;
    }
    cart.remove_item(id);
    print_summary(cart.count(), cart.total());
}

/// Empty the cart.
pub fn clear(state: &AppState) {
    let mut cart = state.open_cart();
    cart.clear();
    println!("Cart cleared.");
}

/// Convert a CLI quantity into a cart quantity.
pub(crate) fn positive_quantity(qty: u32) -> Result<NonZeroU32, AppError> {
    NonZeroU32::new(qty).ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))
}

pub(crate) fn print_summary(count: u64, total: Money) {
    println!("Cart: {count} item(s), total ₹{total}");
}

fn print_line(item: &LineItem) {
    println!(
        "{:>5}  {:<32} {:>4} x ₹{:>10} = ₹{:>10}",
        item.id,
        item.name,
        item.quantity,
        item.unit_price,
        item.line_total()
    );
}
