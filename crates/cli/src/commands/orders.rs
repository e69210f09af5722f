//! Checkout and order history commands.

#![allow(clippy::print_stdout)]

use ix_core::Money;
use ix_storefront::AppError;
use ix_storefront::services::{CheckoutOutcome, CheckoutService};
use ix_storefront::state::AppState;

use super::account::ensure_session;

/// Place an order for the cart.
///
/// # Errors
///
/// Returns error if the cart is empty, no user is logged in, or the backend
/// rejects the order. The cart is kept in all of these cases.
pub async fn checkout(state: &AppState, password: Option<String>) -> Result<(), AppError> {
    let mut cart = state.open_cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    let user = ensure_session(state, password).await?;
    let outcome = CheckoutService::new(state.api())
        .place_order(&mut cart, user.as_ref())
        .await?;

    match outcome {
        CheckoutOutcome::Placed(order) => {
            println!("Order #{} placed.", order.id);
            if order.discount_amount > Money::ZERO {
                println!("Repeat customer discount: ₹{}", order.discount_amount);
            }
            println!("Total: ₹{}", order.total_amount);
        }
        CheckoutOutcome::PlacedPendingReview { order_id } => {
            match order_id {
                Some(id) => println!("Order #{id} was created, but the server reported an error."),
                None => println!("Your order was created, but the server reported an error."),
            }
            println!("Check `ix-cli orders` for its status.");
        }
    }
    Ok(())
}

/// Print the user's orders.
///
/// # Errors
///
/// Returns error if no session is active or the request fails.
pub async fn history(state: &AppState, password: Option<String>) -> Result<(), AppError> {
    ensure_session(state, password).await?;
    let history = state.api().my_orders().await?;

    if history.orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    println!("{} order(s)", history.count);
    for order in &history.orders {
        let placed = order
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let units: u64 = order.items.iter().map(|l| u64::from(l.quantity)).sum();
        println!(
            "#{:<6} {:<16} {:>4} unit(s)  ₹{:>10}",
            order.id, placed, units, order.total_amount
        );
    }
    Ok(())
}
