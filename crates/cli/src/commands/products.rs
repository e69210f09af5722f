//! Catalog commands.

#![allow(clippy::print_stdout)]

use ix_core::ProductId;
use ix_storefront::AppError;
use ix_storefront::api::Product;
use ix_storefront::state::AppState;

use super::cart::{positive_quantity, print_summary};

/// List the catalog.
///
/// # Errors
///
/// Returns error if the catalog cannot be fetched.
pub async fn list(state: &AppState) -> Result<(), AppError> {
    let products = state.api().list_products().await?;
    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }
    for product in &products {
        println!(
            "{:>5}  {:<32} ₹{:>10}{}",
            product.id,
            product.name,
            product.price,
            category_suffix(product)
        );
    }
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns error if the product does not exist or cannot be fetched.
pub async fn show(state: &AppState, id: ProductId) -> Result<(), AppError> {
    let product = state.api().get_product(id).await?;
    println!("{} (#{})", product.name, product.id);
    println!("Price: ₹{}", product.price);
    if let Some(category) = &product.category {
        println!("Category: {}", category.name);
    }
    if let Some(stock) = product.stock {
        println!("Stock: {stock}");
    }
    if let Some(image) = &product.image {
        println!("Image: {image}");
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("{description}");
    }
    Ok(())
}

/// Fetch a product and add it to the cart.
///
/// # Errors
///
/// Returns error for a zero quantity or if the product cannot be fetched.
pub async fn add(state: &AppState, id: ProductId, qty: u32) -> Result<(), AppError> {
    let quantity = positive_quantity(qty)?;
    let product = state.api().get_product(id).await?;
    println!("Added {} x {}", quantity, product.name);

    let mut cart = state.open_cart();
    cart.add_item(&product, quantity);
    print_summary(cart.count(), cart.total());
    Ok(())
}

fn category_suffix(product: &Product) -> String {
    product
        .category
        .as_ref()
        .map(|c| format!("  [{}]", c.name))
        .unwrap_or_default()
}
