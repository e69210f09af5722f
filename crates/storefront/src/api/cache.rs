//! Cache types for catalog responses.

use ix_core::ProductId;

use super::types::Product;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}
