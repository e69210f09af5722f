//! Catalog reads: product listing and detail.
//!
//! Both endpoints are read-only and cached. Cart items reference products by
//! id only; nothing here is consulted once an item is in the cart.

use ix_core::ProductId;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::types::{Product, ProductListBody};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = self.endpoint("api/products/items/")?;
        let response = Self::check(self.get(url).send().await?).await?;
        let products = Self::json::<ProductListBody>(response)
            .await?
            .into_products();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("api/products/items/{id}/"))?;
        let response = self.get(url).send().await?;
        let product: Product = match Self::check(response).await {
            Ok(response) => Self::json(response).await?,
            Err(ApiError::NotFound(_)) => return Err(ApiError::NotFound(format!("product {id}"))),
            Err(e) => return Err(e),
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop cached catalog data so the next read goes to the backend.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
