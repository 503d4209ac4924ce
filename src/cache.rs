use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::warn;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::models::Product;

/// In-memory cache of the last fetched record for each product id.
/// Records are snapshots, so a later insert for the same id simply wins.
#[derive(Debug, Default)]
pub struct ProductCache {
    products: RwLock<HashMap<String, Product>>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the cached record, if any.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Stores a record, replacing any earlier one with the same id.
    pub fn insert(&self, product: Product) {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id.clone(), product);
    }

    /// Stores a batch of records under a single write lock.
    pub fn extend(&self, products: impl IntoIterator<Item = Product>) {
        let mut map = self.products.write().unwrap_or_else(PoisonError::into_inner);
        for product in products {
            map.insert(product.id.clone(), product);
        }
    }

    /// Number of cached products.
    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached record.
    pub fn clear(&self) {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the cached record, fetching and caching it on a miss.
    pub async fn get_or_fetch<C: Catalog>(
        &self,
        catalog: &C,
        id: &str,
    ) -> Result<Product, CatalogError> {
        if let Some(product) = self.get(id) {
            return Ok(product);
        }

        let product = catalog.get_product(id).await?;
        self.insert(product.clone());
        Ok(product)
    }

    /// Resolves ids to products in the given order.
    /// Ids that cannot be fetched are skipped.
    pub async fn load_products<C: Catalog>(&self, catalog: &C, ids: &[String]) -> Vec<Product> {
        let mut products = Vec::with_capacity(ids.len());

        for id in ids {
            match self.get_or_fetch(catalog, id).await {
                Ok(product) => products.push(product),
                Err(e) => warn!(%id, error = %e, "failed to fetch product"),
            }
        }

        products
    }
}
