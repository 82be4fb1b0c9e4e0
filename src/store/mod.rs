//! Persistence for the product catalog.

pub mod postgres;
#[cfg(test)]
pub mod memory;

pub use postgres::PgCatalogStore;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::ingest::IngestBatch;
use crate::models::product::{NutritionFact, Product, ProductDetail, StorePrice};

/// Row counts written by one [`CatalogStore::upsert_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Products that did not exist before this batch.
    pub products_inserted: u64,
    pub prices_written: u64,
    pub nutrition_written: u64,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Write a batch atomically: products first (existing ones untouched),
    /// then prices and nutrition facts (overwritten on key conflict).
    async fn upsert_batch(&self, batch: &IngestBatch) -> Result<UpsertSummary, sqlx::Error>;

    /// All products ordered by name, with their prices and nutrition facts.
    async fn list_products(&self) -> Result<Vec<ProductDetail>, sqlx::Error>;

    async fn find_product(&self, ean: &str) -> Result<Option<ProductDetail>, sqlx::Error>;
}

/// Group price and nutrition rows under their products, keeping the order
/// of `products` and of the rows within each group.
pub(crate) fn attach_children(
    products: Vec<Product>,
    prices: Vec<StorePrice>,
    nutrition: Vec<NutritionFact>,
) -> Vec<ProductDetail> {
    let mut prices_by_ean: HashMap<String, Vec<StorePrice>> = HashMap::new();
    for price in prices {
        prices_by_ean.entry(price.product_ean.clone()).or_default().push(price);
    }
    let mut nutrition_by_ean: HashMap<String, Vec<NutritionFact>> = HashMap::new();
    for fact in nutrition {
        nutrition_by_ean.entry(fact.product_ean.clone()).or_default().push(fact);
    }

    products
        .into_iter()
        .map(|product| ProductDetail {
            store_prices: prices_by_ean.remove(&product.ean).unwrap_or_default(),
            nutrition: nutrition_by_ean.remove(&product.ean).unwrap_or_default(),
            product,
        })
        .collect()
}
