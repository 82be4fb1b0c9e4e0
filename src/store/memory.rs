//! In-memory [`CatalogStore`] with the same conflict policy as Postgres.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{attach_children, CatalogStore, UpsertSummary};
use crate::ingest::IngestBatch;
use crate::models::product::{NutritionFact, Product, ProductDetail, StorePrice};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: Vec<Product>,
    prices: Vec<StorePrice>,
    nutrition: Vec<NutritionFact>,
    next_id: i32,
}

impl Tables {
    fn has_product(&self, ean: &str) -> bool {
        self.products.iter().any(|p| p.ean == ean)
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    upserts: AtomicUsize,
    fail_writes: bool,
}

impl MemoryStore {
    /// A store whose every write fails, leaving its contents untouched.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn products(&self) -> Vec<Product> {
        self.tables.lock().expect("store lock").products.clone()
    }

    pub fn prices(&self) -> Vec<StorePrice> {
        self.tables.lock().expect("store lock").prices.clone()
    }

    pub fn nutrition(&self) -> Vec<NutritionFact> {
        self.tables.lock().expect("store lock").nutrition.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn upsert_batch(&self, batch: &IngestBatch) -> Result<UpsertSummary, sqlx::Error> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let mut guard = self.tables.lock().expect("store lock");
        // Work on a copy and swap it in at the end, so a failure leaves
        // nothing behind.
        let mut tables = guard.clone();
        let mut summary = UpsertSummary::default();

        for product in &batch.products {
            if tables.has_product(&product.ean) {
                continue;
            }
            tables.products.push(Product {
                ean: product.ean.clone(),
                name: product.name.clone(),
                vendor: product.vendor.clone(),
                image: product.image.clone(),
                unit: product.unit.as_str().to_string(),
                quantity: product.quantity,
            });
            summary.products_inserted += 1;
        }

        for price in &batch.store_prices {
            if !tables.has_product(&price.product_ean) {
                return Err(sqlx::Error::Protocol(format!(
                    "store_prices.product_ean {} has no product",
                    price.product_ean
                )));
            }
            match tables
                .prices
                .iter_mut()
                .find(|p| p.store == price.store && p.product_ean == price.product_ean)
            {
                Some(existing) => {
                    existing.price = price.price;
                    existing.store_logo = price.store_logo.clone();
                }
                None => {
                    let id = tables.next_id();
                    tables.prices.push(StorePrice {
                        id,
                        store: price.store.clone(),
                        store_logo: price.store_logo.clone(),
                        price: price.price,
                        product_ean: price.product_ean.clone(),
                    });
                }
            }
            summary.prices_written += 1;
        }

        for fact in &batch.nutrition_facts {
            if !tables.has_product(&fact.product_ean) {
                return Err(sqlx::Error::Protocol(format!(
                    "nutrition_info.product_ean {} has no product",
                    fact.product_ean
                )));
            }
            match tables
                .nutrition
                .iter_mut()
                .find(|n| n.name == fact.name && n.product_ean == fact.product_ean)
            {
                Some(existing) => {
                    existing.amount = fact.amount;
                    existing.unit = fact.unit.clone();
                }
                None => {
                    let id = tables.next_id();
                    tables.nutrition.push(NutritionFact {
                        id,
                        name: fact.name.clone(),
                        amount: fact.amount,
                        unit: fact.unit.clone(),
                        product_ean: fact.product_ean.clone(),
                    });
                }
            }
            summary.nutrition_written += 1;
        }

        *guard = tables;
        Ok(summary)
    }

    async fn list_products(&self) -> Result<Vec<ProductDetail>, sqlx::Error> {
        let tables = self.tables.lock().expect("store lock").clone();
        let mut products = tables.products;
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.ean.cmp(&b.ean)));
        Ok(attach_children(products, tables.prices, tables.nutrition))
    }

    async fn find_product(&self, ean: &str) -> Result<Option<ProductDetail>, sqlx::Error> {
        let tables = self.tables.lock().expect("store lock").clone();
        let products: Vec<Product> = tables.products.into_iter().filter(|p| p.ean == ean).collect();
        Ok(attach_children(products, tables.prices, tables.nutrition).pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{normalize, NewStorePrice};
    use crate::test_support::product;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn orphan_price_rolls_back_the_whole_batch() {
        let store = MemoryStore::default();
        let mut batch = normalize(&[product("A", "MENY", "10")]);
        batch.store_prices.push(NewStorePrice {
            store: "MENY".to_string(),
            store_logo: None,
            price: Decimal::ONE,
            product_ean: "missing".to_string(),
        });

        assert!(store.upsert_batch(&batch).await.is_err());
        assert!(store.products().is_empty());
        assert!(store.prices().is_empty());
    }

    #[tokio::test]
    async fn find_product_returns_children() {
        let store = MemoryStore::default();
        store
            .upsert_batch(&normalize(&[product("A", "MENY", "10"), product("B", "KIWI", "5")]))
            .await
            .expect("upsert");

        let detail = store.find_product("B").await.expect("find").expect("present");
        assert_eq!(detail.product.ean, "B");
        assert_eq!(detail.store_prices.len(), 1);
        assert_eq!(detail.store_prices[0].store, "KIWI");
        assert_eq!(detail.nutrition.len(), 1);
        assert!(store.find_product("C").await.expect("find").is_none());
    }
}
