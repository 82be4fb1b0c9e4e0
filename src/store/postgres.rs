// src/store/postgres.rs
use async_trait::async_trait;
use indexmap::IndexMap;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use super::{attach_children, CatalogStore, UpsertSummary};
use crate::ingest::IngestBatch;
use crate::models::product::{NutritionFact, Product, ProductDetail, StorePrice};

const PRODUCT_COLUMNS: &str = "SELECT ean, name, vendor, image, unit, quantity FROM products";
const PRICE_COLUMNS: &str = "SELECT id, store, store_logo, price, product_ean FROM store_prices";
const NUTRITION_COLUMNS: &str = "SELECT id, name, amount, unit, product_ean FROM nutrition_info";

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self, batch), fields(products = batch.products.len()))]
    async fn upsert_batch(&self, batch: &IngestBatch) -> Result<UpsertSummary, sqlx::Error> {
        let prices = last_wins(&batch.store_prices, |p| (p.store.as_str(), p.product_ean.as_str()));
        let facts = last_wins(&batch.nutrition_facts, |f| (f.name.as_str(), f.product_ean.as_str()));

        let mut tx = self.pool.begin().await?;
        let mut summary = UpsertSummary::default();

        if !batch.products.is_empty() {
            let mut insert: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO products (ean, name, vendor, image, unit, quantity) ");
            insert.push_values(&batch.products, |mut row, product| {
                row.push_bind(&product.ean)
                    .push_bind(&product.name)
                    .push_bind(&product.vendor)
                    .push_bind(&product.image)
                    .push_bind(product.unit.as_str())
                    .push_bind(product.quantity);
            });
            insert.push(" ON CONFLICT (ean) DO NOTHING");
            summary.products_inserted = insert.build().execute(&mut *tx).await?.rows_affected();
        }

        if !prices.is_empty() {
            let mut insert: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO store_prices (store, store_logo, price, product_ean) ");
            insert.push_values(&prices, |mut row, price| {
                row.push_bind(&price.store)
                    .push_bind(&price.store_logo)
                    .push_bind(price.price)
                    .push_bind(&price.product_ean);
            });
            insert.push(
                " ON CONFLICT (store, product_ean) \
                 DO UPDATE SET price = EXCLUDED.price, store_logo = EXCLUDED.store_logo",
            );
            summary.prices_written = insert.build().execute(&mut *tx).await?.rows_affected();
        }

        if !facts.is_empty() {
            let mut insert: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO nutrition_info (name, amount, unit, product_ean) ");
            insert.push_values(&facts, |mut row, fact| {
                row.push_bind(&fact.name)
                    .push_bind(fact.amount)
                    .push_bind(&fact.unit)
                    .push_bind(&fact.product_ean);
            });
            insert.push(
                " ON CONFLICT (name, product_ean) \
                 DO UPDATE SET amount = EXCLUDED.amount, unit = EXCLUDED.unit",
            );
            summary.nutrition_written = insert.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<ProductDetail>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} ORDER BY name, ean"))
            .fetch_all(&self.pool)
            .await?;
        let prices = sqlx::query_as::<_, StorePrice>(&format!("{PRICE_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        let nutrition = sqlx::query_as::<_, NutritionFact>(&format!("{NUTRITION_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_children(products, prices, nutrition))
    }

    #[instrument(skip(self))]
    async fn find_product(&self, ean: &str) -> Result<Option<ProductDetail>, sqlx::Error> {
        let Some(product) = sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} WHERE ean = $1"))
            .bind(ean)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let prices = sqlx::query_as::<_, StorePrice>(&format!(
            "{PRICE_COLUMNS} WHERE product_ean = $1 ORDER BY id"
        ))
        .bind(ean)
        .fetch_all(&self.pool)
        .await?;
        let nutrition = sqlx::query_as::<_, NutritionFact>(&format!(
            "{NUTRITION_COLUMNS} WHERE product_ean = $1 ORDER BY id"
        ))
        .bind(ean)
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_children(vec![product], prices, nutrition).pop())
    }
}

/// Keep one row per conflict key, holding the last value seen at the first
/// key's position. A single `INSERT ... ON CONFLICT DO UPDATE` may not touch
/// the same row twice.
fn last_wins<'a, T, F>(rows: &'a [T], key: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> (&'a str, &'a str),
{
    let mut by_key: IndexMap<(&str, &str), &T> = IndexMap::new();
    for row in rows {
        by_key.insert(key(row), row);
    }
    by_key.into_values().collect()
}
