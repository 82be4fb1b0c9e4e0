// src/ingest.rs
//! Reshapes one page of validated upstream records into the rows written by
//! the catalog store.
//!
//! Descriptive product fields come from the first record seen for each EAN.
//! Prices are kept one per record and nutrition one per fact of each
//! canonical product; repeated keys among those are settled by the store's
//! upsert, where the last value written wins.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::models::product::WeightUnit;
use crate::upstream::UpstreamProduct;

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub ean: String,
    pub name: String,
    pub vendor: String,
    pub image: Option<String>,
    pub unit: WeightUnit,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStorePrice {
    pub store: String,
    pub store_logo: Option<String>,
    pub price: Decimal,
    pub product_ean: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNutritionFact {
    pub name: String,
    pub amount: Decimal,
    pub unit: String,
    pub product_ean: String,
}

/// Everything one search page writes, in the order it must be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestBatch {
    pub products: Vec<NewProduct>,
    pub store_prices: Vec<NewStorePrice>,
    pub nutrition_facts: Vec<NewNutritionFact>,
}

pub fn normalize(records: &[UpstreamProduct]) -> IngestBatch {
    let mut canonical: IndexMap<&str, &UpstreamProduct> = IndexMap::new();
    for record in records {
        canonical.entry(record.ean.as_str()).or_insert(record);
    }

    let products = canonical
        .values()
        .map(|record| NewProduct {
            ean: record.ean.clone(),
            name: record.name.clone(),
            vendor: record.vendor.clone(),
            image: record.image.clone(),
            unit: record.weight_unit,
            quantity: record.weight,
        })
        .collect();

    let store_prices = records
        .iter()
        .map(|record| NewStorePrice {
            store: record.store.name.clone(),
            store_logo: record.store.logo.clone(),
            price: record.current_price,
            product_ean: record.ean.clone(),
        })
        .collect();

    let nutrition_facts = canonical
        .values()
        .flat_map(|record| {
            record.nutrition.iter().map(|fact| NewNutritionFact {
                name: fact.display_name.clone(),
                amount: fact.amount,
                unit: fact.unit.clone(),
                product_ean: record.ean.clone(),
            })
        })
        .collect();

    IngestBatch {
        products,
        store_prices,
        nutrition_facts,
    }
}
