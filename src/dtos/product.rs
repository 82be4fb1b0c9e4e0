// src/dtos/product.rs
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::product::{NutritionFact, ProductDetail, StorePrice};

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub ean: String,
    pub name: String,
    pub vendor: String,
    pub image: Option<String>,
    pub unit: String,
    pub quantity: Decimal,
    pub store_prices: Vec<StorePriceResponse>,
    pub nutrition_info: Vec<NutritionFactResponse>,
}

#[derive(Debug, Serialize)]
pub struct StorePriceResponse {
    pub id: i32,
    pub store: String,
    pub store_logo: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct NutritionFactResponse {
    pub id: i32,
    pub name: String,
    pub amount: Decimal,
    pub unit: String,
}

impl From<StorePrice> for StorePriceResponse {
    fn from(price: StorePrice) -> Self {
        Self {
            id: price.id,
            store: price.store,
            store_logo: price.store_logo,
            price: price.price,
        }
    }
}

impl From<NutritionFact> for NutritionFactResponse {
    fn from(fact: NutritionFact) -> Self {
        Self {
            id: fact.id,
            name: fact.name,
            amount: fact.amount,
            unit: fact.unit,
        }
    }
}

// Convert from Model to Response DTO
impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        let ProductDetail { product, store_prices, mut nutrition } = detail;
        // Longest fact names first, the order the detail view shows them in.
        nutrition.sort_by(|a, b| b.name.chars().count().cmp(&a.name.chars().count()));

        Self {
            ean: product.ean,
            name: product.name,
            vendor: product.vendor,
            image: product.image,
            unit: product.unit,
            quantity: product.quantity,
            store_prices: store_prices.into_iter().map(StorePriceResponse::from).collect(),
            nutrition_info: nutrition.into_iter().map(NutritionFactResponse::from).collect(),
        }
    }
}
