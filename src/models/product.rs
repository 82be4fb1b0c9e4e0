use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Units the upstream API may report a product's size in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Ml,
    L,
    G,
    Kg,
}

impl WeightUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Ml => "ml",
            WeightUnit::L => "l",
            WeightUnit::G => "g",
            WeightUnit::Kg => "kg",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub ean: String,
    pub name: String,
    pub vendor: String,
    pub image: Option<String>,
    pub unit: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct StorePrice {
    pub id: i32,
    pub store: String,
    pub store_logo: Option<String>,
    pub price: Decimal,
    pub product_ean: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct NutritionFact {
    pub id: i32,
    pub name: String,
    pub amount: Decimal,
    pub unit: String,
    pub product_ean: String,
}

/// A stored product together with everything that references it.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub store_prices: Vec<StorePrice>,
    pub nutrition: Vec<NutritionFact>,
}
