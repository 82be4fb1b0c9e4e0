// src/upstream/types.rs
//! Wire schema of the upstream product-search response.
//!
//! The envelope (`data` array plus `links`) must match exactly or the whole
//! page is rejected. Individual records are validated one by one and any
//! record that does not fit [`UpstreamProduct`] is dropped.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::UpstreamError;
use crate::models::product::WeightUnit;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<serde_json::Value>,
    links: RawLinks,
}

// `deserialize_with` keeps serde from defaulting a missing key to `None`:
// every key must be present, as a string or null.
#[derive(Debug, Deserialize)]
struct RawLinks {
    #[serde(deserialize_with = "Option::deserialize")]
    first: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    last: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    prev: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    next: Option<String>,
}

/// Which neighbouring pages exist upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    pub first: bool,
    pub last: bool,
    pub prev: bool,
    pub next: bool,
}

impl From<RawLinks> for PaginationLinks {
    fn from(links: RawLinks) -> Self {
        Self {
            first: links.first.is_some(),
            last: links.last.is_some(),
            prev: links.prev.is_some(),
            next: links.next.is_some(),
        }
    }
}

/// One validated upstream record: a product as sold by one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamProduct {
    pub name: String,
    pub vendor: String,
    pub ean: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub image: Option<String>,
    #[serde(deserialize_with = "json_number")]
    pub current_price: Decimal,
    #[serde(deserialize_with = "json_number")]
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    pub store: UpstreamStore,
    pub nutrition: Vec<UpstreamNutrition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamStore {
    pub name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamNutrition {
    pub display_name: String,
    #[serde(deserialize_with = "json_number")]
    pub amount: Decimal,
    pub unit: String,
}

/// A validated page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub products: Vec<UpstreamProduct>,
    pub links: PaginationLinks,
}

/// Accept only JSON numbers (never numeric strings) and keep their exact
/// decimal text.
fn json_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(serde::de::Error::custom)
}

/// Validate a raw response body into a [`SearchPage`].
pub fn parse_page(body: &[u8]) -> Result<SearchPage, UpstreamError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| UpstreamError::Contract(e.to_string()))?;

    let total = envelope.data.len();
    let products: Vec<UpstreamProduct> = envelope
        .data
        .into_iter()
        .filter_map(|raw| serde_json::from_value(raw).ok())
        .collect();

    let dropped = total - products.len();
    if dropped > 0 {
        debug!(total, dropped, "Dropped upstream records failing validation");
    }

    Ok(SearchPage {
        products,
        links: envelope.links.into(),
    })
}
