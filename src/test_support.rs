//! Fixtures shared by the unit tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::product::WeightUnit;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::CatalogStore;
use crate::upstream::types::{parse_page, UpstreamNutrition, UpstreamStore};
use crate::upstream::{PaginationLinks, ProductSource, SearchPage, UpstreamError, UpstreamProduct};

/// A raw upstream record as JSON, including fields the service ignores.
pub fn record(ean: &str, store: &str, price: f64) -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Tine Lettmelk 1L",
        "vendor": "Tine",
        "ean": ean,
        "image": "https://img.example/melk.png",
        "current_price": price,
        "weight": 1,
        "weight_unit": "l",
        "store": { "name": store, "logo": null, "code": "X" },
        "nutrition": [
            { "code": "energi_kcal", "display_name": "Kalorier", "amount": 38, "unit": "kcal" }
        ]
    })
}

/// A full upstream response body around `data`, with first/next links set.
pub fn page_body(data: Vec<serde_json::Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "data": data,
        "links": {
            "first": "https://kassal.app/api/v1/products?page=1",
            "last": null,
            "prev": null,
            "next": "https://kassal.app/api/v1/products?page=2"
        },
        "meta": { "current_page": 1 }
    }))
    .expect("serialize page body")
}

/// An already validated record.
pub fn product(ean: &str, store: &str, price: &str) -> UpstreamProduct {
    UpstreamProduct {
        name: "Tine Lettmelk 1L".to_string(),
        vendor: "Tine".to_string(),
        ean: ean.to_string(),
        image: Some("https://img.example/melk.png".to_string()),
        current_price: Decimal::from_str(price).expect("decimal"),
        weight: Decimal::ONE,
        weight_unit: WeightUnit::L,
        store: UpstreamStore {
            name: store.to_string(),
            logo: None,
        },
        nutrition: vec![UpstreamNutrition {
            display_name: "Kalorier".to_string(),
            amount: Decimal::new(38, 0),
            unit: "kcal".to_string(),
        }],
    }
}

pub fn links() -> PaginationLinks {
    PaginationLinks {
        first: true,
        last: false,
        prev: false,
        next: true,
    }
}

enum Reply {
    Page(SearchPage),
    Body(Vec<u8>),
    RateLimited,
    Contract(String),
}

/// Canned [`ProductSource`] that counts how often it is asked.
pub struct StubSource {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn page(products: Vec<UpstreamProduct>) -> Self {
        Self::with(Reply::Page(SearchPage {
            products,
            links: links(),
        }))
    }

    /// Serve a raw response body, validated on every call.
    pub fn body(body: Vec<u8>) -> Self {
        Self::with(Reply::Body(body))
    }

    pub fn rate_limited() -> Self {
        Self::with(Reply::RateLimited)
    }

    pub fn contract_error(reason: &str) -> Self {
        Self::with(Reply::Contract(reason.to_string()))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the page served by later calls.
    pub fn set_page(&self, products: Vec<UpstreamProduct>) {
        *self.reply.lock().expect("stub lock") = Reply::Page(SearchPage {
            products,
            links: links(),
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for StubSource {
    async fn search(&self, _query: &str, _page: u32) -> Result<SearchPage, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.reply.lock().expect("stub lock") {
            Reply::Page(page) => Ok(page.clone()),
            Reply::Body(body) => parse_page(body),
            Reply::RateLimited => Err(UpstreamError::RateLimited),
            Reply::Contract(reason) => Err(UpstreamError::Contract(reason.clone())),
        }
    }
}

pub fn state_with(source: Arc<StubSource>, store: Arc<MemoryStore>) -> AppState {
    let source: Arc<dyn ProductSource> = source;
    let store: Arc<dyn CatalogStore> = store;
    AppState::new(store, source, Duration::from_secs(5))
}
