//! Client for the upstream grocery-price search API.

mod client;
pub mod types;

pub use client::KassalClient;
pub use types::{PaginationLinks, SearchPage, UpstreamProduct};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered 429; passed through to the caller without retry.
    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected upstream status: {0}")]
    Status(u16),

    /// The response envelope did not match the expected shape.
    #[error("Upstream contract violation: {0}")]
    Contract(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

/// Anything that can answer a product search with one validated page.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, UpstreamError>;
}
