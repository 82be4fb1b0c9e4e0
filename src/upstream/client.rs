use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::instrument;

use super::types::{parse_page, SearchPage};
use super::{ProductSource, UpstreamError};
use crate::config::UpstreamConfig;

/// Upstream page size; the largest the API accepts.
const PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct KassalClient {
    client: reqwest::Client,
    base_url: String,
}

impl KassalClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| UpstreamError::InvalidApiKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ProductSource for KassalClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, UpstreamError> {
        let url = format!("{}/products", self.base_url);
        let page = page.to_string();
        let size = PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search", query),
                ("page", page.as_str()),
                ("size", size.as_str()),
                ("exclude_without_ean", "true"),
            ])
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport)?;
        interpret_response(status, &body)
    }
}

fn map_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Http(err)
    }
}

/// Turn a status and body into a page, passing rate limits straight through.
pub(crate) fn interpret_response(status: StatusCode, body: &[u8]) -> Result<SearchPage, UpstreamError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(UpstreamError::RateLimited);
    }
    if !status.is_success() {
        return Err(UpstreamError::Status(status.as_u16()));
    }
    parse_page(body)
}
