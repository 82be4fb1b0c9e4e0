// src/dtos/search.rs
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::upstream::{PaginationLinks, UpstreamProduct};

/// Raw query string of `GET /api/search`; checked by [`SearchQuery::validate`].
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn validate(self) -> Result<SearchParams, AppError> {
        let query = self
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("query is required"))?;

        // An empty page parameter counts as absent. Unlike a lenient
        // parseInt-style coercion, trailing junk ("2x", "1.5") is rejected.
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page > 0 => page,
                _ => {
                    return Err(AppError::bad_request(format!(
                        "page must be a positive integer, got {raw:?}"
                    )))
                }
            },
        };

        Ok(SearchParams { query, page })
    }
}

/// Every record that passed validation (duplicates across stores included)
/// plus the upstream pagination flags.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<UpstreamProduct>,
    pub links: PaginationLinks,
}
