// src/handlers/search.rs
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, instrument};

use crate::dtos::search::{SearchParams, SearchQuery, SearchResponse};
use crate::error::AppError;
use crate::ingest::normalize;
use crate::state::AppState;

// GET /api/search - Search upstream, store what came back, return the page
#[instrument(skip(state, raw))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(raw): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let SearchParams { query, page } = raw.validate()?;

    let result = state.source.search(&query, page).await?;

    if result.products.is_empty() {
        return Ok(Json(SearchResponse {
            products: result.products,
            links: result.links,
        }));
    }

    let batch = normalize(&result.products);

    // Dropping the future on timeout drops the open transaction, which rolls it back.
    let summary = tokio::time::timeout(state.persist_timeout, state.store.upsert_batch(&batch))
        .await
        .map_err(|_| AppError::Timeout("persist"))??;

    info!(
        %query,
        page,
        records = result.products.len(),
        products_inserted = summary.products_inserted,
        prices_written = summary.prices_written,
        nutrition_written = summary.nutrition_written,
        "Ingested search page"
    );

    Ok(Json(SearchResponse {
        products: result.products,
        links: result.links,
    }))
}
