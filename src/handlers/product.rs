// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, instrument};

use crate::dtos::product::ProductResponse;
use crate::error::AppError;
use crate::state::AppState;

// GET /api/products - List stored products with prices and nutrition
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    match state.store.list_products().await {
        Ok(products) => {
            let response = products.into_iter().map(ProductResponse::from).collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /api/products/{ean} - Single product with its nutrition detail
#[instrument(skip(state))]
pub async fn get_product(
    Path(ean): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .store
        .find_product(&ean)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}
