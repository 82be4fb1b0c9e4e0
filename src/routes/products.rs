use axum::{routing::get, Router};
use crate::handlers::product::{get_product, get_products};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(get_products))
        .route("/api/products/{ean}", get(get_product))
}
