use axum::{routing::get, Router};
use crate::handlers::search::search_products;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search_products))
}
