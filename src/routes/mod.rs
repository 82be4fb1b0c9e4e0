pub mod products;
pub mod search;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(search::routes())
        .merge(products::routes())
}
