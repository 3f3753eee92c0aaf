pub mod produtos;

use crate::AppState;
use axum::Router;

/// Create the API router for every resource.
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new().merge(produtos::create_produtos_router(state))
}
