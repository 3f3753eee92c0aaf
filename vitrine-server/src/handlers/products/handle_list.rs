use axum::{
    Json,
    extract::{Query, State},
};
use tracing::debug;
use vitrine_core::{ProductListParams, ProductPage, ProductQuery};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// GET /api/produtos - Paginated listing with search and price filters.
///
/// Malformed numeric parameters fall back to their defaults.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<ProductPage>> {
    let query = ProductQuery::from_params(&params);
    debug!(?query, "listing products");

    let page = state
        .products()
        .list(&query)
        .await
        .map_err(|err| AppError::from_catalog("Erro ao listar produtos", err))?;

    Ok(Json(page))
}
