use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::{debug, info};
use vitrine_core::{CatalogError, NewProduct, Product, ProductChanges};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Ids that are not integers cannot match a row, so they read as not-found.
pub(crate) fn parse_product_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::product_not_found())
}

/// GET /api/produtos/{id}
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_product_id(&id)?;

    state
        .products()
        .find_by_id(id)
        .await
        .map_err(|err| AppError::from_catalog("Erro ao buscar produto", err))?
        .map(Json)
        .ok_or_else(AppError::product_not_found)
}

/// POST /api/produtos
pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::from_json_rejection("Erro ao criar produto", rejection)
    })?;
    debug!(?payload, "creating product");

    let product = state
        .products()
        .create(&payload)
        .await
        .map_err(|err| AppError::from_catalog("Erro ao criar produto", err))?;

    info!(id = product.id, codigo = %product.codigo, "product created");
    Ok(Json(product))
}

/// PUT /api/produtos/{id}
///
/// Scalar fields are written first; `imagens`, when present, is applied by a
/// second store call. The two writes are not atomic.
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    changes: Result<Json<ProductChanges>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    let Json(changes) = changes.map_err(|rejection| {
        AppError::from_json_rejection("Erro ao atualizar produto", rejection)
    })?;
    let fail = |err: CatalogError| {
        AppError::from_catalog("Erro ao atualizar produto", err)
    };
    let products = state.products();
    debug!(
        id,
        fields = changes.has_field_changes(),
        images = changes.imagens.is_some(),
        "updating product"
    );

    if !products.update_fields(id, &changes).await.map_err(fail)? {
        return Err(AppError::product_not_found());
    }

    if let Some(imagens) = changes.imagens.as_deref()
        && !products.set_images(id, imagens).await.map_err(fail)?
    {
        return Err(AppError::product_not_found());
    }

    let product = products
        .find_by_id(id)
        .await
        .map_err(fail)?
        .ok_or_else(AppError::product_not_found)?;

    info!(id, "product updated");
    Ok(Json(product))
}

/// DELETE /api/produtos/{id}
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_product_id(&id)?;

    let deleted = state
        .products()
        .delete(id)
        .await
        .map_err(|err| AppError::from_catalog("Erro ao deletar produto", err))?;

    if !deleted {
        return Err(AppError::product_not_found());
    }

    info!(id, "product deleted");
    Ok(Json(json!({ "message": "Produto deletado com sucesso" })))
}
