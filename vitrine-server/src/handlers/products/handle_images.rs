use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use vitrine_core::CatalogError;

use super::handle_product::parse_product_id;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    upload::receive_images,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImagesResponse {
    pub imagens: Vec<String>,
}

/// POST /api/produtos/{id}/imagens - Upload up to six images for a product.
///
/// The product is looked up before the body is read, so a missing product
/// leaves nothing on disk. Resized copies are appended to the product's list,
/// which keeps its first six entries.
pub async fn upload_product_images_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ProductImagesResponse>> {
    let id = parse_product_id(&id)?;
    let fail = |err: CatalogError| {
        AppError::from_catalog("Erro ao fazer upload de imagens", err)
    };

    let product = state
        .products()
        .find_by_id(id)
        .await
        .map_err(fail)?
        .ok_or_else(AppError::product_not_found)?;

    let uploads = receive_images(
        multipart,
        &state.config().uploads_dir,
        state.upload_limits(),
    )
    .await?;

    info!(product_id = id, files = uploads.len(), "received image upload");

    let imagens = state
        .image_pipeline()
        .attach(state.products().as_ref(), &product, &uploads)
        .await
        .map_err(fail)?;

    Ok(Json(ProductImagesResponse { imagens }))
}
