use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::products::{
        create_product_handler, delete_product_handler, get_product_handler,
        list_products_handler, update_product_handler,
        upload_product_images_handler,
    },
};

pub const PRODUCTS_PATH: &str = "/api/produtos";
pub const PRODUCT_PATH: &str = "/api/produtos/{id}";
pub const PRODUCT_IMAGES_PATH: &str = "/api/produtos/{id}/imagens";

/// Product CRUD plus the image upload endpoint.
pub fn create_produtos_router(state: &AppState) -> Router<AppState> {
    let upload_body_limit = state.upload_limits().body_limit();

    Router::new()
        .route(
            PRODUCTS_PATH,
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            PRODUCT_PATH,
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route(
            PRODUCT_IMAGES_PATH,
            post(upload_product_images_handler)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
}
