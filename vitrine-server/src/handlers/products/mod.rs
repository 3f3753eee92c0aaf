pub mod handle_images;
pub mod handle_list;
pub mod handle_product;

pub use handle_images::{ProductImagesResponse, upload_product_images_handler};
pub use handle_list::list_products_handler;
pub use handle_product::{
    create_product_handler, delete_product_handler, get_product_handler,
    update_product_handler,
};
