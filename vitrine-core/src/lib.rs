//! # Vitrine Core
//!
//! Core library for the Vitrine product catalog: the product model, the
//! catalog store port with its SQLite adapter, the list query/filter layer and
//! the image pipeline that derives bounded-width copies of uploaded pictures.
//!
//! ## Architecture
//!
//! - [`domain`]: product entity and request payloads
//! - [`query`]: pagination, search and price-range filtering parameters
//! - [`database`]: store port, SQLite adapter and the `imagens` column codec
//! - [`imaging`]: resize pipeline for uploaded images
//! - [`error`]: the crate-wide error taxonomy

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Product entity and request payloads
pub mod domain;

/// Catalog store port and SQLite implementation
pub mod database;

/// Error types shared by every catalog operation
pub mod error;

/// Image resize pipeline
pub mod imaging;

/// List query parameters and result page
pub mod query;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use database::{
    SqliteDatabase, ports::products::ProductRepository,
    sqlite::products::SqliteProductRepository,
};
pub use domain::product::{
    MAX_PRODUCT_IMAGES, NewProduct, Product, ProductChanges, append_images,
};
pub use error::{CatalogError, Result};
pub use imaging::pipeline::{ImagePipeline, MAX_IMAGE_WIDTH, StagedUpload};
pub use query::{ProductListParams, ProductPage, ProductQuery};
