use async_trait::async_trait;

use crate::{
    Result,
    domain::product::{NewProduct, Product, ProductChanges},
    query::{ProductPage, ProductQuery},
};

/// Repository port for the product catalog.
///
/// Mutations report whether a row matched instead of failing, so callers
/// decide how a missing id is surfaced.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;
    async fn create(&self, product: &NewProduct) -> Result<Product>;

    /// Updates every scalar column present in `changes`; `imagens` is ignored.
    async fn update_fields(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<bool>;
    async fn set_images(&self, id: i64, imagens: &[String]) -> Result<bool>;
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}
