use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::{
    database::{
        codec::{decode_images, encode_images},
        ports::products::ProductRepository,
    },
    domain::product::{
        NewProduct, Product, ProductChanges, validate_image_count,
    },
    error::Result,
    query::{ProductPage, ProductQuery},
};

const PRODUCT_COLUMNS: &str =
    "id, nome, codigo, descricao, preco, imagens, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    nome: String,
    codigo: String,
    descricao: Option<String>,
    preco: f64,
    imagens: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = crate::error::CatalogError;

    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Self {
            imagens: decode_images(row.imagens.as_deref())?,
            id: row.id,
            nome: row.nome,
            codigo: row.codigo,
            descricao: row.descricao,
            preco: row.preco,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// `(nome OR descricao OR codigo matches) AND preco in range`.
    fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &ProductQuery) {
        let pattern = query.like_pattern();
        builder
            .push(" WHERE (nome LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR descricao LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR codigo LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\') AND preco BETWEEN ")
            .push_bind(query.min_price)
            .push(" AND ")
            .push_bind(query.max_price);
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        Self::push_filters(&mut count, query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products"
        ));
        Self::push_filters(&mut select, query);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool())
            .await?;

        debug!(
            total,
            returned = rows.len(),
            page = query.page,
            limit = query.limit,
            "listed products"
        );

        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(ProductPage { total, products })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn create(&self, product: &NewProduct) -> Result<Product> {
        let draft = product.validate()?;
        let now = Utc::now();

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products
                (nome, codigo, descricao, preco, imagens, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.nome)
        .bind(&draft.codigo)
        .bind(&draft.descricao)
        .bind(draft.preco)
        .bind(encode_images(&[])?)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Product::try_from(row)
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<bool> {
        changes.validate()?;

        let mut builder =
            QueryBuilder::<Sqlite>::new("UPDATE products SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(nome) = changes.nome.as_ref() {
            builder.push(", nome = ").push_bind(nome.clone());
        }
        if let Some(codigo) = changes.codigo.as_ref() {
            builder.push(", codigo = ").push_bind(codigo.clone());
        }
        if let Some(descricao) = changes.descricao.as_ref() {
            builder.push(", descricao = ").push_bind(descricao.clone());
        }
        if let Some(preco) = changes.preco {
            builder.push(", preco = ").push_bind(preco);
        }

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_images(&self, id: i64, imagens: &[String]) -> Result<bool> {
        validate_image_count(imagens)?;

        let result = sqlx::query(
            "UPDATE products SET imagens = ?, updated_at = ? WHERE id = ?",
        )
        .bind(encode_images(imagens)?)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}
