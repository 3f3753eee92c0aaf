pub mod products;

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use crate::{
    MIGRATOR,
    database::ports::products::ProductRepository,
    error::{CatalogError, Result},
};
use products::SqliteProductRepository;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Owns the connection pool and the repositories built on top of it.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    products: Arc<SqliteProductRepository>,
}

impl fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl SqliteDatabase {
    /// Open (creating if missing) the database at `connection_string` and
    /// apply pending migrations.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let connect_options = SqliteConnectOptions::from_str(connection_string)
            .map_err(|e| {
                CatalogError::Database(format!("invalid SQLite URL: {e}"))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;

        info!(max_connections, "connected to catalog database");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and make sure the schema is current.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        Ok(Self {
            products: Arc::new(SqliteProductRepository::new(pool.clone())),
            pool,
        })
    }

    /// Private in-memory database on a single connection, for tests and
    /// throwaway runs.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }
}
