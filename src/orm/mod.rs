//! ORM integration: turns model descriptors into tables and stores.

mod mapping;
mod migration;

pub use mapping::*;
pub use migration::{apply_migrations, create_table_sql};

use crate::error::AppError;
use crate::model::ModelSet;
use crate::store::{SqlStore, StoreSet};
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::sync::Arc;

#[async_trait]
pub trait OrmIntegration: Send + Sync {
    /// One store per model, keyed by model name. Mapping errors abort before
    /// any table is touched.
    async fn create_stores(&self, models: &ModelSet) -> Result<StoreSet, AppError>;
}

/// SQL-backed integration over sqlx's Any driver (PostgreSQL or SQLite, chosen by URL).
#[derive(Clone)]
pub struct SqlOrm {
    pool: AnyPool,
    backend: Backend,
}

impl SqlOrm {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: AnyPool) -> Self {
        let backend = Backend::from_url(pool.connect_options().database_url.as_str());
        SqlOrm { pool, backend }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Round trip to the database; used by the readiness route.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps and registers every model. Nothing is written to the database here.
pub fn build_registry(models: &ModelSet) -> Result<SchemaRegistry, AppError> {
    let mut registry = SchemaRegistry::new();
    for model in models.iter() {
        registry.register(table_schema(model)?)?;
    }
    Ok(registry)
}

#[async_trait]
impl OrmIntegration for SqlOrm {
    async fn create_stores(&self, models: &ModelSet) -> Result<StoreSet, AppError> {
        let registry = build_registry(models)?;
        apply_migrations(&self.pool, self.backend, &registry).await?;
        let schemas: Vec<Arc<TableSchema>> = registry.iter().cloned().collect();
        let mut stores = StoreSet::new(registry);
        for schema in schemas {
            let store = SqlStore::new(self.pool.clone(), schema.clone());
            stores.insert(schema.model.clone(), Arc::new(store))?;
        }
        Ok(stores)
    }
}
