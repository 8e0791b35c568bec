//! Per-model CRUD contract, the SQL-backed implementation, and the set of
//! stores produced by an ORM integration.

mod sql;

pub use sql::SqlStore;

use crate::error::{AppError, SchemaError};
use crate::model::Record;
use crate::orm::SchemaRegistry;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// One record as a JSON object, keyed by field name.
pub type Row = Map<String, Value>;

/// CRUD access to one record type, keyed by an opaque string id.
#[async_trait]
pub trait Store<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Every persisted record, in storage order.
    async fn all(&self) -> Result<Vec<T>, AppError>;

    /// `Ok(None)` when no record has this id.
    async fn get(&self, id: &str) -> Result<Option<T>, AppError>;

    /// Persists a new record and returns its id, generating one when the value has none.
    /// Fails with [`AppError::Conflict`] when the id is taken.
    async fn create(&self, value: T) -> Result<String, AppError>;

    /// Replaces every non-id field. Fails with [`AppError::NotFound`] for an unknown id.
    async fn update(&self, id: &str, value: T) -> Result<(), AppError>;

    /// Fails with [`AppError::NotFound`] for an unknown id.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub type DynStore = Arc<dyn Store<Row>>;

/// Stores keyed by model name, plus the schema registry they were built from.
#[derive(Clone, Default)]
pub struct StoreSet {
    stores: HashMap<String, DynStore>,
    registry: SchemaRegistry,
}

impl StoreSet {
    pub fn new(registry: SchemaRegistry) -> Self {
        StoreSet {
            stores: HashMap::new(),
            registry,
        }
    }

    pub fn insert(&mut self, model: impl Into<String>, store: DynStore) -> Result<(), SchemaError> {
        let model = model.into();
        if self.stores.contains_key(&model) {
            return Err(SchemaError::DuplicateModel(model));
        }
        self.stores.insert(model, store);
        Ok(())
    }

    pub fn get(&self, model: &str) -> Option<&DynStore> {
        self.stores.get(model)
    }

    /// Typed view over the store registered for `T`.
    pub fn typed<T: Record>(&self) -> Option<TypedStore<T>> {
        self.get(&T::model().name).cloned().map(TypedStore::new)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut models: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        models.sort_unstable();
        f.debug_struct("StoreSet")
            .field("models", &models)
            .field("tables", &self.registry.len())
            .finish()
    }
}

/// Converts between `T` and rows through serde around a dynamic store.
pub struct TypedStore<T> {
    inner: DynStore,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedStore<T> {
    fn clone(&self) -> Self {
        TypedStore {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> TypedStore<T> {
    pub fn new(inner: DynStore) -> Self {
        TypedStore {
            inner,
            _marker: PhantomData,
        }
    }

    fn to_row(value: T) -> Result<Row, AppError> {
        match serde_json::to_value(value)? {
            Value::Object(row) => Ok(row),
            _ => Err(AppError::Validation(format!(
                "{} must serialize to an object",
                T::model().name
            ))),
        }
    }

    fn from_row(row: Row) -> Result<T, AppError> {
        Ok(serde_json::from_value(Value::Object(row))?)
    }
}

#[async_trait]
impl<T: Record> Store<T> for TypedStore<T> {
    async fn all(&self) -> Result<Vec<T>, AppError> {
        self.inner.all().await?.into_iter().map(Self::from_row).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        self.inner.get(id).await?.map(Self::from_row).transpose()
    }

    async fn create(&self, value: T) -> Result<String, AppError> {
        self.inner.create(Self::to_row(value)?).await
    }

    async fn update(&self, id: &str, value: T) -> Result<(), AppError> {
        self.inner.update(id, Self::to_row(value)?).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.inner.delete(id).await
    }
}
