//! Generic CRUD execution against the Any pool, one transaction per operation.

use crate::error::AppError;
use crate::model::ID_FIELD;
use crate::orm::{ColumnDef, ColumnType, TableSchema};
use crate::sql::{delete, insert, select_all, select_by_id, select_exists, update, QueryBuf};
use crate::store::{Row, Store};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{AnyConnection, AnyPool, Row as _};
use std::sync::Arc;
use uuid::Uuid;

/// Store bound to one generated table and the shared pool.
#[derive(Clone)]
pub struct SqlStore {
    pool: AnyPool,
    schema: Arc<TableSchema>,
}

impl SqlStore {
    pub fn new(pool: AnyPool, schema: Arc<TableSchema>) -> Self {
        SqlStore { pool, schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn missing(&self, id: &str) -> AppError {
        AppError::NotFound(format!("{} {}", self.schema.model, id))
    }

    /// Id from the row, or a fresh UUID when it is absent or null.
    fn assign_id(&self, row: &Row) -> Result<String, AppError> {
        match row.get(ID_FIELD) {
            None | Some(Value::Null) => Ok(Uuid::new_v4().to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(AppError::Validation(format!("{} must be a string", ID_FIELD))),
        }
    }
}

fn prepare(q: &QueryBuf) -> Query<'_, Any, AnyArguments<'_>> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params
        .iter()
        .cloned()
        .fold(sqlx::query::<Any>(&q.sql), |query, p| p.bind(query))
}

/// A concurrent insert can still win the race after the existence check.
fn conflict_or_db(e: sqlx::Error, schema: &TableSchema, id: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::Conflict(format!("{} {}", schema.model, id));
        }
    }
    AppError::Db(e)
}

async fn exists(conn: &mut AnyConnection, schema: &TableSchema, id: &str) -> Result<bool, AppError> {
    let q = select_exists(schema, id);
    Ok(prepare(&q).fetch_optional(conn).await?.is_some())
}

#[async_trait]
impl Store<Row> for SqlStore {
    async fn all(&self) -> Result<Vec<Row>, AppError> {
        let q = select_all(&self.schema);
        let mut tx = self.pool.begin().await?;
        let rows = prepare(&q).fetch_all(&mut *tx).await?;
        tx.commit().await?;
        rows.iter().map(|r| row_to_json(&self.schema, r)).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Row>, AppError> {
        let q = select_by_id(&self.schema, id);
        let mut tx = self.pool.begin().await?;
        let row = prepare(&q).fetch_optional(&mut *tx).await?;
        tx.commit().await?;
        row.map(|r| row_to_json(&self.schema, &r)).transpose()
    }

    async fn create(&self, row: Row) -> Result<String, AppError> {
        let id = self.assign_id(&row)?;
        let q = insert(&self.schema, &id, &row)?;
        let mut tx = self.pool.begin().await?;
        if exists(&mut tx, &self.schema, &id).await? {
            return Err(AppError::Conflict(format!("{} {}", self.schema.model, id)));
        }
        prepare(&q)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_or_db(e, &self.schema, &id))?;
        tx.commit().await?;
        tracing::info!(model = %self.schema.model, id = %id, "record created");
        Ok(id)
    }

    async fn update(&self, id: &str, row: Row) -> Result<(), AppError> {
        let q = update(&self.schema, id, &row)?;
        let mut tx = self.pool.begin().await?;
        let done = prepare(&q).execute(&mut *tx).await?;
        if done.rows_affected() == 0 {
            return Err(self.missing(id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let q = delete(&self.schema, id);
        let mut tx = self.pool.begin().await?;
        let done = prepare(&q).execute(&mut *tx).await?;
        if done.rows_affected() == 0 {
            return Err(self.missing(id));
        }
        tx.commit().await?;
        Ok(())
    }
}

fn row_to_json(schema: &TableSchema, row: &AnyRow) -> Result<Row, AppError> {
    let mut map = Row::new();
    for col in &schema.columns {
        map.insert(col.name.clone(), cell_to_value(row, col)?);
    }
    Ok(map)
}

/// Decodes by declared column type. SQLite booleans are 0/1 integers and
/// integral REAL values may come back as integers, hence the fallbacks.
fn cell_to_value(row: &AnyRow, col: &ColumnDef) -> Result<Value, AppError> {
    let name = col.name.as_str();
    let v = match &col.column_type {
        ColumnType::Text | ColumnType::Enum(_) => row.try_get::<Option<String>, _>(name)?.map(Value::String),
        ColumnType::BigInt => match row.try_get::<Option<i64>, _>(name) {
            Ok(v) => v.map(Value::from),
            Err(_) => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
        },
        ColumnType::Double => match row.try_get::<Option<f64>, _>(name) {
            Ok(v) => v.map(Value::from),
            Err(_) => row.try_get::<Option<i64>, _>(name)?.map(|n| Value::from(n as f64)),
        },
        ColumnType::Boolean => match row.try_get::<Option<bool>, _>(name) {
            Ok(v) => v.map(Value::Bool),
            Err(_) => row.try_get::<Option<i64>, _>(name)?.map(|n| Value::Bool(n != 0)),
        },
    };
    Ok(v.unwrap_or(Value::Null))
}
