//! Field-type to column-type mapping and the registry of generated table schemas.

use crate::error::SchemaError;
use crate::model::{FieldType, ModelDef, ID_FIELD};
use std::collections::HashMap;
use std::sync::Arc;

/// Database dialect behind the Any pool, read from its connection URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Only the postgres and sqlite drivers are compiled in, so anything that is
    /// not a sqlite URL is PostgreSQL.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") {
            Backend::Sqlite
        } else {
            Backend::Postgres
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }
}

/// Storage column type. Rendered by [`ColumnType::sql_type`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    BigInt,
    Double,
    Boolean,
    /// TEXT constrained to these members.
    Enum(Vec<String>),
}

impl ColumnType {
    /// SQLite's BOOLEAN affinity is not readable through the Any driver, so
    /// booleans are stored there as 0/1 integers.
    pub fn sql_type(&self, backend: Backend) -> &'static str {
        match (self, backend) {
            (ColumnType::Text | ColumnType::Enum(_), _) => "TEXT",
            (ColumnType::BigInt, _) => "BIGINT",
            (ColumnType::Double, _) => "DOUBLE PRECISION",
            (ColumnType::Boolean, Backend::Postgres) => "BOOLEAN",
            (ColumnType::Boolean, Backend::Sqlite) => "INTEGER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

/// Generated storage layout for one model. The identity column is always first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub model: String,
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn pk(&self) -> &ColumnDef {
        &self.columns[0]
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns other than the identity.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.primary_key)
    }
}

/// Total mapping policy. Unknown declared types never fall back to text.
pub fn column_type(model: &str, field: &str, ty: &FieldType) -> Result<ColumnType, SchemaError> {
    match ty {
        FieldType::Text => Ok(ColumnType::Text),
        FieldType::Integer => Ok(ColumnType::BigInt),
        FieldType::Float => Ok(ColumnType::Double),
        FieldType::Boolean => Ok(ColumnType::Boolean),
        FieldType::Enum(members) if !members.is_empty() => Ok(ColumnType::Enum(members.clone())),
        other => Err(SchemaError::UnsupportedType {
            model: model.to_string(),
            field: field.to_string(),
            ty: other.to_string(),
        }),
    }
}

fn identity_column() -> ColumnDef {
    ColumnDef {
        name: ID_FIELD.to_string(),
        column_type: ColumnType::Text,
        nullable: false,
        primary_key: true,
    }
}

/// Builds the table schema for a model, injecting the identity column when the
/// model does not declare one.
pub fn table_schema(model: &ModelDef) -> Result<TableSchema, SchemaError> {
    let mut columns = vec![identity_column()];
    for f in &model.fields {
        if f.name == ID_FIELD {
            if f.ty != FieldType::Text || f.optional {
                return Err(SchemaError::InvalidIdentity {
                    model: model.name.clone(),
                });
            }
            continue;
        }
        columns.push(ColumnDef {
            name: f.name.clone(),
            column_type: column_type(&model.name, &f.name, &f.ty)?,
            nullable: f.optional,
            primary_key: false,
        });
    }
    Ok(TableSchema {
        model: model.name.clone(),
        table_name: model.resource(),
        columns,
    })
}

/// Model name to generated schema. Filled while stores are created, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    tables: Vec<Arc<TableSchema>>,
    by_model: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: TableSchema) -> Result<Arc<TableSchema>, SchemaError> {
        if self.by_model.contains_key(&schema.model) {
            return Err(SchemaError::DuplicateModel(schema.model));
        }
        let schema = Arc::new(schema);
        self.by_model.insert(schema.model.clone(), self.tables.len());
        self.tables.push(schema.clone());
        Ok(schema)
    }

    pub fn get(&self, model: &str) -> Option<&Arc<TableSchema>> {
        self.by_model.get(model).map(|&i| &self.tables[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TableSchema>> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
