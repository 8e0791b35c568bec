//! Apply generated table schemas to the database.
//! Idempotent: tables are created with IF NOT EXISTS, so re-running against an
//! existing database neither errors nor duplicates tables.

use crate::error::AppError;
use crate::orm::{Backend, ColumnDef, ColumnType, SchemaRegistry, TableSchema};
use crate::sql::quoted;
use sqlx::AnyPool;

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn column_ddl(c: &ColumnDef, backend: Backend) -> String {
    let mut ddl = format!("{} {}", quoted(&c.name), c.column_type.sql_type(backend));
    if !c.nullable {
        ddl.push_str(" NOT NULL");
    }
    if c.primary_key {
        ddl.push_str(" PRIMARY KEY");
    }
    match (&c.column_type, backend) {
        (ColumnType::Enum(members), _) => {
            let allowed = members.iter().map(|m| literal(m)).collect::<Vec<_>>().join(", ");
            ddl.push_str(&format!(" CHECK ({} IN ({}))", quoted(&c.name), allowed));
        }
        (ColumnType::Boolean, Backend::Sqlite) => {
            ddl.push_str(&format!(" CHECK ({} IN (0, 1))", quoted(&c.name)));
        }
        _ => {}
    }
    ddl
}

/// CREATE TABLE IF NOT EXISTS for one schema in the given dialect.
pub fn create_table_sql(schema: &TableSchema, backend: Backend) -> String {
    let cols = schema
        .columns
        .iter()
        .map(|c| column_ddl(c, backend))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quoted(&schema.table_name), cols)
}

/// Create every registered table, in registration order.
pub async fn apply_migrations(
    pool: &AnyPool,
    backend: Backend,
    registry: &SchemaRegistry,
) -> Result<(), AppError> {
    for schema in registry.iter() {
        let ddl = create_table_sql(schema, backend);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
        tracing::info!(model = %schema.model, table = %schema.table_name, "table ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, ModelDef};
    use crate::orm::table_schema;

    #[test]
    fn renders_table_ddl() {
        let schema = table_schema(
            &ModelDef::new("Task")
                .field("title", FieldType::Text)
                .field("done", FieldType::Boolean)
                .optional_field("estimate", FieldType::Float)
                .field("priority", FieldType::Integer),
        )
        .unwrap();
        assert_eq!(
            create_table_sql(&schema, Backend::Postgres),
            "CREATE TABLE IF NOT EXISTS \"task\" (\"id\" TEXT NOT NULL PRIMARY KEY, \
             \"title\" TEXT NOT NULL, \"done\" BOOLEAN NOT NULL, \
             \"estimate\" DOUBLE PRECISION, \"priority\" BIGINT NOT NULL)"
        );
    }

    #[test]
    fn enum_columns_carry_check_constraint() {
        let schema = table_schema(
            &ModelDef::new("Ticket").field("state", FieldType::enumeration(["open", "won't fix"])),
        )
        .unwrap();
        let ddl = create_table_sql(&schema, Backend::Sqlite);
        assert!(ddl.contains("\"state\" TEXT NOT NULL CHECK (\"state\" IN ('open', 'won''t fix'))"));
    }

    #[test]
    fn sqlite_booleans_are_checked_integers() {
        let schema = table_schema(
            &ModelDef::new("Task")
                .field("done", FieldType::Boolean)
                .optional_field("archived", FieldType::Boolean),
        )
        .unwrap();
        assert_eq!(
            create_table_sql(&schema, Backend::Sqlite),
            "CREATE TABLE IF NOT EXISTS \"task\" (\"id\" TEXT NOT NULL PRIMARY KEY, \
             \"done\" INTEGER NOT NULL CHECK (\"done\" IN (0, 1)), \
             \"archived\" INTEGER CHECK (\"archived\" IN (0, 1)))"
        );
    }
}
