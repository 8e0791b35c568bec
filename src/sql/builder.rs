//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a generated table schema.

use crate::error::AppError;
use crate::orm::TableSchema;
use crate::sql::BindValue;
use serde_json::{Map, Value};

/// Quote identifier (safe: names are validated when models are registered).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }
}

fn select_column_list(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn id_param(id: &str) -> BindValue {
    BindValue::Text(Some(id.to_string()))
}

/// SELECT every row. No ORDER BY: rows come back in storage order.
pub fn select_all(schema: &TableSchema) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        select_column_list(schema),
        quoted(&schema.table_name)
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(schema: &TableSchema, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id_param(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(schema),
        quoted(&schema.table_name),
        quoted(&schema.pk().name),
        n
    );
    q
}

/// `SELECT 1` by primary key: an existence check that decodes no columns.
pub fn select_exists(schema: &TableSchema, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id_param(id));
    q.sql = format!(
        "SELECT 1 FROM {} WHERE {} = ${}",
        quoted(&schema.table_name),
        quoted(&schema.pk().name),
        n
    );
    q
}

/// INSERT with every column. Missing optional fields are bound as NULL; missing
/// required fields fail validation.
pub fn insert(schema: &TableSchema, id: &str, row: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut cols = vec![quoted(&schema.pk().name)];
    let mut placeholders = vec![format!("${}", q.push_param(id_param(id)))];
    for c in schema.data_columns() {
        let v = row.get(&c.name).unwrap_or(&Value::Null);
        let n = q.push_param(BindValue::from_json(c, v)?);
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&schema.table_name),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// UPDATE by id: replaces every non-identity column. An id inside the row is ignored.
pub fn update(schema: &TableSchema, id: &str, row: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in schema.data_columns() {
        let v = row.get(&c.name).unwrap_or(&Value::Null);
        let n = q.push_param(BindValue::from_json(c, v)?);
        sets.push(format!("{} = ${}", quoted(&c.name), n));
    }
    if sets.is_empty() {
        // Identity-only table: a no-op assignment still reports whether the row exists.
        let pk = quoted(&schema.pk().name);
        sets.push(format!("{} = {}", pk, pk));
    }
    let id_n = q.push_param(id_param(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(&schema.table_name),
        sets.join(", "),
        quoted(&schema.pk().name),
        id_n
    );
    Ok(q)
}

/// DELETE by id.
pub fn delete(schema: &TableSchema, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id_param(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(&schema.table_name),
        quoted(&schema.pk().name),
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, ModelDef};
    use crate::orm::table_schema;
    use serde_json::json;

    fn schema() -> TableSchema {
        table_schema(
            &ModelDef::new("Task")
                .field("title", FieldType::Text)
                .field("done", FieldType::Boolean),
        )
        .unwrap()
    }

    fn row(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn select_statements() {
        let s = schema();
        assert_eq!(select_all(&s).sql, r#"SELECT "id", "title", "done" FROM "task""#);
        let q = select_by_id(&s, "abc");
        assert_eq!(q.sql, r#"SELECT "id", "title", "done" FROM "task" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![BindValue::Text(Some("abc".into()))]);
        let q = select_exists(&s, "abc");
        assert_eq!(q.sql, r#"SELECT 1 FROM "task" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![BindValue::Text(Some("abc".into()))]);
    }

    #[test]
    fn insert_binds_id_then_fields() {
        let q = insert(&schema(), "abc", &row(json!({"title": "x", "done": true}))).unwrap();
        assert_eq!(
            q.sql,
            r#"INSERT INTO "task" ("id", "title", "done") VALUES ($1, $2, $3)"#
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::Text(Some("abc".into())),
                BindValue::Text(Some("x".into())),
                BindValue::Bool(Some(true)),
            ]
        );
    }

    #[test]
    fn insert_requires_required_fields() {
        let err = insert(&schema(), "abc", &row(json!({"title": "x"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "done is required"));
    }

    #[test]
    fn update_sets_every_field_and_ignores_row_id() {
        let q = update(&schema(), "abc", &row(json!({"id": "other", "title": "y", "done": false}))).unwrap();
        assert_eq!(q.sql, r#"UPDATE "task" SET "title" = $1, "done" = $2 WHERE "id" = $3"#);
        assert_eq!(q.params[2], BindValue::Text(Some("abc".into())));
    }

    #[test]
    fn update_identity_only_table_still_matches_row() {
        let s = table_schema(&ModelDef::new("Marker")).unwrap();
        let q = update(&s, "abc", &Map::new()).unwrap();
        assert_eq!(q.sql, r#"UPDATE "marker" SET "id" = "id" WHERE "id" = $1"#);
    }

    #[test]
    fn delete_by_id() {
        let q = delete(&schema(), "abc");
        assert_eq!(q.sql, r#"DELETE FROM "task" WHERE "id" = $1"#);
    }

    #[test]
    fn quoting_escapes_quotes() {
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }
}
