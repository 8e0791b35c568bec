//! Convert serde_json::Value to column-typed values that sqlx can bind through the Any driver.

use crate::error::AppError;
use crate::orm::{ColumnDef, ColumnType};
use serde_json::Value;
use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

/// A value checked against its column type. `None` binds a typed NULL.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(Option<String>),
    BigInt(Option<i64>),
    Double(Option<f64>),
    Bool(Option<bool>),
}

impl BindValue {
    pub fn from_json(col: &ColumnDef, v: &Value) -> Result<Self, AppError> {
        if v.is_null() {
            if !col.nullable {
                return Err(AppError::Validation(format!("{} is required", col.name)));
            }
            return Ok(Self::null(&col.column_type));
        }
        let mismatch = |expected: &str| AppError::Validation(format!("{} must be {}", col.name, expected));
        Ok(match &col.column_type {
            ColumnType::Text => BindValue::Text(Some(v.as_str().ok_or_else(|| mismatch("a string"))?.to_string())),
            ColumnType::Enum(members) => {
                let s = v.as_str().ok_or_else(|| mismatch("a string"))?;
                if !members.iter().any(|m| m == s) {
                    return Err(mismatch(&format!("one of [{}]", members.join(", "))));
                }
                BindValue::Text(Some(s.to_string()))
            }
            ColumnType::BigInt => BindValue::BigInt(Some(v.as_i64().ok_or_else(|| mismatch("an integer"))?)),
            ColumnType::Double => BindValue::Double(Some(v.as_f64().ok_or_else(|| mismatch("a number"))?)),
            ColumnType::Boolean => BindValue::Bool(Some(v.as_bool().ok_or_else(|| mismatch("a boolean"))?)),
        })
    }

    pub fn null(ty: &ColumnType) -> Self {
        match ty {
            ColumnType::Text | ColumnType::Enum(_) => BindValue::Text(None),
            ColumnType::BigInt => BindValue::BigInt(None),
            ColumnType::Double => BindValue::Double(None),
            ColumnType::Boolean => BindValue::Bool(None),
        }
    }

    pub fn bind<'q>(self, query: Query<'q, Any, AnyArguments<'q>>) -> Query<'q, Any, AnyArguments<'q>> {
        match self {
            BindValue::Text(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
            BindValue::Double(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn col(ty: ColumnType, nullable: bool) -> ColumnDef {
        ColumnDef {
            name: "c".into(),
            column_type: ty,
            nullable,
            primary_key: false,
        }
    }

    #[test]
    fn accepts_matching_values() {
        assert_eq!(
            BindValue::from_json(&col(ColumnType::Text, false), &json!("x")).unwrap(),
            BindValue::Text(Some("x".into()))
        );
        assert_eq!(
            BindValue::from_json(&col(ColumnType::BigInt, false), &json!(7)).unwrap(),
            BindValue::BigInt(Some(7))
        );
        assert_eq!(
            BindValue::from_json(&col(ColumnType::Double, false), &json!(2)).unwrap(),
            BindValue::Double(Some(2.0))
        );
        assert_eq!(
            BindValue::from_json(&col(ColumnType::Boolean, false), &json!(false)).unwrap(),
            BindValue::Bool(Some(false))
        );
    }

    #[test]
    fn null_respects_nullability() {
        assert_eq!(
            BindValue::from_json(&col(ColumnType::Double, true), &Value::Null).unwrap(),
            BindValue::Double(None)
        );
        let err = BindValue::from_json(&col(ColumnType::Double, false), &Value::Null).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "c is required"));
    }

    #[test]
    fn rejects_wrong_json_kind() {
        assert!(BindValue::from_json(&col(ColumnType::BigInt, false), &json!(1.5)).is_err());
        assert!(BindValue::from_json(&col(ColumnType::Text, false), &json!(1)).is_err());
        assert!(BindValue::from_json(&col(ColumnType::Boolean, false), &json!("true")).is_err());
    }

    #[test]
    fn enum_checks_membership() {
        let c = col(ColumnType::Enum(vec!["open".into(), "closed".into()]), false);
        assert!(BindValue::from_json(&c, &json!("open")).is_ok());
        let err = BindValue::from_json(&c, &json!("archived")).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("one of [open, closed]")));
    }
}
