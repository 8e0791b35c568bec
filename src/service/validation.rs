//! Request body conformance against a model descriptor.

use crate::error::AppError;
use crate::model::{FieldDef, FieldType, ModelDef, ID_FIELD};
use crate::store::Row;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Checks that `body` is an object whose fields are all declared by the model,
    /// that required fields are present and non-null, and that each value has the
    /// field's JSON shape. Returns the body as a row.
    pub fn conform(model: &ModelDef, body: Value) -> Result<Row, AppError> {
        let row = match body {
            Value::Object(m) => m,
            _ => return Err(AppError::BadRequest("body must be a JSON object".into())),
        };
        for key in row.keys() {
            if key != ID_FIELD && model.field_by_name(key).is_none() {
                return Err(AppError::Validation(format!("unknown field {}", key)));
            }
        }
        for field in &model.fields {
            match row.get(&field.name) {
                None | Some(Value::Null) => {
                    if !field.optional && field.name != ID_FIELD {
                        return Err(AppError::Validation(format!("{} is required", field.name)));
                    }
                }
                Some(v) => validate_field(field, v)?,
            }
        }
        Ok(row)
    }
}

fn validate_field(field: &FieldDef, v: &Value) -> Result<(), AppError> {
    let ok = match &field.ty {
        FieldType::Text => v.is_string(),
        FieldType::Integer => v.is_i64(),
        FieldType::Float => v.is_number(),
        FieldType::Boolean => v.is_boolean(),
        FieldType::Enum(members) => {
            let Some(s) = v.as_str() else {
                return Err(AppError::Validation(format!("{} must be a string", field.name)));
            };
            if !members.iter().any(|m| m == s) {
                return Err(AppError::Validation(format!(
                    "{} must be one of [{}]",
                    field.name,
                    members.join(", ")
                )));
            }
            true
        }
        other => {
            return Err(AppError::Validation(format!(
                "{} has type {}, which cannot be stored",
                field.name, other
            )))
        }
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{} must be of type {}", field.name, field.ty)))
    }
}
