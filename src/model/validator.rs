//! Descriptor validation: identifiers, duplicate fields, identity shape.

use crate::error::SchemaError;
use crate::model::{FieldType, ModelDef, ID_FIELD};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles"))
}

/// Names end up quoted inside DDL and URL paths, so only plain identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    if identifier_re().is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}

pub fn validate_model(model: &ModelDef) -> Result<(), SchemaError> {
    validate_identifier(&model.name)?;
    let mut seen = HashSet::new();
    for f in &model.fields {
        validate_identifier(&f.name)?;
        if !seen.insert(f.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                model: model.name.clone(),
                field: f.name.clone(),
            });
        }
        if f.name == ID_FIELD && (f.ty != FieldType::Text || f.optional) {
            return Err(SchemaError::InvalidIdentity {
                model: model.name.clone(),
            });
        }
    }
    Ok(())
}
