//! Ordered collection of model descriptors handed to the orchestrator.

use crate::error::SchemaError;
use crate::model::{validate_model, ModelDef, Record};
use std::collections::HashSet;

/// Paths taken by the common routes; no model may claim them.
pub const RESERVED_RESOURCES: &[&str] = &["health", "ready", "version"];

/// Models in registration order. Names are unique case-insensitively, since the
/// lower-cased name is both the table name and the URL segment.
#[derive(Clone, Debug, Default)]
pub struct ModelSet {
    models: Vec<ModelDef>,
    resources: HashSet<String>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor after validating its identifiers and identity field.
    pub fn add(&mut self, model: ModelDef) -> Result<&mut Self, SchemaError> {
        validate_model(&model)?;
        let resource = model.resource();
        if RESERVED_RESOURCES.contains(&resource.as_str()) {
            return Err(SchemaError::ReservedResource(resource));
        }
        if !self.resources.insert(resource) {
            return Err(SchemaError::DuplicateModel(model.name));
        }
        self.models.push(model);
        Ok(self)
    }

    pub fn register<T: Record>(&mut self) -> Result<&mut Self, SchemaError> {
        self.add(T::model())
    }

    pub fn from_models<I: IntoIterator<Item = ModelDef>>(models: I) -> Result<Self, SchemaError> {
        let mut set = Self::new();
        for m in models {
            set.add(m)?;
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDef> {
        self.models.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
