//! Record-type descriptors: a named, ordered set of typed fields.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Name of the identity field injected into every table.
pub const ID_FIELD: &str = "id";

/// Declared type of a record field. Only some of these have a storage mapping;
/// the rest are rejected when tables are generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    /// Closed set of string members.
    Enum(Vec<String>),
    Bytes,
    Timestamp,
    Json,
    List(Box<FieldType>),
    /// Another record type embedded by name.
    Nested(String),
}

impl FieldType {
    /// Enum over the given members.
    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Enum(members.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => f.write_str("text"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Float => f.write_str("float"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Enum(members) => write!(f, "enum({})", members.join("|")),
            FieldType::Bytes => f.write_str("bytes"),
            FieldType::Timestamp => f.write_str("timestamp"),
            FieldType::Json => f.write_str("json"),
            FieldType::List(inner) => write!(f, "list<{}>", inner),
            FieldType::Nested(name) => write!(f, "nested<{}>", name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// Optional fields may be absent or null; they map to nullable columns.
    pub optional: bool,
}

/// Descriptor of one record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        ModelDef {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            optional: false,
        });
        self
    }

    /// Adds a nullable field.
    pub fn optional_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            optional: true,
        });
        self
    }

    /// Table name and URL resource segment.
    pub fn resource(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_identity(&self) -> bool {
        self.field_by_name(ID_FIELD).is_some()
    }
}

/// A serde type that publishes its own descriptor.
///
/// Implementors should carry the identity as `id: Option<String>` so that
/// values without an id serialize it as null and get one generated on insert.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn model() -> ModelDef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_is_lowercased_name() {
        let m = ModelDef::new("TaskItem").field("title", FieldType::Text);
        assert_eq!(m.resource(), "taskitem");
    }

    #[test]
    fn builder_keeps_field_order_and_optionality() {
        let m = ModelDef::new("Task")
            .field("title", FieldType::Text)
            .optional_field("note", FieldType::Text)
            .field("priority", FieldType::Integer);
        let names: Vec<_> = m.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "note", "priority"]);
        assert!(m.field_by_name("note").map(|f| f.optional).unwrap_or(false));
        assert!(!m.has_identity());
    }

    #[test]
    fn display_names_nested_types() {
        let ty = FieldType::List(Box::new(FieldType::Nested("Tag".into())));
        assert_eq!(ty.to_string(), "list<nested<Tag>>");
        assert_eq!(FieldType::enumeration(["a", "b"]).to_string(), "enum(a|b)");
    }
}
