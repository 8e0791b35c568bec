use autocrud::{FieldType, ModelDef, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub title: String,
    pub done: bool,
}

impl Record for Task {
    fn model() -> ModelDef {
        ModelDef::new("Task")
            .field("id", FieldType::Text)
            .field("title", FieldType::Text)
            .field("done", FieldType::Boolean)
    }
}
