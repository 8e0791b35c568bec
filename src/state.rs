//! Per-resource router state. Each model's routes own one of these by value.

use crate::model::ModelDef;
use crate::store::DynStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecordState {
    pub model: Arc<ModelDef>,
    pub store: DynStore,
}

impl RecordState {
    pub fn new(model: ModelDef, store: DynStore) -> Self {
        RecordState {
            model: Arc::new(model),
            store,
        }
    }
}
