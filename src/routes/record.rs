//! Record CRUD routes for one model.
//! The router is built per model and given that model's state by value, so
//! handlers of different resources never share a store.

use crate::handlers::record::{create, delete as delete_handler, list, read, update};
use crate::model::ModelDef;
use crate::state::RecordState;
use crate::store::DynStore;
use axum::{routing::get, Router};

pub fn record_routes(model: ModelDef, store: DynStore) -> Router {
    let resource = model.resource();
    let state = RecordState::new(model, store);
    Router::new()
        .route(&format!("/{}", resource), get(list).post(create))
        .route(
            &format!("/{}/:id", resource),
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
