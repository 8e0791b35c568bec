//! autocrud: generates SQL tables and REST routes from record definitions.

pub mod error;
pub mod handlers;
pub mod model;
pub mod orchestrator;
pub mod orm;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod web;

pub use error::{AppError, SchemaError, SettingsError};
pub use model::{FieldDef, FieldType, ModelDef, ModelSet, Record, ID_FIELD, RESERVED_RESOURCES};
pub use orchestrator::{Built, Orchestrator};
pub use orm::{Backend, OrmIntegration, SchemaRegistry, SqlOrm, TableSchema};
pub use routes::{common_routes, common_routes_with_ready, record_routes};
pub use settings::Settings;
pub use store::{DynStore, Row, SqlStore, Store, StoreSet, TypedStore};
pub use telemetry::init_tracing;
pub use web::{AxumWeb, WebIntegration};
