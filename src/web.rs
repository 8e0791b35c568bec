//! Web integration: turns models and their stores into HTTP routes.

use crate::error::{AppError, SchemaError};
use crate::model::ModelSet;
use crate::routes::record_routes;
use crate::store::StoreSet;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub trait WebIntegration: Send + Sync {
    type Output;

    /// One route set per model, each bound to the store registered under the model's name.
    fn create_routes(&self, models: &ModelSet, stores: &StoreSet) -> Result<Self::Output, AppError>;
}

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Builds an axum [`Router`] with list/read/create/update/delete per model.
#[derive(Clone, Debug)]
pub struct AxumWeb {
    body_limit: usize,
}

impl Default for AxumWeb {
    fn default() -> Self {
        AxumWeb {
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AxumWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }
}

impl WebIntegration for AxumWeb {
    type Output = Router;

    fn create_routes(&self, models: &ModelSet, stores: &StoreSet) -> Result<Router, AppError> {
        let mut router = Router::new();
        for model in models.iter() {
            let store = stores
                .get(&model.name)
                .cloned()
                .ok_or_else(|| SchemaError::MissingStore(model.name.clone()))?;
            tracing::debug!(model = %model.name, resource = %model.resource(), "routes registered");
            router = router.merge(record_routes(model.clone(), store));
        }
        Ok(router
            .layer(RequestBodyLimitLayer::new(self.body_limit))
            .layer(TraceLayer::new_for_http()))
    }
}
