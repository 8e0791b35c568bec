//! Wires one ORM integration and one web integration over a set of models.

use crate::error::AppError;
use crate::model::ModelSet;
use crate::orm::OrmIntegration;
use crate::store::StoreSet;
use crate::web::WebIntegration;

/// Result of a build: the stores (with their schema registry) and the routes.
pub struct Built<R> {
    pub stores: StoreSet,
    pub routes: R,
}

pub struct Orchestrator<O, W> {
    orm: O,
    web: W,
}

impl<O, W> Orchestrator<O, W>
where
    O: OrmIntegration,
    W: WebIntegration,
{
    pub fn new(orm: O, web: W) -> Self {
        Orchestrator { orm, web }
    }

    /// Creates stores first, then routes over them. Any mapping error aborts the build.
    pub async fn build(&self, models: &ModelSet) -> Result<Built<W::Output>, AppError> {
        let stores = self.orm.create_stores(models).await?;
        let routes = self.web.create_routes(models, &stores)?;
        tracing::info!(models = models.len(), "models wired");
        Ok(Built { stores, routes })
    }
}
