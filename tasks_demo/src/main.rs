//! Task tracker: registers the `Task` model, builds tables and routes, serves them.
//!
//! Run from repo root: `cargo run -p tasks-demo`
//! Configure with DATABASE_URL, HOST, PORT (see `autocrud::Settings`).

mod models;

use autocrud::{common_routes_with_ready, init_tracing, AxumWeb, ModelSet, Orchestrator, Settings, SqlOrm};
use axum::Router;
use models::Task;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    init_tracing("autocrud=info,tasks_demo=info,tower_http=info");

    let orm = SqlOrm::connect(&settings.database_url, settings.max_connections).await?;
    let readiness = orm.clone();

    let mut models = ModelSet::new();
    models.register::<Task>()?;

    let web = AxumWeb::new().with_body_limit(settings.body_limit);
    let built = Orchestrator::new(orm, web).build(&models).await?;

    let app = Router::new()
        .merge(common_routes_with_ready(readiness))
        .merge(built.routes);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
