//! Service routes that sit beside the generated record routes.
//! Their paths are listed in [`RESERVED_RESOURCES`](crate::model::RESERVED_RESOURCES).

use crate::orm::SqlOrm;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    backend: &'static str,
}

#[derive(Serialize)]
struct Version {
    name: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn version() -> Json<Version> {
    Json(Version {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 503 while the pool cannot reach the database.
async fn ready(State(orm): State<SqlOrm>) -> (StatusCode, Json<Readiness>) {
    let backend = orm.backend().as_str();
    match orm.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                database: "ok",
                backend,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "degraded",
                    database: "unavailable",
                    backend,
                }),
            )
        }
    }
}

/// GET /health and GET /version. Needs no database.
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

/// [`common_routes`] plus GET /ready, which pings the database behind `orm`.
pub fn common_routes_with_ready(orm: SqlOrm) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(orm)
        .merge(common_routes())
}
