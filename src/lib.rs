// src/lib.rs

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

pub mod entities {
    pub mod prelude;
    pub mod insumo;
}

pub mod services {
    pub mod reconcile;
}

pub mod models;
pub mod handlers;

/// Build the application router over the given state. Shared by the binary
/// and the integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/insumos",
            get(handlers::insumo::get_insumos).post(handlers::insumo::post_insumos),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello from Insumos Backend!"
}
