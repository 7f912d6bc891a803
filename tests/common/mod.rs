use axum::Router;
use insumos_backend::{app, AppState};
use sea_orm::DatabaseConnection;
use serde_json::Value;

/// Build the application router over a prepared connection.
///
/// Tests hand in a SeaORM `MockDatabase` connection so handler flows run
/// without a live Postgres.
pub fn build_test_app(db: DatabaseConnection) -> Router {
    app(AppState {
        db: std::sync::Arc::new(db),
    })
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
