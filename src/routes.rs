//! Router assembly: the /api/v1 catalog surface plus health/version.

use crate::handlers::{items, merchants};
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/items", get(items::index).post(items::create))
        .route("/items/find_all", get(items::find_all))
        .route(
            "/items/:id",
            get(items::show).patch(items::update).delete(items::destroy),
        )
        .route("/items/:id/merchant", get(items::merchant))
        .route("/merchants", get(merchants::index))
        .route("/merchants/find", get(merchants::find))
        .route("/merchants/:id", get(merchants::show))
        .route("/merchants/:id/items", get(merchants::items))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}
