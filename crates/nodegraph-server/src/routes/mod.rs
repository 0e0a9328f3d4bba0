//! HTTP route handlers — a thin JSON surface over the stores.
//!
//! Validation failures come back as `200` bodies (`{"ok": false, ...}` /
//! `{"valid": false, ...}`); only usage errors and filesystem faults map to
//! error status codes.

pub mod graphs;
pub mod nodes;
pub mod projects;
pub mod resources;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use nodegraph_core::Error;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(graphs::routes())
        .merge(projects::routes())
        .merge(nodes::routes())
        .merge(resources::routes())
}

/// Map a store error onto a status code and an `{"error": ...}` body.
pub(crate) fn error_response(err: &Error) -> (StatusCode, Json<Value>) {
    let status = match err {
        Error::PathEscape(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) | Error::UnknownResource(_) => StatusCode::NOT_FOUND,
        Error::AlreadyExists(_) => StatusCode::CONFLICT,
        Error::Usage(_) => StatusCode::BAD_REQUEST,
        Error::MalformedCatalog(_) | Error::Io(_) | Error::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// Serialize a successful payload.
pub(crate) fn ok_json<T: Serialize>(value: &T) -> (StatusCode, Json<Value>) {
    match serde_json::to_value(value) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(err) => error_response(&Error::Json(err)),
    }
}
