//! Resource routes — listing and `nodegraph://` URI resolution.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use nodegraph_store::resources;

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/resources", get(list_resources))
        .route("/resources/read", get(read_resource))
}

/// GET /api/resources — every markdown doc plus the data resources.
async fn list_resources(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match resources::list_resources(&state.config.roots.docs).await {
        Ok(resources) => (StatusCode::OK, Json(json!({ "resources": resources }))),
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
struct ReadParams {
    uri: String,
}

/// GET /api/resources/read?uri=nodegraph://... — resolve one resource.
async fn read_resource(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReadParams>,
) -> (StatusCode, Json<Value>) {
    match resources::read_resource(
        &state.config.roots.docs,
        &state.config.roots.data,
        &state.catalog,
        &params.uri,
    )
    .await
    {
        Ok(content) => (StatusCode::OK, Json(json!({ "contents": [content] }))),
        Err(err) => error_response(&err),
    }
}
