//! Node-definition catalog routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use nodegraph_store::NodeFilter;

use crate::routes::{error_response, ok_json};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/nodes", get(list_nodes))
}

#[derive(Debug, Deserialize)]
struct NodeParams {
    query: Option<String>,
    kind: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

/// GET /api/nodes — filtered, paginated node definitions.
async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NodeParams>,
) -> (StatusCode, Json<Value>) {
    let filter = NodeFilter {
        query: params.query,
        kind: params.kind,
        category: params.category,
        limit: params.limit,
        offset: params.offset,
    };
    match state.catalog.query(&filter).await {
        Ok(result) => ok_json(&result),
        Err(err) => error_response(&err),
    }
}
