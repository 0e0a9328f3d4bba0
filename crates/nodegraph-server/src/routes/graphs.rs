//! Graph document routes — list, read, write, validate.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use nodegraph_core::Error;
use nodegraph_schema::GraphEnvironment;
use nodegraph_store::{ListOptions, WriteOptions, WriteOutcome};

use crate::routes::{error_response, ok_json};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphs", get(list_graphs))
        .route("/graphs/validate", post(validate_graph))
        .route("/graphs/{*path}", get(read_graph).put(write_graph))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    dir: Option<String>,
    recursive: Option<bool>,
    include_details: Option<bool>,
    environment: Option<String>,
}

/// GET /api/graphs — list graph files under the graphs root.
async fn list_graphs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> (StatusCode, Json<Value>) {
    let environment = match params.environment.as_deref() {
        None => None,
        Some(raw) => match GraphEnvironment::parse(raw) {
            Some(env) => Some(env),
            None => return error_response(&Error::Usage(format!("Unknown environment: {raw}"))),
        },
    };
    let opts = ListOptions {
        dir: params.dir,
        recursive: params.recursive.unwrap_or(true),
        include_details: params.include_details.unwrap_or(true),
        environment,
    };
    match state.graphs.list(&opts).await {
        Ok(listing) => ok_json(&listing),
        Err(err) => error_response(&err),
    }
}

/// GET /api/graphs/{path} — read a graph file without validation.
async fn read_graph(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.graphs.read(&path).await {
        Ok((path, graph)) => (StatusCode::OK, Json(json!({ "path": path, "graph": graph }))),
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
struct WriteGraphBody {
    graph: Value,
    pretty: Option<bool>,
    overwrite: Option<bool>,
}

/// PUT /api/graphs/{path} — validate and write a graph document.
async fn write_graph(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(body): Json<WriteGraphBody>,
) -> (StatusCode, Json<Value>) {
    let opts = WriteOptions {
        overwrite: body.overwrite.unwrap_or(false),
        pretty: body.pretty.unwrap_or(true),
    };
    match state.graphs.write(&path, &body.graph, &opts).await {
        Ok(WriteOutcome::Written { path }) => {
            (StatusCode::OK, Json(json!({ "ok": true, "path": path })))
        }
        Ok(WriteOutcome::Invalid { issues }) => {
            (StatusCode::OK, Json(json!({ "ok": false, "issues": issues })))
        }
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
struct ValidateGraphBody {
    path: Option<String>,
    graph: Option<Value>,
}

/// POST /api/graphs/validate — validate a file or an inline payload.
async fn validate_graph(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateGraphBody>,
) -> (StatusCode, Json<Value>) {
    match state
        .graphs
        .validate(body.path.as_deref(), body.graph.as_ref())
        .await
    {
        Ok(validation) if validation.is_valid() => (StatusCode::OK, Json(json!({ "valid": true }))),
        Ok(validation) => (
            StatusCode::OK,
            Json(json!({ "valid": false, "issues": validation.issues })),
        ),
        Err(err) => error_response(&err),
    }
}
