//! Project routes — read, write, validate composed project documents.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use nodegraph_store::{ProjectWriteOutcome, WriteOptions};

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects/validate", post(validate_project))
        .route("/projects/{*path}", get(read_project).put(write_project))
}

/// GET /api/projects/{path} — compose a project directory into one
/// document.
async fn read_project(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.projects.read(&path).await {
        Ok((path, document)) => (
            StatusCode::OK,
            Json(json!({ "path": path, "document": document })),
        ),
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
struct WriteProjectBody {
    document: Value,
    pretty: Option<bool>,
    overwrite: Option<bool>,
}

/// PUT /api/projects/{path} — validate and decompose a project document to
/// its directory layout.
async fn write_project(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(body): Json<WriteProjectBody>,
) -> (StatusCode, Json<Value>) {
    let opts = WriteOptions {
        overwrite: body.overwrite.unwrap_or(false),
        pretty: body.pretty.unwrap_or(true),
    };
    match state.projects.write(&path, &body.document, &opts).await {
        Ok(ProjectWriteOutcome::Written { path, warnings }) => {
            let mut response = json!({ "ok": true, "path": path });
            if !warnings.is_empty() {
                response["warnings"] = json!(warnings);
            }
            (StatusCode::OK, Json(response))
        }
        Ok(ProjectWriteOutcome::Invalid { issues }) => {
            (StatusCode::OK, Json(json!({ "ok": false, "issues": issues })))
        }
        Err(err) => error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
struct ValidateProjectBody {
    path: Option<String>,
    document: Option<Value>,
}

/// POST /api/projects/validate — validate a project directory or an inline
/// document.
async fn validate_project(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateProjectBody>,
) -> (StatusCode, Json<Value>) {
    match state
        .projects
        .validate(body.path.as_deref(), body.document.as_ref())
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
