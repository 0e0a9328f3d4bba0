//! Error types for the NodeGraph store.
//!
//! Schema validation failures are not represented here: they travel as
//! issue lists inside structured results so a malformed document never
//! aborts a batch listing or a caller's control flow.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Path escapes base directory: {0}")]
    PathEscape(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Node definitions file must contain a JSON array: {0}")]
    MalformedCatalog(String),

    #[error("Unknown resource URI: {0}")]
    UnknownResource(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
