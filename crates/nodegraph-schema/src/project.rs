//! Project manifest and composed project document types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::graph::GraphDocument;

/// Required project identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub id: String,
    pub name: String,
}

/// Manifest entry mapping a logical graph id to an on-disk location
/// relative to the project directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRef {
    pub graph_id: String,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Organizational group metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_folder: Option<TopFolder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopFolder {
    Server,
    Client,
}

/// The authoritative mapping from logical graph identity to files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_version: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    pub project: ProjectIdentity,
    #[serde(default)]
    pub graphs: Vec<GraphRef>,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_groups: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structures: Option<Vec<Value>>,
    /// Unknown top-level fields, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A project composed in memory: manifest plus resolved graph and struct
/// payloads. Its canonical persisted form is always the directory of files
/// it was assembled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub manifest: ProjectManifest,
    #[serde(default)]
    pub graphs: BTreeMap<String, GraphDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structs: Option<BTreeMap<String, Value>>,
    /// Unknown top-level fields, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
