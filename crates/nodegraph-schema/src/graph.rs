//! Graph document types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Schema version tags accepted by validation. The version is an opaque
/// stored attribute; no behavior branches on it.
pub const SUPPORTED_SCHEMA_VERSIONS: [i64; 2] = [1, 2];

/// A 2D canvas position. Numbers keep their JSON representation so an
/// integer coordinate is not rewritten as a float on normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Number,
    pub y: Number,
}

/// Per-node editor payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_flow_out_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_flow_out_labels: Option<Vec<String>>,
}

/// A node placed on the graph canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
}

/// One end of an edge: a node and a port on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub node_id: String,
    pub port_id: String,
}

/// A port-to-port connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: PortRef,
    pub target: PortRef,
}

/// A canvas comment, anchored either to a node or to a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

/// Toolchain a graph targets. Absent means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEnvironment {
    #[serde(rename = "server")]
    Server,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "client:role-skill")]
    ClientRoleSkill,
    #[serde(rename = "client:creation-skill")]
    ClientCreationSkill,
    #[serde(rename = "client:creation-state")]
    ClientCreationState,
    #[serde(rename = "client:creation-state-decision")]
    ClientCreationStateDecision,
    #[serde(rename = "client:boolean")]
    ClientBoolean,
    #[serde(rename = "client:integer")]
    ClientInteger,
}

impl GraphEnvironment {
    pub const ALL: [GraphEnvironment; 8] = [
        GraphEnvironment::Server,
        GraphEnvironment::Client,
        GraphEnvironment::ClientRoleSkill,
        GraphEnvironment::ClientCreationSkill,
        GraphEnvironment::ClientCreationState,
        GraphEnvironment::ClientCreationStateDecision,
        GraphEnvironment::ClientBoolean,
        GraphEnvironment::ClientInteger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GraphEnvironment::Server => "server",
            GraphEnvironment::Client => "client",
            GraphEnvironment::ClientRoleSkill => "client:role-skill",
            GraphEnvironment::ClientCreationSkill => "client:creation-skill",
            GraphEnvironment::ClientCreationState => "client:creation-state",
            GraphEnvironment::ClientCreationStateDecision => "client:creation-state-decision",
            GraphEnvironment::ClientBoolean => "client:boolean",
            GraphEnvironment::ClientInteger => "client:integer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|env| env.as_str() == value)
    }
}

/// A visual-program definition: nodes, edges, comments, and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub schema_version: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<GraphEnvironment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_interval_seconds: Option<Number>,
    /// Unknown top-level fields, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
