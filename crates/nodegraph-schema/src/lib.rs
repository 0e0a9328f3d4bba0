//! NodeGraph schema — document types and validation.
//!
//! Documents are open records: unknown top-level keys are preserved through
//! a read-modify-write cycle. Validation never mutates its input; on success
//! it yields a typed document with schema defaults applied.

pub mod graph;
pub mod project;
pub mod validate;

pub use graph::{
    Comment, Edge, GraphDocument, GraphEnvironment, Node, NodeData, PortRef, Position,
    SUPPORTED_SCHEMA_VERSIONS,
};
pub use project::{GraphRef, GroupEntry, ProjectDocument, ProjectIdentity, ProjectManifest};
pub use validate::{validate_graph, validate_project, ValidationIssue};
