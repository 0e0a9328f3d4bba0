//! Option and result types for store operations.

use serde::Serialize;

use nodegraph_schema::{GraphEnvironment, ValidationIssue};

/// Options for listing graph documents.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Subdirectory under the graphs root to list from.
    pub dir: Option<String>,
    /// Recurse into subdirectories.
    pub recursive: bool,
    /// Parse each file and include document metadata. Forced on when an
    /// environment filter is given.
    pub include_details: bool,
    /// Keep only documents targeting this environment.
    pub environment: Option<GraphEnvironment>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            dir: None,
            recursive: true,
            include_details: true,
            environment: None,
        }
    }
}

/// Options for writing documents.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Allow replacing an existing document.
    pub overwrite: bool,
    /// Pretty-print the persisted JSON.
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            pretty: true,
        }
    }
}

/// Result of listing graph documents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphListing {
    pub base_dir: String,
    pub count: usize,
    pub graphs: Vec<GraphEntry>,
}

/// One listing entry. A file that fails to parse or validate becomes a
/// `Failed` entry so one corrupt file does not hide the rest.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GraphEntry {
    Bare {
        path: String,
    },
    Failed {
        path: String,
        error: EntryError,
    },
    #[serde(rename_all = "camelCase")]
    Summary {
        path: String,
        name: String,
        environment: Option<GraphEnvironment>,
        schema_version: i64,
        node_count: usize,
        edge_count: usize,
    },
}

impl GraphEntry {
    pub fn path(&self) -> &str {
        match self {
            GraphEntry::Bare { path }
            | GraphEntry::Failed { path, .. }
            | GraphEntry::Summary { path, .. } => path,
        }
    }
}

/// Inline listing error: located schema issues, or a plain message for
/// parse/IO failures.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EntryError {
    Issues(Vec<ValidationIssue>),
    Message(String),
}

/// Result of writing a graph document.
#[derive(Debug)]
pub enum WriteOutcome {
    Written { path: String },
    Invalid { issues: Vec<ValidationIssue> },
}

/// Result of writing a project. Referential gaps (a manifest entry with no
/// payload in the document) are warnings, not failures.
#[derive(Debug)]
pub enum ProjectWriteOutcome {
    Written { path: String, warnings: Vec<String> },
    Invalid { issues: Vec<ValidationIssue> },
}

/// Result of a standalone validation.
#[derive(Debug)]
pub struct Validation {
    pub issues: Vec<ValidationIssue>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// An addressable resource, as advertised by a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Resolved resource contents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}
