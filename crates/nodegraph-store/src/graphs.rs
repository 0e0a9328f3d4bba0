//! Graph document store: list, read, write, validate.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use nodegraph_core::{Error, Result};
use nodegraph_schema::validate_graph;

use crate::io;
use crate::sandbox::resolve_inside;
use crate::types::{
    EntryError, GraphEntry, GraphListing, ListOptions, Validation, WriteOptions, WriteOutcome,
};

/// File extension recognized as a graph document.
const GRAPH_EXTENSION: &str = "json";

/// Store of individual graph documents under a graphs root.
#[derive(Debug, Clone)]
pub struct GraphStore {
    root: PathBuf,
}

impl GraphStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate graph files under the root (or a sandboxed subdirectory).
    ///
    /// A missing directory yields an empty listing. With details on, each
    /// file is parsed and validated; a failure becomes an inline error
    /// entry instead of aborting the listing. An environment filter forces
    /// details and silently omits non-matching documents.
    pub async fn list(&self, opts: &ListOptions) -> Result<GraphListing> {
        let base = match &opts.dir {
            Some(dir) => resolve_inside(&self.root, dir)?,
            None => self.root.clone(),
        };
        let include_details = opts.include_details || opts.environment.is_some();
        let files = io::collect_files(&base, opts.recursive, GRAPH_EXTENSION).await?;

        let mut entries = Vec::new();
        for file in files {
            let path = io::relative_display(&self.root, &file);
            if !include_details {
                entries.push(GraphEntry::Bare { path });
                continue;
            }
            let raw = match io::read_json(&file).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("Unreadable graph {}: {}", path, err);
                    entries.push(GraphEntry::Failed {
                        path,
                        error: EntryError::Message(err.to_string()),
                    });
                    continue;
                }
            };
            let doc = match validate_graph(&raw) {
                Ok(doc) => doc,
                Err(issues) => {
                    entries.push(GraphEntry::Failed {
                        path,
                        error: EntryError::Issues(issues),
                    });
                    continue;
                }
            };
            if let Some(filter) = opts.environment {
                if doc.environment != Some(filter) {
                    continue;
                }
            }
            entries.push(GraphEntry::Summary {
                path,
                name: doc.name,
                environment: doc.environment,
                schema_version: doc.schema_version,
                node_count: doc.nodes.len(),
                edge_count: doc.edges.len(),
            });
        }

        Ok(GraphListing {
            base_dir: self.root.display().to_string(),
            count: entries.len(),
            graphs: entries,
        })
    }

    /// Read a graph file without validating it. Reading is permissive;
    /// callers combine with [`GraphStore::validate`] when they need the
    /// schema check.
    pub async fn read(&self, path: &str) -> Result<(String, Value)> {
        let resolved = resolve_inside(&self.root, path)?;
        let raw = match io::read_json(&resolved).await {
            Err(Error::NotFound(_)) => return Err(Error::NotFound(path.to_string())),
            other => other?,
        };
        Ok((io::relative_display(&self.root, &resolved), raw))
    }

    /// Validate and write a graph document.
    ///
    /// On validation failure nothing is written and the issues are
    /// returned. Without `overwrite`, the write is an exclusive create so
    /// an existing file fails with `AlreadyExists` and is left untouched.
    /// The persisted form is the normalized document.
    pub async fn write(
        &self,
        path: &str,
        candidate: &Value,
        opts: &WriteOptions,
    ) -> Result<WriteOutcome> {
        let resolved = resolve_inside(&self.root, path)?;
        let doc = match validate_graph(candidate) {
            Ok(doc) => doc,
            Err(issues) => return Ok(WriteOutcome::Invalid { issues }),
        };
        if opts.overwrite {
            io::write_json(&resolved, &doc, opts.pretty).await?;
        } else {
            match io::write_json_new(&resolved, &doc, opts.pretty).await {
                Err(Error::Io(err)) if err.kind() == ErrorKind::AlreadyExists => {
                    return Err(Error::AlreadyExists(path.to_string()));
                }
                other => other?,
            }
        }
        Ok(WriteOutcome::Written {
            path: io::relative_display(&self.root, &resolved),
        })
    }

    /// Validate a document from a file path or an inline payload. Exactly
    /// one of the two must be supplied.
    pub async fn validate(&self, path: Option<&str>, inline: Option<&Value>) -> Result<Validation> {
        let candidate = match (path, inline) {
            (Some(path), None) => self.read(path).await?.1,
            (None, Some(inline)) => inline.clone(),
            _ => {
                return Err(Error::Usage(
                    "validate requires exactly one of path or graph".to_string(),
                ))
            }
        };
        Ok(match validate_graph(&candidate) {
            Ok(_) => Validation { issues: Vec::new() },
            Err(issues) => Validation { issues },
        })
    }
}
