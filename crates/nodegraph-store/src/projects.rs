//! Project store: compose a manifest-plus-files project into one in-memory
//! document and decompose it back to files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

use nodegraph_core::{Error, Result};
use nodegraph_schema::validate_project;

use crate::io;
use crate::sandbox::resolve_inside;
use crate::types::{ProjectWriteOutcome, Validation, WriteOptions};

/// Manifest file name inside every project directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Store of project directories under a projects root.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a project directory into one composed document.
    ///
    /// The manifest is read raw; every manifest-listed graph (and struct)
    /// path is resolved relative to the project directory, sandboxed, and
    /// read into the corresponding map. Entries with a missing or empty id
    /// or path are skipped. `structs` is omitted entirely when nothing
    /// resolves into it.
    pub async fn read(&self, path: &str) -> Result<(String, Value)> {
        let project_root = resolve_inside(&self.root, path)?;
        let manifest_path = resolve_inside(&project_root, MANIFEST_FILE)?;
        let manifest = match io::read_json(&manifest_path).await {
            Err(Error::NotFound(_)) => {
                return Err(Error::NotFound(format!("{path}/{MANIFEST_FILE}")))
            }
            other => other?,
        };

        let mut graphs = Map::new();
        for entry in manifest_entries(&manifest, "graphs", "graphId") {
            let graph_path = resolve_inside(&project_root, &entry.file)?;
            graphs.insert(entry.id, io::read_json(&graph_path).await?);
        }

        let mut structs = Map::new();
        for entry in manifest_entries(&manifest, "structures", "structId") {
            let struct_path = resolve_inside(&project_root, &entry.file)?;
            structs.insert(entry.id, io::read_json(&struct_path).await?);
        }

        let mut document = Map::new();
        document.insert("manifest".to_string(), manifest);
        document.insert("graphs".to_string(), Value::Object(graphs));
        if !structs.is_empty() {
            document.insert("structs".to_string(), Value::Object(structs));
        }

        Ok((
            io::relative_display(&self.root, &project_root),
            Value::Object(document),
        ))
    }

    /// Validate and write a project document to its directory layout.
    ///
    /// The whole candidate is validated first; on failure nothing is
    /// written. Every target path is resolved through the sandbox before
    /// the first write, so a path escape never leaves a partial project
    /// behind. Without `overwrite`, `manifest.json` is created exclusively
    /// so an existing project fails with `AlreadyExists` (a bare directory
    /// without a manifest does not count). Manifest entries with no payload
    /// in the document are recorded as warnings and the write proceeds for
    /// the rest.
    pub async fn write(
        &self,
        path: &str,
        candidate: &Value,
        opts: &WriteOptions,
    ) -> Result<ProjectWriteOutcome> {
        let project_root = resolve_inside(&self.root, path)?;
        let doc = match validate_project(candidate) {
            Ok(doc) => doc,
            Err(issues) => return Ok(ProjectWriteOutcome::Invalid { issues }),
        };

        let manifest_path = resolve_inside(&project_root, MANIFEST_FILE)?;
        let mut warnings = Vec::new();
        let mut graph_files = Vec::new();
        let mut struct_files = Vec::new();

        for entry in &doc.manifest.graphs {
            let Some(graph) = doc.graphs.get(&entry.graph_id) else {
                warnings.push(format!("Missing graph data for graphId: {}", entry.graph_id));
                continue;
            };
            graph_files.push((resolve_inside(&project_root, &entry.path)?, graph));
        }

        if let (Some(structures), Some(structs)) = (&doc.manifest.structures, &doc.structs) {
            for entry in structures {
                let id = entry
                    .get("structId")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                let file = entry
                    .get("path")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                let (Some(id), Some(file)) = (id, file) else {
                    continue;
                };
                let payload = match structs.get(id) {
                    Some(payload) if !payload.is_null() => payload,
                    _ => {
                        warnings.push(format!("Missing struct data for structId: {id}"));
                        continue;
                    }
                };
                struct_files.push((resolve_inside(&project_root, file)?, payload));
            }
        }

        if opts.overwrite {
            io::write_json(&manifest_path, &doc.manifest, opts.pretty).await?;
        } else {
            match io::write_json_new(&manifest_path, &doc.manifest, opts.pretty).await {
                Err(Error::Io(err)) if err.kind() == ErrorKind::AlreadyExists => {
                    return Err(Error::AlreadyExists(path.to_string()));
                }
                other => other?,
            }
        }
        for (target, graph) in &graph_files {
            io::write_json(target, graph, opts.pretty).await?;
        }
        for (target, payload) in &struct_files {
            io::write_json(target, payload, opts.pretty).await?;
        }

        if !warnings.is_empty() {
            warn!("Project {} written with {} warning(s)", path, warnings.len());
        }

        Ok(ProjectWriteOutcome::Written {
            path: io::relative_display(&self.root, &project_root),
            warnings,
        })
    }

    /// Validate a project from its directory (composed form) or an inline
    /// payload. Exactly one of the two must be supplied.
    pub async fn validate(&self, path: Option<&str>, inline: Option<&Value>) -> Result<Validation> {
        let candidate = match (path, inline) {
            (Some(path), None) => self.read(path).await?.1,
            (None, Some(inline)) => inline.clone(),
            _ => {
                return Err(Error::Usage(
                    "validate requires exactly one of path or document".to_string(),
                ))
            }
        };
        Ok(match validate_project(&candidate) {
            Ok(_) => Validation { issues: Vec::new() },
            Err(issues) => Validation { issues },
        })
    }
}

struct FileEntry {
    id: String,
    file: String,
}

/// Manifest entries that name both an id and a relative file path; anything
/// else is skipped.
fn manifest_entries(manifest: &Value, key: &str, id_key: &str) -> Vec<FileEntry> {
    let Some(entries) = manifest.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get(id_key)?.as_str()?;
            let file = entry.get("path")?.as_str()?;
            if id.is_empty() || file.is_empty() {
                return None;
            }
            Some(FileEntry {
                id: id.to_string(),
                file: file.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(dir: &tempfile::TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("projects"))
    }

    fn graph(name: &str) -> Value {
        json!({"schemaVersion": 1, "name": name, "nodes": [], "edges": []})
    }

    fn project_document() -> Value {
        json!({
            "manifest": {
                "project": {"id": "p1", "name": "Demo"},
                "graphs": [
                    {"graphId": "a", "name": "A", "path": "a.json"},
                    {"graphId": "b", "name": "B", "path": "flows/b.json"},
                ],
            },
            "graphs": {
                "a": graph("A"),
                "b": graph("B"),
            },
        })
    }

    #[tokio::test]
    async fn test_write_then_read_composes_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let outcome = store
            .write("demo", &project_document(), &WriteOptions::default())
            .await
            .unwrap();
        match outcome {
            ProjectWriteOutcome::Written { path, warnings } => {
                assert_eq!(path, "demo");
                assert!(warnings.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let (path, document) = store.read("demo").await.unwrap();
        assert_eq!(path, "demo");
        assert_eq!(document["manifest"]["project"]["id"], json!("p1"));
        assert_eq!(document["graphs"]["a"]["name"], json!("A"));
        assert_eq!(document["graphs"]["b"]["name"], json!("B"));
        // No structures declared: the map is omitted, not empty.
        assert!(document.get("structs").is_none());
    }

    #[tokio::test]
    async fn test_missing_graph_payload_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut candidate = project_document();
        candidate["graphs"].as_object_mut().unwrap().remove("b");

        let outcome = store
            .write("demo", &candidate, &WriteOptions::default())
            .await
            .unwrap();
        match outcome {
            ProjectWriteOutcome::Written { warnings, .. } => {
                assert_eq!(warnings, vec!["Missing graph data for graphId: b".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.path().join("projects/demo/a.json").exists());
        assert!(!dir.path().join("projects/demo/flows/b.json").exists());
        assert!(dir.path().join("projects/demo/manifest.json").exists());
    }

    #[tokio::test]
    async fn test_invalid_project_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let outcome = store
            .write("demo", &json!({"graphs": {}}), &WriteOptions::default())
            .await
            .unwrap();
        match outcome {
            ProjectWriteOutcome::Invalid { issues } => {
                assert_eq!(issues[0].path, "manifest");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!dir.path().join("projects/demo").exists());
    }

    #[tokio::test]
    async fn test_existing_manifest_blocks_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store
            .write("demo", &project_document(), &WriteOptions::default())
            .await
            .unwrap();
        let err = store
            .write("demo", &project_document(), &WriteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        // With overwrite the same write goes through.
        store
            .write(
                "demo",
                &project_document(),
                &WriteOptions {
                    overwrite: true,
                    ..WriteOptions::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bare_directory_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(dir.path().join("projects/demo")).unwrap();
        let outcome = store
            .write("demo", &project_document(), &WriteOptions::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ProjectWriteOutcome::Written { .. }));
    }

    #[tokio::test]
    async fn test_structs_round_trip_and_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut candidate = project_document();
        candidate["manifest"]["structures"] = json!([
            {"structId": "s1", "path": "structs/s1.json"},
            {"structId": "s2", "path": "structs/s2.json"},
        ]);
        candidate["structs"] = json!({"s1": {"fields": ["hp", "mp"]}});

        let outcome = store
            .write("demo", &candidate, &WriteOptions::default())
            .await
            .unwrap();
        match outcome {
            ProjectWriteOutcome::Written { warnings, .. } => {
                assert_eq!(warnings, vec!["Missing struct data for structId: s2".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let (_, document) = store.read("demo").await.unwrap();
        assert_eq!(document["structs"]["s1"]["fields"], json!(["hp", "mp"]));
        assert!(document["structs"].get("s2").is_none());
    }

    #[tokio::test]
    async fn test_escaping_manifest_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut candidate = project_document();
        candidate["manifest"]["graphs"] = json!([
            {"graphId": "a", "name": "A", "path": "../../evil.json"},
        ]);
        let err = store
            .write("demo", &candidate, &WriteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PathEscape(_)));
        // All target paths are resolved before the first write.
        assert!(!dir.path().join("projects/demo/manifest.json").exists());
        assert!(!dir.path().join("evil.json").exists());
    }

    #[tokio::test]
    async fn test_read_missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(&dir).read("ghost").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_validate_requires_exactly_one_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(matches!(
            store.validate(None, None).await.unwrap_err(),
            Error::Usage(_)
        ));
        let inline = project_document();
        assert!(matches!(
            store
                .validate(Some("demo"), Some(&inline))
                .await
                .unwrap_err(),
            Error::Usage(_)
        ));
        let validation = store.validate(None, Some(&inline)).await.unwrap();
        assert!(validation.is_valid());
    }
}
