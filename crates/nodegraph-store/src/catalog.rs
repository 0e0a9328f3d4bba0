//! Memoized node-definition catalog.
//!
//! Loads a JSON array of node-type definitions once and serves filtered
//! slices of it. The cache slot is keyed by the resolved source path and
//! replaced wholesale; a changed path invalidates it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use nodegraph_core::{Error, Result};

/// Environment override for the node-definition source file.
pub const NODE_DEFS_ENV: &str = "NODEGRAPH_NODE_DEFS_PATH";

/// Fields projected into query results.
const PROJECTED_FIELDS: [&str; 7] = [
    "id",
    "displayName",
    "displayNameEN",
    "officialID",
    "category",
    "kind",
    "ports",
];

/// Filter and pagination for catalog queries.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// Case-insensitive substring over id and display names.
    pub query: Option<String>,
    /// Exact (case-insensitive) kind match.
    pub kind: Option<String>,
    /// Case-insensitive category substring.
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// A filtered page of node definitions.
#[derive(Debug, Serialize)]
pub struct NodeQueryResult {
    pub total: usize,
    pub count: usize,
    pub nodes: Vec<Value>,
}

struct CacheSlot {
    path: PathBuf,
    nodes: Arc<Vec<Value>>,
}

/// Memoized catalog of node-type definitions.
pub struct NodeCatalog {
    default_path: PathBuf,
    cache: RwLock<Option<CacheSlot>>,
}

impl NodeCatalog {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Load the definitions, reusing the cached array when the resolved
    /// source path is unchanged.
    pub async fn load(&self) -> Result<Arc<Vec<Value>>> {
        let path = self.resolve_path();
        self.load_from(&path).await
    }

    /// Filter the catalog and slice a page out of the matches.
    pub async fn query(&self, filter: &NodeFilter) -> Result<NodeQueryResult> {
        let nodes = self.load().await?;
        Ok(apply_filter(&nodes, filter))
    }

    /// Resolve the source path, honoring the environment override on every
    /// call so a changed override takes effect without a restart.
    fn resolve_path(&self) -> PathBuf {
        std::env::var_os(NODE_DEFS_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_path.clone())
    }

    async fn load_from(&self, path: &Path) -> Result<Arc<Vec<Value>>> {
        if let Some(slot) = self.cache.read().as_ref() {
            if slot.path == path {
                return Ok(Arc::clone(&slot.nodes));
            }
        }

        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.display().to_string())
            } else {
                Error::Io(err)
            }
        })?;
        let parsed: Value = serde_json::from_str(&raw)?;
        let Value::Array(nodes) = parsed else {
            return Err(Error::MalformedCatalog(path.display().to_string()));
        };

        let nodes = Arc::new(nodes);
        info!(
            "Loaded {} node definitions from {}",
            nodes.len(),
            path.display()
        );
        *self.cache.write() = Some(CacheSlot {
            path: path.to_path_buf(),
            nodes: Arc::clone(&nodes),
        });
        Ok(nodes)
    }
}

fn apply_filter(nodes: &[Value], filter: &NodeFilter) -> NodeQueryResult {
    let query = normalized(&filter.query);
    let kind = normalized(&filter.kind);
    let category = normalized(&filter.category);

    let matched: Vec<&Value> = nodes
        .iter()
        .filter(|node| {
            if let Some(kind) = &kind {
                if str_field(node, "kind").to_lowercase() != *kind {
                    return false;
                }
            }
            if let Some(category) = &category {
                if !str_field(node, "category").to_lowercase().contains(category.as_str()) {
                    return false;
                }
            }
            let Some(query) = &query else {
                return true;
            };
            let haystack = format!(
                "{} {} {}",
                str_field(node, "id"),
                str_field(node, "displayNameEN"),
                str_field(node, "displayName"),
            )
            .to_lowercase();
            haystack.contains(query.as_str())
        })
        .collect();

    let total = matched.len();
    let offset = filter.offset.unwrap_or(0);
    let limit = filter.limit.unwrap_or(total).max(1);
    let nodes: Vec<Value> = matched.into_iter().skip(offset).take(limit).map(project).collect();

    NodeQueryResult {
        total,
        count: nodes.len(),
        nodes,
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn str_field<'a>(node: &'a Value, key: &str) -> &'a str {
    node.get(key).and_then(Value::as_str).unwrap_or("")
}

fn project(node: &Value) -> Value {
    let mut out = Map::new();
    for key in PROJECTED_FIELDS {
        if let Some(value) = node.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_nodes() -> Vec<Value> {
        vec![
            json!({
                "id": "math/add",
                "displayName": "加算",
                "displayNameEN": "Add",
                "officialID": 101,
                "category": "math",
                "kind": "operator",
                "ports": {"in": 2, "out": 1},
                "internal": "dropped-by-projection",
            }),
            json!({
                "id": "math/multiply",
                "displayNameEN": "Multiply",
                "category": "math",
                "kind": "operator",
            }),
            json!({
                "id": "flow/branch",
                "displayNameEN": "Branch",
                "category": "control-flow",
                "kind": "flow",
            }),
        ]
    }

    #[test]
    fn test_query_filters_by_substring() {
        let result = apply_filter(
            &sample_nodes(),
            &NodeFilter {
                query: Some("multi".to_string()),
                ..NodeFilter::default()
            },
        );
        assert_eq!(result.total, 1);
        assert_eq!(result.nodes[0]["id"], json!("math/multiply"));
    }

    #[test]
    fn test_kind_is_exact_and_category_is_substring() {
        let by_kind = apply_filter(
            &sample_nodes(),
            &NodeFilter {
                kind: Some("FLOW".to_string()),
                ..NodeFilter::default()
            },
        );
        assert_eq!(by_kind.total, 1);
        assert_eq!(by_kind.nodes[0]["id"], json!("flow/branch"));

        let by_category = apply_filter(
            &sample_nodes(),
            &NodeFilter {
                category: Some("flow".to_string()),
                ..NodeFilter::default()
            },
        );
        assert_eq!(by_category.total, 1);
    }

    #[test]
    fn test_offset_and_limit_slice_after_filtering() {
        let result = apply_filter(
            &sample_nodes(),
            &NodeFilter {
                offset: Some(1),
                limit: Some(1),
                ..NodeFilter::default()
            },
        );
        assert_eq!(result.total, 3);
        assert_eq!(result.count, 1);
        assert_eq!(result.nodes[0]["id"], json!("math/multiply"));
    }

    #[test]
    fn test_projection_keeps_known_fields_only() {
        let result = apply_filter(&sample_nodes(), &NodeFilter::default());
        let first = &result.nodes[0];
        assert_eq!(first["ports"]["out"], json!(1));
        assert!(first.get("internal").is_none());
    }

    #[tokio::test]
    async fn test_cache_hit_on_same_path_and_reload_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("defs-a.json");
        let second = dir.path().join("defs-b.json");
        std::fs::write(&first, r#"[{"id": "a"}]"#).unwrap();
        std::fs::write(&second, r#"[{"id": "b"}, {"id": "c"}]"#).unwrap();

        let catalog = NodeCatalog::new(&first);
        assert_eq!(catalog.load_from(&first).await.unwrap().len(), 1);

        // Mutating the file does not bust the cache; the path is the key.
        std::fs::write(&first, r#"[{"id": "a"}, {"id": "x"}]"#).unwrap();
        assert_eq!(catalog.load_from(&first).await.unwrap().len(), 1);

        // A different resolved path replaces the slot wholesale.
        assert_eq!(catalog.load_from(&second).await.unwrap().len(), 2);
        assert_eq!(catalog.load_from(&second).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_array_source_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defs.json");
        std::fs::write(&path, r#"{"nodes": []}"#).unwrap();
        let err = NodeCatalog::new(&path).load_from(&path).await.unwrap_err();
        assert!(matches!(err, Error::MalformedCatalog(_)));
    }

    #[tokio::test]
    async fn test_missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = NodeCatalog::new(&path).load_from(&path).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
