//! Configuration and root-directory resolution.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bundled sample node definitions, relative to the data root.
pub const SAMPLE_NODE_DEFS_FILE: &str = "nodeDefinitions.sample.json";

/// Designated root directories for all store operations.
///
/// Every path a client supplies is resolved against one of these and must
/// stay inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRoots {
    /// Workspace root (e.g. `NODEGRAPH_WORKSPACE` or the current directory).
    pub workspace: PathBuf,
    /// Graph documents root (`<workspace>/graphs`).
    pub graphs: PathBuf,
    /// Project directories root (`<workspace>/projects`).
    pub projects: PathBuf,
    /// Markdown documentation root (`<workspace>/docs`).
    pub docs: PathBuf,
    /// Bundled data root (`<workspace>/data`).
    pub data: PathBuf,
}

impl StoreRoots {
    /// Derive all roots from a workspace directory.
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        let workspace = workspace.as_ref().to_path_buf();
        Self {
            graphs: workspace.join("graphs"),
            projects: workspace.join("projects"),
            docs: workspace.join("docs"),
            data: workspace.join("data"),
            workspace,
        }
    }
}

/// Top-level NodeGraph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraphConfig {
    /// HTTP server port.
    pub port: u16,
    /// Store root directories.
    pub roots: StoreRoots,
    /// Default node-definition source (`NODEGRAPH_NODE_DEFS_PATH` may
    /// override it again at load time).
    pub node_defs_path: PathBuf,
}

impl NodeGraphConfig {
    /// Create configuration from environment and defaults.
    ///
    /// `NODEGRAPH_WORKSPACE` selects the workspace root (default: current
    /// directory); `NODEGRAPH_GRAPHS_DIR` and `NODEGRAPH_PROJECTS_DIR`
    /// override the two writable roots individually.
    pub fn from_env() -> std::io::Result<Self> {
        let workspace = match env_path("NODEGRAPH_WORKSPACE") {
            Some(dir) => absolute(dir)?,
            None => std::env::current_dir()?,
        };

        let mut roots = StoreRoots::new(workspace);
        if let Some(dir) = env_path("NODEGRAPH_GRAPHS_DIR") {
            roots.graphs = absolute(dir)?;
        }
        if let Some(dir) = env_path("NODEGRAPH_PROJECTS_DIR") {
            roots.projects = absolute(dir)?;
        }

        let node_defs_path = match env_path("NODEGRAPH_NODE_DEFS_PATH") {
            Some(path) => absolute(path)?,
            None => roots.data.join(SAMPLE_NODE_DEFS_FILE),
        };

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        Ok(Self {
            port,
            roots,
            node_defs_path,
        })
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Make a path absolute against the current directory without touching the
/// filesystem (the target may not exist yet).
pub fn absolute(path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
