//! Shared application state.

use nodegraph_core::NodeGraphConfig;
use nodegraph_store::{GraphStore, NodeCatalog, ProjectStore};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: NodeGraphConfig,
    pub graphs: GraphStore,
    pub projects: ProjectStore,
    pub catalog: NodeCatalog,
}

impl AppState {
    pub fn new(config: NodeGraphConfig) -> Self {
        let graphs = GraphStore::new(config.roots.graphs.clone());
        let projects = ProjectStore::new(config.roots.projects.clone());
        let catalog = NodeCatalog::new(config.node_defs_path.clone());
        Self {
            config,
            graphs,
            projects,
            catalog,
        }
    }
}
