//! NodeGraph — document store server for graph-based visual programs.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = nodegraph_core::NodeGraphConfig::from_env()?;
    info!("Workspace root: {}", config.roots.workspace.display());
    info!("Graphs root: {}", config.roots.graphs.display());
    info!("Projects root: {}", config.roots.projects.display());

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("NodeGraph server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
