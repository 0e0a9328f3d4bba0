//! Resource addressing: the `nodegraph:` URI scheme over docs and data.

use std::path::Path;

use nodegraph_core::config::SAMPLE_NODE_DEFS_FILE;
use nodegraph_core::{Error, Result};

use crate::catalog::NodeCatalog;
use crate::io;
use crate::sandbox::resolve_inside;
use crate::types::{ResourceContent, ResourceDescriptor};

/// URI scheme tag for store resources.
pub const RESOURCE_SCHEME: &str = "nodegraph";

/// A parsed resource reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// A markdown file relative to the docs root.
    Doc(String),
    /// The live node-definition catalog.
    NodeDefinitions,
    /// The bundled sample definition file.
    NodeDefinitionsSample,
}

/// Parse a resource URI. `nodegraph://docs/x` and `nodegraph:/docs/x`
/// address the same resource; anything unrecognized is
/// [`Error::UnknownResource`].
pub fn parse_resource_uri(uri: &str) -> Result<ResourceRef> {
    let rest = uri
        .strip_prefix("nodegraph:")
        .ok_or_else(|| Error::UnknownResource(uri.to_string()))?;
    let mut segments = rest.trim_start_matches('/').split('/');
    match segments.next() {
        Some("docs") => {
            let relative = segments.collect::<Vec<_>>().join("/");
            if relative.is_empty() {
                return Err(Error::UnknownResource(uri.to_string()));
            }
            Ok(ResourceRef::Doc(relative))
        }
        Some("data") => match segments.next() {
            Some("node-definitions") => Ok(ResourceRef::NodeDefinitions),
            Some("node-definitions-sample") => Ok(ResourceRef::NodeDefinitionsSample),
            _ => Err(Error::UnknownResource(uri.to_string())),
        },
        _ => Err(Error::UnknownResource(uri.to_string())),
    }
}

/// List all addressable resources: every markdown doc under the docs root
/// plus the two fixed data resources.
pub async fn list_resources(docs_dir: &Path) -> Result<Vec<ResourceDescriptor>> {
    let files = io::collect_files(docs_dir, true, "md").await?;
    let mut resources: Vec<ResourceDescriptor> = files
        .iter()
        .map(|file| {
            let relative = io::relative_display(docs_dir, file);
            ResourceDescriptor {
                uri: format!("{RESOURCE_SCHEME}://docs/{relative}"),
                name: format!("docs/{relative}"),
                description: format!("Documentation: {relative}"),
                mime_type: "text/markdown".to_string(),
            }
        })
        .collect();

    resources.push(ResourceDescriptor {
        uri: format!("{RESOURCE_SCHEME}://data/node-definitions"),
        name: "data/node-definitions".to_string(),
        description: "Node definitions loaded from the configured source.".to_string(),
        mime_type: "application/json".to_string(),
    });
    resources.push(ResourceDescriptor {
        uri: format!("{RESOURCE_SCHEME}://data/node-definitions-sample"),
        name: "data/node-definitions-sample".to_string(),
        description: "Bundled sample node definitions.".to_string(),
        mime_type: "application/json".to_string(),
    });
    Ok(resources)
}

/// Resolve a resource URI to its contents.
pub async fn read_resource(
    docs_dir: &Path,
    data_dir: &Path,
    catalog: &NodeCatalog,
    uri: &str,
) -> Result<ResourceContent> {
    match parse_resource_uri(uri)? {
        ResourceRef::Doc(relative) => {
            let path = resolve_inside(docs_dir, &relative)?;
            Ok(ResourceContent {
                uri: uri.to_string(),
                mime_type: "text/markdown".to_string(),
                text: read_text(&path).await?,
            })
        }
        ResourceRef::NodeDefinitions => {
            let nodes = catalog.load().await?;
            Ok(ResourceContent {
                uri: uri.to_string(),
                mime_type: "application/json".to_string(),
                text: serde_json::to_string_pretty(&*nodes)?,
            })
        }
        ResourceRef::NodeDefinitionsSample => {
            let path = resolve_inside(data_dir, SAMPLE_NODE_DEFS_FILE)?;
            Ok(ResourceContent {
                uri: uri.to_string(),
                mime_type: "application/json".to_string(),
                text: read_text(&path).await?,
            })
        }
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io(err)
        }
    })
}
