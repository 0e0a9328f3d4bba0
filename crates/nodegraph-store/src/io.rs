//! JSON file I/O shared by the stores.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use nodegraph_core::{Error, Result};

/// Read and parse a JSON file. A missing file is [`Error::NotFound`].
pub async fn read_json(path: &Path) -> Result<Value> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io(err)
        }
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub async fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, render(value, pretty)?).await?;
    Ok(())
}

/// Like [`write_json`] but with an exclusive create: the open itself fails
/// with `AlreadyExists` if the file is present, so there is no separate
/// existence check to race against.
pub async fn write_json_new<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let text = render(value, pretty)?;
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Collect files under `dir` with the given extension (case-insensitive),
/// optionally recursing. A missing directory yields an empty list. Results
/// are sorted for stable output.
pub async fn collect_files(dir: &Path, recursive: bool, extension: &str) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if file_type.is_file() && has_extension(&path, extension) {
                results.push(path);
            }
        }
    }
    results.sort();
    Ok(results)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Root-relative display form with forward slashes, for client-facing
/// paths.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
