//! Path containment for store roots.
//!
//! Every path argument a store operation receives passes through
//! [`resolve_inside`] before any filesystem access; no other concatenation
//! of caller-supplied paths is permitted.

use std::path::{Component, Path, PathBuf};

use nodegraph_core::{Error, Result};

/// Resolve `candidate` against `base_dir` and reject it if the normalized
/// result lands outside `base_dir`.
///
/// Resolution is purely lexical: the target does not have to exist, no
/// filesystem access happens, and symlinks are not followed. Containment
/// means the result equals the base or begins with the base followed by the
/// path separator.
pub fn resolve_inside(base_dir: &Path, candidate: impl AsRef<Path>) -> Result<PathBuf> {
    let candidate = candidate.as_ref();
    let base = normalize(base_dir);
    let resolved = normalize(&base.join(candidate));
    if !is_inside(&base, &resolved) {
        return Err(Error::PathEscape(candidate.display().to_string()));
    }
    Ok(resolved)
}

/// Lexical normalization: `.` segments dropped, `..` pops (never above the
/// filesystem root).
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(windows)]
fn is_inside(base: &Path, target: &Path) -> bool {
    // NTFS and friends are case-folding; compare folded strings.
    let base = base.to_string_lossy().to_lowercase();
    let target = target.to_string_lossy().to_lowercase();
    target == base
        || target.starts_with(&format!("{base}{sep}", sep = std::path::MAIN_SEPARATOR))
}

#[cfg(not(windows))]
fn is_inside(base: &Path, target: &Path) -> bool {
    target.starts_with(base)
}
