//! Keeps request targets inside the server root.
//!
//! A target is first rejected on sight if it contains `..`. Otherwise it is
//! joined onto the root and canonicalized, which resolves symlinks, and the
//! result must still lie under the root. The canonical path is what gets
//! served, so the path that is checked is the path that is opened.

use std::io;
use std::path::{Path, PathBuf};

/// Outcome of resolving a request target against the root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// An existing path inside the root.
    Inside(PathBuf),
    /// Nothing exists at the target.
    Missing,
    /// The target exists but resolves outside the root.
    Escapes,
}

/// Whether the target contains a parent-directory sequence.
pub fn is_traversal(target: &str) -> bool {
    target.contains("..")
}

/// Resolves `target` under `root`, which must already be canonical.
pub async fn resolve(root: &Path, target: &str) -> Resolved {
    let candidate = root.join(target.trim_start_matches('/'));

    match tokio::fs::canonicalize(&candidate).await {
        Ok(real) if real.starts_with(root) => Resolved::Inside(real),
        Ok(real) => {
            tracing::warn!(path = %target, resolved = %real.display(), "request target escapes server root");
            Resolved::Escapes
        }
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %target, error = %e, "cannot resolve request target");
            }
            Resolved::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotdot_anywhere_is_traversal() {
        assert!(is_traversal("/../../etc/passwd"));
        assert!(is_traversal("/private/..%2f/x/.."));
        assert!(!is_traversal("/private/a.b/c.html"));
    }
}
