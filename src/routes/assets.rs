//! Static files under the server root.

use std::io;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::mime::guess_mime_type;
use crate::http::response::StatusCode;
use crate::http::transaction::Transaction;
use crate::routes::guard::Resolved;

/// Served in place of missing paths when HTML5 fallback is on.
pub const FALLBACK_DOCUMENT: &str = "index.html";

/// Sends the file a resolved target points at.
///
/// With `fallback` set, a missing target or a directory is answered with
/// the root's `index.html`.
pub async fn serve<S>(ta: &mut Transaction<'_, S>, resolved: Resolved, fallback: bool) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut path: PathBuf = match resolved {
        Resolved::Inside(path) => path,
        Resolved::Missing if fallback => ta.ctx.root.join(FALLBACK_DOCUMENT),
        Resolved::Missing | Resolved::Escapes => return ta.send_not_found().await,
    };

    if fallback && tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
        path = ta.ctx.root.join(FALLBACK_DOCUMENT);
    }

    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            return match open_failure_status(e.kind()) {
                StatusCode::PermissionDenied => {
                    ta.send_error(StatusCode::PermissionDenied, "Permission denied.")
                        .await
                }
                _ => ta.send_not_found().await,
            };
        }
    };

    let meta = match file.metadata().await {
        Ok(meta) => meta,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "stat failed");
            return ta
                .send_error(StatusCode::InternalServerError, "Could not stat file.")
                .await;
        }
    };

    if meta.is_dir() {
        return ta.send_not_found().await;
    }

    ta.send_file(&mut file, meta.len(), guess_mime_type(&path)).await
}

/// Status for a target that resolved but could not be opened.
fn open_failure_status(kind: io::ErrorKind) -> StatusCode {
    match kind {
        io::ErrorKind::PermissionDenied => StatusCode::PermissionDenied,
        _ => StatusCode::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failures_map_to_status() {
        assert_eq!(
            open_failure_status(io::ErrorKind::PermissionDenied),
            StatusCode::PermissionDenied
        );
        assert_eq!(open_failure_status(io::ErrorKind::NotFound), StatusCode::NotFound);
        assert_eq!(open_failure_status(io::ErrorKind::Other), StatusCode::NotFound);
    }
}
