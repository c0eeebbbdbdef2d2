//! Request dispatch.
//!
//! ```text
//!  method unknown ─────────────────────────────▶ 501
//!  /api/login ─────────────────────────────────▶ login
//!  contains ".." ──────────────────────────────▶ 404
//!  resolve ── missing / outside root ──────────▶ 404
//!     │
//!     ├─ /private… ── gate ── rejected ────────▶ 403 / 404
//!     │                  └── allowed ──┐
//!     └────────────────────────────────┴──────▶ static file
//! ```
//!
//! Containment is checked before the private gate, so every path that is
//! missing or escapes the root is a 404 whoever asks for it.

pub mod assets;
pub mod guard;
pub mod login;
pub mod private;

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::http::transaction::Transaction;
use crate::routes::guard::Resolved;

pub async fn dispatch<S>(ta: &mut Transaction<'_, S>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if ta.request.method == Method::Unknown {
        return ta
            .send_error(StatusCode::NotImplemented, "not implemented http method")
            .await;
    }

    let target = ta.target().to_string();

    if login::is_login_path(&target) {
        return login::handle(ta).await;
    }

    if guard::is_traversal(&target) {
        tracing::warn!(path = %target, "rejected traversal attempt");
        return ta.send_not_found().await;
    }

    let private = private::is_private_path(&target);
    let fallback = ta.ctx.html5_fallback && !private;

    let resolved = guard::resolve(&ta.ctx.root, &target).await;
    match resolved {
        Resolved::Escapes => return ta.send_not_found().await,
        Resolved::Missing if !fallback => return ta.send_not_found().await,
        _ => {}
    }

    if private {
        match private::authorize(ta) {
            Ok(subject) => ta.subject = subject,
            Err(rejection) => {
                tracing::debug!(path = %target, ?rejection, "private request rejected");
                return match rejection {
                    private::Rejection::BadUser => ta.send_not_found().await,
                    _ => ta.send_error(rejection.status(), rejection.message()).await,
                };
            }
        }
    }

    assets::serve(ta, resolved, fallback).await
}
