//! `/api/login`: POST to start a session, GET to inspect it.

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info};

use crate::auth::cookie::{self, AUTH_COOKIE};
use crate::auth::token::unix_now;
use crate::http::request::{HeaderName, Method};
use crate::http::response::StatusCode;
use crate::http::transaction::Transaction;

pub const LOGIN_PATH: &str = "/api/login";

pub fn is_login_path(target: &str) -> bool {
    target.eq_ignore_ascii_case(LOGIN_PATH)
}

pub async fn handle<S>(ta: &mut Transaction<'_, S>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match ta.request.method {
        Method::POST => login(ta).await,
        _ => session(ta).await,
    }
}

async fn login<S>(ta: &mut Transaction<'_, S>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if !ta.ctx.credentials.matches(ta.body()) {
        return ta.send_error(StatusCode::PermissionDenied, "login request invalid").await;
    }

    let subject = ta.ctx.credentials.username.clone();
    let lifetime = ta.ctx.token_lifetime_secs;
    let now = unix_now();
    let expires_at = now.saturating_add(lifetime);

    let issued = match ta.ctx.tokens.issue(&subject, now, expires_at) {
        Ok(issued) => issued,
        Err(e) => {
            error!(subject = %subject, error = %e, "failed to issue token");
            return ta
                .send_error(StatusCode::InternalServerError, "could not issue token")
                .await;
        }
    };

    if let Err(e) = ta.ctx.tokens.save(issued.clone()).await {
        return ta.send_error(StatusCode::ServiceUnavailable, e).await;
    }

    info!(subject = %subject, exp = expires_at, "session started");

    ta.response
        .add_header("Set-Cookie", cookie::session_cookie(&issued.token, lifetime));
    ta.response.json(&issued.claims);
    ta.send().await
}

/// Reports the claims of the caller's current session, or `{}`.
///
/// The caller is recognized by a valid, unexpired session cookie, or
/// failing that by credentials in the body. This never fails.
async fn session<S>(ta: &mut Transaction<'_, S>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let from_cookie = ta
        .request
        .header(HeaderName::Cookie)
        .and_then(|h| cookie::find(h, AUTH_COOKIE))
        .and_then(|token| ta.ctx.tokens.verify(token).ok())
        .filter(|claims| !claims.is_expired(unix_now()))
        .map(|claims| claims.sub);

    let subject = from_cookie.or_else(|| {
        ta.ctx
            .credentials
            .matches(ta.body())
            .then(|| ta.ctx.credentials.username.clone())
    });

    let claims = match &subject {
        Some(subject) => ta.ctx.tokens.get(subject).await.map(|t| t.claims),
        None => None,
    };

    ta.subject = subject;
    ta.response.json(claims.as_deref().unwrap_or("{}"));
    ta.send().await
}
