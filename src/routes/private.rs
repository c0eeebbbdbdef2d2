//! Gate in front of everything under `/private`.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::auth::cookie::{self, AUTH_COOKIE};
use crate::auth::token::unix_now;
use crate::http::request::{HeaderName, Method};
use crate::http::response::StatusCode;
use crate::http::transaction::Transaction;

pub const PRIVATE_PREFIX: &str = "/private";

pub fn is_private_path(target: &str) -> bool {
    target
        .get(..PRIVATE_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(PRIVATE_PREFIX))
}

/// Why a request was turned away at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// GET without a `Cookie` header.
    NoCookie,
    /// The cookie has no session token, or it does not verify.
    BadToken,
    /// The token verifies but `exp` has passed.
    Expired,
    /// Non-GET request whose body credentials do not match.
    BadUser,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::BadUser => StatusCode::NotFound,
            _ => StatusCode::PermissionDenied,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NoCookie => "cookie does not exist",
            Rejection::BadToken => "cookie is invalid",
            Rejection::Expired => "cookie is expired",
            Rejection::BadUser => "user is invalid",
        }
    }
}

/// Decides whether the request may see private content.
///
/// GET requests must present a session cookie; anything else must carry
/// valid credentials in the body. On success returns the subject, when
/// there is one.
pub fn authorize<S>(ta: &Transaction<'_, S>) -> Result<Option<String>, Rejection>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if ta.request.method != Method::GET {
        return if ta.ctx.credentials.matches(ta.body()) {
            Ok(None)
        } else {
            Err(Rejection::BadUser)
        };
    }

    let header = ta
        .request
        .header(HeaderName::Cookie)
        .ok_or(Rejection::NoCookie)?;
    let token = cookie::find(header, AUTH_COOKIE).ok_or(Rejection::BadToken)?;

    let claims = ta.ctx.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        Rejection::BadToken
    })?;

    if claims.is_expired(unix_now()) {
        return Err(Rejection::Expired);
    }

    Ok(Some(claims.sub))
}
