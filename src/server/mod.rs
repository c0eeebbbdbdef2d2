//! Accepting clients and the state they share.

pub mod listener;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::auth::{Credentials, TokenStore};
use crate::config::Config;

/// Everything a connection needs besides its own socket. Built once at
/// startup and shared behind an `Arc`.
pub struct ServerContext {
    /// Canonical server root.
    pub root: PathBuf,
    pub tokens: TokenStore,
    pub credentials: Credentials,
    pub token_lifetime_secs: i64,
    pub max_body_bytes: usize,
    pub read_timeout: Option<Duration>,
    pub html5_fallback: bool,
}

impl ServerContext {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(&cfg.server.root)
            .with_context(|| format!("server root {} is not usable", cfg.server.root.display()))?;
        anyhow::ensure!(root.is_dir(), "server root {} is not a directory", root.display());

        Ok(Self {
            root,
            tokens: TokenStore::new(cfg.auth.signing_key.as_bytes(), cfg.auth.store_capacity),
            credentials: cfg.auth.credentials(),
            token_lifetime_secs: cfg.auth.token_lifetime_secs,
            max_body_bytes: cfg.server.max_body_bytes,
            read_timeout: cfg.server.read_timeout(),
            html5_fallback: cfg.server.html5_fallback,
        })
    }
}
