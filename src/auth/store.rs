//! Process-wide table of issued tokens.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::token::{Claims, IssuedToken, TokenCodec, TokenError};

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("token store is full ({capacity} subjects)")]
    Full { capacity: usize },
}

/// Bounded subject → token table, shared by every connection.
///
/// Insert and lookup are linear scans under an `RwLock`. There is one entry
/// per subject; logging in again replaces it. Nothing is ever evicted, so a
/// full table rejects new subjects.
#[derive(Clone)]
pub struct TokenStore {
    codec: Arc<TokenCodec>,
    entries: Arc<RwLock<Vec<IssuedToken>>>,
    capacity: usize,
}

impl TokenStore {
    pub fn new(signing_key: &[u8], capacity: usize) -> Self {
        Self {
            codec: Arc::new(TokenCodec::new(signing_key)),
            entries: Arc::new(RwLock::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn issue(&self, subject: &str, issued_at: i64, expires_at: i64) -> Result<IssuedToken, TokenError> {
        self.codec.issue(subject, issued_at, expires_at)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.codec.verify(token)
    }

    /// Stores `token` under its subject, replacing any earlier one.
    pub async fn save(&self, token: IssuedToken) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        if let Some(slot) = entries.iter_mut().find(|e| e.subject == token.subject) {
            *slot = token;
            return Ok(());
        }

        if entries.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, subject = %token.subject, "token store full");
            return Err(StoreError::Full {
                capacity: self.capacity,
            });
        }

        entries.push(token);
        Ok(())
    }

    pub async fn get(&self, subject: &str) -> Option<IssuedToken> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.subject == subject)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
