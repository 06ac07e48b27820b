//! Identity resolution
//!
//! Turns an opaque session token into the caller's user id. Tokens are
//! issued elsewhere; an unknown or expired token resolves to no one.

use crate::db::repositories::SessionRepository;
use crate::models::Caller;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves a session token to an optional user id
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<i64>>;

    /// Resolve to a [`Caller`], treating a missing token as anonymous.
    async fn caller(&self, token: Option<&str>) -> Result<Caller> {
        match token {
            Some(token) => Ok(Caller::from(self.resolve(token).await?)),
            None => Ok(Caller::anonymous()),
        }
    }
}

/// Resolver backed by the `sessions` table
pub struct SessionIdentityResolver {
    repo: Arc<dyn SessionRepository>,
}

impl SessionIdentityResolver {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Remove every expired session, returning how many were deleted
    pub async fn cleanup_expired(&self) -> Result<u64> {
        self.repo
            .delete_expired()
            .await
            .context("Failed to clean up expired sessions")
    }
}

#[async_trait]
impl IdentityResolver for SessionIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let session = match self.repo.get_by_id(token).await? {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }
}
