//! Session repository
//!
//! Sessions are issued by the authentication front end. Quill reads them to
//! resolve the caller and sweeps the expired ones.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Session;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a session
    async fn create(&self, session: &Session) -> Result<Session>;

    /// Get session by ID (token)
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// Delete a session
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete expired sessions, returning how many were removed
    async fn delete_expired(&self) -> Result<u64>;
}

/// SQLx-based session repository implementation
pub struct SqlxSessionRepository {
    pool: DynDatabasePool,
}

impl SqlxSessionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SessionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().context("Missing SQLite pool")?;
                create_session_sqlite(pool, session).await
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().context("Missing MySQL pool")?;
                create_session_mysql(pool, session).await
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().context("Missing SQLite pool")?;
                get_session_by_id_sqlite(pool, id).await
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().context("Missing MySQL pool")?;
                get_session_by_id_mysql(pool, id).await
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        execute_by_id(&self.pool, "DELETE FROM sessions WHERE id = ?", id)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let removed = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().context("Missing SQLite pool")?;
                sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
                    .bind(now)
                    .execute(pool)
                    .await
                    .context("Failed to delete expired sessions")?
                    .rows_affected()
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().context("Missing MySQL pool")?;
                sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
                    .bind(now)
                    .execute(pool)
                    .await
                    .context("Failed to delete expired sessions")?
                    .rows_affected()
            }
        };
        Ok(removed)
    }
}

async fn execute_by_id(pool: &DynDatabasePool, sql: &str, id: &str) -> Result<u64> {
    let affected = match pool.driver() {
        DatabaseDriver::Sqlite => {
            let pool = pool.as_sqlite().context("Missing SQLite pool")?;
            sqlx::query(sql).bind(id).execute(pool).await?.rows_affected()
        }
        DatabaseDriver::Mysql => {
            let pool = pool.as_mysql().context("Missing MySQL pool")?;
            sqlx::query(sql).bind(id).execute(pool).await?.rows_affected()
        }
    };
    Ok(affected)
}

const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (id, user_id, expires_at, created_at)
    VALUES (?, ?, ?, ?)
"#;

const SELECT_SESSION: &str = r#"
    SELECT id, user_id, expires_at, created_at
    FROM sessions
    WHERE id = ?
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_session_sqlite(pool: &SqlitePool, session: &Session) -> Result<Session> {
    sqlx::query(INSERT_SESSION)
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(pool)
        .await
        .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_id_sqlite(pool: &SqlitePool, id: &str) -> Result<Option<Session>> {
    let row = sqlx::query(SELECT_SESSION)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get session by ID")?;

    Ok(row.map(|row| Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_session_mysql(pool: &MySqlPool, session: &Session) -> Result<Session> {
    sqlx::query(INSERT_SESSION)
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(pool)
        .await
        .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_id_mysql(pool: &MySqlPool, id: &str) -> Result<Option<Session>> {
    let row = sqlx::query(SELECT_SESSION)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get session by ID")?;

    Ok(row.map(|row| {
        let expires_at: DateTime<Utc> = row.get("expires_at");
        let created_at: DateTime<Utc> = row.get("created_at");
        Session {
            id: row.get("id"),
            user_id: row.get("user_id"),
            expires_at,
            created_at,
        }
    }))
}
