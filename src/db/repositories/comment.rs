//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, NewComment};

/// Comment repository trait
///
/// There is deliberately no update method: a persisted comment, including
/// its `is_author` flag, never changes.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a validated comment
    async fn create(&self, comment: &NewComment) -> Result<Comment>;

    /// Get a comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// All comments of a blog in persisted order (earliest first)
    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>>;

    /// Delete a comment, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> Result<&SqlitePool> {
        self.pool
            .as_sqlite()
            .context("SQLite driver configured without a SQLite pool")
    }

    fn mysql(&self) -> Result<&MySqlPool> {
        self.pool
            .as_mysql()
            .context("MySQL driver configured without a MySQL pool")
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.sqlite()?, comment).await,
            DatabaseDriver::Mysql => create_mysql(self.mysql()?, comment).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.mysql()?, id).await,
        }
    }

    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_by_blog_sqlite(self.sqlite()?, blog_id).await,
            DatabaseDriver::Mysql => list_by_blog_mysql(self.mysql()?, blog_id).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.mysql()?, id).await,
        }
    }
}

const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (blog_id, author_name, content, is_author, created_at)
    VALUES (?, ?, ?, ?, ?)
"#;

const SELECT_COMMENT: &str = r#"
    SELECT id, blog_id, author_name, content, is_author, created_at
    FROM comments
"#;

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, comment: &NewComment) -> Result<Comment> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_COMMENT)
        .bind(comment.blog_id())
        .bind(comment.author_name())
        .bind(comment.content())
        .bind(comment.is_author())
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        blog_id: comment.blog_id(),
        author_name: comment.author_name().to_string(),
        content: comment.content().to_string(),
        is_author: comment.is_author(),
        created_at: now,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COMMENT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    Ok(row.as_ref().map(row_to_comment_sqlite))
}

async fn list_by_blog_sqlite(pool: &SqlitePool, blog_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "{} WHERE blog_id = ? ORDER BY created_at ASC, id ASC",
        SELECT_COMMENT
    ))
    .bind(blog_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_sqlite).collect())
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        blog_id: row.get("blog_id"),
        author_name: row.get("author_name"),
        content: row.get("content"),
        is_author: row.get("is_author"),
        created_at: row.get("created_at"),
    }
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, comment: &NewComment) -> Result<Comment> {
    let now = Utc::now();
    let result = sqlx::query(INSERT_COMMENT)
        .bind(comment.blog_id())
        .bind(comment.author_name())
        .bind(comment.content())
        .bind(comment.is_author())
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        blog_id: comment.blog_id(),
        author_name: comment.author_name().to_string(),
        content: comment.content().to_string(),
        is_author: comment.is_author(),
        created_at: now,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COMMENT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    Ok(row.as_ref().map(row_to_comment_mysql))
}

async fn list_by_blog_mysql(pool: &MySqlPool, blog_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "{} WHERE blog_id = ? ORDER BY created_at ASC, id ASC",
        SELECT_COMMENT
    ))
    .bind(blog_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_mysql).collect())
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Comment {
    let created_at: DateTime<Utc> = row.get("created_at");
    Comment {
        id: row.get("id"),
        blog_id: row.get("blog_id"),
        author_name: row.get("author_name"),
        content: row.get("content"),
        is_author: row.get("is_author"),
        created_at,
    }
}
