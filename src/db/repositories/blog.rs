//! Blog repository
//!
//! This module provides:
//! - `BlogRepository` trait defining the interface for blog data access
//! - `SqlxBlogRepository` implementing the trait for SQLite and MySQL
//!
//! `likes` and `views` are only written by the `increment_*` methods;
//! `update` leaves them alone.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Blog, BlogStatus, CreateBlogInput, DEFAULT_CATEGORY};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Create a new blog owned by `author_id`
    async fn create(&self, author_id: i64, input: &CreateBlogInput) -> Result<Blog>;

    /// Get blog by ID regardless of status
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;

    /// All published blogs, newest first
    async fn list_published(&self) -> Result<Vec<Blog>>;

    /// All blogs of one author in any status, newest first
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Blog>>;

    /// Persist editable fields (title, content, category, excerpt, tags, status)
    async fn update(&self, blog: &Blog) -> Result<Blog>;

    /// Delete a blog, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Add one like, returning the new total or `None` if the blog is gone
    async fn increment_likes(&self, id: i64) -> Result<Option<i64>>;

    /// Add one view, returning the new total or `None` if the blog is gone
    async fn increment_views(&self, id: i64) -> Result<Option<i64>>;
}

/// Counter columns on the blogs table
#[derive(Debug, Clone, Copy)]
enum Counter {
    Likes,
    Views,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::Likes => "likes",
            Counter::Views => "views",
        }
    }
}

/// SQLx-based blog repository implementation
pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
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
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, author_id: i64, input: &CreateBlogInput) -> Result<Blog> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_blog_sqlite(self.sqlite()?, author_id, input).await,
            DatabaseDriver::Mysql => create_blog_mysql(self.mysql()?, author_id, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_blog_by_id_sqlite(self.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_blog_by_id_mysql(self.mysql()?, id).await,
        }
    }

    async fn list_published(&self) -> Result<Vec<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_published_sqlite(self.sqlite()?).await,
            DatabaseDriver::Mysql => list_published_mysql(self.mysql()?).await,
        }
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_by_author_sqlite(self.sqlite()?, author_id).await,
            DatabaseDriver::Mysql => list_by_author_mysql(self.mysql()?, author_id).await,
        }
    }

    async fn update(&self, blog: &Blog) -> Result<Blog> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_blog_sqlite(self.sqlite()?, blog).await,
            DatabaseDriver::Mysql => update_blog_mysql(self.mysql()?, blog).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_blog_sqlite(self.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_blog_mysql(self.mysql()?, id).await,
        }
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<i64>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => increment_sqlite(self.sqlite()?, id, Counter::Likes).await,
            DatabaseDriver::Mysql => increment_mysql(self.mysql()?, id, Counter::Likes).await,
        }
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => increment_sqlite(self.sqlite()?, id, Counter::Views).await,
            DatabaseDriver::Mysql => increment_mysql(self.mysql()?, id, Counter::Views).await,
        }
    }
}

const SELECT_BLOG: &str = r#"
    SELECT id, author_id, status, title, content, category, excerpt, tags, views, likes, created_at, updated_at
    FROM blogs
"#;

fn encode_tags(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).context("Failed to encode blog tags")
}

fn decode_tags(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Invalid tags column: {}", raw))
}

fn decode_status(raw: &str) -> Result<BlogStatus> {
    raw.parse::<BlogStatus>().map_err(anyhow::Error::msg)
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_blog_sqlite(
    pool: &SqlitePool,
    author_id: i64,
    input: &CreateBlogInput,
) -> Result<Blog> {
    let now = Utc::now();
    let status = input.status.unwrap_or_default();
    let category = input.category.clone().unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let result = sqlx::query(
        r#"
        INSERT INTO blogs (author_id, status, title, content, category, excerpt, tags, views, likes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)
        "#,
    )
    .bind(author_id)
    .bind(status.as_str())
    .bind(&input.title)
    .bind(&input.content)
    .bind(&category)
    .bind(&input.excerpt)
    .bind(encode_tags(&input.tags)?)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create blog")?;

    Ok(Blog {
        id: result.last_insert_rowid(),
        author_id,
        status,
        title: input.title.clone(),
        content: input.content.clone(),
        category,
        excerpt: input.excerpt.clone(),
        tags: input.tags.clone(),
        views: 0,
        likes: 0,
        created_at: now,
        updated_at: now,
    })
}

async fn get_blog_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_BLOG))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog by ID")?;

    row.as_ref().map(row_to_blog_sqlite).transpose()
}

async fn list_published_sqlite(pool: &SqlitePool) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE status = 'published' ORDER BY created_at DESC, id DESC",
        SELECT_BLOG
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list published blogs")?;

    rows.iter().map(row_to_blog_sqlite).collect()
}

async fn list_by_author_sqlite(pool: &SqlitePool, author_id: i64) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE author_id = ? ORDER BY created_at DESC, id DESC",
        SELECT_BLOG
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await
    .context("Failed to list blogs by author")?;

    rows.iter().map(row_to_blog_sqlite).collect()
}

async fn update_blog_sqlite(pool: &SqlitePool, blog: &Blog) -> Result<Blog> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE blogs
        SET title = ?, content = ?, category = ?, excerpt = ?, tags = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&blog.title)
    .bind(&blog.content)
    .bind(&blog.category)
    .bind(&blog.excerpt)
    .bind(encode_tags(&blog.tags)?)
    .bind(blog.status.as_str())
    .bind(now)
    .bind(blog.id)
    .execute(pool)
    .await
    .context("Failed to update blog")?;

    get_blog_by_id_sqlite(pool, blog.id)
        .await?
        .context("Blog disappeared during update")
}

async fn delete_blog_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete blog")?;

    Ok(result.rows_affected() > 0)
}

async fn increment_sqlite(pool: &SqlitePool, id: i64, counter: Counter) -> Result<Option<i64>> {
    let column = counter.column();
    let result = sqlx::query(&format!(
        "UPDATE blogs SET {column} = {column} + 1 WHERE id = ?"
    ))
    .bind(id)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to increment blog {}", column))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let total: Option<i64> = sqlx::query_scalar(&format!("SELECT {column} FROM blogs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to read blog {}", column))?;

    Ok(total)
}

fn row_to_blog_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Blog> {
    let status: String = row.get("status");
    let tags: String = row.get("tags");
    Ok(Blog {
        id: row.get("id"),
        author_id: row.get("author_id"),
        status: decode_status(&status)?,
        title: row.get("title"),
        content: row.get("content"),
        category: row.get("category"),
        excerpt: row.get("excerpt"),
        tags: decode_tags(&tags)?,
        views: row.get("views"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_blog_mysql(
    pool: &MySqlPool,
    author_id: i64,
    input: &CreateBlogInput,
) -> Result<Blog> {
    let now = Utc::now();
    let status = input.status.unwrap_or_default();
    let category = input.category.clone().unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let result = sqlx::query(
        r#"
        INSERT INTO blogs (author_id, status, title, content, category, excerpt, tags, views, likes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)
        "#,
    )
    .bind(author_id)
    .bind(status.as_str())
    .bind(&input.title)
    .bind(&input.content)
    .bind(&category)
    .bind(&input.excerpt)
    .bind(encode_tags(&input.tags)?)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create blog")?;

    Ok(Blog {
        id: result.last_insert_id() as i64,
        author_id,
        status,
        title: input.title.clone(),
        content: input.content.clone(),
        category,
        excerpt: input.excerpt.clone(),
        tags: input.tags.clone(),
        views: 0,
        likes: 0,
        created_at: now,
        updated_at: now,
    })
}

async fn get_blog_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_BLOG))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog by ID")?;

    row.as_ref().map(row_to_blog_mysql).transpose()
}

async fn list_published_mysql(pool: &MySqlPool) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE status = 'published' ORDER BY created_at DESC, id DESC",
        SELECT_BLOG
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list published blogs")?;

    rows.iter().map(row_to_blog_mysql).collect()
}

async fn list_by_author_mysql(pool: &MySqlPool, author_id: i64) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE author_id = ? ORDER BY created_at DESC, id DESC",
        SELECT_BLOG
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await
    .context("Failed to list blogs by author")?;

    rows.iter().map(row_to_blog_mysql).collect()
}

async fn update_blog_mysql(pool: &MySqlPool, blog: &Blog) -> Result<Blog> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE blogs
        SET title = ?, content = ?, category = ?, excerpt = ?, tags = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&blog.title)
    .bind(&blog.content)
    .bind(&blog.category)
    .bind(&blog.excerpt)
    .bind(encode_tags(&blog.tags)?)
    .bind(blog.status.as_str())
    .bind(now)
    .bind(blog.id)
    .execute(pool)
    .await
    .context("Failed to update blog")?;

    get_blog_by_id_mysql(pool, blog.id)
        .await?
        .context("Blog disappeared during update")
}

async fn delete_blog_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete blog")?;

    Ok(result.rows_affected() > 0)
}

async fn increment_mysql(pool: &MySqlPool, id: i64, counter: Counter) -> Result<Option<i64>> {
    let column = counter.column();
    let result = sqlx::query(&format!(
        "UPDATE blogs SET {column} = {column} + 1 WHERE id = ?"
    ))
    .bind(id)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to increment blog {}", column))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let total: Option<i64> = sqlx::query_scalar(&format!("SELECT {column} FROM blogs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to read blog {}", column))?;

    Ok(total)
}

fn row_to_blog_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Blog> {
    let status: String = row.get("status");
    let tags: String = row.get("tags");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");
    Ok(Blog {
        id: row.get("id"),
        author_id: row.get("author_id"),
        status: decode_status(&status)?,
        title: row.get("title"),
        content: row.get("content"),
        category: row.get("category"),
        excerpt: row.get("excerpt"),
        tags: decode_tags(&tags)?,
        views: row.get("views"),
        likes: row.get("likes"),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{create_test_user, setup_test_pool};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxBlogRepository, i64) {
        let pool = setup_test_pool().await;
        let author_id = create_test_user(&pool, "author").await;
        let repo = SqlxBlogRepository::new(pool.clone());
        (pool, repo, author_id)
    }

    #[tokio::test]
    async fn test_create_and_get_blog() {
        let (_pool, repo, author_id) = setup_test_repo().await;

        let input = CreateBlogInput::new("First post", "Hello")
            .with_tags(["rust", "intro"])
            .with_status(BlogStatus::Published);
        let created = repo.create(author_id, &input).await.expect("Failed to create blog");

        assert!(created.id > 0);
        assert_eq!(created.category, DEFAULT_CATEGORY);
        assert_eq!(created.likes, 0);
        assert_eq!(created.views, 0);

        let fetched = repo.get_by_id(created.id).await.unwrap().expect("Blog not found");
        assert_eq!(fetched.title, "First post");
        assert_eq!(fetched.status, BlogStatus::Published);
        assert_eq!(fetched.tags, vec!["rust".to_string(), "intro".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_blog_returns_none() {
        let (_pool, repo, _) = setup_test_repo().await;
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_published_excludes_drafts() {
        let (_pool, repo, author_id) = setup_test_repo().await;

        repo.create(author_id, &CreateBlogInput::new("Draft", "x")).await.unwrap();
        let published = repo
            .create(
                author_id,
                &CreateBlogInput::new("Live", "y").with_status(BlogStatus::Published),
            )
            .await
            .unwrap();

        let listed = repo.list_published().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, published.id);

        let mine = repo.list_by_author(author_id).await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_likes_adds_one_per_call() {
        let (_pool, repo, author_id) = setup_test_repo().await;
        let blog = repo
            .create(author_id, &CreateBlogInput::new("Likeable", "z"))
            .await
            .unwrap();

        assert_eq!(repo.increment_likes(blog.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_likes(blog.id).await.unwrap(), Some(2));
        assert_eq!(repo.increment_views(blog.id).await.unwrap(), Some(1));
        assert_eq!(repo.increment_likes(4242).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_leaves_counters_alone() {
        let (_pool, repo, author_id) = setup_test_repo().await;
        let blog = repo
            .create(author_id, &CreateBlogInput::new("Before", "body"))
            .await
            .unwrap();
        repo.increment_likes(blog.id).await.unwrap();

        let mut edited = blog.clone();
        edited.title = "After".into();
        edited.likes = 500;
        edited.views = 500;
        edited.status = BlogStatus::Published;

        let updated = repo.update(&edited).await.unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.status, BlogStatus::Published);
        assert_eq!(updated.likes, 1);
        assert_eq!(updated.views, 0);
    }

    #[tokio::test]
    async fn test_excerpt_round_trips_and_clears() {
        let (_pool, repo, author_id) = setup_test_repo().await;
        let blog = repo
            .create(
                author_id,
                &CreateBlogInput::new("Summarised", "body").with_excerpt("Short version"),
            )
            .await
            .unwrap();
        assert_eq!(blog.excerpt.as_deref(), Some("Short version"));

        let fetched = repo.get_by_id(blog.id).await.unwrap().unwrap();
        assert_eq!(fetched.excerpt.as_deref(), Some("Short version"));

        let mut edited = fetched.clone();
        edited.excerpt = None;
        let updated = repo.update(&edited).await.unwrap();
        assert!(updated.excerpt.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_tags_column_is_an_error() {
        let (pool, repo, author_id) = setup_test_repo().await;
        let blog = repo
            .create(author_id, &CreateBlogInput::new("Tagged", "body"))
            .await
            .unwrap();

        sqlx::query("UPDATE blogs SET tags = 'not json' WHERE id = ?")
            .bind(blog.id)
            .execute(pool.as_sqlite().unwrap())
            .await
            .unwrap();

        let err = repo.get_by_id(blog.id).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid tags column"));
        assert!(repo.list_by_author(author_id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_blog() {
        let (_pool, repo, author_id) = setup_test_repo().await;
        let blog = repo
            .create(author_id, &CreateBlogInput::new("Doomed", "body"))
            .await
            .unwrap();

        assert!(repo.delete(blog.id).await.unwrap());
        assert!(!repo.delete(blog.id).await.unwrap());
        assert!(repo.get_by_id(blog.id).await.unwrap().is_none());
    }
}
