//! Blog service
//!
//! Author dashboard operations plus the public listing:
//! - Listing published blogs and the caller's own blogs
//! - Gated single-blog reads
//! - Create, update, delete restricted to the blog's author
//!
//! Counters are never written here; see `services::interaction`.

use crate::db::repositories::BlogRepository;
use crate::models::{
    normalize_tags, Blog, Caller, CreateBlogInput, UpdateBlogInput, DEFAULT_CATEGORY,
    MAX_CATEGORY_LEN, MAX_TITLE_LEN,
};
use crate::services::{ensure_max_len, ensure_visible, ServiceError};
use anyhow::Context;
use std::sync::Arc;

/// Blog service for the public listing and the author dashboard
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
}

impl BlogService {
    /// Create a new blog service
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// All published blogs, newest first
    pub async fn list_published(&self) -> Result<Vec<Blog>, ServiceError> {
        Ok(self
            .repo
            .list_published()
            .await
            .context("Failed to list published blogs")?)
    }

    /// Every blog of the caller, drafts included
    pub async fn list_for_author(&self, caller: &Caller) -> Result<Vec<Blog>, ServiceError> {
        let author_id = require_user(caller)?;
        Ok(self
            .repo
            .list_by_author(author_id)
            .await
            .context("Failed to list author blogs")?)
    }

    /// Fetch one blog through the visibility gate
    pub async fn get(&self, id: i64, caller: &Caller) -> Result<Blog, ServiceError> {
        let blog = self.repo.get_by_id(id).await.context("Failed to get blog")?;
        ensure_visible(blog, caller)
    }

    /// Create a blog owned by the caller
    pub async fn create(&self, input: CreateBlogInput, caller: &Caller) -> Result<Blog, ServiceError> {
        let author_id = require_user(caller)?;
        validate_not_blank(&input.title, "Title")?;
        validate_not_blank(&input.content, "Content")?;
        ensure_max_len(&input.title, MAX_TITLE_LEN, "Title")?;

        let category = normalize_category(input.category.as_deref().unwrap_or_default());
        ensure_max_len(&category, MAX_CATEGORY_LEN, "Category")?;

        let input = CreateBlogInput {
            tags: normalize_tags(&input.tags),
            category: Some(category),
            excerpt: normalize_excerpt(input.excerpt),
            ..input
        };

        let blog = self
            .repo
            .create(author_id, &input)
            .await
            .context("Failed to create blog")?;

        tracing::info!(blog_id = blog.id, author_id, status = %blog.status, "Blog created");
        Ok(blog)
    }

    /// Apply a partial update to one of the caller's blogs
    pub async fn update(
        &self,
        id: i64,
        input: UpdateBlogInput,
        caller: &Caller,
    ) -> Result<Blog, ServiceError> {
        if let Some(title) = &input.title {
            validate_not_blank(title, "Title")?;
            ensure_max_len(title, MAX_TITLE_LEN, "Title")?;
        }
        if let Some(content) = &input.content {
            validate_not_blank(content, "Content")?;
        }
        let category = input.category.as_deref().map(normalize_category);
        if let Some(category) = &category {
            ensure_max_len(category, MAX_CATEGORY_LEN, "Category")?;
        }

        let mut blog = self.owned_blog(id, caller).await?;

        if let Some(title) = input.title {
            blog.title = title;
        }
        if let Some(content) = input.content {
            blog.content = content;
        }
        if let Some(category) = category {
            blog.category = category;
        }
        if input.excerpt.is_some() {
            blog.excerpt = normalize_excerpt(input.excerpt);
        }
        if let Some(tags) = input.tags {
            blog.tags = normalize_tags(&tags);
        }
        if let Some(status) = input.status {
            blog.status = status;
        }

        let updated = self.repo.update(&blog).await.context("Failed to update blog")?;
        tracing::info!(blog_id = id, status = %updated.status, "Blog updated");
        Ok(updated)
    }

    /// Delete one of the caller's blogs together with its comments
    pub async fn delete(&self, id: i64, caller: &Caller) -> Result<(), ServiceError> {
        self.owned_blog(id, caller).await?;

        if !self.repo.delete(id).await.context("Failed to delete blog")? {
            return Err(ServiceError::blog_not_found());
        }
        tracing::info!(blog_id = id, "Blog deleted");
        Ok(())
    }

    /// Gate first so that other users' drafts stay `NotFound`, then require ownership.
    async fn owned_blog(&self, id: i64, caller: &Caller) -> Result<Blog, ServiceError> {
        let blog = self.get(id, caller).await?;
        if !caller.is(blog.author_id) {
            return Err(ServiceError::Forbidden(
                "Only the author can modify this blog".to_string(),
            ));
        }
        Ok(blog)
    }
}

fn require_user(caller: &Caller) -> Result<i64, ServiceError> {
    caller
        .user_id()
        .ok_or_else(|| ServiceError::Forbidden("Authentication required".to_string()))
}

fn normalize_category(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        category => category.to_string(),
    }
}

fn normalize_excerpt(excerpt: Option<String>) -> Option<String> {
    excerpt
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

fn validate_not_blank(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::ValidationError(format!("{} cannot be empty", field)));
    }
    Ok(())
}
