//! Comment service
//!
//! Decides who may write a comment as the blog's author and assembles the
//! comment feed of a blog. `is_author` is always derived from the caller,
//! never taken from input.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::{BlogRepository, CommentRepository};
use crate::models::{
    Authorship, Blog, Caller, Comment, CommentFeedItem, CreateCommentInput, NewComment,
    MAX_AUTHOR_NAME_LEN,
};
use crate::services::{ensure_max_len, ensure_visible, require_text, ServiceError};

/// Display name used for author comments submitted without one
pub const AUTHOR_PLACEHOLDER_NAME: &str = "Author";

/// Comment service
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    blog_repo: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>, blog_repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo, blog_repo }
    }

    /// Comments of a blog the caller can see, earliest first
    pub async fn list_for_blog(
        &self,
        blog_id: i64,
        caller: &Caller,
    ) -> Result<Vec<CommentFeedItem>, ServiceError> {
        let blog = self.find_blog(blog_id).await?;
        ensure_visible(blog, caller)?;

        let comments = self
            .repo
            .list_by_blog(blog_id)
            .await
            .context("Failed to list comments")?;

        Ok(comments.into_iter().map(CommentFeedItem::from).collect())
    }

    /// Create a comment on a published blog under a caller-supplied name.
    ///
    /// Guest comments are never flagged as author comments, whoever sends them.
    pub async fn create_guest(&self, input: CreateCommentInput) -> Result<Comment, ServiceError> {
        let blog_id = require_blog_id(input.blog_id)?;
        let content = require_text(input.content, "content")?;
        let author_name = require_text(input.author_name, "authorName")?;
        ensure_max_len(&author_name, MAX_AUTHOR_NAME_LEN, "authorName")?;

        let blog = self.find_blog(blog_id).await?;
        ensure_visible(blog, &Caller::anonymous())?;

        let comment = NewComment::new(blog_id, author_name, content, Authorship::Guest);
        let created = self.repo.create(&comment).await.context("Failed to create comment")?;

        tracing::info!(comment_id = created.id, blog_id, "Guest comment created");
        Ok(created)
    }

    /// Create a comment as the blog's author, on a draft or published blog.
    pub async fn create_as_author(
        &self,
        input: CreateCommentInput,
        caller: &Caller,
    ) -> Result<Comment, ServiceError> {
        let blog_id = require_blog_id(input.blog_id)?;
        let content = require_text(input.content, "content")?;
        let author_name = input
            .author_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| AUTHOR_PLACEHOLDER_NAME.to_string());
        ensure_max_len(&author_name, MAX_AUTHOR_NAME_LEN, "authorName")?;

        let blog = self
            .find_blog(blog_id)
            .await?
            .ok_or_else(ServiceError::blog_not_found)?;

        let authorship = Authorship::of(caller, blog.author_id);
        if !authorship.is_author() {
            tracing::debug!(blog_id, ?caller, "Author comment rejected");
            return Err(ServiceError::Forbidden(
                "Only the blog author can comment as author".to_string(),
            ));
        }

        let comment = NewComment::new(blog_id, author_name, content, authorship);
        let created = self.repo.create(&comment).await.context("Failed to create comment")?;

        tracing::info!(comment_id = created.id, blog_id, "Author comment created");
        Ok(created)
    }

    /// Delete any comment on one of the caller's blogs
    pub async fn delete(&self, comment_id: i64, caller: &Caller) -> Result<(), ServiceError> {
        let comment = self
            .repo
            .get_by_id(comment_id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(comment_not_found)?;

        let blog = self
            .find_blog(comment.blog_id)
            .await?
            .ok_or_else(ServiceError::blog_not_found)?;

        if !caller.is(blog.author_id) {
            return Err(ServiceError::Forbidden(
                "Only the blog author can delete comments".to_string(),
            ));
        }

        if !self.repo.delete(comment_id).await.context("Failed to delete comment")? {
            return Err(comment_not_found());
        }

        tracing::info!(comment_id, blog_id = blog.id, "Comment deleted");
        Ok(())
    }

    async fn find_blog(&self, blog_id: i64) -> Result<Option<Blog>, ServiceError> {
        Ok(self
            .blog_repo
            .get_by_id(blog_id)
            .await
            .context("Failed to get blog")?)
    }
}

fn require_blog_id(blog_id: Option<i64>) -> Result<i64, ServiceError> {
    blog_id.ok_or_else(|| ServiceError::ValidationError("blogId is required".to_string()))
}

fn comment_not_found() -> ServiceError {
    ServiceError::NotFound("Comment not found".to_string())
}
