//! Interaction service
//!
//! Server side of likes and views. Each call adds exactly one to the stored
//! counter. Per-client "already liked" state lives with the client
//! (`client::InteractionMarkers`); the server keeps no per-identity ledger,
//! so a repeated or retried call counts again.

use crate::db::repositories::BlogRepository;
use crate::models::Caller;
use crate::services::{ensure_visible, ServiceError};
use anyhow::Context;
use std::sync::Arc;

pub struct InteractionService {
    repo: Arc<dyn BlogRepository>,
}

impl InteractionService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// Like a blog the caller can see, returning the new total.
    pub async fn like(&self, blog_id: i64, caller: &Caller) -> Result<i64, ServiceError> {
        self.visible(blog_id, caller).await?;

        let likes = self
            .repo
            .increment_likes(blog_id)
            .await
            .context("Failed to increment likes")?
            .ok_or_else(ServiceError::blog_not_found)?;

        tracing::debug!(blog_id, likes, "Blog liked");
        Ok(likes)
    }

    /// Count one view of a blog the caller can see, returning the new total.
    pub async fn record_view(&self, blog_id: i64, caller: &Caller) -> Result<i64, ServiceError> {
        self.visible(blog_id, caller).await?;

        let views = self
            .repo
            .increment_views(blog_id)
            .await
            .context("Failed to increment views")?
            .ok_or_else(ServiceError::blog_not_found)?;

        Ok(views)
    }

    async fn visible(&self, blog_id: i64, caller: &Caller) -> Result<(), ServiceError> {
        let blog = self
            .repo
            .get_by_id(blog_id)
            .await
            .context("Failed to get blog")?;
        ensure_visible(blog, caller).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{create_test_blog, create_test_user, setup_test_pool};
    use crate::db::repositories::SqlxBlogRepository;
    use crate::models::BlogStatus;

    async fn setup_test_service() -> (InteractionService, Arc<dyn BlogRepository>, i64, i64, i64) {
        let pool = setup_test_pool().await;
        let author = create_test_user(&pool, "author").await;
        let published = create_test_blog(&pool, author, BlogStatus::Published).await;
        let draft = create_test_blog(&pool, author, BlogStatus::Draft).await;
        let repo = SqlxBlogRepository::boxed(pool);
        (InteractionService::new(repo.clone()), repo, author, published, draft)
    }

    #[tokio::test]
    async fn test_two_likes_add_two() {
        let (service, repo, _, blog_id, _) = setup_test_service().await;
        let before = repo.get_by_id(blog_id).await.unwrap().unwrap().likes;

        service.like(blog_id, &Caller::anonymous()).await.unwrap();
        let after = service.like(blog_id, &Caller::anonymous()).await.unwrap();

        assert_eq!(after, before + 2);
        assert_eq!(repo.get_by_id(blog_id).await.unwrap().unwrap().likes, after);
    }

    #[tokio::test]
    async fn test_like_counts_every_caller() {
        let (service, _, author, blog_id, _) = setup_test_service().await;

        let mut last = 0;
        for caller in [Caller::anonymous(), Caller::user(author), Caller::user(999)] {
            let likes = service.like(blog_id, &caller).await.unwrap();
            assert_eq!(likes, last + 1);
            last = likes;
        }
    }

    #[tokio::test]
    async fn test_like_hidden_or_missing_blog() {
        let (service, repo, author, _, draft) = setup_test_service().await;

        let result = service.like(draft, &Caller::anonymous()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.get_by_id(draft).await.unwrap().unwrap().likes, 0);

        let result = service.like(4242, &Caller::user(author)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        assert_eq!(service.like(draft, &Caller::user(author)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_view_leaves_likes_alone() {
        let (service, repo, _, blog_id, _) = setup_test_service().await;

        assert_eq!(service.record_view(blog_id, &Caller::anonymous()).await.unwrap(), 1);
        assert_eq!(service.record_view(blog_id, &Caller::anonymous()).await.unwrap(), 2);

        let blog = repo.get_by_id(blog_id).await.unwrap().unwrap();
        assert_eq!(blog.views, 2);
        assert_eq!(blog.likes, 0);
    }
}
