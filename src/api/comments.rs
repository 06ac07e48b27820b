//! Comment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::blogs::MessageResponse;
use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{Caller, Comment, CommentFeedItem, CreateCommentInput};

/// GET /api/comments/blog/{blogId}
pub async fn list_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
    caller: Caller,
) -> Result<Json<Vec<CommentFeedItem>>, ApiError> {
    Ok(Json(state.comment_service.list_for_blog(blog_id, &caller).await?))
}

/// POST /api/comments
///
/// Guest comment. The caller's session, if any, is not consulted.
pub async fn create_comment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comment_service.create_guest(body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /api/comments/author
pub async fn create_author_comment(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comment_service.create_as_author(body, &caller).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
) -> Result<Json<MessageResponse>, ApiError> {
    state.comment_service.delete(id, &caller).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
