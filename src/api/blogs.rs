//! Blog API endpoints
//!
//! Public reads go through the visibility gate with whatever caller the
//! optional auth middleware resolved. Dashboard writes require a session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{Blog, Caller, CreateBlogInput, UpdateBlogInput};

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: i64,
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: i64,
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, ApiError> {
    Ok(Json(state.blog_service.list_published().await?))
}

/// GET /api/blogs/mine
pub async fn list_my_blogs(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Blog>>, ApiError> {
    Ok(Json(state.blog_service.list_for_author(&caller).await?))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
) -> Result<Json<Blog>, ApiError> {
    Ok(Json(state.blog_service.get(id, &caller).await?))
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<CreateBlogInput>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let blog = state.blog_service.create(body, &caller).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
    ApiJson(body): ApiJson<UpdateBlogInput>,
) -> Result<Json<Blog>, ApiError> {
    Ok(Json(state.blog_service.update(id, body, &caller).await?))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blog_service.delete(id, &caller).await?;
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

/// POST /api/blogs/{id}/like
pub async fn like_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
) -> Result<Json<LikesResponse>, ApiError> {
    let likes = state.interaction_service.like(id, &caller).await?;
    Ok(Json(LikesResponse { likes }))
}

/// POST /api/blogs/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    caller: Caller,
) -> Result<Json<ViewsResponse>, ApiError> {
    let views = state.interaction_service.record_view(id, &caller).await?;
    Ok(Json(ViewsResponse { views }))
}
