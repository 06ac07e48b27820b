//! API layer - HTTP handlers and routing
//!
//! JSON endpoints under `/api`:
//! - Blog endpoints (public listing, author dashboard, likes and views)
//! - Comment endpoints (feed, guest and author comments, deletion)
//! - Health check

pub mod blogs;
pub mod comments;
pub mod middleware;


use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;

pub use middleware::{ApiError, AppState};

/// Build the `/api` router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Routes that need a valid session
    let protected_routes = Router::new()
        .route("/blogs/mine", get(blogs::list_my_blogs))
        .route("/blogs", post(blogs::create_blog))
        .route("/blogs/{id}", put(blogs::update_blog))
        .route("/blogs/{id}", delete(blogs::delete_blog))
        .route("/comments/author", post(comments::create_author_comment))
        .route("/comments/{id}", delete(comments::delete_comment))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Gated reads and interactions, caller resolved when present
    let public_routes = Router::new()
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs/{id}", get(blogs::get_blog))
        .route("/blogs/{id}/like", post(blogs::like_blog))
        .route("/blogs/{id}/view", post(blogs::record_view))
        .route("/comments/blog/{blog_id}", get(comments::list_comments))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::optional_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/comments", post(comments::create_comment))
        .merge(public_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, server: &ServerConfig) -> anyhow::Result<Router> {
    let origin = server
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", server.cors_origin))?;

    // Cookie sessions need credentialed CORS
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api", build_api_router(state.clone()))
        .layer(DefaultBodyLimit::max(server.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, label) = match state.pool.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!("Health check failed: {:#}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    (
        status,
        Json(json!({
            "status": label,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
