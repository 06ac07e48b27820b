//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error envelope and its mapping from service errors
//! - `ApiJson`, a JSON body extractor that rejects with the envelope
//! - Session resolution (`require_auth`, `optional_auth`) and the `Caller` extractor

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

use crate::models::Caller;
use crate::services::{
    BlogService, CommentService, IdentityResolver, InteractionService, ServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub blog_service: Arc<BlogService>,
    pub comment_service: Arc<CommentService>,
    pub interaction_service: Arc<InteractionService>,
    pub identity: Arc<dyn IdentityResolver>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::InternalError(e) => {
                tracing::error!("Request failed: {:#}", e);
                ApiError::internal_error()
            }
        }
    }
}

/// JSON request body whose rejection is a `VALIDATION_ERROR` envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "Request body has missing or mistyped fields",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "Expected Content-Type: application/json",
            _ => "Failed to read request body",
        };
        ApiError::validation_error(message)
    }
}

/// Extract session token from request
///
/// A bearer token wins over the `session` cookie.
fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
///
/// Rejects the request with 401 unless the token resolves to a user.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user_id = state
        .identity
        .resolve(&token)
        .await
        .map_err(|e| {
            tracing::error!("Session validation failed: {:#}", e);
            ApiError::internal_error()
        })?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(Caller::user(user_id));
    Ok(next.run(request).await)
}

/// Optional authentication middleware
///
/// Anything short of a valid session continues as an anonymous caller.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(&request);
    let caller = match state.identity.caller(token.as_deref()).await {
        Ok(caller) => caller,
        Err(e) => {
            tracing::warn!("Session lookup failed, continuing anonymously: {:#}", e);
            Caller::anonymous()
        }
    };
    request.extensions_mut().insert(caller);
    next.run(request).await
}

// Handlers read the caller inserted by the auth middlewares; routes without
// either middleware see an anonymous caller.
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Caller>().copied().unwrap_or_default())
    }
}
