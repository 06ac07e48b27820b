//! Services layer - Business logic
//!
//! Every operation takes the caller's identity as an explicit `&Caller`
//! argument. Services are responsible for:
//! - Gating reads on blog visibility
//! - Deciding who may write as the blog's author
//! - Validating input before anything is persisted

pub mod blog;
pub mod comment;
pub mod identity;
pub mod interaction;
pub mod visibility;

pub use blog::BlogService;
pub use comment::{CommentService, AUTHOR_PLACEHOLDER_NAME};
pub use identity::{IdentityResolver, SessionIdentityResolver};
pub use interaction::InteractionService;
pub use visibility::{can_view, ensure_visible};

/// Error type shared by all services
///
/// `NotFound` covers both absent and hidden entities so that callers cannot
/// probe for drafts they are not allowed to see.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or blank input field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Entity absent, or not visible to the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is known but lacks the required ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl ServiceError {
    pub(crate) fn blog_not_found() -> Self {
        ServiceError::NotFound("Blog not found".to_string())
    }
}

/// Reject `None` and whitespace-only strings, returning the value untouched.
pub(crate) fn require_text(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::ValidationError(format!("{} is required", field))),
    }
}

/// Reject values longer than `max` characters.
pub(crate) fn ensure_max_len(value: &str, max: usize, field: &str) -> Result<(), ServiceError> {
    if value.chars().count() > max {
        return Err(ServiceError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("hi".into()), "content").unwrap(), "hi");
        assert!(matches!(
            require_text(Some("   ".into()), "content"),
            Err(ServiceError::ValidationError(_))
        ));
        let err = require_text(None, "authorName").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: authorName is required");
    }

    #[test]
    fn test_ensure_max_len_counts_characters() {
        assert!(ensure_max_len(&"é".repeat(100), 100, "authorName").is_ok());
        let err = ensure_max_len(&"a".repeat(101), 100, "authorName").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: authorName must be at most 100 characters"
        );
    }
}
