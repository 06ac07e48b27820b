//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a specific entity.

pub mod blog;
pub mod comment;
pub mod session;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
