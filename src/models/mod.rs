//! Data models
//!
//! Entities stored by Quill (Blog, Comment, Session), the caller identity
//! passed into every service call, and API input types.

mod blog;
mod comment;
mod identity;
mod session;

pub use blog::{
    normalize_tags, Blog, BlogStatus, CreateBlogInput, UpdateBlogInput, DEFAULT_CATEGORY,
    MAX_CATEGORY_LEN, MAX_TITLE_LEN,
};
pub use comment::{
    Authorship, Comment, CommentFeedItem, CreateCommentInput, NewComment, AUTHOR_BADGE,
    MAX_AUTHOR_NAME_LEN,
};
pub use identity::Caller;
pub use session::Session;
