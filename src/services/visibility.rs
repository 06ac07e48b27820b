//! Blog visibility gate
//!
//! Published blogs are visible to everyone. Drafts are visible only to
//! their author. Every read path funnels through [`ensure_visible`].

use crate::models::{Blog, BlogStatus, Caller};
use crate::services::ServiceError;

/// Whether `caller` may see `blog`.
pub fn can_view(blog: &Blog, caller: &Caller) -> bool {
    match blog.status {
        BlogStatus::Published => true,
        BlogStatus::Draft => caller.is(blog.author_id),
    }
}

/// Pass a fetched blog through the gate.
///
/// An absent blog and a hidden one produce the same `NotFound`.
pub fn ensure_visible(blog: Option<Blog>, caller: &Caller) -> Result<Blog, ServiceError> {
    match blog {
        Some(blog) if can_view(&blog, caller) => Ok(blog),
        Some(blog) => {
            tracing::debug!(blog_id = blog.id, ?caller, "Draft hidden from caller");
            Err(ServiceError::blog_not_found())
        }
        None => Err(ServiceError::blog_not_found()),
    }
}
