//! Reader client
//!
//! Client half of likes and reads. A [`Reader`] pairs a server connection
//! with this client's local [`InteractionMarkers`]:
//! - a like is sent to the server at most once per blog from this client
//! - a read is only recorded locally and never reaches the server

pub mod http;
pub mod markers;

pub use http::{BlogApi, HttpBlogApi};
pub use markers::InteractionMarkers;

/// Error types for reader operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or decoding failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Marker file could not be read or written
    #[error("Marker storage error: {0}")]
    Markers(#[from] anyhow::Error),
}

/// Result of [`Reader::like`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The server accepted the like and reported this total
    Liked(i64),
    /// This client had already liked the blog; the server was not called
    AlreadyLiked,
}

pub struct Reader<A> {
    api: A,
    markers: InteractionMarkers,
}

impl<A: BlogApi> Reader<A> {
    pub fn new(api: A, markers: InteractionMarkers) -> Self {
        Self { api, markers }
    }

    /// Like a blog unless this client already did.
    ///
    /// The marker is written only after the server accepted the like, so a
    /// failed call can be retried. Once the server has counted the like the
    /// call succeeds even if the marker cannot be stored.
    pub async fn like(&mut self, blog_id: i64) -> Result<LikeOutcome, ClientError> {
        if self.markers.has_liked(blog_id) {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let likes = self.api.like(blog_id).await?;
        if let Err(e) = self.markers.mark_liked(blog_id) {
            tracing::warn!(blog_id, "Like counted but marker not saved: {:#}", e);
        }
        Ok(LikeOutcome::Liked(likes))
    }

    /// Record that this client opened a blog. Returns `false` if already recorded.
    pub fn mark_read(&mut self, blog_id: i64) -> Result<bool, ClientError> {
        Ok(self.markers.mark_read(blog_id)?)
    }

    pub fn has_liked(&self, blog_id: i64) -> bool {
        self.markers.has_liked(blog_id)
    }

    pub fn has_read(&self, blog_id: i64) -> bool {
        self.markers.has_read(blog_id)
    }
}
