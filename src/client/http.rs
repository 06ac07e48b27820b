//! HTTP access to a Quill server

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::api::ApiError;
use crate::client::ClientError;

/// Server calls the reader needs
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Like a blog, returning the server's new like count
    async fn like(&self, blog_id: i64) -> Result<i64, ClientError>;
}

#[derive(Debug, Deserialize)]
struct LikesBody {
    likes: i64,
}

/// [`BlogApi`] over `reqwest`
pub struct HttpBlogApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBlogApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent("Quill-Reader")
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `token` as a bearer session on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn like(&self, blog_id: i64) -> Result<i64, ClientError> {
        let url = format!("{}/api/blogs/{}/like", self.base_url, blog_id);
        let mut request = self.client.post(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            // Prefer the server's own message when the body is an error envelope
            let message = match response.json::<ApiError>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: LikesBody = response.json().await?;
        Ok(body.likes)
    }
}
