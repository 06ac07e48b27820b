//! Blog model
//!
//! This module provides:
//! - `Blog` entity representing a post owned by one author
//! - `BlogStatus` enum for publication states
//! - Input types for the author dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when the author leaves it blank
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Longest title the `blogs.title` column holds, in characters
pub const MAX_TITLE_LEN: usize = 500;

/// Longest category the `blogs.category` column holds, in characters
pub const MAX_CATEGORY_LEN: usize = 100;

/// Blog entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub author_id: i64,
    /// Publication status
    pub status: BlogStatus,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Optional summary shown in listings
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Tags in the order the author entered them, without duplicates
    pub tags: Vec<String>,
    /// View count, only ever incremented
    pub views: i64,
    /// Like count, only ever incremented
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    /// Visible only to the author
    #[default]
    Draft,
    /// Visible to everyone
    Published,
}

impl BlogStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!("Invalid blog status: {}", s)),
        }
    }
}

/// Input for creating a blog from the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Defaults to draft
    #[serde(default)]
    pub status: Option<BlogStatus>,
}

impl CreateBlogInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: BlogStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update from the dashboard. Counters are not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    /// A blank excerpt clears it
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<BlogStatus>,
}

/// Trim tags, drop blank ones and keep the first occurrence of each.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
