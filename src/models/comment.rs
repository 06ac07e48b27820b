//! Comment model

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::Caller;

/// Badge shown next to comments written by the blog's author
pub const AUTHOR_BADGE: &str = "Author";

/// Longest display name the `comments.author_name` column holds, in characters
pub const MAX_AUTHOR_NAME_LEN: usize = 100;

/// Comment entity
///
/// `is_author` is fixed when the row is inserted; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub blog_id: i64,
    /// Display name; for guests this is whatever they typed
    pub author_name: String,
    pub content: String,
    pub is_author: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment as rendered in a blog's comment feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedItem {
    #[serde(flatten)]
    pub comment: Comment,
    /// `Some("Author")` for author comments
    pub badge: Option<&'static str>,
}

impl From<Comment> for CommentFeedItem {
    fn from(comment: Comment) -> Self {
        let badge = comment.is_author.then_some(AUTHOR_BADGE);
        Self { comment, badge }
    }
}

/// Comment submission as received from a client.
///
/// Every field is optional so that a missing field is reported as a
/// validation error. Unknown fields such as `isAuthor` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    /// Accepts a number or a numeric string, since form posts send the latter
    #[serde(default, deserialize_with = "deserialize_blog_id")]
    pub blog_id: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

impl CreateCommentInput {
    pub fn new(blog_id: i64, content: impl Into<String>) -> Self {
        Self {
            blog_id: Some(blog_id),
            content: Some(content.into()),
            author_name: None,
        }
    }

    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }
}

fn deserialize_blog_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(raw)) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom("blogId must be an integer")),
    }
}

/// Who a comment is written as, relative to the blog it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorship {
    Guest,
    BlogAuthor,
}

impl Authorship {
    /// Derive authorship from the caller and the blog's owner.
    pub fn of(caller: &Caller, blog_author_id: i64) -> Self {
        if caller.is(blog_author_id) {
            Self::BlogAuthor
        } else {
            Self::Guest
        }
    }

    pub fn is_author(&self) -> bool {
        matches!(self, Self::BlogAuthor)
    }
}

/// A validated comment ready to be inserted.
///
/// Only the comment service constructs these, after the authorization
/// checks for the matching path have passed.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub(crate) blog_id: i64,
    pub(crate) author_name: String,
    pub(crate) content: String,
    pub(crate) authorship: Authorship,
}

impl NewComment {
    pub(crate) fn new(
        blog_id: i64,
        author_name: String,
        content: String,
        authorship: Authorship,
    ) -> Self {
        Self {
            blog_id,
            author_name,
            content,
            authorship,
        }
    }

    pub fn blog_id(&self) -> i64 {
        self.blog_id
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_author(&self) -> bool {
        self.authorship.is_author()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn comment(is_author: bool) -> Comment {
        Comment {
            id: 1,
            blog_id: 2,
            author_name: "Sam".into(),
            content: "nice".into(),
            is_author,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_feed_item_badge() {
        assert_eq!(CommentFeedItem::from(comment(true)).badge, Some(AUTHOR_BADGE));
        assert_eq!(CommentFeedItem::from(comment(false)).badge, None);
    }

    #[test]
    fn test_feed_item_flattens_comment() {
        let value = serde_json::to_value(CommentFeedItem::from(comment(true))).unwrap();
        assert_eq!(value["isAuthor"], true);
        assert_eq!(value["authorName"], "Sam");
        assert_eq!(value["blogId"], 2);
        assert_eq!(value["badge"], "Author");
    }

    #[test]
    fn test_input_ignores_is_author_field() {
        let input: CreateCommentInput = serde_json::from_value(serde_json::json!({
            "blogId": 5,
            "content": "hi",
            "authorName": "Eve",
            "isAuthor": true
        }))
        .unwrap();
        assert_eq!(input.blog_id, Some(5));
        assert_eq!(input.author_name.as_deref(), Some("Eve"));
    }

    #[test]
    fn test_input_missing_fields_deserialize_as_none() {
        let input: CreateCommentInput = serde_json::from_str("{}").unwrap();
        assert!(input.blog_id.is_none());
        assert!(input.content.is_none());
        assert!(input.author_name.is_none());
    }

    #[test]
    fn test_input_accepts_numeric_string_blog_id() {
        let input: CreateCommentInput =
            serde_json::from_str(r#"{"blogId":" 12 ","content":"hi"}"#).unwrap();
        assert_eq!(input.blog_id, Some(12));

        let input: CreateCommentInput =
            serde_json::from_str(r#"{"blogId":null,"content":"hi"}"#).unwrap();
        assert!(input.blog_id.is_none());

        assert!(serde_json::from_str::<CreateCommentInput>(r#"{"blogId":"twelve"}"#).is_err());
        assert!(serde_json::from_str::<CreateCommentInput>(r#"{"blogId":true}"#).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn authorship_requires_matching_identity(caller_id in prop::option::of(1i64..20), author_id in 1i64..20) {
            let caller = Caller::from(caller_id);
            let authorship = Authorship::of(&caller, author_id);
            prop_assert_eq!(authorship.is_author(), caller_id == Some(author_id));
        }
    }
}
