//! Caller identity
//!
//! Every service operation receives the caller explicitly; nothing reads a
//! process-wide "current user".

use serde::{Deserialize, Serialize};

/// The optional authenticated principal behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Caller(Option<i64>);

impl Caller {
    /// A caller with no resolved session
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// A caller authenticated as `user_id`
    pub const fn user(user_id: i64) -> Self {
        Self(Some(user_id))
    }

    pub fn user_id(&self) -> Option<i64> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// True only for an authenticated caller whose id is `user_id`.
    pub fn is(&self, user_id: i64) -> bool {
        self.0 == Some(user_id)
    }
}

impl From<Option<i64>> for Caller {
    fn from(user_id: Option<i64>) -> Self {
        Self(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_matches_nobody() {
        let caller = Caller::anonymous();
        assert!(!caller.is_authenticated());
        assert!(!caller.is(0));
        assert!(!caller.is(1));
        assert_eq!(caller, Caller::default());
    }

    #[test]
    fn test_user_matches_only_itself() {
        let caller = Caller::user(42);
        assert!(caller.is_authenticated());
        assert!(caller.is(42));
        assert!(!caller.is(43));
        assert_eq!(caller.user_id(), Some(42));
    }
}
