use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents an account on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            is_bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// The address token that mentions this user at the start of a message.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Whether `token` addresses this user, in either plain or nickname form.
    pub fn is_mentioned_by(&self, token: &str) -> bool {
        token
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|id| id.strip_prefix('!').unwrap_or(id))
            .is_some_and(|id| id == self.id)
    }

    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Public profile returned by a user lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub tag: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub presence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_forms() {
        let user = User::new("42");
        assert_eq!(user.mention(), "<@42>");
        assert!(user.is_mentioned_by("<@42>"));
        assert!(user.is_mentioned_by("<@!42>"));
        assert!(!user.is_mentioned_by("<@420>"));
        assert!(!user.is_mentioned_by("@42"));
        assert!(!user.is_mentioned_by("<@42>echo"));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(User::new("7").to_string(), "7");
        assert_eq!(User::new("7").with_username("op").to_string(), "op");
    }
}
