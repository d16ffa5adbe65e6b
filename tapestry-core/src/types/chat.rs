//! Chat turn and user profile types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
    /// System instruction turn.
    System,
}

/// One turn of conversation passed to a chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Role of the speaker.
    pub role: ChatRole,

    /// Turn content.
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Profile of the requesting user, injected into prompts when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Username.
    pub username: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Free-form preferences.
    #[serde(default)]
    pub preferences: HashMap<String, serde_json::Value>,
}

impl UserProfile {
    /// Render the profile as context lines for a prompt.
    ///
    /// Returns `None` when the profile carries no usable fields.
    #[must_use]
    pub fn format_for_context(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(username) = &self.username {
            parts.push(format!("User: {username}"));
        }
        if let Some(email) = &self.email {
            parts.push(format!("Email: {email}"));
        }
        if !self.preferences.is_empty() {
            let preferences =
                serde_json::to_string(&self.preferences).unwrap_or_else(|_| "{}".to_string());
            parts.push(format!("Preferences: {preferences}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_turn_constructors() {
        assert_eq!(ChatTurn::user("hi").role, ChatRole::User);
        assert_eq!(ChatTurn::assistant("hello").role, ChatRole::Assistant);
        assert_eq!(ChatTurn::system("be brief").role, ChatRole::System);
    }

    #[test]
    fn test_empty_profile_formats_to_none() {
        assert!(UserProfile::default().format_for_context().is_none());
    }

    #[test]
    fn test_profile_formatting() {
        let profile = UserProfile {
            username: Some("ada".to_string()),
            email: None,
            preferences: HashMap::new(),
        };
        assert_eq!(profile.format_for_context().unwrap(), "User: ada");
    }
}
