//! User domain model.

use serde::{Deserialize, Serialize};

/// An authenticated player.
///
/// `username` is unique and compared case-sensitively. The profile is
/// immutable once authenticated; re-authentication replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "display_name")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
}

impl User {
    /// Creates a profile carrying only a username.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            profile_image: None,
            first_name: String::new(),
            last_name: String::new(),
            slack_id: None,
        }
    }

    pub fn with_full_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Returns "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Normalizes a typed handle before verification.
///
/// Surrounding whitespace goes first, then every leading `@`. Anything else
/// is left for the server to reject.
pub fn clean_name(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}
