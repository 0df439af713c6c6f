//! Story identifiers, assignments and request shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FableError, Result};
use crate::user::User;

/// Server-issued identifier of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub i64);

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// What the assignment engine hands a session on a successful acquisition.
///
/// Either a continuation (`prev_line` set, usually with a `story_id`) or a
/// fresh start (`writing_new_story`, no previous line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAssignment {
    pub story_id: Option<StoryId>,
    pub prev_line: Option<String>,
    pub prev_author: Option<User>,
    pub writing_new_story: bool,
    /// 1-based position of the line about to be written.
    pub curr_index: Option<u32>,
    pub max_lines: Option<u32>,
}

impl LineAssignment {
    /// No continuation is available; the player starts a story.
    pub fn fresh_story() -> Self {
        Self {
            writing_new_story: true,
            ..Self::default()
        }
    }

    pub fn continuation(
        story_id: StoryId,
        prev_line: impl Into<String>,
        prev_author: Option<User>,
        curr_index: u32,
        max_lines: u32,
    ) -> Self {
        Self {
            story_id: Some(story_id),
            prev_line: Some(prev_line.into()),
            prev_author,
            writing_new_story: false,
            curr_index: Some(curr_index),
            max_lines: Some(max_lines),
        }
    }

    /// Rejects assignments that break the wire contract.
    pub fn validate(self) -> Result<Self> {
        if self.writing_new_story && self.prev_line.is_some() {
            return Err(FableError::protocol(
                "assignment is both a continuation and a new story",
            ));
        }
        if !self.writing_new_story && self.prev_line.is_none() {
            return Err(FableError::protocol(
                "assignment has neither a line to continue nor a new-story signal",
            ));
        }
        if let (Some(index), Some(max)) = (self.curr_index, self.max_lines)
            && index > max
        {
            return Err(FableError::protocol(format!(
                "line {index} exceeds the story cap of {max}"
            )));
        }
        Ok(self)
    }
}

/// `POST /api/get_line` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireLineRequest {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<StoryId>,
    #[serde(default)]
    pub story_id_history: Vec<StoryId>,
}

/// `POST /api/submit_line` body. `story_id` is absent when the line opens a
/// new story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLineRequest {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<StoryId>,
    pub line: String,
}

/// `POST /api/release_story` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStoryRequest {
    pub username: String,
    #[serde(default)]
    pub story_id: Option<StoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_acquire_request_wire_shape() {
        let request = AcquireLineRequest {
            username: "alice".to_string(),
            story_id: None,
            story_id_history: vec![StoryId(3), StoryId(7)],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "username": "alice", "storyIdHistory": [3, 7] })
        );
    }

    #[test]
    fn test_submit_request_carries_story_id() {
        let request = SubmitLineRequest {
            username: "alice".to_string(),
            story_id: Some(StoryId(7)),
            line: "It jumped.".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "username": "alice", "storyId": 7, "line": "It jumped." })
        );
    }

    #[test]
    fn test_release_request_sends_null_without_story() {
        let request = ReleaseStoryRequest {
            username: "alice".to_string(),
            story_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "username": "alice", "storyId": null })
        );
    }

    #[test]
    fn test_validate_rejects_index_past_cap() {
        let assignment = LineAssignment::continuation(StoryId(1), "x", None, 6, 5);
        assert!(assignment.validate().unwrap_err().is_protocol());
    }

    #[test]
    fn test_validate_rejects_mixed_signals() {
        let assignment = LineAssignment {
            prev_line: Some("x".to_string()),
            ..LineAssignment::fresh_story()
        };
        assert!(assignment.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_assignment() {
        assert!(LineAssignment::default().validate().is_err());
        assert!(LineAssignment::fresh_story().validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_last_line() {
        let assignment = LineAssignment::continuation(StoryId(1), "x", None, 5, 5);
        assert!(assignment.validate().is_ok());
    }
}
