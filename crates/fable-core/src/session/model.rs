//! Session state value.

use serde::{Deserialize, Serialize};

use crate::story::{AcquireLineRequest, LineAssignment, StoryId};
use crate::user::User;

/// Coarse state of a write screen, derived from [`StorySession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Created but not mounted yet.
    Idle,
    /// An acquisition is in flight; inputs are disabled.
    Loading,
    /// Writing the opening line of a new story.
    ComposingNew,
    /// Continuing someone else's line.
    ComposingContinue,
    /// The last request failed; the message is in `error`.
    Error,
    /// Torn down. Terminal.
    Released,
}

/// Everything one mounted write screen knows.
///
/// Owned by a single controller and never persisted. History only grows and
/// never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySession {
    pub user: User,
    pub story_id: Option<StoryId>,
    pub story_id_history: Vec<StoryId>,
    pub writing_new_story: bool,
    pub prev_line: Option<String>,
    pub prev_author: Option<User>,
    /// Live edit buffer.
    pub curr_line: String,
    pub curr_index: Option<u32>,
    pub max_lines: Option<u32>,
    pub error: Option<String>,
    /// True strictly while an acquisition is in flight.
    pub loading: bool,
    /// Set on each successful assignment; the presentation layer clears it
    /// once it has moved focus to the edit buffer.
    pub focus_requested: bool,
    pub mounted: bool,
    pub released: bool,
}

impl StorySession {
    pub fn new(user: User) -> Self {
        Self {
            user,
            story_id: None,
            story_id_history: Vec::new(),
            writing_new_story: false,
            prev_line: None,
            prev_author: None,
            curr_line: String::new(),
            curr_index: None,
            max_lines: None,
            error: None,
            loading: false,
            focus_requested: false,
            mounted: false,
            released: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.released {
            SessionPhase::Released
        } else if !self.mounted {
            SessionPhase::Idle
        } else if self.loading {
            SessionPhase::Loading
        } else if self.error.is_some() {
            SessionPhase::Error
        } else if self.writing_new_story {
            SessionPhase::ComposingNew
        } else if self.prev_line.is_some() {
            SessionPhase::ComposingContinue
        } else {
            SessionPhase::Idle
        }
    }

    /// Whether there is a line to write, new or continued.
    pub fn has_composition(&self) -> bool {
        self.writing_new_story || self.prev_line.is_some()
    }

    /// `curr_index == max_lines` is the only end-of-story signal.
    pub fn is_last_line(&self) -> bool {
        match (self.curr_index, self.max_lines) {
            (Some(index), Some(max)) if index > 0 => index == max,
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.mounted
            && !self.released
            && !self.loading
            && self.has_composition()
            && !self.curr_line.is_empty()
    }

    pub fn can_request_new_story(&self) -> bool {
        self.mounted && !self.released && !self.loading
    }

    pub fn acquire_request(&self) -> AcquireLineRequest {
        AcquireLineRequest {
            username: self.user.username.clone(),
            story_id: self.story_id,
            story_id_history: self.story_id_history.clone(),
        }
    }

    /// Records a successful assignment.
    ///
    /// Assignment fields are replaced as a group so a fresh start never keeps
    /// a stale `prev_line`. A returned id joins the history once.
    pub(crate) fn apply_assignment(&mut self, assignment: LineAssignment) {
        if let Some(id) = assignment.story_id
            && !self.story_id_history.contains(&id)
        {
            self.story_id_history.push(id);
        }
        self.story_id = assignment.story_id;
        self.prev_line = assignment.prev_line;
        self.prev_author = assignment.prev_author;
        self.writing_new_story = assignment.writing_new_story;
        self.curr_index = assignment.curr_index;
        self.max_lines = assignment.max_lines;
        self.curr_line.clear();
        self.error = None;
        self.loading = false;
        self.focus_requested = true;
    }
}
