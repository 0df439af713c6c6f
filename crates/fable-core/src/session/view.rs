//! Rendering-agnostic description of the write screen.

use serde::Serialize;

use super::model::{SessionPhase, StorySession};

pub const NEW_STORY_PLACEHOLDER: &str = "> Start a new story...";
pub const CONTINUE_PLACEHOLDER: &str = "> Continue the story...";
pub const LAST_LINE_WARNING: &str = "This is the last line!";

/// The line being continued, with its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub line: String,
    /// `@username` of the previous author, when known.
    pub attribution: Option<String>,
}

/// What a front end needs to draw one frame of the write screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteView {
    pub phase: SessionPhase,
    pub error_banner: Option<String>,
    pub prompt: Option<PromptView>,
    pub show_write_box: bool,
    pub placeholder: &'static str,
    pub draft: String,
    pub progress: Option<String>,
    pub last_line_warning: Option<&'static str>,
    pub inputs_enabled: bool,
    pub can_submit: bool,
    pub can_request_new_story: bool,
    pub focus_input: bool,
}

impl From<&StorySession> for WriteView {
    fn from(session: &StorySession) -> Self {
        let prompt = session.prev_line.as_ref().map(|line| PromptView {
            line: line.clone(),
            attribution: session
                .prev_author
                .as_ref()
                .map(|author| format!("@{}", author.username)),
        });

        let progress = match (session.curr_index, session.max_lines) {
            (Some(index), Some(max)) if index > 0 => Some(format!("Line {index} of {max}")),
            _ => None,
        };

        let placeholder = if session.writing_new_story {
            NEW_STORY_PLACEHOLDER
        } else {
            CONTINUE_PLACEHOLDER
        };

        Self {
            phase: session.phase(),
            error_banner: session
                .error
                .as_ref()
                .map(|error| format!("Something went wrong: {error}")),
            prompt,
            show_write_box: session.has_composition(),
            placeholder,
            draft: session.curr_line.clone(),
            progress,
            last_line_warning: session.is_last_line().then_some(LAST_LINE_WARNING),
            inputs_enabled: session.mounted && !session.loading && !session.released,
            can_submit: session.can_submit(),
            can_request_new_story: session.can_request_new_story(),
            focus_input: session.focus_requested,
        }
    }
}
