use crate::story::{AcquireLineRequest, LineAssignment, ReleaseStoryRequest, SubmitLineRequest};

use super::model::StorySession;

/// Everything that can happen to a write screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The screen was mounted for its user.
    Mounted,
    /// "Get a new story": abandon the current draft and reacquire.
    NewStoryRequested,
    /// The edit buffer changed.
    LineEdited(String),
    SubmitRequested,
    AcquireSucceeded(LineAssignment),
    AcquireFailed(String),
    SubmitSucceeded,
    SubmitFailed(String),
    /// The presentation layer moved focus to the edit buffer.
    FocusConsumed,
    /// The screen is going away.
    Unloaded,
}

/// A request the driver must issue after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    AcquireLine(AcquireLineRequest),
    SubmitLine(SubmitLineRequest),
    /// Fire-and-forget; no event ever answers it.
    ReleaseStory(ReleaseStoryRequest),
}

/// Result of [`super::transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: StorySession,
    pub effect: Option<SessionEffect>,
}

impl Transition {
    pub(crate) fn unchanged(session: &StorySession) -> Self {
        Self {
            session: session.clone(),
            effect: None,
        }
    }

    pub(crate) fn to(session: StorySession) -> Self {
        Self {
            session,
            effect: None,
        }
    }

    pub(crate) fn with(session: StorySession, effect: SessionEffect) -> Self {
        Self {
            session,
            effect: Some(effect),
        }
    }
}
