//! The session transition function.

use crate::story::{ReleaseStoryRequest, SubmitLineRequest};

use super::event::{SessionEffect, SessionEvent, Transition};
use super::model::StorySession;

/// Computes the next session state for `event`.
///
/// Gating mirrors what the screen allows: while loading, edits, submits and
/// new-story requests are ignored; after release, everything is ignored
/// (including late replies from requests issued before the unload).
pub fn transition(session: &StorySession, event: SessionEvent) -> Transition {
    if session.released {
        return Transition::unchanged(session);
    }

    match event {
        SessionEvent::Mounted => {
            if session.mounted {
                return Transition::unchanged(session);
            }
            let mut next = session.clone();
            next.mounted = true;
            next.loading = true;
            let request = next.acquire_request();
            Transition::with(next, SessionEffect::AcquireLine(request))
        }

        SessionEvent::NewStoryRequested => {
            if !session.can_request_new_story() {
                return Transition::unchanged(session);
            }
            begin_acquisition(session.clone())
        }

        SessionEvent::LineEdited(text) => {
            if !session.mounted || session.loading {
                return Transition::unchanged(session);
            }
            let mut next = session.clone();
            next.curr_line = text;
            Transition::to(next)
        }

        SessionEvent::SubmitRequested => {
            if !session.can_submit() {
                return Transition::unchanged(session);
            }
            let story_id = if session.writing_new_story {
                None
            } else {
                session.story_id
            };
            let request = SubmitLineRequest {
                username: session.user.username.clone(),
                story_id,
                line: session.curr_line.clone(),
            };
            Transition::with(session.clone(), SessionEffect::SubmitLine(request))
        }

        SessionEvent::AcquireSucceeded(assignment) => {
            let mut next = session.clone();
            next.apply_assignment(assignment);
            Transition::to(next)
        }

        SessionEvent::AcquireFailed(message) => {
            let mut next = session.clone();
            next.loading = false;
            next.error = Some(message);
            Transition::to(next)
        }

        SessionEvent::SubmitSucceeded => {
            let mut next = session.clone();
            next.error = None;
            begin_acquisition(next)
        }

        SessionEvent::SubmitFailed(message) => {
            let mut next = session.clone();
            next.error = Some(message);
            Transition::to(next)
        }

        SessionEvent::FocusConsumed => {
            if !session.focus_requested {
                return Transition::unchanged(session);
            }
            let mut next = session.clone();
            next.focus_requested = false;
            Transition::to(next)
        }

        SessionEvent::Unloaded => {
            let mut next = session.clone();
            next.released = true;
            next.loading = false;
            next.focus_requested = false;
            if !session.mounted {
                return Transition::to(next);
            }
            let request = ReleaseStoryRequest {
                username: next.user.username.clone(),
                story_id: next.story_id,
            };
            Transition::with(next, SessionEffect::ReleaseStory(request))
        }
    }
}

fn begin_acquisition(mut next: StorySession) -> Transition {
    next.loading = true;
    let request = next.acquire_request();
    Transition::with(next, SessionEffect::AcquireLine(request))
}
