//! StoryWriteController - async driver for one mounted write screen.
//!
//! The controller owns a [`StorySession`] and feeds it events. Whatever
//! request a transition asks for is sent through the [`StoryGateway`], and
//! its outcome is fed back as the next event until the session settles.

use std::sync::Arc;

use fable_core::session::{
    SessionEffect, SessionEvent, StorySession, Transition, WriteView, transition,
};
use fable_core::story::{ReleaseStoryRequest, StoryGateway};
use fable_core::user::User;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// Drives a story-writing session against a gateway.
///
/// The release is never awaited: it runs on a spawned task. Dropping a
/// mounted controller without calling
/// [`release_on_unload`](Self::release_on_unload) still sends it, provided a
/// tokio runtime is available to spawn it on.
pub struct StoryWriteController {
    gateway: Arc<dyn StoryGateway>,
    session: StorySession,
    session_id: Uuid,
    span: tracing::Span,
    release_task: Option<JoinHandle<()>>,
}

impl StoryWriteController {
    pub fn new(gateway: Arc<dyn StoryGateway>, user: User) -> Self {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "story_session",
            session_id = %session_id,
            username = %user.username
        );
        Self {
            gateway,
            session: StorySession::new(user),
            session_id,
            span,
            release_task: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn session(&self) -> &StorySession {
        &self.session
    }

    pub fn view(&self) -> WriteView {
        WriteView::from(&self.session)
    }

    /// Mounts the screen and acquires the first line. Only the first call
    /// has any effect.
    pub async fn initialize(&mut self) {
        tracing::info!(parent: &self.span, "Mounting write screen");
        self.dispatch(SessionEvent::Mounted).await;
    }

    /// Abandons the current draft and asks for another story.
    pub async fn new_story(&mut self) {
        self.dispatch(SessionEvent::NewStoryRequested).await;
    }

    pub async fn edit_line(&mut self, text: impl Into<String>) {
        self.dispatch(SessionEvent::LineEdited(text.into())).await;
    }

    /// Submits the draft; on success the next line is acquired right away.
    pub async fn submit_line(&mut self) {
        self.dispatch(SessionEvent::SubmitRequested).await;
    }

    /// Acknowledges a focus request once the input has been focused.
    pub async fn consume_focus(&mut self) {
        self.dispatch(SessionEvent::FocusConsumed).await;
    }

    /// Hands the release of the held story to a background task and
    /// returns without waiting for the server. Later calls do nothing.
    pub async fn release_on_unload(&mut self) {
        self.dispatch(SessionEvent::Unloaded).await;
    }

    /// The in-flight release, for callers that want to let it finish before
    /// the runtime shuts down.
    pub fn take_release_task(&mut self) -> Option<JoinHandle<()>> {
        self.release_task.take()
    }

    async fn dispatch(&mut self, event: SessionEvent) {
        let span = self.span.clone();
        self.run(event).instrument(span).await;
    }

    async fn run(&mut self, event: SessionEvent) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            let Transition { session, effect } = transition(&self.session, event);
            self.session = session;

            let Some(effect) = effect else { break };
            next = self.perform(effect).await;
        }
    }

    /// Issues the request for `effect` and maps its outcome to an event.
    async fn perform(&mut self, effect: SessionEffect) -> Option<SessionEvent> {
        match effect {
            SessionEffect::AcquireLine(request) => {
                tracing::debug!(
                    "Acquiring line (story {:?}, {} seen)",
                    request.story_id,
                    request.story_id_history.len()
                );
                match self.gateway.acquire_line(&request).await {
                    Ok(assignment) => {
                        tracing::info!(
                            "Assigned story {:?} (new story: {})",
                            assignment.story_id,
                            assignment.writing_new_story
                        );
                        Some(SessionEvent::AcquireSucceeded(assignment))
                    }
                    Err(e) => {
                        tracing::warn!("Line acquisition failed: {}", e);
                        Some(SessionEvent::AcquireFailed(e.user_message()))
                    }
                }
            }
            SessionEffect::SubmitLine(request) => {
                match self.gateway.submit_line(&request).await {
                    Ok(()) => {
                        tracing::info!("Submitted line to story {:?}", request.story_id);
                        Some(SessionEvent::SubmitSucceeded)
                    }
                    Err(e) => {
                        tracing::warn!("Line submission failed: {}", e);
                        Some(SessionEvent::SubmitFailed(e.user_message()))
                    }
                }
            }
            SessionEffect::ReleaseStory(request) => {
                tracing::info!("Releasing story {:?}", request.story_id);
                self.release_task = spawn_release(self.gateway.clone(), request, &self.span);
                None
            }
        }
    }
}

fn spawn_release(
    gateway: Arc<dyn StoryGateway>,
    request: ReleaseStoryRequest,
    span: &tracing::Span,
) -> Option<JoinHandle<()>> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn(
            async move {
                gateway.release_story(&request).await;
            }
            .instrument(span.clone()),
        )),
        Err(_) => {
            tracing::warn!(
                parent: span,
                "No runtime to release story {:?}",
                request.story_id
            );
            None
        }
    }
}

impl Drop for StoryWriteController {
    fn drop(&mut self) {
        let Transition { effect, .. } = transition(&self.session, SessionEvent::Unloaded);
        let Some(SessionEffect::ReleaseStory(request)) = effect else {
            return;
        };

        tracing::info!(
            parent: &self.span,
            "Releasing story {:?} on drop",
            request.story_id
        );
        spawn_release(self.gateway.clone(), request, &self.span);
    }
}
