//! Direct engine access through the transport contract.

use std::sync::Arc;

use async_trait::async_trait;
use fable_core::Result;
use fable_core::story::{
    AcquireLineRequest, AssignmentEngine, LineAssignment, ReleaseStoryRequest, StoryGateway,
    SubmitLineRequest,
};
use fable_core::user::User;

/// A [`StoryGateway`] that skips the network and calls an engine in-process.
///
/// Replies are validated exactly like HTTP replies, and release failures are
/// swallowed the same way.
#[derive(Clone)]
pub struct EngineGateway {
    engine: Arc<dyn AssignmentEngine>,
}

impl EngineGateway {
    pub fn new(engine: Arc<dyn AssignmentEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl StoryGateway for EngineGateway {
    async fn verify_username(&self, username: &str) -> Result<User> {
        self.engine.verify_username(username).await
    }

    async fn acquire_line(&self, request: &AcquireLineRequest) -> Result<LineAssignment> {
        self.engine
            .assign(&request.username, request.story_id, &request.story_id_history)
            .await?
            .validate()
    }

    async fn submit_line(&self, request: &SubmitLineRequest) -> Result<()> {
        self.engine
            .append_line(&request.username, request.story_id, &request.line)
            .await
    }

    async fn release_story(&self, request: &ReleaseStoryRequest) {
        if let Err(e) = self.engine.release(&request.username, request.story_id).await {
            tracing::warn!(
                "Release of story {:?} for @{} failed: {}",
                request.story_id,
                request.username,
                e
            );
        }
    }
}
