//! Client-side transport contract.

use async_trait::async_trait;

use super::model::{AcquireLineRequest, LineAssignment, ReleaseStoryRequest, SubmitLineRequest};
use crate::error::Result;
use crate::user::User;

/// The four operations the game issues against the story service.
///
/// Each call is an independent request/response translation: no retries, no
/// caching, no batching. Sequencing belongs to the controller alone.
#[async_trait]
pub trait StoryGateway: Send + Sync {
    /// Looks up the full profile for a cleaned username.
    async fn verify_username(&self, username: &str) -> Result<User>;

    /// Asks for the next line to continue, avoiding `story_id_history`.
    async fn acquire_line(&self, request: &AcquireLineRequest) -> Result<LineAssignment>;

    /// Stores a finished line. Without a `story_id` the line opens a new story.
    async fn submit_line(&self, request: &SubmitLineRequest) -> Result<()>;

    /// Best-effort lock release at the end of a session.
    ///
    /// Nothing is returned: the caller is going away and cannot act on the
    /// outcome, so implementations log failures and swallow them.
    async fn release_story(&self, request: &ReleaseStoryRequest);
}
