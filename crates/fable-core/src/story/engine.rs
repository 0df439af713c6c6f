//! Server-side assignment contract.

use async_trait::async_trait;

use super::model::{LineAssignment, StoryId};
use crate::error::Result;
use crate::user::User;

/// Story selection and per-story locking, as observed by the client.
///
/// Implementations must uphold:
/// - a returned `story_id` is never one listed in `history`
/// - the returned story is locked to `username` until a line is appended,
///   the lock is released, or the lock goes stale
/// - `curr_index <= max_lines`; a story at its cap is never offered
/// - with nothing eligible, the reply is [`LineAssignment::fresh_story`]
/// - `release` of an unknown or already released story is a no-op
#[async_trait]
pub trait AssignmentEngine: Send + Sync {
    async fn verify_username(&self, username: &str) -> Result<User>;

    async fn assign(
        &self,
        username: &str,
        story_id: Option<StoryId>,
        history: &[StoryId],
    ) -> Result<LineAssignment>;

    /// Appends `line` to the locked story, or opens a new story when
    /// `story_id` is `None`.
    async fn append_line(
        &self,
        username: &str,
        story_id: Option<StoryId>,
        line: &str,
    ) -> Result<()>;

    async fn release(&self, username: &str, story_id: Option<StoryId>) -> Result<()>;
}
