//! Identity persistence contract.

use async_trait::async_trait;

use super::model::User;
use crate::error::Result;

/// Keeps the authenticated profile under a single key.
///
/// - read at startup: `load`, where `None` means unauthenticated
/// - write on authentication: `save`
/// - clear on re-authentication: `clear`
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn load(&self) -> Result<Option<User>>;

    async fn save(&self, user: &User) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
