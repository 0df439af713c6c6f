//! Identity persistence.

use std::path::PathBuf;

use async_trait::async_trait;
use fable_core::Result;
use fable_core::user::{IdentityStore, User};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::atomic_toml::AtomicTomlFile;
use crate::paths::FablePaths;

/// On-disk shape: a single `[user]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityDocument {
    user: User,
}

/// Keeps the authenticated user in `identity.toml`.
pub struct FileIdentityStore {
    file: AtomicTomlFile<IdentityDocument>,
}

impl FileIdentityStore {
    /// Uses the default location (`~/.config/fable/identity.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(FablePaths::identity_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

#[async_trait]
impl IdentityStore for FileIdentityStore {
    async fn load(&self) -> Result<Option<User>> {
        Ok(self.file.load()?.map(|document| document.user))
    }

    async fn save(&self, user: &User) -> Result<()> {
        tracing::debug!("Persisting identity for @{} to {:?}", user.username, self.path());
        self.file.save(&IdentityDocument { user: user.clone() })
    }

    async fn clear(&self) -> Result<()> {
        tracing::debug!("Clearing identity at {:?}", self.path());
        self.file.remove()
    }
}

/// Process-local identity, for tests and throwaway sessions.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    user: RwLock<Option<User>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn load(&self) -> Result<Option<User>> {
        Ok(self.user.read().await.clone())
    }

    async fn save(&self, user: &User) -> Result<()> {
        *self.user.write().await = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.user.write().await = None;
        Ok(())
    }
}
