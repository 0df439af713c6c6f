//! Authentication use case: verify a handle with the story service and
//! remember the resulting profile.

use std::sync::Arc;

use fable_core::story::StoryGateway;
use fable_core::user::{IdentityStore, User, clean_name};
use fable_core::{FableError, Result};

/// What the login screen says, depending on whether someone is already
/// remembered on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Stranger,
    Imposter,
}

impl Greeting {
    pub fn message(self) -> &'static str {
        match self {
            Greeting::Stranger => "Hi, I don't think we've met! 👋",
            Greeting::Imposter => "So, you're an imposter, huh? 👀",
        }
    }
}

pub struct AuthenticationService {
    gateway: Arc<dyn StoryGateway>,
    identity: Arc<dyn IdentityStore>,
}

impl AuthenticationService {
    pub fn new(gateway: Arc<dyn StoryGateway>, identity: Arc<dyn IdentityStore>) -> Self {
        Self { gateway, identity }
    }

    /// The remembered user, if any.
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.identity.load().await
    }

    pub async fn greeting(&self) -> Result<Greeting> {
        Ok(match self.identity.load().await? {
            Some(_) => Greeting::Imposter,
            None => Greeting::Stranger,
        })
    }

    /// Cleans `raw`, verifies it and persists the returned profile.
    ///
    /// Nothing is written when verification fails.
    pub async fn authenticate(&self, raw: &str) -> Result<User> {
        let username = clean_name(raw);
        if username.is_empty() {
            return Err(FableError::validation("Please enter your username."));
        }

        let user = self.gateway.verify_username(&username).await?;
        self.identity.save(&user).await?;
        tracing::info!("Authenticated @{}", user.username);
        Ok(user)
    }

    /// Forgets the remembered user, then authenticates `raw`.
    pub async fn reauthenticate(&self, raw: &str) -> Result<User> {
        self.identity.clear().await?;
        self.authenticate(raw).await
    }

    pub async fn logout(&self) -> Result<()> {
        tracing::info!("Clearing remembered user");
        self.identity.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_infrastructure::{EngineGateway, InMemoryAssignmentEngine, InMemoryIdentityStore};

    fn service(identity: Arc<InMemoryIdentityStore>) -> AuthenticationService {
        let engine = Arc::new(InMemoryAssignmentEngine::default());
        engine
            .register_user(User::named("Parth").with_full_name("Parth", "Sarin"))
            .unwrap();
        engine.register_user(User::named("alice")).unwrap();
        AuthenticationService::new(Arc::new(EngineGateway::new(engine)), identity)
    }

    #[tokio::test]
    async fn test_authenticate_cleans_and_persists() {
        let identity = Arc::new(InMemoryIdentityStore::new());
        let service = service(identity.clone());

        let user = service.authenticate("  @@Parth ").await.unwrap();

        assert_eq!(user.first_name, "Parth");
        assert_eq!(identity.load().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_unknown_user_writes_nothing() {
        let identity = Arc::new(InMemoryIdentityStore::new());
        let service = service(identity.clone());

        let err = service.authenticate("parth").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "User not found");
        assert_eq!(identity.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_locally() {
        let service = service(Arc::new(InMemoryIdentityStore::new()));
        let err = service.authenticate(" @ ").await.unwrap_err();
        assert_eq!(err, FableError::validation("Please enter your username."));
    }

    #[tokio::test]
    async fn test_reauthenticate_clears_first() {
        let identity = Arc::new(InMemoryIdentityStore::with_user(User::named("alice")));
        let service = service(identity.clone());
        assert_eq!(service.greeting().await.unwrap(), Greeting::Imposter);

        assert!(service.reauthenticate("nobody").await.is_err());
        assert_eq!(identity.load().await.unwrap(), None);
        assert_eq!(service.greeting().await.unwrap(), Greeting::Stranger);

        let user = service.reauthenticate("Parth").await.unwrap();
        assert_eq!(service.current_user().await.unwrap(), Some(user));
    }

    #[test]
    fn test_greeting_text() {
        assert_eq!(Greeting::Stranger.message(), "Hi, I don't think we've met! 👋");
        assert_eq!(Greeting::Imposter.message(), "So, you're an imposter, huh? 👀");
    }
}
