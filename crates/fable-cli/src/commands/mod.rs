//! Subcommand implementations and the wiring they share.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use fable_application::AuthenticationService;
use fable_core::config::FableConfig;
use fable_core::story::StoryGateway;
use fable_core::user::{IdentityStore, User};
use fable_infrastructure::engine::OPENING_LINES;
use fable_infrastructure::{
    ConfigService, EngineGateway, FileIdentityStore, HttpStoryGateway, InMemoryAssignmentEngine,
};

pub mod auth;
pub mod play;

pub fn load_config(path: Option<PathBuf>) -> FableConfig {
    match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    }
    .get_config()
}

/// Services built once per invocation.
pub struct AppContext {
    pub config: FableConfig,
    pub identity: Arc<dyn IdentityStore>,
    pub gateway: Arc<dyn StoryGateway>,
    /// Present with `--offline`; players must be registered here first.
    pub offline_engine: Option<Arc<InMemoryAssignmentEngine>>,
}

impl AppContext {
    pub fn new(config: FableConfig, offline: bool) -> Result<Self> {
        let identity: Arc<dyn IdentityStore> = match &config.identity.file {
            Some(path) => Arc::new(FileIdentityStore::with_path(path.clone())),
            None => Arc::new(FileIdentityStore::new().context("Cannot locate identity file")?),
        };

        let offline_engine = offline.then(|| {
            Arc::new(InMemoryAssignmentEngine::new(&config.game).with_opening_lines(OPENING_LINES))
        });

        let gateway: Arc<dyn StoryGateway> = match &offline_engine {
            Some(engine) => Arc::new(EngineGateway::new(engine.clone())),
            None => {
                tracing::debug!("Using story service at {}", config.server.base_url);
                Arc::new(HttpStoryGateway::new(config.server.base_url.clone()))
            }
        };

        Ok(Self {
            config,
            identity,
            gateway,
            offline_engine,
        })
    }

    pub fn authentication(&self) -> AuthenticationService {
        AuthenticationService::new(self.gateway.clone(), self.identity.clone())
    }

    /// Makes `user` known to the offline engine. No-op against a server.
    pub fn admit(&self, user: User) {
        if let Some(engine) = &self.offline_engine
            && let Err(e) = engine.register_user(user)
        {
            tracing::debug!("{}", e);
        }
    }
}
