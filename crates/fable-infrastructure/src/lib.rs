//! Infrastructure layer for Fable.
//!
//! Concrete implementations of the domain contracts: the HTTP transport,
//! identity persistence, configuration loading and an in-memory assignment
//! engine used for offline play and tests.

pub mod config_service;
pub mod dto;
pub mod engine;
pub mod http_gateway;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::engine::{EngineGateway, InMemoryAssignmentEngine};
pub use crate::http_gateway::HttpStoryGateway;
pub use crate::storage::{FileIdentityStore, InMemoryIdentityStore};
