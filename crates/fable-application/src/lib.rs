//! Application layer for Fable.
//!
//! Use cases that drive the domain session against a story gateway and an
//! identity store.

pub mod authentication_service;
pub mod story_write_controller;

pub use authentication_service::{AuthenticationService, Greeting};
pub use story_write_controller::StoryWriteController;
