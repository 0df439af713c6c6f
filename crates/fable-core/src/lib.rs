//! Domain layer for Fable.
//!
//! Players are shown one line of an in-progress story and write the next
//! one. This crate holds the session state machine that drives a write
//! screen, the contracts it needs from the outside world, and the shared
//! error and configuration types.

pub mod config;
pub mod error;
pub mod session;
pub mod story;
pub mod user;

pub use error::{FableError, Result};
