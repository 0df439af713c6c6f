//! Assignment engine implementations.
//!
//! - `in_memory`: a process-local engine following the assignment contract
//! - `loopback`: a `StoryGateway` that calls an engine directly, no network

mod in_memory;
mod loopback;

pub use in_memory::{InMemoryAssignmentEngine, OPENING_LINES};
pub use loopback::EngineGateway;
