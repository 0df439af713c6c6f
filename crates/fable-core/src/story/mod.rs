//! Story assignment domain module.
//!
//! # Module Structure
//!
//! - `model`: story identifiers, assignment replies and the request shapes
//! - `gateway`: the client-side transport contract (`StoryGateway`)
//! - `engine`: the server-side assignment contract (`AssignmentEngine`)

mod engine;
mod gateway;
mod model;

pub use engine::AssignmentEngine;
pub use gateway::StoryGateway;
pub use model::{
    AcquireLineRequest, LineAssignment, ReleaseStoryRequest, StoryId, SubmitLineRequest,
};
