//! Story-writing session domain module.
//!
//! A session is one mounted write screen. Its state is a plain value
//! ([`StorySession`]); every change goes through [`transition`], which maps
//! `(state, event)` to the next state plus at most one request the driver
//! must issue. No I/O happens here.
//!
//! # Module Structure
//!
//! - `model`: `StorySession` and the derived `SessionPhase`
//! - `event`: inputs (`SessionEvent`) and outputs (`SessionEffect`)
//! - `machine`: the pure transition function
//! - `view`: the rendering-agnostic write screen (`WriteView`)

mod event;
mod machine;
mod model;
mod view;

pub use event::{SessionEffect, SessionEvent, Transition};
pub use machine::transition;
pub use model::{SessionPhase, StorySession};
pub use view::{PromptView, WriteView};
