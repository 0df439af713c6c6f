//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: the authenticated `User` profile and username cleaning
//! - `identity`: the `IdentityStore` trait that keeps the profile across restarts

mod identity;
mod model;

pub use identity::IdentityStore;
pub use model::{User, clean_name};
