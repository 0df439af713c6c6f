//! File and in-memory storage.

mod atomic_toml;
mod identity_store;

pub use atomic_toml::AtomicTomlFile;
pub use identity_store::{FileIdentityStore, InMemoryIdentityStore};
