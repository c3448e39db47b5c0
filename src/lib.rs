//! # followkit - Polymorphic follow graph
//!
//! Attaches follow semantics to arbitrary application entities.
//!
//! followkit provides:
//! - Polymorphic `type:key` references for any entity kind
//! - Capability checks at the boundary (can follow / can be followed)
//! - SQLite-backed storage of follow edges with pending/accepted state
//! - A target-side view (followers, requests, accept/decline/revoke)
//! - A source-side view (follow, request, unfollow, cancel)

pub mod morph;
pub mod capability;
pub mod edge;
pub mod policy;
pub mod registry;
pub mod storage;
pub mod followable;
pub mod following;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use morph::MorphRef;
pub use capability::{Capabilities, Capability, Model, Participant};
pub use edge::{EdgeScope, EdgeState, FollowEdge};
pub use policy::RevokePolicy;
pub use registry::ModelRegistry;
pub use storage::SqliteStore;
pub use followable::Followable;
pub use following::Follower;

/// Result type alias for followkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for followkit operations
///
/// Business outcomes (wrong participant type, missing edge, nothing to do) are
/// reported as `false` by the graph operations and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(String),
}
