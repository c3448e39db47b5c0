//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single polymorphic edge table:
//! - followers(followable_type, followable_id, follower_type, follower_id, accepted, created_at, updated_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
