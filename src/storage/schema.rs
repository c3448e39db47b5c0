//! Database schema definitions

/// SQL to create the followers edge table
///
/// One row per ordered (follower, followable) pair.
pub const CREATE_FOLLOWERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS followers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    followable_type TEXT NOT NULL,
    followable_id TEXT NOT NULL,
    follower_type TEXT NOT NULL,
    follower_id TEXT NOT NULL,
    accepted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(followable_type, followable_id, follower_type, follower_id)
)
"#;

/// Rejects any update that would turn an accepted edge back into a request
pub const CREATE_ACCEPTED_FORWARD_TRIGGER: &str = r#"
CREATE TRIGGER IF NOT EXISTS followers_accepted_forward_only
BEFORE UPDATE OF accepted ON followers
WHEN OLD.accepted = 1 AND NEW.accepted = 0
BEGIN
    SELECT RAISE(ABORT, 'accepted edge cannot return to pending');
END
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_followers_followable ON followers(followable_type, followable_id, accepted)",
    "CREATE INDEX IF NOT EXISTS idx_followers_follower ON followers(follower_type, follower_id, accepted)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_FOLLOWERS_TABLE, CREATE_ACCEPTED_FORWARD_TRIGGER];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
