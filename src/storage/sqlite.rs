//! SQLite storage implementation

use std::path::Path;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::edge::{EdgeScope, EdgeState, FollowEdge};
use crate::morph::MorphRef;
use super::schema;

const EDGE_COLUMNS: &str =
    "id, followable_type, followable_id, follower_type, follower_id, accepted, created_at, updated_at";

/// SQLite-backed storage for follow edges
///
/// Every method takes the follower (source) before the followable (target),
/// whichever side of the relationship is calling.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::info!("Opened follow store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Edge Writes ==========

    /// Insert a new edge in the given state
    ///
    /// Returns `false` without touching the existing row when the pair is
    /// already connected, whatever that row's state.
    pub fn insert_edge(&self, follower: &MorphRef, followable: &MorphRef, state: EdgeState) -> Result<bool> {
        let now = Utc::now();
        let inserted = self.conn.execute(
            r#"
            INSERT INTO followers (followable_type, followable_id, follower_type, follower_id, accepted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT(followable_type, followable_id, follower_type, follower_id) DO NOTHING
            "#,
            params![
                followable.kind,
                followable.key,
                follower.kind,
                follower.key,
                state.accepted(),
                now,
            ],
        )?;

        tracing::debug!("insert {} -> {} ({}): {}", follower, followable, state, inserted > 0);
        Ok(inserted > 0)
    }

    /// Flip a pending edge to accepted
    ///
    /// The update only matches `accepted = 0`, so an edge that is missing or
    /// already accepted reports `false`.
    pub fn accept_edge(&self, follower: &MorphRef, followable: &MorphRef) -> Result<bool> {
        let updated = self.conn.execute(
            r#"
            UPDATE followers SET accepted = 1, updated_at = ?5
            WHERE followable_type = ?1 AND followable_id = ?2
              AND follower_type = ?3 AND follower_id = ?4
              AND accepted = 0
            "#,
            params![followable.kind, followable.key, follower.kind, follower.key, Utc::now()],
        )?;

        tracing::debug!("accept {} -> {}: {}", follower, followable, updated > 0);
        Ok(updated > 0)
    }

    /// Delete the edge between an ordered pair, limited to `scope`
    ///
    /// Symmetric primitive used by both sides of the relationship. Returns
    /// the number of rows removed.
    pub fn remove_edge(&self, follower: &MorphRef, followable: &MorphRef, scope: EdgeScope) -> Result<usize> {
        let removed = self.conn.execute(
            r#"
            DELETE FROM followers
            WHERE followable_type = ?1 AND followable_id = ?2
              AND follower_type = ?3 AND follower_id = ?4
              AND (?5 IS NULL OR accepted = ?5)
            "#,
            params![
                followable.kind,
                followable.key,
                follower.kind,
                follower.key,
                scope.accepted_filter(),
            ],
        )?;

        tracing::debug!("remove {} -> {} ({:?}): {} row(s)", follower, followable, scope, removed);
        Ok(removed)
    }

    // ========== Edge Reads ==========

    /// Get the edge between an ordered pair, in any state
    pub fn find_edge(&self, follower: &MorphRef, followable: &MorphRef) -> Result<Option<FollowEdge>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {EDGE_COLUMNS} FROM followers
                     WHERE followable_type = ?1 AND followable_id = ?2
                       AND follower_type = ?3 AND follower_id = ?4"
                ),
                params![followable.kind, followable.key, follower.kind, follower.key],
                |row| self.row_to_edge(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Whether an edge between the pair exists in the given state
    pub fn has_edge(&self, follower: &MorphRef, followable: &MorphRef, state: EdgeState) -> Result<bool> {
        Ok(self
            .find_edge(follower, followable)?
            .is_some_and(|edge| edge.state() == state))
    }

    /// Edges pointing at a target, from followers of one type
    ///
    /// Ordered by creation.
    pub fn edges_to(&self, followable: &MorphRef, follower_type: &str, state: EdgeState) -> Result<Vec<FollowEdge>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EDGE_COLUMNS} FROM followers
             WHERE followable_type = ?1 AND followable_id = ?2
               AND follower_type = ?3 AND accepted = ?4
             ORDER BY id"
        ))?;

        let edges = stmt
            .query_map(
                params![followable.kind, followable.key, follower_type, state.accepted()],
                |row| self.row_to_edge(row),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(edges)
    }

    /// Edges leaving a source, towards targets of one type
    ///
    /// Ordered by creation.
    pub fn edges_from(&self, follower: &MorphRef, followable_type: &str, state: EdgeState) -> Result<Vec<FollowEdge>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EDGE_COLUMNS} FROM followers
             WHERE follower_type = ?1 AND follower_id = ?2
               AND followable_type = ?3 AND accepted = ?4
             ORDER BY id"
        ))?;

        let edges = stmt
            .query_map(
                params![follower.kind, follower.key, followable_type, state.accepted()],
                |row| self.row_to_edge(row),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(edges)
    }

    /// Count edges in a scope
    pub fn count_edges(&self, scope: EdgeScope) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE (?1 IS NULL OR accepted = ?1)",
            params![scope.accepted_filter()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a FollowEdge
    fn row_to_edge(&self, row: &rusqlite::Row) -> rusqlite::Result<FollowEdge> {
        let created_at: DateTime<Utc> = row.get(6)?;
        let updated_at: DateTime<Utc> = row.get(7)?;

        Ok(FollowEdge {
            id: row.get(0)?,
            followable: MorphRef::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
            follower: MorphRef::new(row.get::<_, String>(3)?, row.get::<_, String>(4)?),
            accepted: row.get(5)?,
            created_at,
            updated_at,
        })
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction, e.g. around a check-then-act pair
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN IMMEDIATE TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let (targets, sources): (i64, i64) = self.conn.query_row(
            r#"
            SELECT
                (SELECT COUNT(*) FROM (SELECT DISTINCT followable_type, followable_id FROM followers)),
                (SELECT COUNT(*) FROM (SELECT DISTINCT follower_type, follower_id FROM followers))
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(DbStats {
            edges: self.count_edges(EdgeScope::Any)?,
            active: self.count_edges(EdgeScope::Active)?,
            pending: self.count_edges(EdgeScope::Pending)?,
            followables: targets as usize,
            followers: sources as usize,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub edges: usize,
    pub active: usize,
    pub pending: usize,
    /// Distinct targets with at least one edge
    pub followables: usize,
    /// Distinct sources with at least one edge
    pub followers: usize,
}
