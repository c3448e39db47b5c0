//! Edge types - one row of the `followers` table
//!
//! An edge always points from a follower (source) to a followable (target)
//! and is in one of two states:
//! - `Requested`: pending follow request (`accepted = false`)
//! - `Active`: accepted follower (`accepted = true`)
//!
//! The only transition between them is `Requested -> Active`. Everything
//! else is creation or deletion.

use crate::morph::MorphRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeState {
    Requested,
    Active,
}

impl EdgeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeState::Requested => "requested",
            EdgeState::Active => "active",
        }
    }

    /// Map the `accepted` column to a state
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted {
            EdgeState::Active
        } else {
            EdgeState::Requested
        }
    }

    /// Value of the `accepted` column for this state
    pub fn accepted(&self) -> bool {
        matches!(self, EdgeState::Active)
    }
}

impl std::fmt::Display for EdgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which edges a delete or count applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeScope {
    Pending,
    Active,
    Any,
}

impl EdgeScope {
    /// Required value of `accepted`, or `None` when either matches
    pub fn accepted_filter(&self) -> Option<bool> {
        match self {
            EdgeScope::Pending => Some(false),
            EdgeScope::Active => Some(true),
            EdgeScope::Any => None,
        }
    }
}

impl From<EdgeState> for EdgeScope {
    fn from(state: EdgeState) -> Self {
        match state {
            EdgeState::Requested => EdgeScope::Pending,
            EdgeState::Active => EdgeScope::Active,
        }
    }
}

/// A follow edge: `follower` follows (or asked to follow) `followable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
    /// Surrogate key; increases with creation order
    pub id: i64,
    /// Target of the edge
    pub followable: MorphRef,
    /// Source of the edge
    pub follower: MorphRef,
    /// `true` = active follower, `false` = pending request
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FollowEdge {
    pub fn state(&self) -> EdgeState {
        EdgeState::from_accepted(self.accepted)
    }

    pub fn is_pending(&self) -> bool {
        !self.accepted
    }

    pub fn is_active(&self) -> bool {
        self.accepted
    }

    /// Whether the edge connects the given ordered pair
    pub fn connects(&self, follower: &MorphRef, followable: &MorphRef) -> bool {
        &self.follower == follower && &self.followable == followable
    }
}

impl PartialEq for FollowEdge {
    fn eq(&self, other: &Self) -> bool {
        self.followable == other.followable
            && self.follower == other.follower
            && self.accepted == other.accepted
    }
}

impl Eq for FollowEdge {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edge(accepted: bool) -> FollowEdge {
        let now = Utc::now();
        FollowEdge {
            id: 1,
            followable: MorphRef::new("user", "a"),
            follower: MorphRef::new("user", "b"),
            accepted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_state_from_accepted() {
        assert_eq!(sample_edge(false).state(), EdgeState::Requested);
        assert_eq!(sample_edge(true).state(), EdgeState::Active);
        assert!(sample_edge(false).is_pending());
    }

    #[test]
    fn test_scope_filters() {
        assert_eq!(EdgeScope::Any.accepted_filter(), None);
        assert_eq!(EdgeScope::Pending.accepted_filter(), Some(false));
        assert_eq!(EdgeScope::from(EdgeState::Active), EdgeScope::Active);
    }

    #[test]
    fn test_connects_is_directional() {
        let edge = sample_edge(true);
        let a = MorphRef::new("user", "a");
        let b = MorphRef::new("user", "b");
        assert!(edge.connects(&b, &a));
        assert!(!edge.connects(&a, &b));
    }
}
