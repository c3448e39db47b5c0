//! Revocation policy
//!
//! Whether `revoke_follower` also removes a pending request from the
//! entity, or only an accepted follower edge.

use crate::edge::EdgeScope;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevokePolicy {
    /// Only accepted followers can be revoked; pending requests are left
    /// for decline
    #[default]
    ActiveOnly,
    /// Revoke removes the edge whatever its state
    Any,
}

impl RevokePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevokePolicy::ActiveOnly => "active-only",
            RevokePolicy::Any => "any",
        }
    }

    /// Edges a revoke is allowed to delete
    pub fn scope(&self) -> EdgeScope {
        match self {
            RevokePolicy::ActiveOnly => EdgeScope::Active,
            RevokePolicy::Any => EdgeScope::Any,
        }
    }
}

impl FromStr for RevokePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active-only" | "active" | "accepted" => Ok(RevokePolicy::ActiveOnly),
            "any" | "all" => Ok(RevokePolicy::Any),
            _ => Err(crate::Error::Config(format!("Unknown revoke policy: {}", s))),
        }
    }
}

impl std::fmt::Display for RevokePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
