//! Morph references - polymorphic identity for any participating entity
//!
//! Format: `<type>:<key>`
//!
//! Examples:
//! - `user:42`
//! - `page:acme-corp`
//! - `team:7f3a`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (type, key) pair standing in for a reference to any entity kind.
///
/// Both halves are stored verbatim in the edge table, so the pair is what
/// the collaborator's own morph resolution sees when it maps a reference
/// back to a concrete record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MorphRef {
    /// Type discriminator (e.g. `user`)
    pub kind: String,
    /// Primary key of the entity within its type
    pub key: String,
}

impl MorphRef {
    /// Create a new MorphRef
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Parse a `type:key` string into a MorphRef
    ///
    /// The type may not contain `:`; the key may (it is everything after the
    /// first separator).
    pub fn parse(s: &str) -> Result<Self> {
        let (kind, key) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidReference(format!("expected <type>:<key>, got '{}'", s)))?;

        if kind.is_empty() {
            return Err(Error::InvalidReference(format!("missing type in '{}'", s)));
        }
        if key.is_empty() {
            return Err(Error::InvalidReference(format!("missing key in '{}'", s)));
        }

        Ok(Self::new(kind, key))
    }

    /// Convert to the `type:key` string form
    pub fn to_ref_string(&self) -> String {
        format!("{}:{}", self.kind, self.key)
    }

    /// Whether this reference has the given type
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for MorphRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ref_string())
    }
}

impl FromStr for MorphRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MorphRef {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_ref_string())
    }
}

impl<'de> Deserialize<'de> for MorphRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MorphRef::parse(&s).map_err(serde::de::Error::custom)
    }
}
