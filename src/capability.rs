//! Capabilities - what an entity may do in the follow graph
//!
//! Every participant falls into one or both of:
//! - `Following`: the entity can follow others (source side)
//! - `Followable`: the entity can be followed (target side)
//!
//! Operations that take another entity check its capabilities before
//! touching storage and fail softly (`false`) when it has neither.

use crate::morph::MorphRef;
use serde::{Deserialize, Serialize};

/// A single participant capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Can follow other entities
    Following,
    /// Can be followed by other entities
    Followable,
}

impl Capability {
    /// Get the string representation of the capability
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Following => "following",
            Capability::Followable => "followable",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of capabilities an entity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub following: bool,
    pub followable: bool,
}

impl Capabilities {
    /// No capabilities; fails every boundary check
    pub const fn none() -> Self {
        Self { following: false, followable: false }
    }

    /// Both sides of the relationship
    pub const fn both() -> Self {
        Self { following: true, followable: true }
    }

    /// Add a capability
    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Following => self.following = true,
            Capability::Followable => self.followable = true,
        }
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Following => self.following,
            Capability::Followable => self.followable,
        }
    }

    /// Whether the entity takes part in the follow graph at all
    pub fn is_participant(&self) -> bool {
        self.following || self.followable
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// An entity that can appear on either end of a follow edge.
///
/// Implement this for application types; the graph only ever reads the
/// morph reference and the capability set.
pub trait Participant {
    /// Stable (type, key) identity of the entity
    fn morph_ref(&self) -> MorphRef;

    /// What the entity is allowed to do
    fn capabilities(&self) -> Capabilities;

    /// Boundary check performed before any store access
    fn is_participant(&self) -> bool {
        self.capabilities().is_participant()
    }
}

/// A reference paired with its capabilities.
///
/// This is what the registry hands out for `type:key` strings and what
/// tests use in place of application types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Model {
    pub reference: MorphRef,
    pub capabilities: Capabilities,
}

impl Model {
    pub fn new(reference: MorphRef, capabilities: Capabilities) -> Self {
        Self { reference, capabilities }
    }

    /// A model that can both follow and be followed
    pub fn participant(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(MorphRef::new(kind, key), Capabilities::both())
    }

    /// A model outside the follow graph
    pub fn outsider(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(MorphRef::new(kind, key), Capabilities::none())
    }
}

impl Participant for Model {
    fn morph_ref(&self) -> MorphRef {
        self.reference.clone()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}
