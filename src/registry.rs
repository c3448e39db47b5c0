//! Model registry - capabilities by morph type
//!
//! Application code usually implements [`Participant`](crate::Participant)
//! on its own types. Callers that only hold a `type:key` string (the CLI,
//! job payloads) resolve it here instead.

use crate::capability::{Capabilities, Model};
use crate::config::ModelConfig;
use crate::morph::MorphRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    types: HashMap<String, Capabilities>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `[[models]]` config entries
    ///
    /// A type listed twice keeps the union of its capabilities.
    pub fn from_config(models: &[ModelConfig]) -> Self {
        let mut registry = Self::new();
        for model in models {
            registry.register(&model.kind, model.capabilities());
        }
        registry
    }

    pub fn register(&mut self, kind: &str, capabilities: Capabilities) {
        let entry = self.types.entry(kind.to_string()).or_default();
        entry.following |= capabilities.following;
        entry.followable |= capabilities.followable;
    }

    /// Capabilities of a type; unknown types have none
    pub fn capabilities_of(&self, kind: &str) -> Capabilities {
        self.types.get(kind).copied().unwrap_or_default()
    }

    /// Attach the registered capabilities to a reference
    pub fn resolve(&self, reference: MorphRef) -> Model {
        let capabilities = self.capabilities_of(&reference.kind);
        Model::new(reference, capabilities)
    }

    /// Registered type names, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.types.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}
