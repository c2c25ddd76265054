//! Model-family graph: child → parent edges for prior inheritance.

use std::collections::{HashMap, HashSet};

use thalamus_core::constants::MAX_FAMILY_DEPTH;
use tracing::warn;

/// Parent lookup for family inheritance. Read-only after construction.
pub struct FamilyGraph {
    parents: HashMap<String, String>,
}

impl FamilyGraph {
    pub fn new(parents: HashMap<String, String>) -> Self {
        Self { parents }
    }

    pub fn parent_of(&self, model: &str) -> Option<&str> {
        self.parents.get(model).map(String::as_str)
    }

    /// Ancestors of `model`, nearest first. The walk is bounded by
    /// depth and stops at the first repeated node, so a miswired graph
    /// can slow resolution down but never hang it.
    pub fn ancestors(&self, model: &str) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(model);
        let mut chain: Vec<&str> = Vec::new();
        let mut current = model;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                warn!(model, parent, "family graph cycle, stopping ascent");
                break;
            }
            chain.push(parent);
            if chain.len() >= MAX_FAMILY_DEPTH {
                break;
            }
            current = parent;
        }
        chain
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
