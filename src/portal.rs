// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Portal Graph

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core_types::{Principal, WorldId};
use crate::error::ContractError;
use crate::registry::WorldRegistry;

// ─── PortalKey ───────────────────────────────────────────────────────────────

/// Unordered world pair, normalized so the smaller ID comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortalKey(WorldId, WorldId);

impl PortalKey {
    /// `None` for a self-link.
    pub fn new(a: WorldId, b: WorldId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> WorldId {
        self.0
    }

    pub fn high(&self) -> WorldId {
        self.1
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: WorldId) -> Option<WorldId> {
        if self.0 == id {
            Some(self.1)
        } else if self.1 == id {
            Some(self.0)
        } else {
            None
        }
    }
}

// ─── Portal ──────────────────────────────────────────────────────────────────

/// An undirected link between two distinct worlds. `world_a < world_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Portal {
    pub world_a: WorldId,
    pub world_b: WorldId,
    pub creator: Principal,
}

// ─── PortalGraph ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PortalGraph {
    portals: BTreeMap<PortalKey, Portal>,
}

impl PortalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `a` and `b`. Self-links are rejected before existence is
    /// checked; duplicates are detected in either order.
    pub fn create(
        &mut self,
        worlds: &WorldRegistry,
        a: WorldId,
        b: WorldId,
        caller: &Principal,
    ) -> Result<PortalKey, ContractError> {
        let key = PortalKey::new(a, b).ok_or(ContractError::InvalidInput)?;
        if !worlds.contains(a) || !worlds.contains(b) {
            return Err(ContractError::NotFound);
        }
        if self.portals.contains_key(&key) {
            return Err(ContractError::AlreadyExists);
        }
        self.portals.insert(key, Portal {
            world_a: key.low(),
            world_b: key.high(),
            creator: caller.clone(),
        });
        Ok(key)
    }

    /// Order-independent lookup.
    pub fn get(&self, a: WorldId, b: WorldId) -> Option<&Portal> {
        PortalKey::new(a, b).and_then(|key| self.portals.get(&key))
    }

    /// Worlds linked to `id`, ascending.
    pub fn neighbours(&self, id: WorldId) -> Vec<WorldId> {
        let mut out: Vec<WorldId> = self.portals.keys().filter_map(|k| k.other(id)).collect();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortalKey, &Portal)> {
        self.portals.iter()
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
