// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - World Registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core_types::{AsciiText, Principal, RewardAmount, WorldId};
use crate::error::ContractError;
use crate::ids::IdAllocator;

// ─── World ───────────────────────────────────────────────────────────────────

/// A named, owned container for activities and portal endpoints.
///
/// `name`, `description` and `owner` never change after creation. The two
/// counters only move forward through the activity ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct World {
    pub id: WorldId,
    pub name: AsciiText,
    pub description: AsciiText,
    pub owner: Principal,
    pub activity_count: u64,
    pub total_rewards: RewardAmount,
}

// ─── WorldRegistry ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    worlds: BTreeMap<WorldId, World>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new world owned by `owner`. Text is already validated, so the
    /// only failure left is ID exhaustion.
    pub fn create(
        &mut self,
        ids: &mut IdAllocator,
        name: AsciiText,
        description: AsciiText,
        owner: Principal,
    ) -> Result<WorldId, ContractError> {
        let id = ids.next_world_id()?;
        ids.commit_world_id(id);
        self.worlds.insert(id, World {
            id,
            name,
            description,
            owner,
            activity_count: 0,
            total_rewards: RewardAmount::zero(),
        });
        Ok(id)
    }

    pub fn get(&self, id: WorldId) -> Option<&World> {
        self.worlds.get(&id)
    }

    pub fn contains(&self, id: WorldId) -> bool {
        self.worlds.contains_key(&id)
    }

    /// Like [`get`](Self::get) but absence is an error.
    pub fn require(&self, id: WorldId) -> Result<&World, ContractError> {
        self.worlds.get(&id).ok_or(ContractError::NotFound)
    }

    /// Existence check followed by an ownership check.
    pub fn require_owner(&self, id: WorldId, caller: &Principal) -> Result<&World, ContractError> {
        let world = self.require(id)?;
        if &world.owner != caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(world)
    }

    pub(crate) fn get_mut(&mut self, id: WorldId) -> Option<&mut World> {
        self.worlds.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
