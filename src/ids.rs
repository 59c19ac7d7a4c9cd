// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Identifier Allocation

//! World IDs come from one global counter. Activity IDs are derived from the
//! owning world's `activity_count`, so there is no separate per-world counter
//! to drift out of sync.

use crate::core_types::{ActivityId, WorldId};
use crate::error::ContractError;
use crate::registry::World;

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last_world_id: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ID the next world will receive. Does not consume it.
    pub fn next_world_id(&self) -> Result<WorldId, ContractError> {
        self.last_world_id
            .checked_add(1)
            .map(WorldId)
            .ok_or(ContractError::InvalidInput)
    }

    /// Mark `id` as issued. Must be the value returned by `next_world_id`.
    pub(crate) fn commit_world_id(&mut self, id: WorldId) {
        debug_assert_eq!(id.0, self.last_world_id + 1);
        self.last_world_id = id.0;
    }

    /// The ID the next activity in `world` will receive.
    pub fn next_activity_id(world: &World) -> Result<ActivityId, ContractError> {
        world
            .activity_count
            .checked_add(1)
            .map(ActivityId)
            .ok_or(ContractError::InvalidInput)
    }

    /// Highest world ID issued so far, 0 when none.
    pub fn last_world_id(&self) -> u64 {
        self.last_world_id
    }
}
