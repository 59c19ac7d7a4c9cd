// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Activity Ledger

//! Activities and the reward accounting they drive.
//!
//! Two invariants hold after every call:
//!
//! ```text
//! world.total_rewards = Σ activity.participants × activity.reward   (per world)
//! Σ earned(principal)  = Σ world.total_rewards                      (globally)
//! ```
//!
//! Participation computes every new counter with checked arithmetic first and
//! only writes once all of them are known, so an overflow leaves the ledger
//! untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core_types::{ActivityId, AsciiText, Principal, RewardAmount, WorldId};
use crate::error::ContractError;
use crate::ids::IdAllocator;
use crate::registry::WorldRegistry;

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// A reward-bearing action scoped to one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Activity {
    pub world_id: WorldId,
    pub activity_id: ActivityId,
    pub name: AsciiText,
    pub description: AsciiText,
    /// Reward credited per participation.
    pub reward: RewardAmount,
    /// Successful participations so far (not distinct callers).
    pub participants: u64,
}

/// Result of a single participation, for logging and receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participation {
    pub participants: u64,
    pub world_total_rewards: RewardAmount,
    pub earned_by_caller: RewardAmount,
}

// ---------------------------------------------------------------------------
// ActivityLedger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ActivityLedger {
    activities: BTreeMap<(WorldId, ActivityId), Activity>,
    earned: BTreeMap<Principal, RewardAmount>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an activity in `world_id`. Only the world's owner may do so.
    pub fn create(
        &mut self,
        worlds: &mut WorldRegistry,
        world_id: WorldId,
        name: AsciiText,
        description: AsciiText,
        reward: RewardAmount,
        caller: &Principal,
    ) -> Result<ActivityId, ContractError> {
        let world = worlds.require_owner(world_id, caller)?;
        let activity_id = IdAllocator::next_activity_id(world)?;

        let world = worlds.get_mut(world_id).ok_or(ContractError::NotFound)?;
        world.activity_count = activity_id.0;
        self.activities.insert((world_id, activity_id), Activity {
            world_id,
            activity_id,
            name,
            description,
            reward,
            participants: 0,
        });
        Ok(activity_id)
    }

    /// Record one participation by `caller`. Repeat participation is allowed.
    pub fn participate(
        &mut self,
        worlds: &mut WorldRegistry,
        world_id: WorldId,
        activity_id: ActivityId,
        caller: &Principal,
    ) -> Result<Participation, ContractError> {
        let activity = self
            .activities
            .get(&(world_id, activity_id))
            .ok_or(ContractError::NotFound)?;
        let world = worlds.require(world_id)?;

        let participants = activity
            .participants
            .checked_add(1)
            .ok_or(ContractError::InvalidInput)?;
        let world_total_rewards = world.total_rewards.checked_add(activity.reward)?;
        let earned_by_caller = self
            .earned_by(caller)
            .checked_add(activity.reward)?;

        // Everything validated; apply together.
        if let Some(activity) = self.activities.get_mut(&(world_id, activity_id)) {
            activity.participants = participants;
        }
        if let Some(world) = worlds.get_mut(world_id) {
            world.total_rewards = world_total_rewards;
        }
        self.earned.insert(caller.clone(), earned_by_caller);

        Ok(Participation { participants, world_total_rewards, earned_by_caller })
    }

    pub fn get(&self, world_id: WorldId, activity_id: ActivityId) -> Option<&Activity> {
        self.activities.get(&(world_id, activity_id))
    }

    /// Activities of one world in ID order.
    pub fn in_world(&self, world_id: WorldId) -> impl Iterator<Item = &Activity> {
        self.activities
            .range((world_id, ActivityId(0))..=(world_id, ActivityId(u64::MAX)))
            .map(|(_, a)| a)
    }

    /// Total reward units `principal` has earned. Zero if never participated.
    pub fn earned_by(&self, principal: &Principal) -> RewardAmount {
        self.earned.get(principal).copied().unwrap_or_default()
    }

    pub fn earnings(&self) -> impl Iterator<Item = (&Principal, &RewardAmount)> {
        self.earned.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> AsciiText {
        AsciiText::parse(s, 64).expect("test: text")
    }

    fn setup() -> (IdAllocator, WorldRegistry, ActivityLedger, WorldId) {
        let mut ids = IdAllocator::new();
        let mut worlds = WorldRegistry::new();
        let world = worlds
            .create(&mut ids, text("Activity World"), text("A world with activities"), "deployer".into())
            .expect("test: world");
        (ids, worlds, ActivityLedger::new(), world)
    }

    #[test]
    fn first_activity_gets_id_one() {
        let (_, mut worlds, mut ledger, world) = setup();
        let id = ledger
            .create(&mut worlds, world, text("Test Activity"), text("An activity with rewards"),
                RewardAmount(100), &"deployer".into())
            .expect("test: create");
        assert_eq!(id, ActivityId(1));
        assert_eq!(worlds.get(world).map(|w| w.activity_count), Some(1));
        let activity = ledger.get(world, id).expect("test: stored");
        assert_eq!(activity.participants, 0);
        assert_eq!(activity.reward, RewardAmount(100));
    }

    #[test]
    fn activity_ids_are_scoped_per_world() {
        let (mut ids, mut worlds, mut ledger, first) = setup();
        let second = worlds
            .create(&mut ids, text("Other"), text("x"), "deployer".into())
            .expect("test: second world");
        let owner = Principal::from("deployer");
        for _ in 0..3 {
            ledger.create(&mut worlds, first, text("a"), text("b"), RewardAmount(1), &owner)
                .expect("test: first world activity");
        }
        let id = ledger
            .create(&mut worlds, second, text("a"), text("b"), RewardAmount(1), &owner)
            .expect("test: second world activity");
        assert_eq!(id, ActivityId(1));
        assert_eq!(ledger.in_world(first).count(), 3);
        assert_eq!(ledger.in_world(second).count(), 1);
    }

    #[test]
    fn create_in_missing_world_is_not_found() {
        let (_, mut worlds, mut ledger, world) = setup();
        let err = ledger
            .create(&mut worlds, WorldId(42), text("a"), text("b"), RewardAmount(1), &"deployer".into())
            .expect_err("test: missing world");
        assert_eq!(err, ContractError::NotFound);
        assert_eq!(worlds.get(world).map(|w| w.activity_count), Some(0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn non_owner_cannot_create() {
        let (_, mut worlds, mut ledger, world) = setup();
        let err = ledger
            .create(&mut worlds, world, text("a"), text("b"), RewardAmount(1), &"wallet_1".into())
            .expect_err("test: non-owner");
        assert_eq!(err, ContractError::Unauthorized);
        assert_eq!(worlds.get(world).map(|w| w.activity_count), Some(0));
    }

    #[test]
    fn participation_accumulates_rewards() {
        let (_, mut worlds, mut ledger, world) = setup();
        let id = ledger
            .create(&mut worlds, world, text("a"), text("b"), RewardAmount(100), &"deployer".into())
            .expect("test: create");
        let player = Principal::from("wallet_1");
        for n in 1..=4 {
            let p = ledger.participate(&mut worlds, world, id, &player).expect("test: participate");
            assert_eq!(p.participants, n);
            assert_eq!(p.earned_by_caller, RewardAmount(100 * u128::from(n)));
            assert_eq!(p.world_total_rewards, p.earned_by_caller);
        }
        assert_eq!(ledger.get(world, id).map(|a| a.participants), Some(4));
        assert_eq!(worlds.get(world).map(|w| w.total_rewards), Some(RewardAmount(400)));
        assert_eq!(ledger.earned_by(&player), RewardAmount(400));
        assert_eq!(ledger.earned_by(&"wallet_2".into()), RewardAmount::zero());
    }

    #[test]
    fn owner_may_participate() {
        let (_, mut worlds, mut ledger, world) = setup();
        let owner = Principal::from("deployer");
        let id = ledger
            .create(&mut worlds, world, text("a"), text("b"), RewardAmount(5), &owner)
            .expect("test: create");
        assert!(ledger.participate(&mut worlds, world, id, &owner).is_ok());
    }

    #[test]
    fn participate_unknown_activity_is_not_found() {
        let (_, mut worlds, mut ledger, world) = setup();
        let err = ledger
            .participate(&mut worlds, world, ActivityId(1), &"wallet_1".into())
            .expect_err("test: no activity");
        assert_eq!(err, ContractError::NotFound);
    }

    #[test]
    fn overflow_leaves_ledger_untouched() {
        let (_, mut worlds, mut ledger, world) = setup();
        let owner = Principal::from("deployer");
        let id = ledger
            .create(&mut worlds, world, text("a"), text("b"), RewardAmount(u128::MAX), &owner)
            .expect("test: create");
        ledger.participate(&mut worlds, world, id, &"wallet_1".into()).expect("test: first");

        let err = ledger
            .participate(&mut worlds, world, id, &"wallet_2".into())
            .expect_err("test: overflow");
        assert_eq!(err, ContractError::InvalidInput);
        assert_eq!(ledger.get(world, id).map(|a| a.participants), Some(1));
        assert_eq!(worlds.get(world).map(|w| w.total_rewards), Some(RewardAmount(u128::MAX)));
        assert!(ledger.earned_by(&"wallet_2".into()).is_zero());
    }
}
