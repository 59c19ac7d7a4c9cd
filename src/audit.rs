// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Ledger audit.
//!
//! Re-derives every aggregate the contract maintains incrementally and checks
//! it against the stored value:
//!
//! ```text
//! world.total_rewards  = Σ participants × reward        (per world)
//! world.activity_count = |activities|, ids = 1..=count  (per world)
//! world ids            = 1..=last_world_id
//! Σ earned(principal)  = Σ world.total_rewards
//! ```
//!
//! Portals must be normalized (`world_a < world_b`) and point at stored worlds.

use serde::Serialize;

use crate::contract::MetanestWorld;
use crate::core_types::{ActivityId, RewardAmount, WorldId};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("world {world} reports total rewards {reported}, activities account for {derived}")]
    RewardMismatch { world: WorldId, reported: RewardAmount, derived: RewardAmount },

    #[error("world {world} reports {reported} activities, ledger holds {held}")]
    ActivityCountMismatch { world: WorldId, reported: u64, held: u64 },

    #[error("world {world} activity ids are not contiguous from 1 (expected {expected}, found {found})")]
    ActivityIdGap { world: WorldId, expected: ActivityId, found: ActivityId },

    #[error("activity {activity} belongs to missing world {world}")]
    OrphanActivity { world: WorldId, activity: ActivityId },

    #[error("world ids are not contiguous (expected {expected}, found {found})")]
    WorldIdGap { expected: WorldId, found: WorldId },

    #[error("last issued world id is {last} but {held} worlds are stored")]
    WorldCountMismatch { last: u64, held: u64 },

    #[error("portal {world_a}-{world_b} is not a normalized pair of distinct worlds")]
    PortalNotNormalized { world_a: WorldId, world_b: WorldId },

    #[error("portal {world_a}-{world_b} references a missing world")]
    DanglingPortal { world_a: WorldId, world_b: WorldId },

    #[error("participants earned {earned} but worlds distributed {distributed}")]
    EarningsMismatch { earned: RewardAmount, distributed: RewardAmount },

    #[error("reward totals overflow during audit")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Totals observed by a passing audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub worlds: u64,
    pub activities: u64,
    pub portals: u64,
    pub participations: u64,
    pub total_rewards: RewardAmount,
}

// ---------------------------------------------------------------------------
// verify
// ---------------------------------------------------------------------------

/// Check every ledger invariant. Stops at the first violation.
pub fn verify(contract: &MetanestWorld) -> Result<AuditReport, AuditError> {
    let mut report = AuditReport::default();

    let mut expected_world = 1u64;
    for world in contract.worlds().iter() {
        if world.id.0 != expected_world {
            return Err(AuditError::WorldIdGap {
                expected: WorldId(expected_world),
                found: world.id,
            });
        }
        expected_world += 1;

        let mut derived = RewardAmount::zero();
        let mut held = 0u64;
        for activity in contract.activities().in_world(world.id) {
            held += 1;
            if activity.activity_id.0 != held {
                return Err(AuditError::ActivityIdGap {
                    world: world.id,
                    expected: ActivityId(held),
                    found: activity.activity_id,
                });
            }
            let earned = activity
                .reward
                .checked_mul(activity.participants)
                .map_err(|_| AuditError::Overflow)?;
            derived = derived.checked_add(earned).map_err(|_| AuditError::Overflow)?;
            report.participations = report.participations.saturating_add(activity.participants);
        }

        if held != world.activity_count {
            return Err(AuditError::ActivityCountMismatch {
                world: world.id,
                reported: world.activity_count,
                held,
            });
        }
        if derived != world.total_rewards {
            return Err(AuditError::RewardMismatch {
                world: world.id,
                reported: world.total_rewards,
                derived,
            });
        }
        report.activities += held;
        report.total_rewards = report
            .total_rewards
            .checked_add(derived)
            .map_err(|_| AuditError::Overflow)?;
    }
    report.worlds = expected_world - 1;

    if report.worlds != contract.last_world_id() {
        return Err(AuditError::WorldCountMismatch {
            last: contract.last_world_id(),
            held: report.worlds,
        });
    }

    for activity in contract.activities().iter() {
        if !contract.worlds().contains(activity.world_id) {
            return Err(AuditError::OrphanActivity {
                world: activity.world_id,
                activity: activity.activity_id,
            });
        }
    }

    for (key, portal) in contract.portals().iter() {
        if portal.world_a >= portal.world_b
            || portal.world_a != key.low()
            || portal.world_b != key.high()
        {
            return Err(AuditError::PortalNotNormalized {
                world_a: portal.world_a,
                world_b: portal.world_b,
            });
        }
        if !contract.worlds().contains(portal.world_a) || !contract.worlds().contains(portal.world_b) {
            return Err(AuditError::DanglingPortal {
                world_a: portal.world_a,
                world_b: portal.world_b,
            });
        }
        report.portals += 1;
    }

    let mut earned = RewardAmount::zero();
    for (_, amount) in contract.activities().earnings() {
        earned = earned.checked_add(*amount).map_err(|_| AuditError::Overflow)?;
    }
    if earned != report.total_rewards {
        return Err(AuditError::EarningsMismatch {
            earned,
            distributed: report.total_rewards,
        });
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
