// Scenario Definitions
// Each scenario is a call mix plus a block schedule; all logic lives in the traffic generator.

use metanest_world::{MetanestWorld, Principal};

use crate::traffic::fit_text;

// ─── Call Mix ───────────────────────────────────────────────────────────────

/// Relative weights of each kind of generated transaction.
#[derive(Debug, Clone, Copy)]
pub struct CallMix {
    pub create_world: u32,
    pub create_activity: u32,
    pub participate: u32,
    pub create_portal: u32,
    pub read: u32,
    /// Calls built to fail with a known error kind.
    pub hostile: u32,
}

impl CallMix {
    pub fn weights(&self) -> [u32; 6] {
        [
            self.create_world,
            self.create_activity,
            self.participate,
            self.create_portal,
            self.read,
            self.hostile,
        ]
    }
}

impl Default for CallMix {
    fn default() -> Self {
        Self {
            create_world: 10,
            create_activity: 15,
            participate: 45,
            create_portal: 10,
            read: 15,
            hostile: 5,
        }
    }
}

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub blocks: u64,
    pub txs_per_block: usize,
    pub mix: CallMix,
    pub criteria: PassCriteria,
    /// Pre-run setup, applied before the first block.
    pub setup: Option<fn(&mut MetanestWorld)>,
}

pub struct PassCriteria {
    /// Every block must leave the ledger auditable.
    pub require_audit: bool,
    /// Every receipt must match the outcome the generator predicted.
    pub require_predicted_outcomes: bool,
    pub min_ok_rate: Option<f64>,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            require_audit: true,
            require_predicted_outcomes: true,
            min_ok_rate: None,
        }
    }
}

// ─── Setup Functions ────────────────────────────────────────────────────────

/// Ten worlds owned by the deployer, each with one 100-unit activity.
fn seeded_worlds(contract: &mut MetanestWorld) {
    let owner = Principal::from("deployer");
    let name_len = contract.config().max_name_len;
    let description_len = contract.config().max_description_len;
    for i in 1..=10u64 {
        let name = fit_text(format!("Seed World {i}"), name_len);
        let description = fit_text("pre-seeded".to_string(), description_len);
        let activity = fit_text("Welcome".to_string(), name_len);
        let steps = fit_text("first steps".to_string(), description_len);
        let created = contract
            .create_world(&owner, &name, &description)
            .and_then(|id| contract.create_activity(&owner, id, &activity, &steps, 100));
        if let Err(e) = created {
            tracing::warn!("seed world {i} failed: {e}");
        }
    }
}

// ─── Scenario List ──────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        // ─── Baseline ───────────────────────────────────────────────────
        Scenario { name: "BASELINE", label: "Baseline Mix", category: "baseline",
            blocks: 200, txs_per_block: 20, mix: CallMix::default(),
            criteria: PassCriteria { min_ok_rate: Some(50.0), ..Default::default() },
            setup: None },
        Scenario { name: "COLD_START", label: "Cold Start", category: "baseline",
            blocks: 20, txs_per_block: 5, mix: CallMix::default(),
            criteria: PassCriteria::default(),
            setup: None },

        // ─── Load ───────────────────────────────────────────────────────
        Scenario { name: "PARTICIPATION_SURGE", label: "Participation Surge", category: "load",
            blocks: 300, txs_per_block: 50,
            mix: CallMix { create_world: 2, create_activity: 3, participate: 90, create_portal: 1, read: 4, hostile: 0 },
            criteria: PassCriteria { min_ok_rate: Some(90.0), ..Default::default() },
            setup: Some(seeded_worlds) },
        Scenario { name: "PORTAL_MESH", label: "Portal Mesh", category: "load",
            blocks: 150, txs_per_block: 30,
            mix: CallMix { create_world: 15, create_activity: 0, participate: 0, create_portal: 80, read: 5, hostile: 0 },
            criteria: PassCriteria::default(),
            setup: Some(seeded_worlds) },
        Scenario { name: "WORLD_BOOM", label: "World Creation Boom", category: "load",
            blocks: 100, txs_per_block: 40,
            mix: CallMix { create_world: 80, create_activity: 15, participate: 0, create_portal: 0, read: 5, hostile: 0 },
            criteria: PassCriteria { min_ok_rate: Some(99.0), ..Default::default() },
            setup: None },

        // ─── Adversarial ────────────────────────────────────────────────
        Scenario { name: "HOSTILE_INPUT", label: "Hostile Input", category: "adversarial",
            blocks: 100, txs_per_block: 20,
            mix: CallMix { create_world: 5, create_activity: 5, participate: 10, create_portal: 5, read: 5, hostile: 70 },
            criteria: PassCriteria::default(),
            setup: Some(seeded_worlds) },
        Scenario { name: "ALL_HOSTILE", label: "All Hostile", category: "adversarial",
            blocks: 50, txs_per_block: 20,
            mix: CallMix { create_world: 0, create_activity: 0, participate: 0, create_portal: 0, read: 0, hostile: 1 },
            criteria: PassCriteria::default(),
            setup: Some(seeded_worlds) },
    ]
}
