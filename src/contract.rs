// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Contract Facade

//! The externally callable surface.
//!
//! Every operation takes the caller explicitly and receives raw arguments as
//! they arrive from outside. Arguments are validated in full before any store
//! is touched, and failures come back as values, never panics.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::activity::{Activity, ActivityLedger};
use crate::config::ContractConfig;
use crate::core_types::{ActivityId, Principal, RewardAmount, WorldId};
use crate::error::ContractError;
use crate::ids::IdAllocator;
use crate::portal::{Portal, PortalGraph};
use crate::registry::{World, WorldRegistry};

// ─── Call ────────────────────────────────────────────────────────────────────

/// One contract call as sequenced by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Call {
    CreateWorld { name: String, description: String },
    GetWorldData { world_id: WorldId },
    CreateActivity {
        world_id: WorldId,
        name: String,
        description: String,
        /// Signed so that negative amounts can be seen and rejected.
        reward: i128,
    },
    ParticipateActivity { world_id: WorldId, activity_id: ActivityId },
    GetActivityData { world_id: WorldId, activity_id: ActivityId },
    CreatePortal { world_a: WorldId, world_b: WorldId },
    GetPortalData { world_a: WorldId, world_b: WorldId },
    GetLastWorldId,
    GetWorldPortals { world_id: WorldId },
    GetParticipantRewards { principal: Principal },
}

impl Call {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CreateWorld { .. } => "create-world",
            Self::GetWorldData { .. } => "get-world-data",
            Self::CreateActivity { .. } => "create-activity",
            Self::ParticipateActivity { .. } => "participate-activity",
            Self::GetActivityData { .. } => "get-activity-data",
            Self::CreatePortal { .. } => "create-portal",
            Self::GetPortalData { .. } => "get-portal-data",
            Self::GetLastWorldId => "get-last-world-id",
            Self::GetWorldPortals { .. } => "get-world-portals",
            Self::GetParticipantRewards { .. } => "get-participant-rewards",
        }
    }

    pub fn is_read_only(&self) -> bool {
        !matches!(
            self,
            Self::CreateWorld { .. }
                | Self::CreateActivity { .. }
                | Self::ParticipateActivity { .. }
                | Self::CreatePortal { .. }
        )
    }
}

// ─── Value / CallResult ──────────────────────────────────────────────────────

/// Payload carried by a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Value {
    Uint(u128),
    Bool(bool),
    World(World),
    Activity(Activity),
    Portal(Portal),
    WorldIds(Vec<WorldId>),
}

impl Value {
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_world(&self) -> Option<&World> {
        match self {
            Self::World(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            Self::Activity(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_portal(&self) -> Option<&Portal> {
        match self {
            Self::Portal(p) => Some(p),
            _ => None,
        }
    }
}

/// Outcome of a call, shaped like a contract receipt: public functions
/// answer `ok`/`err`, read-only lookups answer `some`/`none`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallResult {
    Ok(Value),
    Err(ContractError),
    Some(Value),
    None,
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn error(&self) -> Option<ContractError> {
        match self {
            Self::Err(e) => Some(*e),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Ok(v) | Self::Some(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Result<Value, ContractError>> for CallResult {
    fn from(r: Result<Value, ContractError>) -> Self {
        match r {
            Ok(v) => Self::Ok(v),
            Err(e) => Self::Err(e),
        }
    }
}

impl From<Option<Value>> for CallResult {
    fn from(o: Option<Value>) -> Self {
        match o {
            Some(v) => Self::Some(v),
            None => Self::None,
        }
    }
}

// ─── MetanestWorld ───────────────────────────────────────────────────────────

/// Single owned store for every world, activity and portal. All mutation goes
/// through `&mut self`, so calls are applied one at a time by construction.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct MetanestWorld {
    pub(crate) config: ContractConfig,
    pub(crate) ids: IdAllocator,
    pub(crate) worlds: WorldRegistry,
    pub(crate) activities: ActivityLedger,
    pub(crate) portals: PortalGraph,
}

impl Default for MetanestWorld {
    fn default() -> Self {
        Self::with_config(ContractConfig::default())
    }
}

impl MetanestWorld {
    pub fn with_config(config: ContractConfig) -> Self {
        Self {
            config,
            ids: IdAllocator::new(),
            worlds: WorldRegistry::new(),
            activities: ActivityLedger::new(),
            portals: PortalGraph::new(),
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn worlds(&self) -> &WorldRegistry {
        &self.worlds
    }

    pub fn activities(&self) -> &ActivityLedger {
        &self.activities
    }

    pub fn portals(&self) -> &PortalGraph {
        &self.portals
    }

    // ── Worlds ───────────────────────────────────────────────────────────────

    pub fn create_world(
        &mut self,
        caller: &Principal,
        name: &str,
        description: &str,
    ) -> Result<WorldId, ContractError> {
        let name = self.config.name(name)?;
        let description = self.config.description(description)?;
        let id = self.worlds.create(&mut self.ids, name, description, caller.clone())?;
        tracing::debug!(world_id = %id, owner = %caller, "world created");
        Ok(id)
    }

    pub fn get_world(&self, world_id: WorldId) -> Option<&World> {
        self.worlds.get(world_id)
    }

    /// Highest world ID issued, 0 before the first world.
    pub fn last_world_id(&self) -> u64 {
        self.ids.last_world_id()
    }

    // ── Activities ───────────────────────────────────────────────────────────

    pub fn create_activity(
        &mut self,
        caller: &Principal,
        world_id: WorldId,
        name: &str,
        description: &str,
        reward: i128,
    ) -> Result<ActivityId, ContractError> {
        let name = self.config.name(name)?;
        let description = self.config.description(description)?;
        let reward = RewardAmount::from_signed(reward)?;
        let activity_id = self.activities.create(
            &mut self.worlds,
            world_id,
            name,
            description,
            reward,
            caller,
        )?;
        tracing::debug!(
            world_id = %world_id,
            activity_id = %activity_id,
            reward = %reward,
            "activity created"
        );
        Ok(activity_id)
    }

    pub fn participate_activity(
        &mut self,
        caller: &Principal,
        world_id: WorldId,
        activity_id: ActivityId,
    ) -> Result<(), ContractError> {
        let p = self
            .activities
            .participate(&mut self.worlds, world_id, activity_id, caller)?;
        tracing::debug!(
            world_id = %world_id,
            activity_id = %activity_id,
            participant = %caller,
            participants = p.participants,
            world_total_rewards = %p.world_total_rewards,
            earned_by_caller = %p.earned_by_caller,
            "participation recorded"
        );
        Ok(())
    }

    pub fn get_activity(&self, world_id: WorldId, activity_id: ActivityId) -> Option<&Activity> {
        self.activities.get(world_id, activity_id)
    }

    /// Reward units `principal` has earned across every activity.
    pub fn participant_rewards(&self, principal: &Principal) -> RewardAmount {
        self.activities.earned_by(principal)
    }

    // ── Portals ──────────────────────────────────────────────────────────────

    pub fn create_portal(
        &mut self,
        caller: &Principal,
        world_a: WorldId,
        world_b: WorldId,
    ) -> Result<(), ContractError> {
        let key = self.portals.create(&self.worlds, world_a, world_b, caller)?;
        tracing::debug!(world_a = %key.low(), world_b = %key.high(), creator = %caller, "portal created");
        Ok(())
    }

    pub fn get_portal(&self, world_a: WorldId, world_b: WorldId) -> Option<&Portal> {
        self.portals.get(world_a, world_b)
    }

    /// Linked worlds in ascending order, `None` if `world_id` does not exist.
    pub fn world_portals(&self, world_id: WorldId) -> Option<Vec<WorldId>> {
        self.worlds
            .contains(world_id)
            .then(|| self.portals.neighbours(world_id))
    }

    // ── Dispatch ─────────────────────────────────────────────────────────────

    /// Apply one raw call on behalf of `caller`.
    pub fn call(&mut self, caller: &Principal, call: Call) -> CallResult {
        let function = call.function_name();
        let result: CallResult = match call {
            Call::CreateWorld { name, description } => self
                .create_world(caller, &name, &description)
                .map(|id| Value::Uint(u128::from(id.0)))
                .into(),
            Call::GetWorldData { world_id } => {
                self.get_world(world_id).cloned().map(Value::World).into()
            }
            Call::CreateActivity { world_id, name, description, reward } => self
                .create_activity(caller, world_id, &name, &description, reward)
                .map(|id| Value::Uint(u128::from(id.0)))
                .into(),
            Call::ParticipateActivity { world_id, activity_id } => self
                .participate_activity(caller, world_id, activity_id)
                .map(|()| Value::Bool(true))
                .into(),
            Call::GetActivityData { world_id, activity_id } => self
                .get_activity(world_id, activity_id)
                .cloned()
                .map(Value::Activity)
                .into(),
            Call::CreatePortal { world_a, world_b } => self
                .create_portal(caller, world_a, world_b)
                .map(|()| Value::Bool(true))
                .into(),
            Call::GetPortalData { world_a, world_b } => {
                self.get_portal(world_a, world_b).cloned().map(Value::Portal).into()
            }
            Call::GetLastWorldId => CallResult::Ok(Value::Uint(u128::from(self.last_world_id()))),
            Call::GetWorldPortals { world_id } => {
                self.world_portals(world_id).map(Value::WorldIds).into()
            }
            Call::GetParticipantRewards { principal } => {
                CallResult::Ok(Value::Uint(self.participant_rewards(&principal).0))
            }
        };
        if let Some(error) = result.error() {
            tracing::debug!(function, caller = %caller, code = error.code(), "call rejected: {error}");
        }
        result
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
