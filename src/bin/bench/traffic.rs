// Seeded Call Traffic Generator
// Builds each block from the pre-block ledger state and predicts every outcome.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use metanest_world::chain::ACCOUNT_NAMES;
use metanest_world::{ActivityId, Call, CallResult, ContractError, MetanestWorld, Principal, Tx, WorldId};

use crate::scenarios::CallMix;

/// World IDs at this height are never issued during a run.
const UNREACHABLE_ID: u64 = u64::MAX - 1;

/// Outcome the generator expects for a transaction.
///
/// Predictions only rely on facts that cannot change inside a block: world
/// owners are immutable, records are never deleted and unreachable IDs stay
/// unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Ok,
    /// Portal creation between existing worlds; a duplicate is legitimate.
    OkOrDuplicate,
    Err(ContractError),
    Some,
    Any,
}

impl Expect {
    pub fn matches(&self, result: &CallResult) -> bool {
        match (self, result) {
            (Self::Any, _) => true,
            (Self::Ok, CallResult::Ok(_)) => true,
            (Self::OkOrDuplicate, CallResult::Ok(_)) => true,
            (Self::OkOrDuplicate, CallResult::Err(ContractError::AlreadyExists)) => true,
            (Self::Err(want), CallResult::Err(got)) => want == got,
            (Self::Some, CallResult::Some(_)) => true,
            _ => false,
        }
    }
}

pub struct TrafficGenerator {
    rng: ChaCha8Rng,
    accounts: Vec<Principal>,
    mix: CallMix,
    pub generated: u64,
    pub kind_counts: [u64; 6],
}

impl TrafficGenerator {
    pub fn new(rng: ChaCha8Rng, mix: CallMix) -> Self {
        Self {
            rng,
            accounts: ACCOUNT_NAMES.iter().map(|&n| Principal::from(n)).collect(),
            mix,
            generated: 0,
            kind_counts: [0; 6],
        }
    }

    /// Generate one block of `n` transactions against the state in `contract`.
    pub fn generate_block(&mut self, contract: &MetanestWorld, n: usize) -> Vec<(Tx, Expect)> {
        (0..n).map(|_| self.generate_tx(contract)).collect()
    }

    fn generate_tx(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        self.generated += 1;
        let kind = select_kind(&mut self.rng, &self.mix.weights());
        self.kind_counts[kind] += 1;

        let has_worlds = contract.last_world_id() > 0;
        let has_activities = !contract.activities().is_empty();
        match kind {
            1 if has_worlds => self.create_activity(contract),
            2 if has_activities => self.participate(contract),
            3 if contract.last_world_id() > 1 => self.create_portal(contract),
            4 if has_worlds => self.read(contract),
            5 => self.hostile(contract),
            _ => self.create_world(contract),
        }
    }

    fn sender(&mut self) -> Principal {
        self.accounts
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| Principal::from("deployer"))
    }

    fn text(&mut self, prefix: &str, max_len: usize) -> String {
        let n: u32 = self.rng.gen_range(0..100_000);
        fit_text(format!("{prefix} {n}"), max_len)
    }

    fn existing_world(&mut self, contract: &MetanestWorld) -> WorldId {
        WorldId(self.rng.gen_range(1..=contract.last_world_id().max(1)))
    }

    fn create_world(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let config = contract.config();
        let call = Call::CreateWorld {
            name: self.text("World", config.max_name_len),
            description: self.text("A generated world", config.max_description_len),
        };
        (Tx::contract_call(call, self.sender()), Expect::Ok)
    }

    fn create_activity(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let world_id = self.existing_world(contract);
        let owner = contract
            .get_world(world_id)
            .map(|w| w.owner.clone())
            .unwrap_or_else(|| self.sender());
        let call = Call::CreateActivity {
            world_id,
            name: self.text("Activity", contract.config().max_name_len),
            description: self.text("Earn rewards", contract.config().max_description_len),
            reward: self.rng.gen_range(0..=1_000),
        };
        (Tx::contract_call(call, owner), Expect::Ok)
    }

    fn participate(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let count = contract.activities().len();
        let pick = self.rng.gen_range(0..count);
        let target = contract
            .activities()
            .iter()
            .nth(pick)
            .map(|a| (a.world_id, a.activity_id));
        match target {
            Some((world_id, activity_id)) => {
                let call = Call::ParticipateActivity { world_id, activity_id };
                (Tx::contract_call(call, self.sender()), Expect::Ok)
            }
            None => self.create_world(contract),
        }
    }

    fn create_portal(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let world_a = self.existing_world(contract);
        let mut world_b = self.existing_world(contract);
        while world_b == world_a {
            world_b = self.existing_world(contract);
        }
        let call = Call::CreatePortal { world_a, world_b };
        (Tx::contract_call(call, self.sender()), Expect::OkOrDuplicate)
    }

    fn read(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let world_id = self.existing_world(contract);
        let (call, expect) = match self.rng.gen_range(0..4) {
            0 => (Call::GetWorldData { world_id }, Expect::Some),
            1 => (Call::GetWorldPortals { world_id }, Expect::Some),
            2 => {
                let world_b = self.existing_world(contract);
                (Call::GetPortalData { world_a: world_id, world_b }, Expect::Any)
            }
            _ => {
                let principal = self.sender();
                (Call::GetParticipantRewards { principal }, Expect::Ok)
            }
        };
        (Tx::contract_call(call, self.sender()), expect)
    }

    /// A call built to fail with a known error kind.
    fn hostile(&mut self, contract: &MetanestWorld) -> (Tx, Expect) {
        let sender = self.sender();
        let oversize = "x".repeat(contract.config().max_name_len + 1);
        let (call, expect) = match self.rng.gen_range(0..7) {
            0 => (
                Call::CreateWorld { name: oversize, description: "d".into() },
                Expect::Err(ContractError::InvalidInput),
            ),
            1 => (
                Call::CreateWorld { name: "Caf\u{e9}".into(), description: "d".into() },
                Expect::Err(ContractError::InvalidInput),
            ),
            2 => (
                Call::CreateActivity {
                    world_id: WorldId(1),
                    name: "a".into(),
                    description: "b".into(),
                    reward: -self.rng.gen_range(1..=1_000i128),
                },
                Expect::Err(ContractError::InvalidInput),
            ),
            3 => {
                let world = WorldId(self.rng.gen_range(1..=UNREACHABLE_ID));
                (
                    Call::CreatePortal { world_a: world, world_b: world },
                    Expect::Err(ContractError::InvalidInput),
                )
            }
            4 => (
                Call::ParticipateActivity {
                    world_id: WorldId(UNREACHABLE_ID),
                    activity_id: ActivityId(1),
                },
                Expect::Err(ContractError::NotFound),
            ),
            5 => (
                Call::CreatePortal {
                    world_a: WorldId(1),
                    world_b: WorldId(UNREACHABLE_ID),
                },
                Expect::Err(ContractError::NotFound),
            ),
            _ => {
                let world_id = self.existing_world(contract);
                let stranger = contract
                    .get_world(world_id)
                    .and_then(|w| self.accounts.iter().find(|p| **p != w.owner).cloned());
                match stranger {
                    Some(stranger) => {
                        let call = Call::CreateActivity {
                            world_id,
                            name: "a".into(),
                            description: "b".into(),
                            reward: 1,
                        };
                        return (Tx::contract_call(call, stranger), Expect::Err(ContractError::Unauthorized));
                    }
                    None => (
                        Call::GetActivityData {
                            world_id: WorldId(UNREACHABLE_ID),
                            activity_id: ActivityId(1),
                        },
                        Expect::Any,
                    ),
                }
            }
        };
        (Tx::contract_call(call, sender), expect)
    }
}

/// Truncate generated ASCII text to the configured byte limit.
pub fn fit_text(mut text: String, max_len: usize) -> String {
    text.truncate(max_len);
    text
}

/// Weighted selection over the call mix. All-zero weights fall back to
/// world creation.
fn select_kind(rng: &mut ChaCha8Rng, weights: &[u32; 6]) -> usize {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return 0;
    }
    let mut r = rng.gen_range(0..total);
    for (i, &w) in weights.iter().enumerate() {
        if r < w {
            return i;
        }
        r -= w;
    }
    0
}
