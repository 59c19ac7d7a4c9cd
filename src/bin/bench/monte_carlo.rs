// Monte Carlo Infrastructure: N seeded runs per scenario with statistical aggregation
// Seeds run base..base+N; every block is audited before the next is generated.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use metanest_world::{audit, CallResult, Chain, ContractConfig, MetanestWorld};

use crate::report::*;
use crate::scenarios::Scenario;
use crate::traffic::TrafficGenerator;

use std::time::Instant;

/// Schedule for one run; CLI flags may override the scenario's own values.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub blocks: u64,
    pub txs_per_block: usize,
    pub config: ContractConfig,
}

impl RunPlan {
    pub fn for_scenario(
        scenario: &Scenario,
        blocks: Option<u64>,
        txs: Option<usize>,
        config: &ContractConfig,
    ) -> Self {
        Self {
            blocks: blocks.unwrap_or(scenario.blocks),
            txs_per_block: txs.unwrap_or(scenario.txs_per_block),
            config: config.clone(),
        }
    }
}

/// Run a single scenario iteration with a specific seed.
pub fn run_single(scenario: &Scenario, plan: &RunPlan, seed: u64) -> BenchResult {
    let span = tracing::info_span!("run", scenario = scenario.name, seed);
    let _enter = span.enter();
    let start = Instant::now();

    let mut contract = MetanestWorld::with_config(plan.config.clone());
    if let Some(setup) = scenario.setup {
        setup(&mut contract);
    }
    let mut chain = Chain::with_contract(contract);
    let mut traffic = TrafficGenerator::new(ChaCha8Rng::seed_from_u64(seed), scenario.mix);

    let mut errors = ErrorCounts::default();
    let mut ok_count = 0u64;
    let mut unexpected = 0u64;
    let mut audit_failure: Option<String> = None;

    for _ in 0..plan.blocks {
        let (txs, expected): (Vec<_>, Vec<_>) = traffic
            .generate_block(chain.contract(), plan.txs_per_block)
            .into_iter()
            .unzip();
        let block = chain.mine_block(txs);

        for (receipt, expect) in block.receipts.iter().zip(&expected) {
            match &receipt.result {
                CallResult::Err(e) => errors.record(*e),
                _ => ok_count += 1,
            }
            if !expect.matches(&receipt.result) {
                unexpected += 1;
                tracing::warn!(
                    height = block.height,
                    function = receipt.function,
                    ?expect,
                    result = ?receipt.result,
                    "unexpected outcome"
                );
            }
        }

        if audit_failure.is_none() {
            if let Err(e) = audit::verify(chain.contract()) {
                tracing::error!(height = block.height, "audit failed: {e}");
                audit_failure = Some(format!("block {}: {e}", block.height));
            }
        }
    }

    let report = audit::verify(chain.contract()).unwrap_or_default();
    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);
    let txs = traffic.generated;
    let ok_rate = if txs == 0 { 100.0 } else { ok_count as f64 / txs as f64 * 100.0 };

    let criteria = &scenario.criteria;
    let mut pass = true;
    if criteria.require_audit && audit_failure.is_some() {
        pass = false;
    }
    if criteria.require_predicted_outcomes && unexpected > 0 {
        pass = false;
    }
    if let Some(min_rate) = criteria.min_ok_rate {
        if ok_rate < min_rate {
            pass = false;
        }
    }

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        blocks: chain.block_height(),
        txs,
        ok_count,
        ok_rate,
        errors,
        unexpected_outcomes: unexpected,
        audit_failure,
        worlds: report.worlds,
        activities: report.activities,
        portals: report.portals,
        participations: report.participations,
        total_rewards: report.total_rewards.0,
        elapsed_ms: elapsed.as_millis(),
        txs_per_sec: txs as f64 / elapsed_secs,
    }
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(scenario: &Scenario, plan: &RunPlan, n_runs: usize, base_seed: u64) -> MonteCarloReport {
    let results = (0..n_runs as u64)
        .map(|i| run_single(scenario, plan, base_seed.wrapping_add(i)))
        .collect();
    aggregate(scenario, results)
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n == 0 { 0.0 } else { passed as f64 / n as f64 };
    let stats = |f: fn(&BenchResult) -> f64| Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>());

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        ok_rate: stats(|r| r.ok_rate),
        rejected: stats(|r| r.errors.total() as f64),
        unexpected_outcomes: stats(|r| r.unexpected_outcomes as f64),
        worlds: stats(|r| r.worlds as f64),
        portals: stats(|r| r.portals as f64),
        total_rewards: stats(|r| r.total_rewards as f64),
        elapsed_ms: stats(|r| r.elapsed_ms as f64),
        txs_per_sec: stats(|r| r.txs_per_sec),
        individual_runs: results,
    }
}
