// Metanest Contract Benchmark Runner
// Monte Carlo over seeded call traffic, per-block ledger audit
//
// Usage:
//   cargo run --release --bin bench                       # Run all scenarios (10 runs each)
//   cargo run --release --bin bench -- --runs 3           # Quick mode
//   cargo run --release --bin bench -- PORTAL             # Filter by name, label or category
//   cargo run --release --bin bench -- --blocks 50 --txs 5
//   cargo run --release --bin bench -- --config limits.json --seed 42
//   cargo run --release --bin bench -- --json             # Write benchmark-results/bench-<ts>.json

mod monte_carlo;
mod report;
mod scenarios;
mod traffic;

use monte_carlo::RunPlan;
use report::*;
use scenarios::*;

use metanest_world::ContractConfig;

use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    blocks: Option<u64>,
    txs: Option<usize>,
    config: Option<String>,
    json: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 10,
        seed: 0,
        blocks: None,
        txs: None,
        config: None,
        json: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--blocks" => {
                i += 1;
                if i < args.len() {
                    cli.blocks = args[i].parse().ok();
                }
            }
            "--txs" => {
                i += 1;
                if i < args.len() {
                    cli.txs = args[i].parse().ok();
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(args[i].clone());
                }
            }
            "--json" => {
                cli.json = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_config(path: Option<&str>) -> Result<ContractConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(ContractConfig::from_json_str(&raw)?)
        }
        None => Ok(ContractConfig::default()),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metanest_world=warn,bench=info")),
        )
        .with_target(false)
        .init();

    let cli = parse_args();
    let config = load_config(cli.config.as_deref())?;
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        return Err(format!("no scenarios match filter: {:?}", cli.filter).into());
    }

    println!("\n  Metanest Contract Benchmark");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Text limits: name {} / description {}", config.max_name_len, config.max_description_len);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<26} {:>5} {:>12} {:>9} {:>7} {:>8} {:>7}",
        "Scenario", "Pass%", "Ok%", "Rejected", "Worlds", "Portals", "Time");
    println!("  {}", "-".repeat(84));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let plan = RunPlan::for_scenario(scenario, cli.blocks, cli.txs, &config);
        let report = monte_carlo::run_monte_carlo(scenario, &plan, cli.runs, cli.seed);

        let pass_pct = report.pass_rate * 100.0;
        let ok_ci = (report.ok_rate.ci_upper - report.ok_rate.ci_lower) / 2.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<26} {:>4}% {:>6.1}±{:<4.1} {:>9.0} {:>7.0} {:>8.0} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.ok_rate.mean, ok_ci,
            report.rejected.mean,
            report.worlds.mean,
            report.portals.mean,
            report.elapsed_ms.mean,
            status,
        );

        for run in report.individual_runs.iter().filter(|r| !r.pass) {
            tracing::warn!(
                scenario = %run.name,
                seed = run.seed,
                unexpected = run.unexpected_outcomes,
                audit = ?run.audit_failure,
                "run failed"
            );
        }

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(84));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    if cli.json {
        let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        let timestamp = format!("{}", ts);

        let report = BenchReport {
            timestamp: timestamp.clone(),
            version: env!("CARGO_PKG_VERSION"),
            prng: "ChaCha8Rng",
            n_runs_per_scenario: cli.runs,
            summary: Summary {
                total,
                passed,
                failed,
                pass_rate: passed as f64 / total as f64,
            },
            scenarios: mc_reports,
        };

        let dir = std::path::Path::new("benchmark-results");
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("bench-{}.json", timestamp));
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        println!("  Results saved to: {}\n", path.display());
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
