// Benchmark Report Types
// Structured output for per-seed runs and Monte Carlo aggregation

use serde::Serialize;

use metanest_world::ContractError;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let half_width = 1.96 * std_dev / (n as f64).sqrt(); // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Error Tally ────────────────────────────────────────────────────────────

/// Rejected calls per error kind, keyed by the wire name.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ErrorCounts {
    pub unauthorized: u64,
    pub not_found: u64,
    pub already_exists: u64,
    pub invalid_input: u64,
}

impl ErrorCounts {
    pub fn record(&mut self, error: ContractError) {
        match error {
            ContractError::Unauthorized => self.unauthorized += 1,
            ContractError::NotFound => self.not_found += 1,
            ContractError::AlreadyExists => self.already_exists += 1,
            ContractError::InvalidInput => self.invalid_input += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.unauthorized + self.not_found + self.already_exists + self.invalid_input
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub blocks: u64,
    pub txs: u64,
    pub ok_count: u64,
    pub ok_rate: f64,
    pub errors: ErrorCounts,
    pub unexpected_outcomes: u64,
    /// First audit failure, if any block left the ledger inconsistent.
    pub audit_failure: Option<String>,
    pub worlds: u64,
    pub activities: u64,
    pub portals: u64,
    pub participations: u64,
    pub total_rewards: u128,
    pub elapsed_ms: u128,
    pub txs_per_sec: f64,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub ok_rate: Stats,
    pub rejected: Stats,
    pub unexpected_outcomes: Stats,
    pub worlds: Stats,
    pub portals: Stats,
    pub total_rewards: Stats,
    pub elapsed_ms: Stats,
    pub txs_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_of_constant_samples() {
        let stats = Stats::from_samples(&[4.0, 4.0, 4.0]);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.ci_lower, stats.ci_upper);
        assert_eq!(stats.n, 3);
    }

    #[test]
    fn test_stats_empty() {
        let stats = Stats::from_samples(&[]);
        assert_eq!(stats.n, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_error_counts() {
        let mut counts = ErrorCounts::default();
        counts.record(ContractError::NotFound);
        counts.record(ContractError::NotFound);
        counts.record(ContractError::InvalidInput);
        assert_eq!(counts.not_found, 2);
        assert_eq!(counts.total(), 3);
        let json = serde_json::to_value(counts).expect("test: serialize");
        assert_eq!(json["invalid-input"], 1);
    }
}
