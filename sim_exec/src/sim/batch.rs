//! Batch runs
//!
//! A batch runs every configured mode under every configured scenario and
//! summarises the metrics of each run, plus their per mode average.
//!
//! Seeding is fixed so a batch can be replayed: the batch seed starts a
//! master ChaCha8 stream, one run seed is drawn from it per scenario in the
//! order the scenarios are given, and every mode run of a scenario uses that
//! scenario's seed. Modes of the same scenario therefore see identical noise.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// Internal
use super::{simulate, Scenario, SimConfig, SimError};
use crate::metrics::{MetricsParams, RunMetrics};
use crate::ref_traj::CaseKind;
use crate::traj_ctrl::ControlMode;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Scenario label used for the per mode averages.
pub const AVERAGE_LABEL: &str = "average";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One row of the metrics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub mode: ControlMode,

    /// Scenario name, or [`AVERAGE_LABEL`] for an average row
    pub scenario: String,

    /// Run seed, empty for an average row
    pub seed: Option<u64>,

    pub rmse_x: f64,
    pub rmse_y: f64,
    pub rmse_theta: f64,
    pub settling_pos_s: f64,
    pub settling_lat_s: f64,
    pub chattering: f64,
    pub overshoot_m: f64,
    pub overshoot_pct: f64,
    pub energy: f64,
    pub energy_avg: f64,
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub case_kind: CaseKind,
    pub batch_seed: u64,

    /// One row per run, in execution order
    pub runs: Vec<MetricsRecord>,

    /// One row per mode
    pub averages: Vec<MetricsRecord>,

    /// Warnings raised while generating the reference, deduplicated
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MetricsRecord {
    pub fn new(mode: ControlMode, scenario: &str, seed: Option<u64>, m: &RunMetrics) -> Self {
        Self {
            mode,
            scenario: scenario.to_string(),
            seed,
            rmse_x: m.rmse_x,
            rmse_y: m.rmse_y,
            rmse_theta: m.rmse_theta,
            settling_pos_s: m.settling_pos_s,
            settling_lat_s: m.settling_lat_s,
            chattering: m.chattering,
            overshoot_m: m.overshoot_m,
            overshoot_pct: m.overshoot_pct,
            energy: m.energy,
            energy_avg: m.energy_avg,
        }
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            rmse_x: self.rmse_x,
            rmse_y: self.rmse_y,
            rmse_theta: self.rmse_theta,
            settling_pos_s: self.settling_pos_s,
            settling_lat_s: self.settling_lat_s,
            chattering: self.chattering,
            overshoot_m: self.overshoot_m,
            overshoot_pct: self.overshoot_pct,
            energy: self.energy,
            energy_avg: self.energy_avg,
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Draw one run seed per scenario from the master stream of `batch_seed`.
pub fn scenario_seeds(batch_seed: u64, scenarios: &[Scenario]) -> Vec<u64> {
    let mut master = ChaCha8Rng::seed_from_u64(batch_seed);

    scenarios.iter().map(|_| master.next_u64()).collect()
}

/// Run every mode under every scenario.
///
/// Runs are executed sequentially, scenario by scenario, with the modes of a
/// scenario in the order given. The first failing run aborts the batch.
pub fn run_batch(
    config: &SimConfig,
    modes: &[ControlMode],
    scenarios: &[Scenario],
    batch_seed: u64,
    metrics_params: &MetricsParams,
) -> Result<BatchReport, SimError> {
    let seeds = scenario_seeds(batch_seed, scenarios);

    let mut runs = Vec::with_capacity(modes.len() * scenarios.len());
    let mut warnings: Vec<String> = Vec::new();

    for (scenario, seed) in scenarios.iter().zip(seeds.iter()) {
        for mode in modes.iter() {
            let res = simulate(config, *mode, *scenario, *seed)?;
            res.check_finite()?;

            for w in res.warnings() {
                let w = w.to_string();
                if !warnings.contains(&w) {
                    warnings.push(w);
                }
            }

            let m = res.metrics_with(metrics_params);
            debug!(
                "{} {}: RMSE(e_y) = {:.6} m, energy = {:.6}",
                mode, scenario, m.rmse_y, m.energy
            );

            runs.push(MetricsRecord::new(*mode, scenario.as_str(), Some(*seed), &m));
        }
    }

    let averages = modes
        .iter()
        .filter_map(|mode| {
            let mode_metrics: Vec<RunMetrics> = runs
                .iter()
                .filter(|r| r.mode == *mode)
                .map(|r| r.metrics())
                .collect();

            RunMetrics::average(&mode_metrics)
                .map(|avg| MetricsRecord::new(*mode, AVERAGE_LABEL, None, &avg))
        })
        .collect();

    Ok(BatchReport {
        case_kind: config.case.kind,
        batch_seed,
        runs,
        averages,
        warnings,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scenario_seeds() {
        let seeds = scenario_seeds(42, &Scenario::ALL);

        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds, scenario_seeds(42, &Scenario::ALL));
        assert_ne!(seeds, scenario_seeds(43, &Scenario::ALL));

        // Seeds depend only on position, so a prefix of the scenarios gets a
        // prefix of the seeds
        assert_eq!(scenario_seeds(42, &Scenario::ALL[..2]), seeds[..2].to_vec());
    }

    #[test]
    fn test_run_batch() {
        let mut config = SimConfig::default();
        config.case.t_end_s = 2.0;

        let report = run_batch(
            &config,
            &ControlMode::ALL,
            &Scenario::ALL,
            42,
            &MetricsParams::default(),
        )
        .unwrap();

        assert_eq!(report.runs.len(), 8);
        assert_eq!(report.averages.len(), 2);
        assert!(report.warnings.is_empty());

        // Both modes of a scenario share its seed
        for pair in report.runs.chunks(2) {
            assert_eq!(pair[0].scenario, pair[1].scenario);
            assert_eq!(pair[0].seed, pair[1].seed);
            assert_ne!(pair[0].mode, pair[1].mode);
        }

        let smc_rmse_y: Vec<f64> = report
            .runs
            .iter()
            .filter(|r| r.mode == ControlMode::Smc)
            .map(|r| r.rmse_y)
            .collect();
        let avg = &report.averages[0];
        assert_eq!(avg.mode, ControlMode::Smc);
        assert_eq!(avg.scenario, AVERAGE_LABEL);
        assert!((avg.rmse_y - smc_rmse_y.iter().sum::<f64>() / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_batch_reproducible() {
        let mut config = SimConfig::default();
        config.case.t_end_s = 1.0;

        let scenarios = [Scenario::SensorNoise];
        let a = run_batch(&config, &[ControlMode::Afsmc], &scenarios, 7, &MetricsParams::default())
            .unwrap();
        let b = run_batch(&config, &[ControlMode::Afsmc], &scenarios, 7, &MetricsParams::default())
            .unwrap();

        assert_eq!(a.runs, b.runs);
    }
}
