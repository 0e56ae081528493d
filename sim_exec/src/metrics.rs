//! # Performance metrics
//!
//! Scalar indicators computed once over the recorded history of a finished
//! run, and their average over a batch of runs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::sim::SimulationResult;
use util::maths::{mean, std_dev, trapz};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tuning of the metric calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsParams {
    /// Absolute error below which a signal counts as settled
    pub settling_tol: f64,

    /// Trailing fraction of a series averaged to find its steady state value
    pub steady_state_fraction: f64,
}

/// Metrics of a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Units: meters
    pub rmse_x: f64,

    /// Units: meters
    pub rmse_y: f64,

    /// Units: radians
    pub rmse_theta: f64,

    /// Settling time of the position error magnitude.
    ///
    /// Units: seconds
    pub settling_pos_s: f64,

    /// Settling time of the lateral error.
    ///
    /// Units: seconds
    pub settling_lat_s: f64,

    /// Standard deviation of the second difference of the sliding variable
    pub chattering: f64,

    /// Peak position error magnitude.
    ///
    /// Units: meters
    pub overshoot_m: f64,

    /// Percentage overshoot of the position error magnitude over its steady
    /// state value
    pub overshoot_pct: f64,

    /// Integral of the squared turn rate command
    pub energy: f64,

    /// `energy` divided by the run duration
    pub energy_avg: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Definition of overshoot to use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Overshoot {
    /// Largest absolute value of the series
    MaxAbs,

    /// Percentage by which the maximum exceeds the mean of the trailing
    /// `fraction` of the series
    SteadyState { fraction: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            settling_tol: 0.05,
            steady_state_fraction: 0.2,
        }
    }
}

impl RunMetrics {
    /// Compute the metrics of a finished run.
    pub fn from_result(result: &SimulationResult, params: &MetricsParams) -> Self {
        let times_s = result.times_s();
        let pos_err_m: Vec<f64> = result
            .long_err_m()
            .iter()
            .zip(result.lat_err_m().iter())
            .map(|(ex, ey)| ex.hypot(*ey))
            .collect();

        // All series share the time base, so the energy is always defined
        let energy = control_energy(result.omega_cmd_rads(), times_s, false).unwrap_or(0.0);
        let energy_avg = control_energy(result.omega_cmd_rads(), times_s, true).unwrap_or(0.0);

        Self {
            rmse_x: rmse(result.long_err_m()),
            rmse_y: rmse(result.lat_err_m()),
            rmse_theta: rmse(result.head_err_rad()),
            settling_pos_s: settling_time(times_s, &pos_err_m, params.settling_tol),
            settling_lat_s: settling_time(times_s, result.lat_err_m(), params.settling_tol),
            chattering: chattering_index(result.s()),
            overshoot_m: overshoot(&pos_err_m, Overshoot::MaxAbs),
            overshoot_pct: overshoot(
                &pos_err_m,
                Overshoot::SteadyState {
                    fraction: params.steady_state_fraction,
                },
            ),
            energy,
            energy_avg,
        }
    }

    /// Field by field mean of a set of metrics, or `None` if there are none.
    pub fn average(metrics: &[RunMetrics]) -> Option<Self> {
        Some(Self {
            rmse_x: field_mean(metrics, |m| m.rmse_x)?,
            rmse_y: field_mean(metrics, |m| m.rmse_y)?,
            rmse_theta: field_mean(metrics, |m| m.rmse_theta)?,
            settling_pos_s: field_mean(metrics, |m| m.settling_pos_s)?,
            settling_lat_s: field_mean(metrics, |m| m.settling_lat_s)?,
            chattering: field_mean(metrics, |m| m.chattering)?,
            overshoot_m: field_mean(metrics, |m| m.overshoot_m)?,
            overshoot_pct: field_mean(metrics, |m| m.overshoot_pct)?,
            energy: field_mean(metrics, |m| m.energy)?,
            energy_avg: field_mean(metrics, |m| m.energy_avg)?,
        })
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn field_mean<F: Fn(&RunMetrics) -> f64>(metrics: &[RunMetrics], f: F) -> Option<f64> {
    mean(&metrics.iter().map(f).collect::<Vec<f64>>())
}

/// Root mean square of the series, zero if empty.
pub fn rmse(err: &[f64]) -> f64 {
    let sq: Vec<f64> = err.iter().map(|e| e * e).collect();

    mean(&sq).map(f64::sqrt).unwrap_or(0.0)
}

/// Time from which `|err|` stays below `tol` for the rest of the series.
///
/// Returns the final time if the last sample is not within tolerance, and
/// zero for an empty series.
pub fn settling_time(times_s: &[f64], err: &[f64], tol: f64) -> f64 {
    let n = err.len().min(times_s.len());
    if n == 0 {
        return 0.0;
    }

    let settled_from = err[..n]
        .iter()
        .rposition(|e| !(e.abs() < tol))
        .map(|k| k + 1)
        .unwrap_or(0);

    times_s[settled_from.min(n - 1)]
}

/// Population standard deviation of the second difference of `s`, zero for
/// fewer than three samples.
pub fn chattering_index(s: &[f64]) -> f64 {
    if s.len() < 3 {
        return 0.0;
    }

    let diff: Vec<f64> = s.windows(2).map(|w| w[1] - w[0]).collect();
    let diff2: Vec<f64> = diff.windows(2).map(|w| w[1] - w[0]).collect();

    std_dev(&diff2).unwrap_or(0.0)
}

/// Overshoot of the series, zero if empty.
pub fn overshoot(err: &[f64], kind: Overshoot) -> f64 {
    if err.is_empty() {
        return 0.0;
    }

    match kind {
        Overshoot::MaxAbs => err.iter().fold(0.0, |acc: f64, e| acc.max(e.abs())),
        Overshoot::SteadyState { fraction } => {
            let n = err.len();
            let window = ((n as f64 * fraction).floor() as usize).max(1).min(n);

            let e_max = err.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let e_ss = mean(&err[n - window..]).unwrap_or(0.0);

            if e_ss.abs() < 1e-6 {
                100.0 * e_max.abs()
            } else {
                100.0 * (e_max - e_ss) / e_ss.abs()
            }
        }
    }
}

/// Trapezoidal integral of the squared turn rate over time.
///
/// If `normalise` is set the integral is divided by the duration of the
/// series. Returns `None` if the series lengths differ.
pub fn control_energy(omega_rads: &[f64], times_s: &[f64], normalise: bool) -> Option<f64> {
    let sq: Vec<f64> = omega_rads.iter().map(|w| w * w).collect();
    let energy = trapz(&sq, times_s)?;

    if !normalise {
        return Some(energy);
    }

    match (times_s.first(), times_s.last()) {
        (Some(t0), Some(t1)) if t1 > t0 => Some(energy / (t1 - t0)),
        _ => Some(0.0),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[]), 0.0);
        assert_eq!(rmse(&[0.0; 10]), 0.0);
        assert!((rmse(&[3.0, -3.0]) - 3.0).abs() < 1e-12);
        assert!(rmse(&[1.0, -2.0, 0.5]) >= 0.0);
    }

    #[test]
    fn test_settling_time() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];

        // Dips below tolerance early but only stays there from t = 3
        let e = [1.0, 0.01, 0.2, 0.04, -0.01];
        assert_eq!(settling_time(&t, &e, 0.05), 3.0);

        // Always settled
        assert_eq!(settling_time(&t, &[0.0; 5], 0.05), 0.0);

        // Never settled
        assert_eq!(settling_time(&t, &[0.0, 0.0, 0.0, 0.0, 1.0], 0.05), 4.0);

        assert_eq!(settling_time(&[], &[], 0.05), 0.0);
    }

    #[test]
    fn test_settling_time_idempotent() {
        let t: Vec<f64> = (0..100).map(|k| k as f64 * 0.1).collect();
        let e: Vec<f64> = t.iter().map(|t| (-t).exp() * (3.0 * t).cos()).collect();

        let first = settling_time(&t, &e, 0.05);
        let second = settling_time(&t, &e, 0.05);

        assert_eq!(first, second);
        for (ti, ei) in t.iter().zip(e.iter()) {
            if *ti >= first {
                assert!(ei.abs() < 0.05);
            }
        }
    }

    #[test]
    fn test_chattering_index() {
        assert_eq!(chattering_index(&[1.0, 2.0]), 0.0);

        // A ramp has a zero second difference
        assert_eq!(chattering_index(&[0.0, 1.0, 2.0, 3.0]), 0.0);

        // Alternating sign gives second differences of +-4
        let s = [1.0, -1.0, 1.0, -1.0];
        assert!((chattering_index(&s) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_overshoot() {
        let e = [0.0, 2.0, -3.0, 1.0, 1.0];

        assert_eq!(overshoot(&e, Overshoot::MaxAbs), 3.0);
        assert_eq!(overshoot(&[], Overshoot::MaxAbs), 0.0);

        // Window of one sample, e_ss = 1, max = 2
        let pct = overshoot(&e, Overshoot::SteadyState { fraction: 0.2 });
        assert!((pct - 100.0).abs() < 1e-12);

        // Steady state at zero falls back to the peak
        let e = [0.0, 0.5, 0.0, 0.0, 0.0];
        let pct = overshoot(&e, Overshoot::SteadyState { fraction: 0.2 });
        assert!((pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_control_energy() {
        let t = [0.0, 1.0, 2.0];
        let w = [1.0, 1.0, 1.0];

        assert_eq!(control_energy(&w, &t, false), Some(2.0));
        assert_eq!(control_energy(&w, &t, true), Some(1.0));
        assert_eq!(control_energy(&w, &t[..2], false), None);
        assert_eq!(control_energy(&[], &[], true), Some(0.0));
    }

    #[test]
    fn test_average() {
        assert_eq!(RunMetrics::average(&[]), None);

        let a = RunMetrics {
            rmse_y: 1.0,
            energy: 4.0,
            ..Default::default()
        };
        let b = RunMetrics {
            rmse_y: 3.0,
            energy: 0.0,
            ..Default::default()
        };

        let avg = RunMetrics::average(&[a, b]).unwrap();
        assert_eq!(avg.rmse_y, 2.0);
        assert_eq!(avg.energy, 2.0);
        assert_eq!(avg.rmse_x, 0.0);
    }
}
