//! Result of a simulation run

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{Scenario, SimError, SimulationState};
use crate::loco_ctrl::{calc_skid_steer, RobotParams};
use crate::metrics::{MetricsParams, RunMetrics};
use crate::ref_traj::{CaseKind, RefTrajWarning, ReferenceTrajectory};
use crate::traj_ctrl::ControlMode;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Names of the per-step series accepted by [`SimulationResult::series`].
pub const SERIES_NAMES: [&str; 17] = [
    "t", "x", "y", "theta", "x_ref", "y_ref", "theta_ref", "v", "v_cmd", "omega", "e_x", "e_y",
    "e_theta", "w_left", "w_right", "s", "beta",
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The recorded history of a finished run.
///
/// Every series has one entry per sample. The turn rate command, sliding
/// variable and gain are never computed for the final sample and hold zero
/// there.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    mode: ControlMode,
    scenario: Scenario,
    case_kind: CaseKind,
    seed: u64,

    times_s: Vec<f64>,

    x_m: Vec<f64>,
    y_m: Vec<f64>,
    head_rad: Vec<f64>,

    x_ref_m: Vec<f64>,
    y_ref_m: Vec<f64>,
    head_ref_rad: Vec<f64>,

    speed_ms: Vec<f64>,
    speed_cmd_ms: Vec<f64>,
    omega_cmd_rads: Vec<f64>,

    long_err_m: Vec<f64>,
    lat_err_m: Vec<f64>,
    head_err_rad: Vec<f64>,

    wheel_left_rads: Vec<f64>,
    wheel_right_rads: Vec<f64>,

    s: Vec<f64>,
    beta: Vec<f64>,

    warnings: Vec<RefTrajWarning>,
}

/// Identifies a run within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunInfo {
    pub mode: ControlMode,
    pub scenario: Scenario,
    pub case_kind: CaseKind,
    pub seed: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimulationResult {
    /// Assemble the result from the finished loop state, mapping the body
    /// rates onto the wheels.
    pub(crate) fn new(
        info: RunInfo,
        times_s: Vec<f64>,
        reference: ReferenceTrajectory,
        state: SimulationState,
        speed_cmd_ms: f64,
        robot: &RobotParams,
    ) -> Self {
        let n = state.num_steps();
        let omega_cmd_rads: Vec<f64> = state.control.iter().map(|c| c.omega_cmd_rads).collect();

        let wheels: Vec<_> = state
            .speed_ms
            .iter()
            .zip(omega_cmd_rads.iter())
            .map(|(v, w)| calc_skid_steer(*v, *w, robot))
            .collect();

        Self {
            mode: info.mode,
            scenario: info.scenario,
            case_kind: info.case_kind,
            seed: info.seed,

            times_s,

            x_m: state.poses.iter().map(|p| p.x()).collect(),
            y_m: state.poses.iter().map(|p| p.y()).collect(),
            head_rad: state.poses.iter().map(|p| p.heading_rad).collect(),

            x_ref_m: reference.poses.iter().map(|p| p.x()).collect(),
            y_ref_m: reference.poses.iter().map(|p| p.y()).collect(),
            head_ref_rad: reference.poses.iter().map(|p| p.heading_rad).collect(),

            speed_ms: state.speed_ms,
            speed_cmd_ms: vec![speed_cmd_ms; n],
            omega_cmd_rads,

            long_err_m: state.errors.iter().map(|e| e.long_err_m).collect(),
            lat_err_m: state.errors.iter().map(|e| e.lat_err_m).collect(),
            head_err_rad: state.errors.iter().map(|e| e.head_err_rad).collect(),

            wheel_left_rads: wheels.iter().map(|w| w.left_rads).collect(),
            wheel_right_rads: wheels.iter().map(|w| w.right_rads).collect(),

            s: state.control.iter().map(|c| c.s).collect(),
            beta: state.control.iter().map(|c| c.beta).collect(),

            warnings: reference.warnings,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn case_kind(&self) -> CaseKind {
        self.case_kind
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_steps(&self) -> usize {
        self.times_s.len()
    }

    pub fn warnings(&self) -> &[RefTrajWarning] {
        &self.warnings
    }

    pub fn times_s(&self) -> &[f64] {
        &self.times_s
    }

    pub fn x_m(&self) -> &[f64] {
        &self.x_m
    }

    pub fn y_m(&self) -> &[f64] {
        &self.y_m
    }

    pub fn head_rad(&self) -> &[f64] {
        &self.head_rad
    }

    pub fn speed_ms(&self) -> &[f64] {
        &self.speed_ms
    }

    pub fn omega_cmd_rads(&self) -> &[f64] {
        &self.omega_cmd_rads
    }

    pub fn long_err_m(&self) -> &[f64] {
        &self.long_err_m
    }

    pub fn lat_err_m(&self) -> &[f64] {
        &self.lat_err_m
    }

    pub fn head_err_rad(&self) -> &[f64] {
        &self.head_err_rad
    }

    pub fn s(&self) -> &[f64] {
        &self.s
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Look up a series by its short name, see [`SERIES_NAMES`].
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        let series = match name {
            "t" => &self.times_s,
            "x" => &self.x_m,
            "y" => &self.y_m,
            "theta" => &self.head_rad,
            "x_ref" => &self.x_ref_m,
            "y_ref" => &self.y_ref_m,
            "theta_ref" => &self.head_ref_rad,
            "v" => &self.speed_ms,
            "v_cmd" => &self.speed_cmd_ms,
            "omega" => &self.omega_cmd_rads,
            "e_x" => &self.long_err_m,
            "e_y" => &self.lat_err_m,
            "e_theta" => &self.head_err_rad,
            "w_left" => &self.wheel_left_rads,
            "w_right" => &self.wheel_right_rads,
            "s" => &self.s,
            "beta" => &self.beta,
            _ => return None,
        };

        Some(series.as_slice())
    }

    /// Check that the sliding variable and turn rate command stayed finite,
    /// reporting the first sample which did not.
    pub fn check_finite(&self) -> Result<(), SimError> {
        for k in 0..self.num_steps() {
            for (name, series) in [("s", &self.s), ("omega", &self.omega_cmd_rads)].iter() {
                if !series[k].is_finite() {
                    return Err(SimError::NonFinite {
                        series: *name,
                        index: k,
                    });
                }
            }
        }

        Ok(())
    }

    /// Metrics of this run with the default metric parameters.
    pub fn metrics(&self) -> RunMetrics {
        self.metrics_with(&MetricsParams::default())
    }

    pub fn metrics_with(&self, params: &MetricsParams) -> RunMetrics {
        RunMetrics::from_result(self, params)
    }
}
