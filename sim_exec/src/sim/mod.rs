//! # Simulation module
//!
//! Drives a single closed loop run of the robot tracking its reference
//! trajectory. Each step, in order:
//!
//! 1. the motor model advances the actual speed towards the commanded speed,
//! 2. the pose from the previous step is measured against the previous
//!    reference pose, giving the tracking errors and their rates,
//! 3. the control law computes the turn rate command,
//! 4. the unicycle integrator advances the pose using the actual speed.
//!
//! The controller therefore never sees the state it is about to produce. The
//! errors of the final sample are computed from the true final pose once the
//! loop has finished.
//!
//! A run is a pure function of its configuration, mode, scenario and seed.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod batch;
pub mod case;
mod result;
mod scenario;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
pub use batch::*;
pub use case::CaseStudyParams;
pub use result::*;
pub use scenario::*;
pub use state::*;

use crate::loco_ctrl::{self, RobotParams};
use crate::motor::{self, MotorParams};
use crate::ref_traj::{circle, line, CaseKind, RefTrajError};
use crate::traj_ctrl::{
    self, compute_turn_rate, ControlInputs, ControlMode, ControllerParams, TrackingError,
    TrajCtrlError,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Complete configuration of a run, excluding mode and scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub controller: ControllerParams,
    pub case: CaseStudyParams,
    pub robot: RobotParams,
    pub motor: MotorParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid controller parameters: {0}")]
    InvalidControllerParams(#[from] traj_ctrl::params::ParamsError),

    #[error("Invalid case parameters: {0}")]
    InvalidCaseParams(#[from] case::ParamsError),

    #[error("Invalid robot parameters: {0}")]
    InvalidRobotParams(#[from] loco_ctrl::ParamsError),

    #[error("Invalid motor parameters: {0}")]
    InvalidMotorParams(#[from] motor::ParamsError),

    #[error("Cannot generate the reference trajectory: {0}")]
    RefTrajError(#[from] RefTrajError),

    #[error(transparent)]
    TrajCtrlError(#[from] TrajCtrlError),

    #[error("Unknown scenario \"{0}\", expected nominal, sensor_noise, payload_20 or external_dist")]
    InvalidScenario(String),

    #[error("Series `{series}` is not finite at sample {index}")]
    NonFinite { series: &'static str, index: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimConfig {
    /// Default configuration for the given case kind.
    pub fn for_kind(kind: CaseKind) -> Self {
        Self {
            case: CaseStudyParams::for_kind(kind),
            ..Default::default()
        }
    }

    /// Determines if the configuration is valid.
    pub fn validate(&self) -> Result<(), SimError> {
        self.controller.validate()?;
        self.case.validate()?;
        self.robot.validate()?;
        self.motor.validate()?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a single simulation.
///
/// The configuration is validated before any stepping, an invalid
/// configuration produces no partial result. `seed` only affects noisy
/// scenarios.
pub fn simulate(
    config: &SimConfig,
    mode: ControlMode,
    scenario: Scenario,
    seed: u64,
) -> Result<SimulationResult, SimError> {
    config.validate()?;

    let case = &config.case;
    let dt_s = case.dt_s;
    let times_s = case.time_base();
    let n = times_s.len();

    let reference = match case.kind {
        CaseKind::Line => line::generate(&case.ref_start(), case.speed_cmd_ms, &times_s),
        CaseKind::Circle => circle::generate(
            &case.ref_start(),
            case.speed_cmd_ms,
            case.radius_m,
            case.strict_circle_projection,
            &times_s,
        )?,
    };

    debug!(
        "Starting {} run on the {} case, scenario {}, {} steps",
        mode, case.kind, scenario, n
    );

    let mut perturber = Perturber::new(scenario, seed);
    let start = perturber.measure_pose(&case.start());
    let mut state = SimulationState::new(n, start, config.motor);

    for k in 1..n {
        let loading = perturber.loading(times_s[k]);
        state.speed_ms[k] = state.motor.step(case.speed_cmd_ms, dt_s, &loading);

        let measured = perturber.measure_pose(&state.poses[k - 1]);
        let err = TrackingError::between(&measured, &reference.poses[k - 1]);
        state.errors[k - 1] = err;

        let rates = state.tracker.update(&err, dt_s);
        let rates = perturber.measure_rates(&rates);

        let inputs = ControlInputs {
            lat_err_m: err.lat_err_m,
            head_err_rad: err.head_err_rad,
            head_err_int: state.tracker.head_err_int(),
            lat_err_rate_ms: rates.lat_err_rate_ms,
            head_err_rate_rads: rates.head_err_rate_rads,
            omega_eq_rads: reference.omega_eq_rads,
        };
        let out = compute_turn_rate(mode, &inputs, &config.controller);
        state.control[k - 1] = out;

        state.poses[k] =
            state.poses[k - 1].integrate_unicycle(state.speed_ms[k], out.omega_cmd_rads, dt_s);
    }

    if let (Some(pose), Some(ref_pose)) = (state.poses.last(), reference.poses.last()) {
        let final_err = TrackingError::between(pose, ref_pose);
        if let Some(e) = state.errors.last_mut() {
            *e = final_err;
        }
    }

    debug!("Finished {} run, scenario {}", mode, scenario);

    let info = RunInfo {
        mode,
        scenario,
        case_kind: case.kind,
        seed,
    };

    Ok(SimulationResult::new(
        info,
        times_s,
        reference,
        state,
        case.speed_cmd_ms,
        &config.robot,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn line_config() -> SimConfig {
        SimConfig::for_kind(CaseKind::Line)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = line_config();
        config.case.dt_s = 0.0;

        assert!(matches!(
            simulate(&config, ControlMode::Smc, Scenario::Nominal, 0),
            Err(SimError::InvalidCaseParams(case::ParamsError::NonPositiveTimeStep(_)))
        ));

        let mut config = line_config();
        config.controller.hfn_breakpoints = [0.3, 0.2, 0.1, 0.0, 0.0, 0.0];

        assert!(matches!(
            simulate(&config, ControlMode::Afsmc, Scenario::Nominal, 0),
            Err(SimError::InvalidControllerParams(_))
        ));

        let mut config = line_config();
        config.case.t_end_s = 1e300;
        config.case.dt_s = 1e-300;

        assert!(matches!(
            simulate(&config, ControlMode::Smc, Scenario::Nominal, 0),
            Err(SimError::InvalidCaseParams(case::ParamsError::TooManySteps(_)))
        ));
    }

    #[test]
    fn test_line_initial_lateral_error() {
        let config = line_config();
        let res = simulate(&config, ControlMode::Smc, Scenario::Nominal, 0).unwrap();

        let c = &config.case;
        let expected = -(c.x0_m - c.x_ref0_m) * c.head_ref0_rad.sin()
            + (c.y0_m - c.y_ref0_m) * c.head_ref0_rad.cos();

        assert_eq!(res.num_steps(), 2001);
        assert!((res.lat_err_m()[0] - expected).abs() < 1e-12);
        assert!((res.lat_err_m()[0] - 0.25 * 3f64.sqrt()).abs() < 1e-12);
        assert!((res.long_err_m()[0] + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_invariants_hold_every_step() {
        for kind in [CaseKind::Line, CaseKind::Circle].iter() {
            let config = SimConfig::for_kind(*kind);

            for mode in ControlMode::ALL.iter() {
                for scenario in Scenario::ALL.iter() {
                    let res = simulate(&config, *mode, *scenario, 3).unwrap();
                    let n = res.num_steps();

                    for k in 0..n {
                        let head = res.head_rad()[k];
                        assert!(head > -PI && head <= PI);

                        let v = res.speed_ms()[k];
                        assert!(v >= 0.0 && v <= config.motor.v_max_ms);
                    }

                    for k in 0..n - 1 {
                        let beta = res.beta()[k];
                        match mode {
                            ControlMode::Smc => assert_eq!(beta, config.controller.beta_max),
                            ControlMode::Afsmc => assert!(
                                beta >= config.controller.beta_min
                                    && beta <= config.controller.beta_max
                            ),
                        }
                    }

                    assert!(res.check_finite().is_ok());
                    assert!(res.warnings().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_final_sample_not_commanded() {
        let res = simulate(&line_config(), ControlMode::Smc, Scenario::Nominal, 0).unwrap();
        let last = res.num_steps() - 1;

        assert_eq!(res.omega_cmd_rads()[last], 0.0);
        assert_eq!(res.s()[last], 0.0);
        assert_eq!(res.beta()[last], 0.0);
        assert_eq!(res.speed_ms()[0], 0.0);
    }

    #[test]
    fn test_nominal_is_reproducible() {
        let config = line_config();

        let a = simulate(&config, ControlMode::Afsmc, Scenario::Nominal, 1).unwrap();
        let b = simulate(&config, ControlMode::Afsmc, Scenario::Nominal, 2).unwrap();

        // Nominal runs make no random draws, so the seed has no effect
        for name in SERIES_NAMES.iter() {
            assert_eq!(a.series(name), b.series(name), "series {} differs", name);
        }
    }

    #[test]
    fn test_noise_follows_seed() {
        let config = line_config();

        let a = simulate(&config, ControlMode::Smc, Scenario::SensorNoise, 11).unwrap();
        let b = simulate(&config, ControlMode::Smc, Scenario::SensorNoise, 11).unwrap();
        let c = simulate(&config, ControlMode::Smc, Scenario::SensorNoise, 12).unwrap();

        assert_eq!(a.lat_err_m(), b.lat_err_m());
        assert_ne!(a.lat_err_m(), c.lat_err_m());
    }

    #[test]
    fn test_line_converges() {
        let config = line_config();

        let smc = simulate(&config, ControlMode::Smc, Scenario::Nominal, 0).unwrap();
        let afsmc = simulate(&config, ControlMode::Afsmc, Scenario::Nominal, 0).unwrap();

        for res in [&smc, &afsmc].iter() {
            let last = res.num_steps() - 1;
            assert!(res.lat_err_m()[last].abs() < 0.01);
        }

        let smc_metrics = smc.metrics();
        let afsmc_metrics = afsmc.metrics();

        assert!(smc_metrics.settling_lat_s < 5.0);

        // The adaptive gain spends far less effort once inside the boundary
        assert!(afsmc_metrics.energy < smc_metrics.energy);
    }

    #[test]
    fn test_circle_projection_warning() {
        let mut config = SimConfig::for_kind(CaseKind::Circle);
        config.case.x_ref0_m = 5.0;

        let res = simulate(&config, ControlMode::Smc, Scenario::Nominal, 0).unwrap();
        assert_eq!(res.warnings().len(), 1);
        assert!((res.series("x_ref").unwrap()[0] - 4.0).abs() < 1e-12);

        config.case.x_ref0_m = 0.0;
        config.case.strict_circle_projection = true;
        assert!(matches!(
            simulate(&config, ControlMode::Smc, Scenario::Nominal, 0),
            Err(SimError::RefTrajError(RefTrajError::DegenerateCircleStart(_)))
        ));
    }

    #[test]
    fn test_shipped_params_match_defaults() {
        let controller: ControllerParams =
            util::params::from_str(include_str!("../../../params/traj_ctrl.toml")).unwrap();
        let robot: RobotParams =
            util::params::from_str(include_str!("../../../params/robot.toml")).unwrap();
        let motor: MotorParams =
            util::params::from_str(include_str!("../../../params/motor.toml")).unwrap();

        assert_eq!(controller, ControllerParams::default());
        assert_eq!(robot, RobotParams::default());
        assert_eq!(motor, MotorParams::default());

        let cases = [
            (
                include_str!("../../../params/case_line.toml"),
                CaseStudyParams::line_case(),
            ),
            (
                include_str!("../../../params/case_circle.toml"),
                CaseStudyParams::circle_case(),
            ),
        ];

        for (toml_str, default) in cases.iter() {
            let case: CaseStudyParams = util::params::from_str(toml_str).unwrap();

            assert_eq!(case.kind, default.kind);
            assert_eq!(case.num_steps(), default.num_steps());
            assert!((case.head_ref0_rad - default.head_ref0_rad).abs() < 1e-12);
            assert!((case.head0_rad - default.head0_rad).abs() < 1e-12);
            assert_eq!(case.start().position_m, default.start().position_m);
            assert_eq!(case.ref_start().position_m, default.ref_start().position_m);
        }
    }

    #[test]
    fn test_series_lookup() {
        let res = simulate(&line_config(), ControlMode::Smc, Scenario::Nominal, 0).unwrap();

        for name in SERIES_NAMES.iter() {
            assert_eq!(res.series(name).map(|s| s.len()), Some(res.num_steps()));
        }
        assert!(res.series("not_a_series").is_none());
        assert_eq!(res.series("v_cmd").unwrap()[0], 2.5);
    }
}
