//! # Sliding mode control law
//!
//! Both controllers share the same sliding surface
//!
//! ```text
//! s = lambda phi1 y_e + l2 phi2 e_theta + k_i int(e_theta)
//! ```
//!
//! and the same boundary layer switching law `omega = omega_eq - beta
//! tanh(s / delta)`. They differ only in the switching gain `beta`: classical
//! SMC holds it at `beta_max`, while the adaptive fuzzy controller (AFSMC)
//! interpolates between `beta_min` and `beta_max` using a hexagonal fuzzy
//! number (HFN) membership of the combined error magnitude.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{ControlMode, ControllerParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Inputs to a single evaluation of the control law.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlInputs {
    /// Lateral error
    pub lat_err_m: f64,

    /// Heading error
    pub head_err_rad: f64,

    /// Running integral of the heading error
    pub head_err_int: f64,

    /// Rate of the lateral error
    pub lat_err_rate_ms: f64,

    /// Rate of the heading error
    pub head_err_rate_rads: f64,

    /// Feedforward turn rate of the reference trajectory
    pub omega_eq_rads: f64,
}

/// Output of the control law for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SlidingModeOutput {
    /// Commanded turn rate
    pub omega_cmd_rads: f64,

    /// Value of the sliding variable
    pub s: f64,

    /// Effective switching gain
    pub beta: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Hexagonal fuzzy number membership of `x` over the breakpoints `xi`.
///
/// Zero outside `(xi[0], xi[5])`, one on `(xi[1], xi[4]]`, with ramps shaped
/// by `gamma` on the rising edge `(xi[0], xi[1]]` and the falling edge
/// `(xi[4], xi[5])`. The breakpoints must be non-decreasing.
pub fn hfn_membership(x: f64, xi: &[f64; 6], gamma: f64) -> f64 {
    if x <= xi[0] || x >= xi[5] {
        0.0
    } else if x <= xi[1] {
        ((x - xi[0]) / (xi[1] - xi[0])).powf(gamma)
    } else if x <= xi[4] {
        1.0
    } else {
        ((xi[5] - x) / (xi[5] - xi[4])).powf(gamma)
    }
}

/// Adaptive switching gain for the given error and error rate magnitudes.
pub fn adaptive_gain(err: f64, err_rate: f64, params: &ControllerParams) -> f64 {
    let x = err.abs() + 0.5 * err_rate.abs();
    let mu = hfn_membership(x, &params.hfn_breakpoints, params.hfn_gamma);

    params.beta_min + (params.beta_max - params.beta_min) * mu
}

/// Value of the sliding variable for the given inputs.
pub fn sliding_variable(inputs: &ControlInputs, params: &ControllerParams) -> f64 {
    params.lambda * params.phi1 * inputs.lat_err_m
        + params.l2 * params.phi2 * inputs.head_err_rad
        + params.k_i * inputs.head_err_int
}

/// Evaluate the control law.
///
/// The law holds no memory between calls, the caller owns the error history
/// used to build `inputs`.
pub fn compute_turn_rate(
    mode: ControlMode,
    inputs: &ControlInputs,
    params: &ControllerParams,
) -> SlidingModeOutput {
    let s = sliding_variable(inputs, params);

    let beta = match mode {
        ControlMode::Smc => params.beta_max,
        ControlMode::Afsmc => adaptive_gain(
            inputs.lat_err_m.hypot(inputs.head_err_rad),
            inputs.lat_err_rate_ms.hypot(inputs.head_err_rate_rads),
            params,
        ),
    };

    let switching = beta * (s / params.delta).tanh();

    SlidingModeOutput {
        omega_cmd_rads: inputs.omega_eq_rads - switching,
        s,
        beta,
    }
}
