//! # Drive motor model
//!
//! Models the lag between the commanded forward speed and the speed the
//! drivetrain actually achieves. The response is a second order system
//!
//! ```text
//! v'' = -2 zeta omega_n v' - omega_n^2 (v - v_ref)
//! ```
//!
//! integrated with an explicit one step update. The acceleration is saturated
//! at `a_max` and the speed at `[0, v_max]`, so the robot can never reverse.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

pub use params::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// External loading applied to the drivetrain for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Loading {
    /// Divides the acceleration update. Values above one slow the response.
    pub inertia_mult: f64,

    /// Added directly to the speed's second derivative.
    ///
    /// Units: meters/second^2
    pub disturbance_mss: f64,
}

/// State of the drive motor model.
#[derive(Debug, Clone, Serialize)]
pub struct MotorModel {
    params: MotorParams,

    /// Actual forward speed
    speed_ms: f64,

    /// Actual forward acceleration
    accel_mss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Loading {
    fn default() -> Self {
        Self {
            inertia_mult: 1.0,
            disturbance_mss: 0.0,
        }
    }
}

impl MotorModel {
    /// Create a new motor at rest.
    pub fn new(params: MotorParams) -> Self {
        Self {
            params,
            speed_ms: 0.0,
            accel_mss: 0.0,
        }
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    pub fn accel_mss(&self) -> f64 {
        self.accel_mss
    }

    /// Advance the motor by one step towards `speed_dem_ms`, returning the new
    /// actual speed.
    pub fn step(&mut self, speed_dem_ms: f64, dt_s: f64, loading: &Loading) -> f64 {
        let zeta = self.params.zeta;
        let omega_n = self.params.omega_n_rads;

        let mut jerk_msss = -2.0 * zeta * omega_n * self.accel_mss
            - omega_n.powi(2) * (self.speed_ms - speed_dem_ms);
        jerk_msss += loading.disturbance_mss;

        self.accel_mss += jerk_msss * dt_s / loading.inertia_mult;
        self.accel_mss = clamp(
            &self.accel_mss,
            &-self.params.a_max_mss,
            &self.params.a_max_mss,
        );

        self.speed_ms += self.accel_mss * dt_s;
        self.speed_ms = clamp(&self.speed_ms, &0.0, &self.params.v_max_ms);

        self.speed_ms
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT_S: f64 = 0.01;

    #[test]
    fn test_first_step() {
        let mut motor = MotorModel::new(MotorParams::default());

        // From rest v'' = omega_n^2 * v_ref = 22.5, so v' = 0.225, v = 0.00225
        let v = motor.step(2.5, DT_S, &Loading::default());

        assert!((motor.accel_mss() - 0.225).abs() < 1e-12);
        assert!((v - 0.00225).abs() < 1e-12);
    }

    #[test]
    fn test_saturation_closure() {
        let params = MotorParams::default();
        let mut motor = MotorModel::new(params);

        // Demand well above v_max so both limits are exercised
        for k in 0..2000 {
            let dem = if k < 1000 { 10.0 } else { -10.0 };
            let v = motor.step(dem, DT_S, &Loading::default());

            assert!(v >= 0.0 && v <= params.v_max_ms, "v = {} at step {}", v, k);
            assert!(motor.accel_mss().abs() <= params.a_max_mss);
        }

        // Demanding reverse leaves the motor stopped rather than reversing
        assert_eq!(motor.speed_ms(), 0.0);
    }

    #[test]
    fn test_converges_to_demand() {
        let mut motor = MotorModel::new(MotorParams::default());

        for _ in 0..3000 {
            motor.step(2.5, DT_S, &Loading::default());
        }

        assert!((motor.speed_ms() - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_payload_slows_response() {
        let mut nominal = MotorModel::new(MotorParams::default());
        let mut loaded = MotorModel::new(MotorParams::default());
        let payload = Loading {
            inertia_mult: 1.2,
            disturbance_mss: 0.0,
        };

        for _ in 0..20 {
            nominal.step(2.5, DT_S, &Loading::default());
            loaded.step(2.5, DT_S, &payload);
        }

        assert!(loaded.speed_ms() < nominal.speed_ms());
    }
}
