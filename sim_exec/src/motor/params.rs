//! Parameters structure for the drive motor model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shape of the second order forward speed response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    /// Maximum no-load forward speed.
    ///
    /// Units: meters/second
    pub v_max_ms: f64,

    /// Maximum absolute forward acceleration.
    ///
    /// Units: meters/second^2
    pub a_max_mss: f64,

    /// Damping ratio of the speed response. Lower values overshoot more.
    pub zeta: f64,

    /// Natural frequency of the speed response.
    ///
    /// Units: radians/second
    pub omega_n_rads: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("Motor parameter `{0}` must be finite and greater than zero, found {1}")]
    NotPositive(&'static str, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotorParams {
    fn default() -> Self {
        Self {
            v_max_ms: 3.5,
            a_max_mss: 5.0,
            zeta: 0.4,
            omega_n_rads: 3.0,
        }
    }
}

impl MotorParams {
    /// Determines if the parameters are valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("v_max_ms", self.v_max_ms),
            ("a_max_mss", self.a_max_mss),
            ("zeta", self.zeta),
            ("omega_n_rads", self.omega_n_rads),
        ]
        .iter()
        {
            if !(value.is_finite() && *value > 0.0) {
                return Err(ParamsError::NotPositive(*name, *value));
            }
        }

        Ok(())
    }
}
