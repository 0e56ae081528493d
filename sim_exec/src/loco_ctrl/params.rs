//! Parameters structure for the robot body

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical parameters of the differential drive robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParams {

    // ---- BODY ----

    /// Total mass.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Body length.
    ///
    /// Units: meters
    pub length_m: f64,

    /// Body width.
    ///
    /// Units: meters
    pub width_m: f64,

    /// Moment of inertia about the vertical axis.
    ///
    /// Units: kilograms meters^2
    pub inertia_kgm2: f64,

    // ---- GEOMETRY ----

    /// Distance between the left and right wheels.
    ///
    /// Units: meters
    pub wheel_spacing_m: f64,

    /// The radius of the robot's wheels.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("Robot parameter `{0}` must be finite and greater than zero, found {1}")]
    NotPositive(&'static str, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            mass_kg: 1.8,
            length_m: 0.306,
            width_m: 0.281,
            inertia_kgm2: 1.35,
            wheel_spacing_m: 0.287,
            wheel_radius_m: 0.066,
        }
    }
}

impl RobotParams {
    /// Determines if the parameters are valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("mass_kg", self.mass_kg),
            ("length_m", self.length_m),
            ("width_m", self.width_m),
            ("inertia_kgm2", self.inertia_kgm2),
            ("wheel_spacing_m", self.wheel_spacing_m),
            ("wheel_radius_m", self.wheel_radius_m),
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
