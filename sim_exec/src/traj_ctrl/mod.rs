//! # Trajectory control module
//!
//! Trajectory control keeps the robot on the reference trajectory by
//! commanding a turn rate, while the forward speed demand is held at the
//! case's commanded speed. Two sliding mode controllers are provided,
//! selected by [`ControlMode`].
//!
//! The errors fed to the controllers are computed against the reference pose
//! at the previous step, so the law only ever sees state that has already
//! been produced. The backward difference rates and the heading error
//! integral are held by an [`ErrorTracker`] owned by the caller, which keeps
//! [`compute_turn_rate`] a pure function.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod errors;
pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Internal
pub use controllers::*;
pub use errors::*;
pub use params::ControllerParams;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The control strategy used to compute the turn rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlMode {
    /// Classical sliding mode control with a fixed switching gain
    Smc,

    /// Adaptive fuzzy sliding mode control
    Afsmc,
}

#[derive(Debug, Error, PartialEq)]
pub enum TrajCtrlError {
    #[error("Unknown control mode \"{0}\", expected SMC or AFSMC")]
    InvalidMode(String),

    #[error("Invalid controller parameters: {0}")]
    InvalidParams(#[from] params::ParamsError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlMode {
    pub const ALL: [ControlMode; 2] = [ControlMode::Smc, ControlMode::Afsmc];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Smc => "SMC",
            ControlMode::Afsmc => "AFSMC",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMode {
    type Err = TrajCtrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SMC" => Ok(ControlMode::Smc),
            "AFSMC" => Ok(ControlMode::Afsmc),
            _ => Err(TrajCtrlError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("SMC".parse::<ControlMode>(), Ok(ControlMode::Smc));
        assert_eq!("afsmc".parse::<ControlMode>(), Ok(ControlMode::Afsmc));
        assert_eq!(
            "PID".parse::<ControlMode>(),
            Err(TrajCtrlError::InvalidMode("PID".into()))
        );
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&ControlMode::Afsmc).unwrap(), "\"AFSMC\"");
        assert_eq!(
            serde_json::from_str::<ControlMode>("\"SMC\"").unwrap(),
            ControlMode::Smc
        );
        assert!(serde_json::from_str::<ControlMode>("\"PID\"").is_err());
    }
}
