//! # Reference trajectory
//!
//! The reference trajectory is the pose the robot should occupy at each
//! sample time. It depends only on time, so the whole trajectory is generated
//! before the simulation loop starts. Each generator also provides the
//! nominal feedforward turn rate `omega_eq` used by the control law.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod circle;
pub mod line;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Internal
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A reference trajectory sampled on the simulation time base.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceTrajectory {
    /// Reference pose at each sample
    pub poses: Vec<Pose>,

    /// Nominal feedforward turn rate
    ///
    /// Units: radians/second
    pub omega_eq_rads: f64,

    /// Non-fatal corrections applied while generating the trajectory
    pub warnings: Vec<RefTrajWarning>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Shape of the reference trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// Straight line at constant heading
    Line,

    /// Counter-clockwise circle about the origin
    Circle,
}

/// Non-fatal corrections made by a generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefTrajWarning {
    /// The reference start point was not on the circle and has been moved
    /// radially onto it.
    ProjectedOntoCircle {
        from_m: [f64; 2],
        to_m: [f64; 2],
        radius_m: f64,
    },

    /// The reference start point was at the origin, so has no direction to
    /// project along, and was left unscaled.
    DegenerateCircleStart { radius_m: f64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum RefTrajError {
    #[error("Unknown case kind \"{0}\", expected line or circle")]
    InvalidCaseKind(String),

    #[error(
        "The circle reference starts at the origin, which cannot be projected \
        onto a circle of radius {0} m"
    )]
    DegenerateCircleStart(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseKind::Line => "line",
            CaseKind::Circle => "circle",
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseKind {
    type Err = RefTrajError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(CaseKind::Line),
            "circle" => Ok(CaseKind::Circle),
            _ => Err(RefTrajError::InvalidCaseKind(s.to_string())),
        }
    }
}

impl fmt::Display for RefTrajWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTrajWarning::ProjectedOntoCircle {
                from_m,
                to_m,
                radius_m,
            } => write!(
                f,
                "Reference start ({:.3}, {:.3}) is {:.3} m from the origin, not R = {} m, \
                projected onto the circle at ({:.3}, {:.3})",
                from_m[0],
                from_m[1],
                from_m[0].hypot(from_m[1]),
                radius_m,
                to_m[0],
                to_m[1]
            ),
            RefTrajWarning::DegenerateCircleStart { radius_m } => write!(
                f,
                "Reference start is at the origin and cannot be projected onto \
                the circle of radius {} m, using it unscaled",
                radius_m
            ),
        }
    }
}
