//! Working state of a single simulation run

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::loc::Pose;
use crate::motor::{MotorModel, MotorParams};
use crate::traj_ctrl::{ErrorTracker, SlidingModeOutput, TrackingError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-step histories and loop memory owned by the simulation driver.
///
/// Index 0 holds the initial condition. Every later entry is written by the
/// loop before anything reads it.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// True pose of the robot
    pub poses: Vec<Pose>,

    /// Actual forward speed produced by the motor model
    pub speed_ms: Vec<f64>,

    /// Measured tracking errors
    pub errors: Vec<TrackingError>,

    /// Control law outputs, the final sample is never commanded
    pub control: Vec<SlidingModeOutput>,

    pub motor: MotorModel,

    pub tracker: ErrorTracker,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimulationState {
    /// Create the state for `num_steps` samples with the robot at rest at
    /// `start`.
    pub fn new(num_steps: usize, start: Pose, motor_params: MotorParams) -> Self {
        let mut poses = vec![Pose::default(); num_steps];
        if let Some(p0) = poses.first_mut() {
            *p0 = start;
        }

        Self {
            poses,
            speed_ms: vec![0.0; num_steps],
            errors: vec![TrackingError::default(); num_steps],
            control: vec![SlidingModeOutput::default(); num_steps],
            motor: MotorModel::new(motor_params),
            tracker: ErrorTracker::new(),
        }
    }

    pub fn num_steps(&self) -> usize {
        self.poses.len()
    }
}
