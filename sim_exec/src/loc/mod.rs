//! # Localisation module
//!
//! Provides the planar pose of the robot and the kinematic integrator which
//! advances it. The robot is modelled as a unicycle: it can move forwards
//! along its heading and turn, but has no direct lateral motion.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use util::maths::wrap_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planar pose (position and heading in the world frame) of the robot or
/// of a point on the reference trajectory.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose {
    /// The position in the world frame
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading (angle to the positive world X axis), in (-pi, pi].
    ///
    /// Units: radians
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose, wrapping the heading into (-pi, pi].
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: wrap_angle(heading_rad),
        }
    }

    pub fn x(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y(&self) -> f64 {
        self.position_m[1]
    }

    /// Unit vector pointing along the heading.
    pub fn forward2(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }

    /// Advance the pose by one forward-Euler step of the unicycle model.
    ///
    /// The position moves along the heading held at the start of the step,
    /// then the heading is rotated by `turn_rate_rads * dt_s` and wrapped.
    pub fn integrate_unicycle(&self, speed_ms: f64, turn_rate_rads: f64, dt_s: f64) -> Self {
        let x_m = self.position_m[0] + speed_ms * self.heading_rad.cos() * dt_s;
        let y_m = self.position_m[1] + speed_ms * self.heading_rad.sin() * dt_s;

        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: wrap_angle(self.heading_rad + turn_rate_rads * dt_s),
        }
    }
}
