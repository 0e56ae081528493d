//! # Locomotion control module
//!
//! Maps the forward speed and turn rate of the robot body onto the angular
//! rates of its left and right drive wheels. The simulation runs this once
//! over the recorded history rather than inside the control loop.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_skid_steer;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_skid_steer::*;
pub use params::*;
