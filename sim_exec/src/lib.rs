//! # Simulation library.
//!
//! This library allows other crates in the workspace, the benchmarks and the
//! `sim_exec` executable to access the simulation and control engine.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation module - the robot's pose and the unicycle integrator
pub mod loc;

/// Locomotion control module - maps body rates onto the drive wheels
pub mod loco_ctrl;

/// Performance metrics - scalar indicators of a finished run
pub mod metrics;

/// Drive motor model - second order speed response with saturation
pub mod motor;

/// Parameters of the simulation executable
pub mod params;

/// Reference trajectory module - the poses the robot should follow
pub mod ref_traj;

/// Simulation module - the closed loop driver, scenarios and batches
pub mod sim;

/// Trajectory control module - keeps the robot on the reference trajectory
pub mod traj_ctrl;
