//! Circular reference
//!
//! The circle is centred on the origin and traversed counter-clockwise at
//! constant speed. The phase of the start point sets where on the circle the
//! reference begins, and the reference heading is always tangent to it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use std::f64::consts::FRAC_PI_2;

// Internal
use super::{RefTrajError, RefTrajWarning, ReferenceTrajectory};
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distance from the circle a start point may lie before it is projected.
///
/// Units: meters
pub const PROJECTION_TOL_M: f64 = 1e-3;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate a circle of `radius_m` traversed at `speed_ms`, starting at the
/// phase of `start`.
///
/// A start point further than [`PROJECTION_TOL_M`] from the circle is scaled
/// radially onto it, recording a warning. A start point at the origin cannot
/// be projected: it is used unscaled with a warning, or rejected if `strict`
/// is set. The heading of `start` is ignored.
pub fn generate(
    start: &Pose,
    speed_ms: f64,
    radius_m: f64,
    strict: bool,
    times_s: &[f64],
) -> Result<ReferenceTrajectory, RefTrajError> {
    let omega_eq_rads = speed_ms / radius_m;
    let mut warnings = Vec::new();

    let mut start_m = start.position_m;
    let dist_m = start_m.norm();

    if (dist_m - radius_m).abs() > PROJECTION_TOL_M {
        if dist_m > 0.0 {
            let from_m = start_m;
            start_m *= radius_m / dist_m;

            let w = RefTrajWarning::ProjectedOntoCircle {
                from_m: [from_m[0], from_m[1]],
                to_m: [start_m[0], start_m[1]],
                radius_m,
            };
            warn!("{}", w);
            warnings.push(w);
        } else if strict {
            return Err(RefTrajError::DegenerateCircleStart(radius_m));
        } else {
            let w = RefTrajWarning::DegenerateCircleStart { radius_m };
            warn!("{}", w);
            warnings.push(w);
        }
    }

    let phase_rad = start_m[1].atan2(start_m[0]);

    let poses = times_s
        .iter()
        .map(|t| {
            let alpha = omega_eq_rads * t + phase_rad;
            Pose::new(
                radius_m * alpha.cos(),
                radius_m * alpha.sin(),
                alpha + FRAC_PI_2,
            )
        })
        .collect();

    Ok(ReferenceTrajectory {
        poses,
        omega_eq_rads,
        warnings,
    })
}
