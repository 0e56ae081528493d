//! Straight line reference

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::ReferenceTrajectory;
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate a straight line leaving `start` along its heading at `speed_ms`.
pub fn generate(start: &Pose, speed_ms: f64, times_s: &[f64]) -> ReferenceTrajectory {
    let dir = start.forward2();

    let poses = times_s
        .iter()
        .map(|t| Pose {
            position_m: start.position_m + dir * (speed_ms * t),
            heading_rad: start.heading_rad,
        })
        .collect();

    ReferenceTrajectory {
        poses,
        omega_eq_rads: 0.0,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_3;

    #[test]
    fn test_line() {
        let start = Pose::new(1.0, 0.0, FRAC_PI_3);
        let traj = generate(&start, 2.5, &[0.0, 1.0, 2.0]);

        assert_eq!(traj.poses.len(), 3);
        assert_eq!(traj.omega_eq_rads, 0.0);
        assert!(traj.warnings.is_empty());

        assert_eq!(traj.poses[0], start);
        assert!((traj.poses[2].x() - (1.0 + 5.0 * 0.5)).abs() < 1e-12);
        assert!((traj.poses[2].y() - 5.0 * FRAC_PI_3.sin()).abs() < 1e-12);

        for pose in traj.poses.iter() {
            assert_eq!(pose.heading_rad, FRAC_PI_3);
        }
    }
}
