//! # Tracking error frame
//!
//! The tracking errors are expressed in the frame of the reference pose: the
//! longitudinal error lies along the reference heading, the lateral error is
//! perpendicular to it (positive to the left) and the heading error is the
//! wrapped difference between the actual and reference headings.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::loc::Pose;
use util::maths::wrap_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracking errors of a pose relative to a reference pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrackingError {
    /// Error along the reference heading
    pub long_err_m: f64,

    /// Error perpendicular to the reference heading
    pub lat_err_m: f64,

    /// Wrapped heading error, in (-pi, pi]
    pub head_err_rad: f64,
}

/// Backward difference rates of the tracked errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ErrorRates {
    pub lat_err_rate_ms: f64,

    pub head_err_rate_rads: f64,
}

/// Memory of the error signals carried between control steps.
///
/// The control law itself is stateless, the loop driving it owns one of
/// these and feeds the derived rates and integral into each call.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ErrorTracker {
    /// Previous lateral error, zero before the first sample
    prev_lat_err_m: f64,

    /// Previous heading error, zero before the first sample
    prev_head_err_rad: f64,

    /// Rectangular running sum of the heading error
    head_err_int: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrackingError {
    /// Calculate the errors of `pose` relative to `reference`.
    pub fn between(pose: &Pose, reference: &Pose) -> Self {
        let delta = pose.position_m - reference.position_m;
        let (sin_r, cos_r) = reference.heading_rad.sin_cos();

        Self {
            long_err_m: delta[0] * cos_r + delta[1] * sin_r,
            lat_err_m: -delta[0] * sin_r + delta[1] * cos_r,
            head_err_rad: wrap_angle(pose.heading_rad - reference.heading_rad),
        }
    }
}

impl ErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integral of the heading error accumulated so far.
    pub fn head_err_int(&self) -> f64 {
        self.head_err_int
    }

    /// Push a new error sample, returning the backward difference rates.
    ///
    /// The heading error integral is advanced by `head_err_rad * dt_s`. A
    /// non-positive `dt_s` produces zero rates and leaves the integral
    /// unchanged.
    pub fn update(&mut self, err: &TrackingError, dt_s: f64) -> ErrorRates {
        let rates = if dt_s > 0.0 {
            ErrorRates {
                lat_err_rate_ms: (err.lat_err_m - self.prev_lat_err_m) / dt_s,
                head_err_rate_rads: (err.head_err_rad - self.prev_head_err_rad) / dt_s,
            }
        } else {
            ErrorRates::default()
        };

        self.prev_lat_err_m = err.lat_err_m;
        self.prev_head_err_rad = err.head_err_rad;

        if dt_s > 0.0 {
            self.head_err_int += err.head_err_rad * dt_s;
        }

        rates
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_3, PI};

    #[test]
    fn test_line_case_initial_errors() {
        let reference = Pose::new(1.0, 0.0, FRAC_PI_3);
        let actual = Pose::new(0.5, 0.0, FRAC_PI_3);

        let err = TrackingError::between(&actual, &reference);

        assert!((err.long_err_m - (-0.25)).abs() < 1e-12);
        assert!((err.lat_err_m - 0.5 * FRAC_PI_3.sin()).abs() < 1e-12);
        assert_eq!(err.head_err_rad, 0.0);
    }

    #[test]
    fn test_heading_error_wraps() {
        let reference = Pose::new(0.0, 0.0, PI - 0.1);
        let actual = Pose::new(0.0, 0.0, -PI + 0.1);

        let err = TrackingError::between(&actual, &reference);

        assert!((err.head_err_rad - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_tracker_rates_and_integral() {
        let mut tracker = ErrorTracker::new();
        let e0 = TrackingError {
            long_err_m: 0.0,
            lat_err_m: 0.1,
            head_err_rad: 0.2,
        };

        // First sample is differenced against zero
        let r0 = tracker.update(&e0, 0.1);
        assert!((r0.lat_err_rate_ms - 1.0).abs() < 1e-12);
        assert!((r0.head_err_rate_rads - 2.0).abs() < 1e-12);

        let r1 = tracker.update(&e0, 0.1);
        assert_eq!(r1, ErrorRates::default());

        assert!((tracker.head_err_int() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_tracker_zero_dt() {
        let mut tracker = ErrorTracker::new();
        let err = TrackingError {
            long_err_m: 1.0,
            lat_err_m: 1.0,
            head_err_rad: 1.0,
        };

        assert_eq!(tracker.update(&err, 0.0), ErrorRates::default());
        assert_eq!(tracker.head_err_int(), 0.0);
    }
}
