//! Case study parameters
//!
//! A case study fixes the reference trajectory, the robot's starting pose and
//! the time base of a run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};
use thiserror::Error;

// Internal
use crate::loc::Pose;
use crate::ref_traj::CaseKind;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest number of samples a run may have, including the initial
/// condition. Every series of a run is preallocated at this length.
pub const MAX_STEPS: usize = 10_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Initial conditions, commanded speed and time base of a case study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseStudyParams {
    /// Shape of the reference trajectory
    pub kind: CaseKind,

    // ---- REFERENCE START ----

    /// Units: meters
    pub x_ref0_m: f64,

    /// Units: meters
    pub y_ref0_m: f64,

    /// Units: radians
    pub head_ref0_rad: f64,

    // ---- ROBOT START ----

    /// Units: meters
    pub x0_m: f64,

    /// Units: meters
    pub y0_m: f64,

    /// Units: radians
    pub head0_rad: f64,

    // ---- MOTION ----

    /// Forward speed demanded from the drive motors, and the speed at which
    /// the reference advances.
    ///
    /// Units: meters/second
    pub speed_cmd_ms: f64,

    /// Duration of the run.
    ///
    /// Units: seconds
    pub t_end_s: f64,

    /// Integration step.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Radius of the circular reference, unused for a line.
    ///
    /// Units: meters
    pub radius_m: f64,

    /// If set, a circle reference starting at the origin is rejected rather
    /// than used unscaled.
    pub strict_circle_projection: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("Case parameter `{0}` must be finite, found {1}")]
    NotFinite(&'static str, f64),

    #[error("The time step must be greater than zero, found {0} s")]
    NonPositiveTimeStep(f64),

    #[error("The end time must be greater than zero, found {0} s")]
    NonPositiveEndTime(f64),

    #[error("The circle radius must be greater than zero, found {0} m")]
    NonPositiveRadius(f64),

    #[error(
        "The run has too many samples: t_end_s / dt_s = {0}, at most {} samples are allowed",
        MAX_STEPS
    )]
    TooManySteps(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CaseStudyParams {
    fn default() -> Self {
        Self::line_case()
    }
}

impl CaseStudyParams {
    /// Straight line case: the robot starts half a meter behind the
    /// reference, on the same heading.
    pub fn line_case() -> Self {
        Self {
            kind: CaseKind::Line,
            x_ref0_m: 1.0,
            y_ref0_m: 0.0,
            head_ref0_rad: FRAC_PI_3,
            x0_m: 0.5,
            y0_m: 0.0,
            head0_rad: FRAC_PI_3,
            speed_cmd_ms: 2.5,
            t_end_s: 20.0,
            dt_s: 0.01,
            radius_m: 4.0,
            strict_circle_projection: false,
        }
    }

    /// Circle case: the reference starts on the 4 m circle at (4, 0), the
    /// robot starts inside it with a heading error of pi/3.
    pub fn circle_case() -> Self {
        Self {
            kind: CaseKind::Circle,
            x_ref0_m: 4.0,
            y_ref0_m: 0.0,
            head_ref0_rad: FRAC_PI_2,
            x0_m: 4.0,
            y0_m: 2.0,
            head0_rad: 5.0 * std::f64::consts::PI / 6.0,
            ..Self::line_case()
        }
    }

    /// The default case for the given kind.
    pub fn for_kind(kind: CaseKind) -> Self {
        match kind {
            CaseKind::Line => Self::line_case(),
            CaseKind::Circle => Self::circle_case(),
        }
    }

    /// Determines if the parameters are valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("x_ref0_m", self.x_ref0_m),
            ("y_ref0_m", self.y_ref0_m),
            ("head_ref0_rad", self.head_ref0_rad),
            ("x0_m", self.x0_m),
            ("y0_m", self.y0_m),
            ("head0_rad", self.head0_rad),
            ("speed_cmd_ms", self.speed_cmd_ms),
        ]
        .iter()
        {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite(*name, *value));
            }
        }

        if !(self.dt_s.is_finite() && self.dt_s > 0.0) {
            return Err(ParamsError::NonPositiveTimeStep(self.dt_s));
        }

        if !(self.t_end_s.is_finite() && self.t_end_s > 0.0) {
            return Err(ParamsError::NonPositiveEndTime(self.t_end_s));
        }

        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(ParamsError::NonPositiveRadius(self.radius_m));
        }

        let ratio = self.t_end_s / self.dt_s;
        if !(ratio.is_finite() && ratio.floor() < MAX_STEPS as f64) {
            return Err(ParamsError::TooManySteps(ratio));
        }

        Ok(())
    }

    /// Pose of the reference at t = 0.
    pub fn ref_start(&self) -> Pose {
        Pose::new(self.x_ref0_m, self.y_ref0_m, self.head_ref0_rad)
    }

    /// Pose of the robot at t = 0.
    pub fn start(&self) -> Pose {
        Pose::new(self.x0_m, self.y0_m, self.head0_rad)
    }

    /// Number of samples in the run, including the initial condition.
    ///
    /// Only meaningful for validated parameters, saturates otherwise.
    pub fn num_steps(&self) -> usize {
        ((self.t_end_s / self.dt_s).floor() as usize).saturating_add(1)
    }

    /// Sample times, evenly spaced from zero to exactly `t_end_s`.
    ///
    /// The spacing is `t_end_s / (num_steps - 1)`, which differs from `dt_s`
    /// when `dt_s` does not divide `t_end_s`. The integrator always steps by
    /// `dt_s`.
    pub fn time_base(&self) -> Vec<f64> {
        let n = self.num_steps();

        if n < 2 {
            return vec![0.0];
        }

        let step_s = self.t_end_s / (n - 1) as f64;
        let mut times_s: Vec<f64> = (0..n).map(|k| k as f64 * step_s).collect();
        times_s[n - 1] = self.t_end_s;

        times_s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_time_base() {
        let case = CaseStudyParams::line_case();

        assert_eq!(case.num_steps(), 2001);

        let times_s = case.time_base();
        assert_eq!(times_s.len(), 2001);
        assert_eq!(times_s[0], 0.0);
        assert_eq!(times_s[2000], 20.0);
        assert!((times_s[1] - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_uneven_time_base() {
        let mut case = CaseStudyParams::line_case();
        case.t_end_s = 1.0;
        case.dt_s = 0.3;

        // floor(1.0 / 0.3) + 1
        assert_eq!(case.num_steps(), 4);
        assert_eq!(case.time_base().last(), Some(&1.0));

        case.dt_s = 2.0;
        assert_eq!(case.num_steps(), 1);
        assert_eq!(case.time_base(), vec![0.0]);
    }

    #[test]
    fn test_validate() {
        assert_eq!(CaseStudyParams::line_case().validate(), Ok(()));
        assert_eq!(CaseStudyParams::circle_case().validate(), Ok(()));

        let mut case = CaseStudyParams::line_case();
        case.dt_s = 0.0;
        assert_eq!(case.validate(), Err(ParamsError::NonPositiveTimeStep(0.0)));

        let mut case = CaseStudyParams::line_case();
        case.t_end_s = -1.0;
        assert_eq!(case.validate(), Err(ParamsError::NonPositiveEndTime(-1.0)));

        let mut case = CaseStudyParams::circle_case();
        case.radius_m = 0.0;
        assert_eq!(case.validate(), Err(ParamsError::NonPositiveRadius(0.0)));
    }

    #[test]
    fn test_step_count_limit() {
        // Finite and positive, but far too many samples to allocate
        let mut case = CaseStudyParams::line_case();
        case.t_end_s = 1e300;
        case.dt_s = 1e-300;
        assert!(matches!(case.validate(), Err(ParamsError::TooManySteps(_))));
        assert_eq!(case.num_steps(), usize::MAX);

        let mut case = CaseStudyParams::line_case();
        case.t_end_s = 1e6;
        case.dt_s = 1e-10;
        assert!(matches!(case.validate(), Err(ParamsError::TooManySteps(_))));

        // Just below the limit is accepted
        let mut case = CaseStudyParams::line_case();
        case.t_end_s = (MAX_STEPS - 1) as f64;
        case.dt_s = 1.0;
        assert_eq!(case.validate(), Ok(()));
        assert_eq!(case.num_steps(), MAX_STEPS);
    }

    #[test]
    fn test_circle_case_from_toml() {
        let case: CaseStudyParams = util::params::from_str("kind = \"circle\"\nx_ref0_m = 5.0").unwrap();

        assert_eq!(case.kind, CaseKind::Circle);
        assert_eq!(case.x_ref0_m, 5.0);
        assert_eq!(case.radius_m, 4.0);
    }
}
