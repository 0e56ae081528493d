//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the sliding mode trajectory controllers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerParams {
    /// Lateral error weight in the sliding surface (lambda)
    pub lambda: f64,

    /// Heading error weight in the sliding surface
    pub l2: f64,

    /// Integral gain on the heading error
    pub k_i: f64,

    /// Scaling of the lateral error (phi 1)
    pub phi1: f64,

    /// Scaling of the heading error (phi 2)
    pub phi2: f64,

    /// Width of the boundary layer used to smooth the switching term.
    ///
    /// The switching term is `beta * tanh(s / delta)`, a smaller delta
    /// approaches the ideal relay and chatters more.
    pub delta: f64,

    /// Lower bound of the switching gain
    pub beta_min: f64,

    /// Upper bound of the switching gain, and the fixed gain of classical SMC
    pub beta_max: f64,

    /// Breakpoints of the hexagonal fuzzy membership function, non-decreasing.
    pub hfn_breakpoints: [f64; 6],

    /// Shape exponent applied to the rising and falling ramps of the
    /// membership function
    pub hfn_gamma: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("Controller parameter `{0}` must be finite, found {1}")]
    NotFinite(&'static str, f64),

    #[error("The boundary layer width (delta) must be greater than zero, found {0}")]
    NonPositiveDelta(f64),

    #[error("The HFN shape exponent (gamma) must be greater than zero, found {0}")]
    NonPositiveGamma(f64),

    #[error("beta_min ({0}) is greater than beta_max ({1})")]
    GainBoundsInverted(f64, f64),

    #[error("HFN breakpoints must be finite and non-decreasing, found {0:?}")]
    MalformedBreakpoints([f64; 6]),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            l2: 0.5,
            k_i: 0.0,
            phi1: 1.0,
            phi2: 1.0,
            delta: 0.5,
            beta_min: 0.5,
            beta_max: 3.0,
            hfn_breakpoints: [0.0, 0.05, 0.10, 0.15, 0.20, 0.25],
            hfn_gamma: 1.0,
        }
    }
}

impl ControllerParams {
    /// Determines if the parameters are valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("lambda", self.lambda),
            ("l2", self.l2),
            ("k_i", self.k_i),
            ("phi1", self.phi1),
            ("phi2", self.phi2),
            ("beta_min", self.beta_min),
            ("beta_max", self.beta_max),
        ]
        .iter()
        {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite(*name, *value));
            }
        }

        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(ParamsError::NonPositiveDelta(self.delta));
        }

        if !(self.hfn_gamma.is_finite() && self.hfn_gamma > 0.0) {
            return Err(ParamsError::NonPositiveGamma(self.hfn_gamma));
        }

        if self.beta_min > self.beta_max {
            return Err(ParamsError::GainBoundsInverted(self.beta_min, self.beta_max));
        }

        let xi = &self.hfn_breakpoints;
        if xi.iter().any(|x| !x.is_finite()) || xi.windows(2).any(|w| w[0] > w[1]) {
            return Err(ParamsError::MalformedBreakpoints(*xi));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ControllerParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_params() {
        let mut p = ControllerParams::default();
        p.delta = 0.0;
        assert_eq!(p.validate(), Err(ParamsError::NonPositiveDelta(0.0)));

        let mut p = ControllerParams::default();
        p.beta_min = 4.0;
        assert_eq!(p.validate(), Err(ParamsError::GainBoundsInverted(4.0, 3.0)));

        let mut p = ControllerParams::default();
        p.hfn_breakpoints = [0.0, 0.1, 0.05, 0.15, 0.2, 0.25];
        assert!(matches!(p.validate(), Err(ParamsError::MalformedBreakpoints(_))));

        let mut p = ControllerParams::default();
        p.lambda = f64::NAN;
        assert!(matches!(p.validate(), Err(ParamsError::NotFinite("lambda", _))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let p: ControllerParams = util::params::from_str("beta_max = 4.0\ndelta = 0.25").unwrap();

        assert_eq!(p.beta_max, 4.0);
        assert_eq!(p.delta, 0.25);
        assert_eq!(p.beta_min, ControllerParams::default().beta_min);
        assert_eq!(p.hfn_breakpoints, ControllerParams::default().hfn_breakpoints);
    }
}
