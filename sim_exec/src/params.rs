//! # Simulation Executable Parameters
//!
//! This module provides the batch parameters for the simulation executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::MetricsParams;
use crate::ref_traj::CaseKind;
use crate::sim::{CaseStudyParams, Scenario};
use crate::traj_ctrl::ControlMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimExecParams {
    /// Case study to run
    pub case_kind: CaseKind,

    /// Modes to compare, run in this order within each scenario
    pub modes: Vec<ControlMode>,

    /// Scenarios to run, in this order. The order fixes the run seeds.
    pub scenarios: Vec<Scenario>,

    /// Seed of the master stream the run seeds are drawn from
    pub batch_seed: u64,

    pub metrics: MetricsParams,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("At least one control mode must be given")]
    NoModes,

    #[error("At least one scenario must be given")]
    NoScenarios,

    #[error("The settling tolerance must be greater than zero, found {0}")]
    NonPositiveSettlingTol(f64),

    #[error("The steady state fraction must be in (0, 1], found {0}")]
    InvalidSteadyStateFraction(f64),

    #[error("The {requested} case was requested but its case file declares a {found} case")]
    CaseKindMismatch { requested: CaseKind, found: CaseKind },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimExecParams {
    fn default() -> Self {
        Self {
            case_kind: CaseKind::Line,
            modes: ControlMode::ALL.to_vec(),
            scenarios: Scenario::ALL.to_vec(),
            batch_seed: 42,
            metrics: MetricsParams::default(),
        }
    }
}

impl SimExecParams {
    /// Determines if the parameters are valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.modes.is_empty() {
            return Err(ParamsError::NoModes);
        }

        if self.scenarios.is_empty() {
            return Err(ParamsError::NoScenarios);
        }

        let tol = self.metrics.settling_tol;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(ParamsError::NonPositiveSettlingTol(tol));
        }

        let frac = self.metrics.steady_state_fraction;
        if !(frac > 0.0 && frac <= 1.0) {
            return Err(ParamsError::InvalidSteadyStateFraction(frac));
        }

        Ok(())
    }

    /// Check that a case loaded from [`Self::case_file`] is of the requested
    /// kind.
    pub fn check_case(&self, case: &CaseStudyParams) -> Result<(), ParamsError> {
        if case.kind != self.case_kind {
            return Err(ParamsError::CaseKindMismatch {
                requested: self.case_kind,
                found: case.kind,
            });
        }

        Ok(())
    }

    /// Name of the parameter file holding the case for `case_kind`.
    pub fn case_file(&self) -> &'static str {
        match self.case_kind {
            CaseKind::Line => "case_line.toml",
            CaseKind::Circle => "case_circle.toml",
        }
    }
}
