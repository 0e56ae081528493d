//! Operating scenarios
//!
//! A scenario perturbs an otherwise nominal run: sensor noise on the measured
//! pose and error rates, a heavier payload, or an external disturbance on the
//! drivetrain. Noise is drawn from a ChaCha8 stream seeded per run so that
//! every run can be replayed exactly.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

// Internal
use super::SimError;
use crate::loc::Pose;
use crate::motor::Loading;
use crate::traj_ctrl::ErrorRates;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Magnitudes of the perturbations applied by a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioProfile {
    /// Standard deviation of the measured position noise.
    ///
    /// Units: meters
    pub pos_noise_std_m: f64,

    /// Standard deviation of the measured heading noise.
    ///
    /// Units: radians
    pub head_noise_std_rad: f64,

    /// Standard deviation of the noise on both error rates
    pub rate_noise_std: f64,

    /// Divides the drivetrain acceleration update
    pub inertia_mult: f64,

    /// Amplitude of the sinusoidal drivetrain disturbance.
    ///
    /// Units: meters/second^2
    pub dist_amp_mss: f64,

    /// Period of the sinusoidal drivetrain disturbance.
    ///
    /// Units: seconds
    pub dist_period_s: f64,
}

/// Applies a scenario's perturbations during a run.
pub struct Perturber {
    profile: ScenarioProfile,

    /// Present only for noisy scenarios, so nominal runs make no draws.
    rng: Option<ChaCha8Rng>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "nominal")]
    Nominal,

    #[serde(rename = "sensor_noise")]
    SensorNoise,

    /// 20 % heavier payload
    #[serde(rename = "payload_20")]
    Payload20,

    #[serde(rename = "external_dist")]
    ExternalDist,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ScenarioProfile {
    fn default() -> Self {
        Self {
            pos_noise_std_m: 0.0,
            head_noise_std_rad: 0.0,
            rate_noise_std: 0.0,
            inertia_mult: 1.0,
            dist_amp_mss: 0.0,
            dist_period_s: 5.0,
        }
    }
}

impl ScenarioProfile {
    pub fn is_noisy(&self) -> bool {
        self.pos_noise_std_m > 0.0 || self.head_noise_std_rad > 0.0 || self.rate_noise_std > 0.0
    }
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Nominal,
        Scenario::SensorNoise,
        Scenario::Payload20,
        Scenario::ExternalDist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Nominal => "nominal",
            Scenario::SensorNoise => "sensor_noise",
            Scenario::Payload20 => "payload_20",
            Scenario::ExternalDist => "external_dist",
        }
    }

    /// Perturbation magnitudes of this scenario.
    pub fn profile(&self) -> ScenarioProfile {
        match self {
            Scenario::Nominal => ScenarioProfile::default(),
            Scenario::SensorNoise => ScenarioProfile {
                pos_noise_std_m: 0.01,
                head_noise_std_rad: 0.001,
                rate_noise_std: 0.05,
                ..Default::default()
            },
            Scenario::Payload20 => ScenarioProfile {
                inertia_mult: 1.2,
                ..Default::default()
            },
            Scenario::ExternalDist => ScenarioProfile {
                dist_amp_mss: 0.1,
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.trim().to_lowercase();

        Scenario::ALL
            .iter()
            .find(|sc| sc.as_str() == s_lower)
            .copied()
            .ok_or_else(|| SimError::InvalidScenario(s.to_string()))
    }
}

impl Perturber {
    /// Create the perturber for `scenario`, seeding its noise stream from
    /// `seed`.
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        let profile = scenario.profile();

        Self {
            profile,
            rng: if profile.is_noisy() {
                Some(ChaCha8Rng::seed_from_u64(seed))
            } else {
                None
            },
        }
    }

    /// Measure a pose, drawing x, y then heading noise.
    pub fn measure_pose(&mut self, pose: &Pose) -> Pose {
        match self.rng {
            Some(ref mut rng) => {
                let dx: f64 = rng.sample(StandardNormal);
                let dy: f64 = rng.sample(StandardNormal);
                let dh: f64 = rng.sample(StandardNormal);

                Pose::new(
                    pose.x() + self.profile.pos_noise_std_m * dx,
                    pose.y() + self.profile.pos_noise_std_m * dy,
                    pose.heading_rad + self.profile.head_noise_std_rad * dh,
                )
            }
            None => *pose,
        }
    }

    /// Measure the error rates, drawing lateral then heading rate noise.
    pub fn measure_rates(&mut self, rates: &ErrorRates) -> ErrorRates {
        match self.rng {
            Some(ref mut rng) => {
                let dl: f64 = rng.sample(StandardNormal);
                let dh: f64 = rng.sample(StandardNormal);

                ErrorRates {
                    lat_err_rate_ms: rates.lat_err_rate_ms + self.profile.rate_noise_std * dl,
                    head_err_rate_rads: rates.head_err_rate_rads
                        + self.profile.rate_noise_std * dh,
                }
            }
            None => *rates,
        }
    }

    /// Drivetrain loading at time `t_s`.
    pub fn loading(&self, t_s: f64) -> Loading {
        Loading {
            inertia_mult: self.profile.inertia_mult,
            disturbance_mss: self.profile.dist_amp_mss
                * (TAU * t_s / self.profile.dist_period_s).sin(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scenario_from_str() {
        assert_eq!("payload_20".parse::<Scenario>().unwrap(), Scenario::Payload20);
        assert_eq!("Sensor_Noise".parse::<Scenario>().unwrap(), Scenario::SensorNoise);
        assert!(matches!(
            "windy".parse::<Scenario>(),
            Err(SimError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_nominal_has_no_effect() {
        let mut p = Perturber::new(Scenario::Nominal, 7);
        let pose = Pose::new(1.0, 2.0, 0.3);
        let rates = ErrorRates {
            lat_err_rate_ms: 0.1,
            head_err_rate_rads: 0.2,
        };

        assert_eq!(p.measure_pose(&pose), pose);
        assert_eq!(p.measure_rates(&rates), rates);
        assert_eq!(p.loading(1.25), Loading::default());
    }

    #[test]
    fn test_noise_is_seeded() {
        let pose = Pose::new(1.0, 2.0, 0.3);

        let mut a = Perturber::new(Scenario::SensorNoise, 42);
        let mut b = Perturber::new(Scenario::SensorNoise, 42);
        let mut c = Perturber::new(Scenario::SensorNoise, 43);

        let pa = a.measure_pose(&pose);
        assert_eq!(pa, b.measure_pose(&pose));
        assert_ne!(pa, c.measure_pose(&pose));

        assert!((pa.x() - 1.0).abs() < 0.1);
        assert!((pa.heading_rad - 0.3).abs() < 0.01);
    }

    #[test]
    fn test_disturbance() {
        let p = Perturber::new(Scenario::ExternalDist, 0);

        assert_eq!(p.loading(0.0).disturbance_mss, 0.0);
        assert!((p.loading(1.25).disturbance_mss - 0.1).abs() < 1e-12);
        assert_eq!(p.loading(1.25).inertia_mult, 1.0);

        let p = Perturber::new(Scenario::Payload20, 0);
        assert_eq!(p.loading(1.25).inertia_mult, 1.2);
        assert_eq!(p.loading(1.25).disturbance_mss, 0.0);
    }
}
