//! Skid steer calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use serde::Serialize;

// Internal imports
use super::RobotParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Angular rates of the left and right drive wheels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WheelRates {
    /// Units: radians/second
    pub left_rads: f64,

    /// Units: radians/second
    pub right_rads: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the wheel rates which produce the given forward speed and turn
/// rate.
pub fn calc_skid_steer(speed_ms: f64, turn_rate_rads: f64, params: &RobotParams) -> WheelRates {
    let half_track_m = params.wheel_spacing_m / 2.0;

    WheelRates {
        left_rads: (speed_ms - turn_rate_rads * half_track_m) / params.wheel_radius_m,
        right_rads: (speed_ms + turn_rate_rads * half_track_m) / params.wheel_radius_m,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_straight() {
        let params = RobotParams::default();
        let rates = calc_skid_steer(0.66, 0.0, &params);

        assert!((rates.left_rads - 10.0).abs() < 1e-12);
        assert_eq!(rates.left_rads, rates.right_rads);
    }

    #[test]
    fn test_turn_on_spot() {
        let params = RobotParams::default();
        let rates = calc_skid_steer(0.0, 1.0, &params);

        assert_eq!(rates.left_rads, -rates.right_rads);
        assert!((rates.right_rads - 0.1435 / 0.066).abs() < 1e-12);
    }

    #[test]
    fn test_left_turn_speeds_right_wheel() {
        let rates = calc_skid_steer(2.5, 0.625, &RobotParams::default());

        assert!(rates.right_rads > rates.left_rads);
    }
}
