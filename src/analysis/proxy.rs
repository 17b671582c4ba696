use serde::{Deserialize, Serialize};

use crate::config::LateralCoefficients;

/// Deviation attributed to the side-force channel per unit |Cy·beta|.
///
/// Calibration parameter fitted against full 6-DOF runs, not a physical
/// constant; revisit when the aerodynamic model changes.
pub const DEVIATION_GAIN_SIDE_FORCE: f64 = 500.0;

/// Deviation attributed to the weathercock channel per unit |Cn·beta|.
///
/// Calibration parameter, same caveat as [`DEVIATION_GAIN_SIDE_FORCE`].
pub const DEVIATION_GAIN_YAW: f64 = 300.0;

/// Nominal approach speed used when reducing a wind condition to a sideslip
/// angle (m/s).
pub const NOMINAL_APPROACH_SPEED: f64 = 30.0;

/// Representative wind condition for the reduced-order outcome model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindCondition {
    pub speed: f64,
    /// Direction relative to the approach heading (rad).
    pub direction: f64,
}

impl WindCondition {
    pub fn new(speed: f64, direction: f64) -> Self {
        Self { speed, direction }
    }

    /// Approximate steady sideslip for this wind at the nominal approach
    /// speed.
    pub fn sideslip(&self) -> f64 {
        let crosswind = self.speed * self.direction.sin();
        crosswind.atan2(NOMINAL_APPROACH_SPEED)
    }
}

/// Reduced closed-form lateral-deviation proxy (m).
///
/// Stands in for the full time-domain simulation where thousands of
/// evaluations are needed: sensitivity perturbation studies and Monte Carlo
/// uncertainty propagation. Only `cy_beta` and `cn_beta` enter the proxy;
/// the rate and control derivatives shape the transient, not the steady
/// deviation this approximates.
pub fn deviation_proxy(coefficients: &LateralCoefficients, wind: &WindCondition) -> f64 {
    let beta = wind.sideslip();
    DEVIATION_GAIN_SIDE_FORCE * (coefficients.side_force.cy_beta * beta).abs()
        + DEVIATION_GAIN_YAW * (coefficients.yaw.cn_beta * beta).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_wind_gives_zero_outcome() {
        let coeffs = LateralCoefficients::twin_otter();
        let wind = WindCondition::new(0.0, FRAC_PI_2);
        assert_relative_eq!(deviation_proxy(&coeffs, &wind), 0.0);
    }

    #[test]
    fn test_outcome_grows_with_crosswind() {
        let coeffs = LateralCoefficients::twin_otter();
        let light = deviation_proxy(&coeffs, &WindCondition::new(4.0, FRAC_PI_2));
        let strong = deviation_proxy(&coeffs, &WindCondition::new(12.0, FRAC_PI_2));
        assert!(strong > light);
    }

    #[test]
    fn test_headwind_contributes_nothing() {
        let coeffs = LateralCoefficients::twin_otter();
        let wind = WindCondition::new(10.0, 0.0);
        assert_relative_eq!(deviation_proxy(&coeffs, &wind), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_outcome_is_symmetric_in_direction() {
        let coeffs = LateralCoefficients::twin_otter();
        let left = deviation_proxy(&coeffs, &WindCondition::new(8.0, -1.0));
        let right = deviation_proxy(&coeffs, &WindCondition::new(8.0, 1.0));
        assert_relative_eq!(left, right, epsilon = 1e-12);
    }
}
