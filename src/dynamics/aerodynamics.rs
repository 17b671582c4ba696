use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::{AircraftProperties, Environment, LateralCoefficients};
use crate::dynamics::controls::ControlCommand;
use crate::state::AircraftState;

/// Below this relative airspeed (m/s) the aerodynamic angles are undefined
/// and all aerodynamic outputs degrade to zero instead of NaN.
const MIN_AIRSPEED_THRESHOLD: f64 = 1e-6;

/// Derived air data at one instant: relative velocity, aerodynamic angles and
/// dynamic pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    /// True airspeed (m/s).
    pub true_airspeed: f64,
    /// Angle of attack (rad).
    pub alpha: f64,
    /// Sideslip angle (rad).
    pub beta: f64,
    /// Dynamic pressure (Pa).
    pub dynamic_pressure: f64,
    /// Relative velocity in body axes (m/s).
    pub relative_velocity: Vector3<f64>,
}

impl AirData {
    /// Resolve the constant earth-frame wind into body axes through the
    /// current attitude and form the aerodynamic angles.
    pub fn calculate(state: &AircraftState, environment: &Environment) -> Self {
        let wind_body = state.body_to_earth().transpose() * environment.wind_ned();
        let relative_velocity = state.velocity_body() - wind_body;
        let airspeed = relative_velocity.norm();

        let (alpha, beta) = if airspeed > MIN_AIRSPEED_THRESHOLD {
            // Alpha is defined as zero when there is no axial flow, rather
            // than the +-pi/2 atan2 would give.
            let alpha = if relative_velocity.x.abs() > MIN_AIRSPEED_THRESHOLD {
                relative_velocity.z.atan2(relative_velocity.x)
            } else {
                0.0
            };
            (alpha, (relative_velocity.y / airspeed).asin())
        } else {
            (0.0, 0.0)
        };

        Self {
            true_airspeed: airspeed,
            alpha,
            beta,
            dynamic_pressure: 0.5 * environment.air_density * airspeed * airspeed,
            relative_velocity,
        }
    }
}

/// Dimensional lateral-directional forces and moments in body axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LateralForcesMoments {
    /// Side force Y (N).
    pub side_force: f64,
    /// Rolling moment L (N m).
    pub roll_moment: f64,
    /// Yawing moment N (N m).
    pub yaw_moment: f64,
}

impl LateralForcesMoments {
    pub fn zero() -> Self {
        Self {
            side_force: 0.0,
            roll_moment: 0.0,
            yaw_moment: 0.0,
        }
    }
}

/// Linear lateral-directional force and moment build-up.
///
/// Cy, Cl and Cn are each a linear combination of beta, the non-dimensional
/// roll/yaw rates and the aileron/rudder deflections, scaled by the matching
/// stability derivative. Pure function; the degenerate zero-airspeed case
/// returns zeros rather than propagating NaN.
pub fn lateral_forces_moments(
    state: &AircraftState,
    controls: &ControlCommand,
    air_data: &AirData,
    coefficients: &LateralCoefficients,
    properties: &AircraftProperties,
) -> LateralForcesMoments {
    let airspeed = air_data.true_airspeed;
    if air_data.dynamic_pressure <= 0.0 || airspeed <= MIN_AIRSPEED_THRESHOLD {
        return LateralForcesMoments::zero();
    }

    let span = properties.wing_span;
    let p_hat = state.p * span / (2.0 * airspeed);
    let r_hat = state.r * span / (2.0 * airspeed);
    let beta = air_data.beta;

    let cy = coefficients.side_force.cy_beta * beta
        + coefficients.side_force.cy_p * p_hat
        + coefficients.side_force.cy_r * r_hat
        + coefficients.side_force.cy_deltaa * controls.aileron
        + coefficients.side_force.cy_deltar * controls.rudder;

    let cl = coefficients.roll.cl_beta * beta
        + coefficients.roll.cl_p * p_hat
        + coefficients.roll.cl_r * r_hat
        + coefficients.roll.cl_deltaa * controls.aileron
        + coefficients.roll.cl_deltar * controls.rudder;

    let cn = coefficients.yaw.cn_beta * beta
        + coefficients.yaw.cn_p * p_hat
        + coefficients.yaw.cn_r * r_hat
        + coefficients.yaw.cn_deltaa * controls.aileron
        + coefficients.yaw.cn_deltar * controls.rudder;

    let q_s = air_data.dynamic_pressure * properties.wing_area;
    LateralForcesMoments {
        side_force: q_s * cy,
        roll_moment: q_s * span * cl,
        yaw_moment: q_s * span * cn,
    }
}
