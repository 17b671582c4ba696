use nalgebra::Vector3;

use crate::config::{AircraftProperties, Environment, LateralCoefficients};
use crate::dynamics::aerodynamics::{lateral_forces_moments, AirData};
use crate::dynamics::controls::ControlLaw;
use crate::state::{AircraftState, StateVector};

/// Gravitational acceleration (m/s^2).
pub const GRAVITY: f64 = 9.80665;

/// Right-hand side of the 12-state rigid-body ODE.
///
/// Pure function: identical inputs always produce identical outputs, which
/// the adaptive solver's error estimation relies on.
///
/// Modeling simplifications, stated rather than silently dropped:
/// - The aerodynamic model is lateral-directional only. The longitudinal
///   channel is held at its trimmed approach condition: a constant trim lift
///   equal to the level-flight weight acts along negative body z, and a trim
///   drag of thrust magnitude acts along the relative wind, so the thrust
///   residual is what remains after resolving through alpha and beta.
/// - Products of inertia are neglected; the rotational equations use the
///   diagonal Ixx/Iyy/Izz terms only.
/// - The yaw-rate kinematics divide by cos(theta) and are undefined at
///   theta = +-pi/2. The approach never pitches near vertical; the
///   singularity is documented, not handled.
pub fn state_derivative(
    t: f64,
    y: &StateVector,
    environment: &Environment,
    coefficients: &LateralCoefficients,
    properties: &AircraftProperties,
    control_law: &dyn ControlLaw,
) -> StateVector {
    let state = AircraftState::from_vector(y);
    let controls = control_law.compute_controls(t, &state);
    let air_data = AirData::calculate(&state, environment);
    let aero = lateral_forces_moments(&state, &controls, &air_data, coefficients, properties);

    let mass = properties.mass;
    let (sin_phi, cos_phi) = state.phi.sin_cos();
    let (sin_theta, cos_theta) = state.theta.sin_cos();

    // Thrust along body x, opposed by an equal trim drag along the relative
    // wind; only the alpha/beta residual survives.
    let thrust_residual = if air_data.true_airspeed > 0.0 {
        Vector3::new(controls.thrust, 0.0, 0.0)
            - controls.thrust * air_data.relative_velocity / air_data.true_airspeed
    } else {
        Vector3::zeros()
    };

    // Gravity through the Euler angles, less the constant trim lift.
    let gravity_body = GRAVITY
        * Vector3::new(-sin_theta, sin_phi * cos_theta, cos_phi * cos_theta);
    let trim_lift_body = Vector3::new(0.0, 0.0, -GRAVITY);

    let specific_force = Vector3::new(0.0, aero.side_force / mass, 0.0)
        + thrust_residual / mass
        + gravity_body
        + trim_lift_body;

    // Newton in rotating body axes.
    let u_dot = state.r * state.v - state.q * state.w + specific_force.x;
    let v_dot = state.p * state.w - state.r * state.u + specific_force.y;
    let w_dot = state.q * state.u - state.p * state.v + specific_force.z;

    // Euler rigid-body equations, diagonal inertia.
    let p_dot = (aero.roll_moment + (properties.iyy - properties.izz) * state.q * state.r)
        / properties.ixx;
    let q_dot = ((properties.izz - properties.ixx) * state.p * state.r) / properties.iyy;
    let r_dot = (aero.yaw_moment + (properties.ixx - properties.iyy) * state.p * state.q)
        / properties.izz;

    // Position kinematics through the body-to-earth DCM.
    let velocity_ned = state.body_to_earth() * state.velocity_body();

    // Euler-angle rates. psi_dot divides by cos(theta).
    let tan_theta = sin_theta / cos_theta;
    let phi_dot = state.p + tan_theta * (state.q * sin_phi + state.r * cos_phi);
    let theta_dot = state.q * cos_phi - state.r * sin_phi;
    let psi_dot = (state.q * sin_phi + state.r * cos_phi) / cos_theta;

    StateVector::from_column_slice(&[
        velocity_ned.x,
        velocity_ned.y,
        velocity_ned.z,
        u_dot,
        v_dot,
        w_dot,
        phi_dot,
        theta_dot,
        psi_dot,
        p_dot,
        q_dot,
        r_dot,
    ])
}
