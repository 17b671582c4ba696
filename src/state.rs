use nalgebra::{Matrix3, SVector, Vector3};
use serde::{Deserialize, Serialize};

/// Number of states carried by the rigid-body model.
pub const STATE_DIM: usize = 12;

/// Flat state vector used at the integrator boundary.
pub type StateVector = SVector<f64, STATE_DIM>;

/// Full rigid-body state of the aircraft.
///
/// Position is expressed in a North-East-Down earth-fixed frame (m), velocity
/// in body axes (m/s), attitude as Euler angles (rad) and angular velocity in
/// body axes (rad/s).
///
/// The Euler-rate kinematics divide by cos(theta); callers must keep
/// `theta` inside (-pi/2, pi/2). The landing-approach scenarios modeled here
/// never pitch near vertical, so the singularity is documented rather than
/// special-cased.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    /// North position (m).
    pub x: f64,
    /// East position (m). Lateral deviation from the approach track.
    pub y: f64,
    /// Down position (m). Negative when above the touchdown elevation.
    pub z: f64,
    /// Body-axis forward velocity (m/s).
    pub u: f64,
    /// Body-axis lateral velocity (m/s).
    pub v: f64,
    /// Body-axis vertical velocity (m/s).
    pub w: f64,
    /// Roll angle phi (rad).
    pub phi: f64,
    /// Pitch angle theta (rad).
    pub theta: f64,
    /// Yaw angle psi (rad), zero along the nominal approach heading.
    pub psi: f64,
    /// Body-axis roll rate (rad/s).
    pub p: f64,
    /// Body-axis pitch rate (rad/s).
    pub q: f64,
    /// Body-axis yaw rate (rad/s).
    pub r: f64,
}

impl Default for AircraftState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            u: 0.0,
            v: 0.0,
            w: 0.0,
            phi: 0.0,
            theta: 0.0,
            psi: 0.0,
            p: 0.0,
            q: 0.0,
            r: 0.0,
        }
    }
}

impl AircraftState {
    pub fn to_vector(&self) -> StateVector {
        StateVector::from_column_slice(&[
            self.x, self.y, self.z, self.u, self.v, self.w, self.phi, self.theta, self.psi,
            self.p, self.q, self.r,
        ])
    }

    pub fn from_vector(v: &StateVector) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
            u: v[3],
            v: v[4],
            w: v[5],
            phi: v[6],
            theta: v[7],
            psi: v[8],
            p: v[9],
            q: v[10],
            r: v[11],
        }
    }

    /// Body-axis velocity vector (u, v, w).
    pub fn velocity_body(&self) -> Vector3<f64> {
        Vector3::new(self.u, self.v, self.w)
    }

    /// Body-axis angular velocity vector (p, q, r).
    pub fn angular_velocity(&self) -> Vector3<f64> {
        Vector3::new(self.p, self.q, self.r)
    }

    /// Direction cosine matrix rotating body-frame vectors into the NED frame.
    pub fn body_to_earth(&self) -> Matrix3<f64> {
        let (sp, cp) = self.phi.sin_cos();
        let (st, ct) = self.theta.sin_cos();
        let (ss, cs) = self.psi.sin_cos();

        Matrix3::new(
            ct * cs,
            sp * st * cs - cp * ss,
            cp * st * cs + sp * ss,
            ct * ss,
            sp * st * ss + cp * cs,
            cp * st * ss - sp * cs,
            -st,
            sp * ct,
            cp * ct,
        )
    }
}
