use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::state::AircraftState;

/// Commanded control-surface deflections (rad) and thrust (N).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    pub aileron: f64,
    pub elevator: f64,
    pub rudder: f64,
    pub thrust: f64,
}

impl Default for ControlCommand {
    fn default() -> Self {
        Self {
            aileron: 0.0,
            elevator: 0.0,
            rudder: 0.0,
            thrust: 0.0,
        }
    }
}

/// Feedback gains and trim settings for the stabilizing control law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlGains {
    /// Proportional roll gain (aileron per rad of phi).
    pub kp_roll: f64,
    /// Derivative roll gain (aileron per rad/s of p).
    pub kd_roll: f64,
    /// Proportional yaw gain (rudder per rad of psi).
    pub kp_yaw: f64,
    /// Derivative yaw gain (rudder per rad/s of r).
    pub kd_yaw: f64,
    /// Fixed elevator trim deflection (rad).
    pub elevator_trim: f64,
    /// Stabilized-approach thrust setting (N).
    pub thrust: f64,
    /// Symmetric surface saturation limit (rad).
    pub deflection_limit: f64,
}

impl Default for ControlGains {
    fn default() -> Self {
        Self {
            kp_roll: -2.0,
            kd_roll: -0.8,
            kp_yaw: -1.5,
            kd_yaw: -0.6,
            elevator_trim: -0.02,
            thrust: 1200.0,
            deflection_limit: 0.35,
        }
    }
}

impl ControlGains {
    pub fn validate(&self) -> Result<()> {
        if !(self.deflection_limit > 0.0) || !self.deflection_limit.is_finite() {
            return Err(SimError::invalid_config(
                "deflection_limit",
                format!("must be positive, got {}", self.deflection_limit),
            ));
        }
        if !self.thrust.is_finite() || self.thrust < 0.0 {
            return Err(SimError::invalid_config(
                "thrust",
                format!("must be finite and non-negative, got {}", self.thrust),
            ));
        }
        Ok(())
    }
}

/// Maps the current state to control-surface commands.
///
/// Implementations must be pure: the right-hand side of the equations of
/// motion calls this inside the adaptive solver, and step-doubling error
/// estimation only behaves if identical inputs give identical outputs.
/// Alternative strategies (e.g. a crab-then-sideslip transition) plug in here
/// without touching the integrator.
pub trait ControlLaw {
    fn compute_controls(&self, time: f64, state: &AircraftState) -> ControlCommand;
}

/// Proportional-derivative feedback stabilizing wings-level attitude and the
/// nominal approach heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdControlLaw {
    pub gains: ControlGains,
}

impl PdControlLaw {
    pub fn new(gains: ControlGains) -> Self {
        Self { gains }
    }
}

impl Default for PdControlLaw {
    fn default() -> Self {
        Self::new(ControlGains::default())
    }
}

impl ControlLaw for PdControlLaw {
    fn compute_controls(&self, _time: f64, state: &AircraftState) -> ControlCommand {
        let g = &self.gains;
        let limit = g.deflection_limit;

        // Hard saturation clamp, not a rate limiter.
        let aileron = (g.kp_roll * state.phi + g.kd_roll * state.p).clamp(-limit, limit);
        let rudder = (g.kp_yaw * state.psi + g.kd_yaw * state.r).clamp(-limit, limit);

        ControlCommand {
            aileron,
            elevator: g.elevator_trim.clamp(-limit, limit),
            rudder,
            thrust: g.thrust,
        }
    }
}
