use serde::{Deserialize, Serialize};

use crate::config::{AircraftProperties, Environment, LateralCoefficients};
use crate::dynamics::controls::ControlLaw;
use crate::dynamics::equations::state_derivative;
use crate::dynamics::integrator::{IntegratorConfig, Rk45Integrator};
use crate::error::{Result, SimError};
use crate::state::AircraftState;

/// Initial approach condition shared by every scenario in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachConfig {
    /// Stabilized approach speed (m/s).
    pub approach_speed: f64,
    /// Height above the touchdown elevation at the start of the run (m).
    pub approach_altitude: f64,
    /// Initial descent rate, positive down (m/s).
    pub descent_rate: f64,
    /// Simulated duration (s).
    pub duration: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            approach_speed: 30.0,
            approach_altitude: 50.0,
            descent_rate: 1.5,
            duration: 30.0,
        }
    }
}

impl ApproachConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.approach_speed > 0.0) {
            return Err(SimError::invalid_config(
                "approach_speed",
                format!("must be positive, got {}", self.approach_speed),
            ));
        }
        if !(self.duration > 0.0) {
            return Err(SimError::invalid_config(
                "duration",
                format!("must be positive, got {}", self.duration),
            ));
        }
        Ok(())
    }

    /// Initial state: on track and on speed, started far enough out that the
    /// nominal touchdown point is the origin.
    pub fn initial_state(&self) -> AircraftState {
        AircraftState {
            x: -self.approach_speed * self.duration,
            z: -self.approach_altitude,
            u: self.approach_speed,
            w: self.descent_rate,
            ..Default::default()
        }
    }
}

/// Summary metrics extracted from one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Largest absolute east-axis deviation from the approach track (m).
    pub max_lateral_deviation: f64,
    /// East-axis position at the end of the run (m).
    pub final_lateral_position: f64,
    /// Largest absolute roll excursion (rad).
    pub max_roll_angle: f64,
    /// Largest absolute yaw excursion (rad).
    pub max_yaw_angle: f64,
    /// Distance from the nominal touchdown point at the end of the run (m).
    pub landing_accuracy: f64,
}

/// Complete output of one landing-approach simulation. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub environment: Environment,
    pub time: Vec<f64>,
    pub states: Vec<AircraftState>,
    pub metrics: ScenarioMetrics,
}

impl ScenarioMetrics {
    fn extract(states: &[AircraftState]) -> Self {
        let mut max_lateral_deviation: f64 = 0.0;
        let mut max_roll_angle: f64 = 0.0;
        let mut max_yaw_angle: f64 = 0.0;

        for state in states {
            max_lateral_deviation = max_lateral_deviation.max(state.y.abs());
            max_roll_angle = max_roll_angle.max(state.phi.abs());
            max_yaw_angle = max_yaw_angle.max(state.psi.abs());
        }

        // Runs always start from at least one state.
        let last = states[states.len() - 1];
        Self {
            max_lateral_deviation,
            final_lateral_position: last.y,
            max_roll_angle,
            max_yaw_angle,
            landing_accuracy: (last.x * last.x + last.y * last.y).sqrt(),
        }
    }
}

/// Drives one complete landing-approach simulation for a given wind
/// condition.
///
/// The coefficient set and aircraft properties are borrowed from the caller
/// and never mutated, so one runner can serve many parallel scenarios.
pub struct ScenarioRunner<'a, C: ControlLaw> {
    properties: &'a AircraftProperties,
    coefficients: &'a LateralCoefficients,
    control_law: &'a C,
    approach: ApproachConfig,
    integrator: Rk45Integrator,
}

impl<'a, C: ControlLaw> ScenarioRunner<'a, C> {
    pub fn new(
        properties: &'a AircraftProperties,
        coefficients: &'a LateralCoefficients,
        control_law: &'a C,
        approach: ApproachConfig,
        integrator_config: IntegratorConfig,
    ) -> Result<Self> {
        properties.validate()?;
        approach.validate()?;
        integrator_config.validate()?;
        Ok(Self {
            properties,
            coefficients,
            control_law,
            approach,
            integrator: Rk45Integrator::new(integrator_config),
        })
    }

    pub fn approach(&self) -> &ApproachConfig {
        &self.approach
    }

    /// Run one scenario. A fresh integration per call; nothing carries over
    /// between runs.
    pub fn run_scenario(&self, environment: &Environment) -> Result<ScenarioResult> {
        environment.validate()?;

        let y0 = self.approach.initial_state().to_vector();
        let output = self.integrator.integrate(
            &y0,
            0.0,
            self.approach.duration,
            |t, y| {
                state_derivative(
                    t,
                    y,
                    environment,
                    self.coefficients,
                    self.properties,
                    self.control_law,
                )
            },
        )?;

        let states: Vec<AircraftState> = output
            .states
            .iter()
            .map(AircraftState::from_vector)
            .collect();
        let metrics = ScenarioMetrics::extract(&states);

        Ok(ScenarioResult {
            environment: *environment,
            time: output.time,
            states,
            metrics,
        })
    }
}
