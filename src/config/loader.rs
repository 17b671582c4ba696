use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{AircraftProperties, Environment, LateralCoefficients, SEA_LEVEL_DENSITY};
use crate::dynamics::controls::{ControlGains, PdControlLaw};
use crate::dynamics::integrator::IntegratorConfig;
use crate::error::{Result, SimError};
use crate::scenario::runner::{ApproachConfig, ScenarioRunner};
use crate::scenario::sweep::{ScenarioSweep, SweepSummary};

/// Wind grid for a sweep, Cartesian product of speeds and directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Wind speeds (m/s).
    pub wind_speeds: Vec<f64>,
    /// Wind directions relative to the approach heading (rad).
    pub wind_directions: Vec<f64>,
}

impl SweepGrid {
    pub fn validate(&self) -> Result<()> {
        if self.wind_speeds.is_empty() {
            return Err(SimError::EmptyGrid("wind_speeds"));
        }
        if self.wind_directions.is_empty() {
            return Err(SimError::EmptyGrid("wind_directions"));
        }
        for &ws in &self.wind_speeds {
            if !ws.is_finite() || ws < 0.0 {
                return Err(SimError::invalid_config(
                    "wind_speeds",
                    format!("must be finite and non-negative, got {}", ws),
                ));
            }
        }
        for &wd in &self.wind_directions {
            if !wd.is_finite() {
                return Err(SimError::invalid_config("wind_directions", "must be finite"));
            }
        }
        Ok(())
    }
}

fn default_air_density() -> f64 {
    SEA_LEVEL_DENSITY
}

/// Full scenario description as loaded from a YAML file.
///
/// The aircraft properties, coefficient set and sweep grid are required and
/// must be spelled out in the file; a missing field is a configuration error,
/// never a silent default. Only the tuning sections (approach geometry, gains,
/// solver tolerances, air density) fall back to their built-in defaults when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub aircraft: AircraftProperties,
    pub coefficients: LateralCoefficients,
    #[serde(default)]
    pub approach: ApproachConfig,
    #[serde(default)]
    pub gains: ControlGains,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    pub sweep: SweepGrid,
    #[serde(default = "default_air_density")]
    pub air_density: f64,
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("loading scenario config from {:?}", path.as_ref());
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on the first invalid field, before any simulation starts.
    pub fn validate(&self) -> Result<()> {
        self.aircraft.validate()?;
        self.approach.validate()?;
        self.gains.validate()?;
        self.integrator.validate()?;
        self.sweep.validate()?;
        Environment {
            wind_speed: 0.0,
            wind_direction: 0.0,
            air_density: self.air_density,
        }
        .validate()?;
        Ok(())
    }

    /// Run the configured wind-grid sweep end to end.
    pub fn run_sweep(&self) -> Result<SweepSummary> {
        let law = PdControlLaw::new(self.gains);
        let runner = ScenarioRunner::new(
            &self.aircraft,
            &self.coefficients,
            &law,
            self.approach,
            self.integrator,
        )?;
        ScenarioSweep::new(runner)
            .with_air_density(self.air_density)
            .run(&self.sweep.wind_speeds, &self.sweep.wind_directions)
    }
}
