use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Sea-level standard air density (kg/m^3).
pub const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Atmospheric conditions for one scenario.
///
/// The wind is a constant horizontal vector for the duration of a run; no
/// gust or turbulence superposition is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Direction the wind blows toward, measured from the approach heading
    /// (rad). pi/2 is a pure right crosswind.
    pub wind_direction: f64,
    /// Air density (kg/m^3).
    pub air_density: f64,
}

impl Environment {
    pub fn new(wind_speed: f64, wind_direction: f64) -> Self {
        Self {
            wind_speed,
            wind_direction,
            air_density: SEA_LEVEL_DENSITY,
        }
    }

    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Wind velocity in the NED frame. The approach track is along +x.
    pub fn wind_ned(&self) -> Vector3<f64> {
        Vector3::new(
            self.wind_speed * self.wind_direction.cos(),
            self.wind_speed * self.wind_direction.sin(),
            0.0,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            return Err(SimError::invalid_config(
                "wind_speed",
                format!("must be finite and non-negative, got {}", self.wind_speed),
            ));
        }
        if !self.wind_direction.is_finite() {
            return Err(SimError::invalid_config("wind_direction", "must be finite"));
        }
        if !(self.air_density > 0.0) || !self.air_density.is_finite() {
            return Err(SimError::invalid_config(
                "air_density",
                format!("must be positive, got {}", self.air_density),
            ));
        }
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::calm()
    }
}
