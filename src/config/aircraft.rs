use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Constant physical properties of the aircraft.
///
/// Products of inertia are neglected in the rigid-body equations, so only the
/// diagonal inertia terms are carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftProperties {
    /// Mass (kg).
    pub mass: f64,
    /// Roll inertia Ixx (kg m^2).
    pub ixx: f64,
    /// Pitch inertia Iyy (kg m^2).
    pub iyy: f64,
    /// Yaw inertia Izz (kg m^2).
    pub izz: f64,
    /// Reference wing area (m^2).
    pub wing_area: f64,
    /// Reference wing span (m).
    pub wing_span: f64,
    /// Mean aerodynamic chord (m).
    pub mac: f64,
}

impl AircraftProperties {
    /// Light utility aircraft in the Twin Otter class, scaled for approach
    /// studies.
    pub fn light_utility() -> Self {
        Self {
            mass: 1134.0,
            ixx: 700.0,
            iyy: 700.0,
            izz: 1166.0,
            wing_area: 16.2,
            wing_span: 6.0,
            mac: 1.5,
        }
    }

    /// Reject non-positive mass, inertia or geometry, naming the offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("mass", self.mass),
            ("ixx", self.ixx),
            ("iyy", self.iyy),
            ("izz", self.izz),
            ("wing_area", self.wing_area),
            ("wing_span", self.wing_span),
            ("mac", self.mac),
        ];
        for (field, value) in checks {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimError::invalid_config(
                    field,
                    format!("must be positive and finite, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

impl Default for AircraftProperties {
    fn default() -> Self {
        Self::light_utility()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_properties_are_valid() {
        AircraftProperties::default().validate().unwrap();
    }

    #[test]
    fn test_non_positive_mass_is_rejected() {
        let props = AircraftProperties {
            mass: 0.0,
            ..Default::default()
        };
        let err = props.validate().unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn test_nan_inertia_is_rejected() {
        let props = AircraftProperties {
            izz: f64::NAN,
            ..Default::default()
        };
        let err = props.validate().unwrap_err();
        assert!(err.to_string().contains("izz"));
    }
}
