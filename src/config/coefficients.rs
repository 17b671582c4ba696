use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Non-dimensional side-force derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideForceDerivatives {
    pub cy_beta: f64,
    pub cy_p: f64,
    pub cy_r: f64,
    pub cy_deltaa: f64,
    pub cy_deltar: f64,
}

/// Non-dimensional rolling-moment derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollDerivatives {
    pub cl_beta: f64,
    pub cl_p: f64,
    pub cl_r: f64,
    pub cl_deltaa: f64,
    pub cl_deltar: f64,
}

/// Non-dimensional yawing-moment derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YawDerivatives {
    pub cn_beta: f64,
    pub cn_p: f64,
    pub cn_r: f64,
    pub cn_deltaa: f64,
    pub cn_deltar: f64,
}

/// Lateral-directional stability and control derivative set.
///
/// Created once per analysis run and treated as immutable afterwards;
/// sensitivity and Monte Carlo studies work on perturbed copies produced by
/// [`LateralCoefficients::with_value`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LateralCoefficients {
    pub side_force: SideForceDerivatives,
    pub roll: RollDerivatives,
    pub yaw: YawDerivatives,
}

/// Names of every derivative in the set, in declaration order.
pub const COEFFICIENT_NAMES: [&str; 15] = [
    "cy_beta",
    "cy_p",
    "cy_r",
    "cy_deltaa",
    "cy_deltar",
    "cl_beta",
    "cl_p",
    "cl_r",
    "cl_deltaa",
    "cl_deltar",
    "cn_beta",
    "cn_p",
    "cn_r",
    "cn_deltaa",
    "cn_deltar",
];

impl LateralCoefficients {
    /// Twin Otter lateral-directional derivatives.
    pub fn twin_otter() -> Self {
        Self {
            side_force: SideForceDerivatives {
                cy_beta: -0.885,
                cy_p: -0.090,
                cy_r: 1.697,
                cy_deltaa: -0.051,
                cy_deltar: -0.193,
            },
            roll: RollDerivatives {
                cl_beta: -0.112,
                cl_p: -0.413,
                cl_r: 0.191,
                cl_deltaa: -0.206,
                cl_deltar: 0.116,
            },
            yaw: YawDerivatives {
                cn_beta: 0.088,
                cn_p: -0.043,
                cn_r: -0.426,
                cn_deltaa: 0.023,
                cn_deltar: -0.087,
            },
        }
    }

    /// Look up a derivative by name.
    pub fn get(&self, name: &str) -> Result<f64> {
        let value = match name {
            "cy_beta" => self.side_force.cy_beta,
            "cy_p" => self.side_force.cy_p,
            "cy_r" => self.side_force.cy_r,
            "cy_deltaa" => self.side_force.cy_deltaa,
            "cy_deltar" => self.side_force.cy_deltar,
            "cl_beta" => self.roll.cl_beta,
            "cl_p" => self.roll.cl_p,
            "cl_r" => self.roll.cl_r,
            "cl_deltaa" => self.roll.cl_deltaa,
            "cl_deltar" => self.roll.cl_deltar,
            "cn_beta" => self.yaw.cn_beta,
            "cn_p" => self.yaw.cn_p,
            "cn_r" => self.yaw.cn_r,
            "cn_deltaa" => self.yaw.cn_deltaa,
            "cn_deltar" => self.yaw.cn_deltar,
            _ => return Err(SimError::UnknownCoefficient(name.to_string())),
        };
        Ok(value)
    }

    /// Return a copy with one derivative replaced. The original is untouched.
    pub fn with_value(&self, name: &str, value: f64) -> Result<Self> {
        let mut out = *self;
        match name {
            "cy_beta" => out.side_force.cy_beta = value,
            "cy_p" => out.side_force.cy_p = value,
            "cy_r" => out.side_force.cy_r = value,
            "cy_deltaa" => out.side_force.cy_deltaa = value,
            "cy_deltar" => out.side_force.cy_deltar = value,
            "cl_beta" => out.roll.cl_beta = value,
            "cl_p" => out.roll.cl_p = value,
            "cl_r" => out.roll.cl_r = value,
            "cl_deltaa" => out.roll.cl_deltaa = value,
            "cl_deltar" => out.roll.cl_deltar = value,
            "cn_beta" => out.yaw.cn_beta = value,
            "cn_p" => out.yaw.cn_p = value,
            "cn_r" => out.yaw.cn_r = value,
            "cn_deltaa" => out.yaw.cn_deltaa = value,
            "cn_deltar" => out.yaw.cn_deltar = value,
            _ => return Err(SimError::UnknownCoefficient(name.to_string())),
        }
        Ok(out)
    }

    /// Return a copy with one derivative scaled by `factor`.
    pub fn with_scaled(&self, name: &str, factor: f64) -> Result<Self> {
        let nominal = self.get(name)?;
        self.with_value(name, nominal * factor)
    }

    pub fn names() -> &'static [&'static str] {
        &COEFFICIENT_NAMES
    }
}

impl Default for LateralCoefficients {
    fn default() -> Self {
        Self::twin_otter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_named_access_covers_every_field() {
        let coeffs = LateralCoefficients::twin_otter();
        for name in LateralCoefficients::names() {
            coeffs.get(name).unwrap();
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let coeffs = LateralCoefficients::twin_otter();
        assert!(coeffs.get("cm_alpha").is_err());
        assert!(coeffs.with_value("cm_alpha", 0.1).is_err());
    }

    #[test]
    fn test_with_value_leaves_original_untouched() {
        let coeffs = LateralCoefficients::twin_otter();
        let perturbed = coeffs.with_value("cn_beta", 0.2).unwrap();

        assert_relative_eq!(perturbed.yaw.cn_beta, 0.2);
        assert_relative_eq!(coeffs.yaw.cn_beta, 0.088);
        // Everything else carries over.
        assert_relative_eq!(perturbed.side_force.cy_beta, coeffs.side_force.cy_beta);
        assert_relative_eq!(perturbed.roll.cl_p, coeffs.roll.cl_p);
    }

    #[test]
    fn test_with_scaled() {
        let coeffs = LateralCoefficients::twin_otter();
        let scaled = coeffs.with_scaled("cy_beta", 1.1).unwrap();
        assert_relative_eq!(scaled.side_force.cy_beta, -0.885 * 1.1);
    }
}
