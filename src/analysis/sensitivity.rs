use serde::{Deserialize, Serialize};

use crate::analysis::proxy::{deviation_proxy, WindCondition};
use crate::config::LateralCoefficients;
use crate::error::Result;

/// Outcome of a single-coefficient perturbation study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub coefficient: String,
    /// The applied perturbations (%).
    pub perturbations: Vec<f64>,
    /// Percentage change in the proxy outcome at each perturbation.
    pub outcome_changes: Vec<f64>,
    /// Least-squares slope of outcome change (%) per perturbation (%).
    pub linear_sensitivity: f64,
}

/// Measures how strongly the reduced deviation proxy responds to each
/// coefficient, one coefficient at a time. Combined perturbations are out of
/// scope; cross-terms are deliberately not modeled.
pub struct SensitivityAnalyzer<'a> {
    coefficients: &'a LateralCoefficients,
    wind: WindCondition,
}

impl<'a> SensitivityAnalyzer<'a> {
    pub fn new(coefficients: &'a LateralCoefficients, wind: WindCondition) -> Self {
        Self { coefficients, wind }
    }

    /// Perturb `name` by each percentage in `perturbations`, all other
    /// coefficients held at nominal, and fit a line through
    /// (perturbation %, outcome change %).
    pub fn sensitivity(&self, name: &str, perturbations: &[f64]) -> Result<SensitivityResult> {
        let nominal = deviation_proxy(self.coefficients, &self.wind);

        let mut outcome_changes = Vec::with_capacity(perturbations.len());
        for &pct in perturbations {
            let perturbed = self.coefficients.with_scaled(name, 1.0 + pct / 100.0)?;
            let outcome = deviation_proxy(&perturbed, &self.wind);
            let change = if nominal.abs() > f64::EPSILON {
                (outcome - nominal) / nominal * 100.0
            } else {
                0.0
            };
            outcome_changes.push(change);
        }

        Ok(SensitivityResult {
            coefficient: name.to_string(),
            perturbations: perturbations.to_vec(),
            outcome_changes: outcome_changes.clone(),
            linear_sensitivity: least_squares_slope(perturbations, &outcome_changes),
        })
    }

    /// Sensitivity of every coefficient in the set, in declaration order.
    pub fn rank_all(&self, perturbations: &[f64]) -> Result<Vec<SensitivityResult>> {
        LateralCoefficients::names()
            .iter()
            .map(|name| self.sensitivity(name, perturbations))
            .collect()
    }
}

/// Slope of the least-squares line through (x, y), zero for degenerate
/// inputs.
fn least_squares_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let x = &x[..n];
    let y = &y[..n];

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var = 0.0;
    for i in 0..n {
        cov += (x[i] - mean_x) * (y[i] - mean_y);
        var += (x[i] - mean_x) * (x[i] - mean_x);
    }

    if var > f64::EPSILON {
        cov / var
    } else {
        0.0
    }
}
