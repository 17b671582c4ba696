use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::analysis::proxy::{deviation_proxy, WindCondition};
use crate::config::LateralCoefficients;
use crate::error::{Result, SimError};

/// Empirical distribution summary of the Monte Carlo outcome samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyResult {
    pub n_samples: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    /// Empirical 16th/84th percentiles, roughly one sigma.
    pub ci68: (f64, f64),
    /// Empirical 2.5th/97.5th percentiles, roughly two sigma.
    pub ci95: (f64, f64),
    /// Fraction of samples at or below the safety threshold.
    pub safety_probability: f64,
}

/// Monte Carlo propagation of coefficient uncertainty through the reduced
/// deviation proxy.
///
/// Every draw perturbs each listed coefficient by an independent
/// `Normal(0, sigma%)` relative factor. Sampling is driven by an explicit
/// seed, so runs are reproducible and parallel callers never share hidden
/// generator state.
pub struct UncertaintyPropagator<'a> {
    coefficients: &'a LateralCoefficients,
}

impl<'a> UncertaintyPropagator<'a> {
    pub fn new(coefficients: &'a LateralCoefficients) -> Self {
        Self { coefficients }
    }

    /// Propagate `uncertainties` (coefficient name -> relative standard
    /// deviation in percent) through `n_samples` proxy evaluations.
    ///
    /// An unknown coefficient name fails fast: silently ignoring it would
    /// misrepresent the modeled uncertainty.
    pub fn propagate(
        &self,
        uncertainties: &BTreeMap<String, f64>,
        n_samples: usize,
        wind: &WindCondition,
        safety_threshold: f64,
        seed: u64,
    ) -> Result<UncertaintyResult> {
        if n_samples == 0 {
            return Err(SimError::invalid_config("n_samples", "must be at least 1"));
        }

        // Validate every name and uncertainty before any sampling starts.
        let mut distributions = Vec::with_capacity(uncertainties.len());
        for (name, std_percent) in uncertainties {
            self.coefficients.get(name)?;
            if !std_percent.is_finite() || *std_percent < 0.0 {
                return Err(SimError::invalid_config(
                    name,
                    format!("standard deviation must be non-negative, got {}", std_percent),
                ));
            }
            let normal = Normal::new(0.0, std_percent / 100.0).map_err(|e| {
                SimError::invalid_config(name, format!("invalid distribution: {}", e))
            })?;
            distributions.push((name.as_str(), normal));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(n_samples);

        for _ in 0..n_samples {
            let mut perturbed = *self.coefficients;
            for (name, normal) in &distributions {
                let factor = 1.0 + normal.sample(&mut rng);
                perturbed = perturbed.with_scaled(name, factor)?;
            }
            samples.push(deviation_proxy(&perturbed, wind));
        }

        let mean = samples.iter().sum::<f64>() / n_samples as f64;
        let std = if n_samples > 1 {
            let var = samples
                .iter()
                .map(|s| (s - mean) * (s - mean))
                .sum::<f64>()
                / (n_samples - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        let below = samples.iter().filter(|&&s| s <= safety_threshold).count();
        let safety_probability = below as f64 / n_samples as f64;

        let mut sorted = samples;
        sorted.sort_by(f64::total_cmp);

        Ok(UncertaintyResult {
            n_samples,
            mean,
            std,
            ci68: (percentile(&sorted, 16.0), percentile(&sorted, 84.0)),
            ci95: (percentile(&sorted, 2.5), percentile(&sorted, 97.5)),
            safety_probability,
        })
    }
}

/// Empirical percentile of pre-sorted samples by nearest-rank index.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = (q / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn uncertainties(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs
            .iter()
            .map(|(name, pct)| (name.to_string(), *pct))
            .collect()
    }

    fn wind() -> WindCondition {
        WindCondition::new(10.0, FRAC_PI_2)
    }

    #[test]
    fn test_same_seed_reproduces_results() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cy_beta", 10.0), ("cn_beta", 15.0)]);

        let a = propagator
            .propagate(&u, 500, &wind(), 20.0, 42)
            .unwrap();
        let b = propagator
            .propagate(&u, 500, &wind(), 20.0, 42)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cy_beta", 10.0)]);

        let a = propagator.propagate(&u, 500, &wind(), 20.0, 1).unwrap();
        let b = propagator.propagate(&u, 500, &wind(), 20.0, 2).unwrap();
        assert!(a.mean != b.mean);
    }

    #[test]
    fn test_zero_uncertainty_collapses_to_deterministic_outcome() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cy_beta", 0.0), ("cn_beta", 0.0)]);

        let result = propagator.propagate(&u, 200, &wind(), 20.0, 7).unwrap();
        let deterministic = deviation_proxy(&coeffs, &wind());

        assert_relative_eq!(result.mean, deterministic, epsilon = 1e-12);
        assert_relative_eq!(result.std, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.ci68.0, deterministic, epsilon = 1e-12);
        assert_relative_eq!(result.ci95.1, deterministic, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_coefficient_fails_fast() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cm_q", 10.0)]);

        assert!(matches!(
            propagator.propagate(&u, 100, &wind(), 20.0, 0),
            Err(SimError::UnknownCoefficient(_))
        ));
    }

    #[test]
    fn test_safety_probability_boundaries() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cy_beta", 10.0)]);

        let unbounded = propagator
            .propagate(&u, 300, &wind(), f64::INFINITY, 3)
            .unwrap();
        assert_eq!(unbounded.safety_probability, 1.0);

        // Non-zero-mean outcome distribution against a zero threshold.
        let impossible = propagator.propagate(&u, 300, &wind(), 0.0, 3).unwrap();
        assert!(impossible.safety_probability < 1.0);
    }

    #[test]
    fn test_std_shrinks_with_uncertainty() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);

        let wide = propagator
            .propagate(&uncertainties(&[("cy_beta", 20.0)]), 500, &wind(), 20.0, 11)
            .unwrap();
        let narrow = propagator
            .propagate(&uncertainties(&[("cy_beta", 2.0)]), 500, &wind(), 20.0, 11)
            .unwrap();
        assert!(narrow.std < wide.std);
    }

    #[test]
    fn test_ci_ordering() {
        let coeffs = LateralCoefficients::twin_otter();
        let propagator = UncertaintyPropagator::new(&coeffs);
        let u = uncertainties(&[("cy_beta", 10.0), ("cn_beta", 10.0)]);

        let result = propagator.propagate(&u, 1000, &wind(), 20.0, 5).unwrap();
        assert!(result.ci95.0 <= result.ci68.0);
        assert!(result.ci68.0 <= result.ci68.1);
        assert!(result.ci68.1 <= result.ci95.1);
    }
}
