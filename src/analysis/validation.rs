use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::sensitivity::SensitivityResult;
use crate::analysis::uncertainty::UncertaintyResult;
use crate::config::LateralCoefficients;

/// Published lateral-directional derivatives for one reference aircraft.
/// Sets may be partial; absent entries simply drop out of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceAircraft {
    pub name: String,
    pub coefficients: BTreeMap<String, f64>,
}

impl ReferenceAircraft {
    pub fn new(name: &str, values: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            coefficients: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Small built-in literature database of general-aviation lateral
/// derivatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDatabase {
    pub aircraft: Vec<ReferenceAircraft>,
}

impl Default for ReferenceDatabase {
    fn default() -> Self {
        Self {
            aircraft: vec![
                ReferenceAircraft::new(
                    "Cessna 172",
                    &[
                        ("cy_beta", -0.31),
                        ("cl_beta", -0.089),
                        ("cl_p", -0.47),
                        ("cl_r", 0.096),
                        ("cn_beta", 0.065),
                        ("cn_r", -0.099),
                        ("cn_deltar", -0.0657),
                    ],
                ),
                ReferenceAircraft::new(
                    "Navion",
                    &[
                        ("cy_beta", -0.564),
                        ("cl_beta", -0.074),
                        ("cl_p", -0.410),
                        ("cl_r", 0.107),
                        ("cn_beta", 0.071),
                        ("cn_r", -0.125),
                        ("cl_deltaa", 0.134),
                        ("cn_deltar", -0.072),
                    ],
                ),
                ReferenceAircraft::new(
                    "DHC-6 Twin Otter",
                    &[
                        ("cy_beta", -0.885),
                        ("cl_beta", -0.112),
                        ("cl_p", -0.413),
                        ("cl_r", 0.191),
                        ("cn_beta", 0.088),
                        ("cn_r", -0.426),
                        ("cl_deltaa", -0.206),
                        ("cn_deltar", -0.087),
                    ],
                ),
            ],
        }
    }
}

/// Agreement band for one coefficient against the literature mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementBand {
    /// Mean difference below 20%.
    Close,
    /// Mean difference below 40%.
    Consistent,
    /// Mean difference below 60%.
    Marginal,
    /// Mean difference of 60% or more.
    Divergent,
}

impl AgreementBand {
    fn classify(mean_diff_percent: f64) -> Self {
        if mean_diff_percent < 20.0 {
            Self::Close
        } else if mean_diff_percent < 40.0 {
            Self::Consistent
        } else if mean_diff_percent < 60.0 {
            Self::Marginal
        } else {
            Self::Divergent
        }
    }

    fn partial_score(self) -> f64 {
        match self {
            Self::Close => 1.0,
            Self::Consistent => 0.75,
            Self::Marginal => 0.5,
            Self::Divergent => 0.25,
        }
    }
}

/// One row of the literature comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientComparison {
    pub name: String,
    pub candidate: f64,
    /// Percentage difference against each reference aircraft that carries
    /// this coefficient.
    pub reference_diffs: Vec<(String, f64)>,
    pub mean_diff_percent: f64,
    pub std_diff_percent: f64,
    pub band: AgreementBand,
}

/// Letter grade under fixed composite-score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityGrade {
    A,
    B,
    C,
    D,
}

impl ReliabilityGrade {
    fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::A
        } else if score >= 70.0 {
            Self::B
        } else if score >= 55.0 {
            Self::C
        } else {
            Self::D
        }
    }
}

/// Complete coefficient-reliability assessment. Read-only once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub comparisons: Vec<CoefficientComparison>,
    /// Coefficients with no reference data, excluded from the literature
    /// sub-score.
    pub omitted: Vec<String>,
    /// Mean literature partial score, 0-1.
    pub literature_score: f64,
    /// Fraction of coefficients inside their theoretically expected
    /// sign/magnitude band, 0-1.
    pub dimensional_score: f64,
    /// Penalty for high-sensitivity coefficients, 0-1.
    pub sensitivity_score: f64,
    /// Monte Carlo safety probability, 0-1.
    pub safety_probability: f64,
    /// Weighted composite, 0-100.
    pub composite_score: f64,
    pub grade: ReliabilityGrade,
}

impl ValidationRecord {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Theoretically expected sign/magnitude band for each derivative, from
/// lateral-directional stability theory: positive dihedral effect and
/// weathercock stability, damped roll and yaw.
fn expected_band(name: &str) -> Option<(f64, f64)> {
    match name {
        "cy_beta" => Some((-2.0, -0.05)),
        "cy_p" => Some((-0.5, 0.5)),
        "cy_r" => Some((0.0, 2.5)),
        "cy_deltaa" => Some((-0.2, 0.2)),
        "cy_deltar" => Some((-0.5, 0.5)),
        "cl_beta" => Some((-0.4, 0.0)),
        "cl_p" => Some((-1.0, -0.1)),
        "cl_r" => Some((0.0, 0.6)),
        "cl_deltaa" => Some((-0.5, 0.5)),
        "cl_deltar" => Some((-0.2, 0.2)),
        "cn_beta" => Some((0.02, 0.4)),
        "cn_p" => Some((-0.3, 0.1)),
        "cn_r" => Some((-1.0, -0.02)),
        "cn_deltaa" => Some((-0.1, 0.1)),
        "cn_deltar" => Some((-0.3, 0.0)),
        _ => None,
    }
}

/// Weights of the four sub-scores in the composite.
const LITERATURE_WEIGHT: f64 = 0.4;
const DIMENSIONAL_WEIGHT: f64 = 0.2;
const SENSITIVITY_WEIGHT: f64 = 0.2;
const UNCERTAINTY_WEIGHT: f64 = 0.2;

/// Compares a candidate coefficient set against the reference database and
/// folds the sensitivity and uncertainty findings into one reliability
/// grade.
pub struct LiteratureValidator<'a> {
    database: &'a ReferenceDatabase,
}

impl<'a> LiteratureValidator<'a> {
    pub fn new(database: &'a ReferenceDatabase) -> Self {
        Self { database }
    }

    /// Build the full validation record. Missing reference data for a
    /// coefficient excludes it from the literature sub-score and notes the
    /// omission; it is never an error.
    pub fn validate(
        &self,
        coefficients: &LateralCoefficients,
        sensitivities: &[SensitivityResult],
        uncertainty: &UncertaintyResult,
    ) -> ValidationRecord {
        let mut comparisons = Vec::new();
        let mut omitted = Vec::new();
        let mut in_band = 0usize;
        let mut banded = 0usize;

        for name in LateralCoefficients::names() {
            // Names come from the set itself, so the lookup cannot fail.
            let candidate = coefficients.get(name).unwrap_or(0.0);

            if let Some((lo, hi)) = expected_band(name) {
                banded += 1;
                if candidate >= lo && candidate <= hi {
                    in_band += 1;
                }
            }

            let mut diffs = Vec::new();
            for reference in &self.database.aircraft {
                if let Some(&ref_value) = reference.coefficients.get(*name) {
                    if ref_value.abs() > f64::EPSILON {
                        let diff = (candidate - ref_value).abs() / ref_value.abs() * 100.0;
                        diffs.push((reference.name.clone(), diff));
                    }
                }
            }

            if diffs.is_empty() {
                omitted.push(name.to_string());
                continue;
            }

            let n = diffs.len() as f64;
            let mean = diffs.iter().map(|(_, d)| d).sum::<f64>() / n;
            let var = diffs
                .iter()
                .map(|(_, d)| (d - mean) * (d - mean))
                .sum::<f64>()
                / n;

            comparisons.push(CoefficientComparison {
                name: name.to_string(),
                candidate,
                reference_diffs: diffs,
                mean_diff_percent: mean,
                std_diff_percent: var.sqrt(),
                band: AgreementBand::classify(mean),
            });
        }

        let literature_score = if comparisons.is_empty() {
            0.0
        } else {
            comparisons
                .iter()
                .map(|c| c.band.partial_score())
                .sum::<f64>()
                / comparisons.len() as f64
        };

        let dimensional_score = if banded > 0 {
            in_band as f64 / banded as f64
        } else {
            0.0
        };

        // High-sensitivity coefficients most need independent verification,
        // so a sensitive set scores lower.
        let sensitivity_score = if sensitivities.is_empty() {
            0.0
        } else {
            let mean_abs = sensitivities
                .iter()
                .map(|s| s.linear_sensitivity.abs())
                .sum::<f64>()
                / sensitivities.len() as f64;
            1.0 / (1.0 + mean_abs)
        };

        let safety_probability = uncertainty.safety_probability;

        let composite_score = 100.0
            * (LITERATURE_WEIGHT * literature_score
                + DIMENSIONAL_WEIGHT * dimensional_score
                + SENSITIVITY_WEIGHT * sensitivity_score
                + UNCERTAINTY_WEIGHT * safety_probability);

        ValidationRecord {
            comparisons,
            omitted,
            literature_score,
            dimensional_score,
            sensitivity_score,
            safety_probability,
            composite_score,
            grade: ReliabilityGrade::from_score(composite_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::proxy::WindCondition;
    use crate::analysis::sensitivity::SensitivityAnalyzer;
    use crate::analysis::uncertainty::UncertaintyPropagator;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;
    use std::f64::consts::FRAC_PI_2;

    fn full_inputs(
        coeffs: &LateralCoefficients,
    ) -> (Vec<SensitivityResult>, UncertaintyResult) {
        let wind = WindCondition::new(10.0, FRAC_PI_2);
        let sensitivities = SensitivityAnalyzer::new(coeffs, wind)
            .rank_all(&[-20.0, -10.0, 10.0, 20.0])
            .unwrap();

        let mut uncertainties = BTreeMap::new();
        uncertainties.insert("cy_beta".to_string(), 10.0);
        uncertainties.insert("cn_beta".to_string(), 15.0);
        let uncertainty = UncertaintyPropagator::new(coeffs)
            .propagate(&uncertainties, 500, &wind, 25.0, 42)
            .unwrap();

        (sensitivities, uncertainty)
    }

    #[test]
    fn test_twin_otter_matches_its_own_reference() {
        let coeffs = LateralCoefficients::twin_otter();
        let db = ReferenceDatabase::default();
        let (sens, unc) = full_inputs(&coeffs);

        let record = LiteratureValidator::new(&db).validate(&coeffs, &sens, &unc);

        // The database carries the Twin Otter itself, so cy_beta has an
        // exact match among its reference diffs.
        let cy = record
            .comparisons
            .iter()
            .find(|c| c.name == "cy_beta")
            .unwrap();
        let exact = cy
            .reference_diffs
            .iter()
            .find(|(name, _)| name == "DHC-6 Twin Otter")
            .unwrap();
        assert_relative_eq!(exact.1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_reference_data_is_noted_not_fatal() {
        let coeffs = LateralCoefficients::twin_otter();
        let db = ReferenceDatabase::default();
        let (sens, unc) = full_inputs(&coeffs);

        let record = LiteratureValidator::new(&db).validate(&coeffs, &sens, &unc);

        // No reference aircraft lists cy_p, so it must be omitted.
        assert!(record.omitted.contains(&"cy_p".to_string()));
        // And omissions never empty the comparison table.
        assert!(!record.comparisons.is_empty());
    }

    #[test]
    fn test_scores_stay_in_range() {
        let coeffs = LateralCoefficients::twin_otter();
        let db = ReferenceDatabase::default();
        let (sens, unc) = full_inputs(&coeffs);

        let record = LiteratureValidator::new(&db).validate(&coeffs, &sens, &unc);

        for score in [
            record.literature_score,
            record.dimensional_score,
            record.sensitivity_score,
            record.safety_probability,
        ] {
            assert!((0.0..=1.0).contains(&score), "sub-score {} out of range", score);
        }
        assert!((0.0..=100.0).contains(&record.composite_score));
    }

    #[test]
    fn test_band_classification_thresholds() {
        assert_eq!(AgreementBand::classify(5.0), AgreementBand::Close);
        assert_eq!(AgreementBand::classify(25.0), AgreementBand::Consistent);
        assert_eq!(AgreementBand::classify(45.0), AgreementBand::Marginal);
        assert_eq!(AgreementBand::classify(90.0), AgreementBand::Divergent);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(ReliabilityGrade::from_score(90.0), ReliabilityGrade::A);
        assert_eq!(ReliabilityGrade::from_score(85.0), ReliabilityGrade::A);
        assert_eq!(ReliabilityGrade::from_score(75.0), ReliabilityGrade::B);
        assert_eq!(ReliabilityGrade::from_score(60.0), ReliabilityGrade::C);
        assert_eq!(ReliabilityGrade::from_score(10.0), ReliabilityGrade::D);
    }

    #[test]
    fn test_wild_coefficients_grade_worse() {
        let good = LateralCoefficients::twin_otter();
        // Wrong-signed weathercock and dihedral terms, far from every
        // reference value.
        let bad = good
            .with_value("cn_beta", -0.9)
            .unwrap()
            .with_value("cl_beta", 0.8)
            .unwrap()
            .with_value("cy_beta", 3.0)
            .unwrap();

        let db = ReferenceDatabase::default();
        let (good_sens, good_unc) = full_inputs(&good);
        let (bad_sens, bad_unc) = full_inputs(&bad);

        let validator = LiteratureValidator::new(&db);
        let good_record = validator.validate(&good, &good_sens, &good_unc);
        let bad_record = validator.validate(&bad, &bad_sens, &bad_unc);

        assert!(bad_record.composite_score < good_record.composite_score);
        assert!(bad_record.dimensional_score < good_record.dimensional_score);
    }

    #[test]
    fn test_record_serializes_to_json() {
        let coeffs = LateralCoefficients::twin_otter();
        let db = ReferenceDatabase::default();
        let (sens, unc) = full_inputs(&coeffs);

        let record = LiteratureValidator::new(&db).validate(&coeffs, &sens, &unc);
        let json = record.to_json().unwrap();
        assert!(json.contains("composite_score"));
    }
}
