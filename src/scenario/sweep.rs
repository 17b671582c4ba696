use std::collections::HashMap;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::dynamics::controls::ControlLaw;
use crate::error::{Result, SimError};
use crate::scenario::runner::{ScenarioResult, ScenarioRunner};

/// One row of the sweep summary table, suitable for CSV emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub max_lateral_deviation: f64,
    pub final_lateral_position: f64,
    pub max_roll_angle: f64,
    pub max_yaw_angle: f64,
    pub landing_accuracy: f64,
}

/// A scenario that was requested but not completed, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCase {
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub reason: String,
}

/// Aggregated output of a wind-grid sweep.
///
/// The summary may hold fewer rows than were requested: failed scenarios are
/// listed in `skipped` instead. Callers must never assume a one-to-one
/// correspondence between requested and returned cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub rows: Vec<SummaryRow>,
    pub details: HashMap<String, ScenarioResult>,
    pub skipped: Vec<SkippedCase>,
}

/// Stable identifier for one (wind speed, wind direction) case. Shortest
/// round-trip float formatting, so distinct grid points never share a key.
pub fn case_id(wind_speed: f64, wind_direction: f64) -> String {
    format!("ws{}_wd{}", wind_speed, wind_direction)
}

impl SweepSummary {
    /// Render the summary table as CSV, one row per completed scenario, in
    /// wind-grid order.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "wind_speed,wind_direction,max_lateral_deviation,final_lateral_position,\
             max_roll_angle,max_yaw_angle,landing_accuracy\n",
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                row.wind_speed,
                row.wind_direction,
                row.max_lateral_deviation,
                row.final_lateral_position,
                row.max_roll_angle,
                row.max_yaw_angle,
                row.landing_accuracy,
            ));
        }
        out
    }

    /// Serialize the per-case time histories as JSON, keyed by case id.
    pub fn details_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.details)?)
    }

    pub fn get_detail(&self, wind_speed: f64, wind_direction: f64) -> Option<&ScenarioResult> {
        self.details.get(&case_id(wind_speed, wind_direction))
    }
}

/// Iterates a [`ScenarioRunner`] over the Cartesian product of wind speeds
/// and directions.
///
/// Cases are independent and run in parallel; the summary is ordered by the
/// input grid (speeds outer, directions inner), never by completion order,
/// so repeated sweeps with the same grid are bit-identical.
pub struct ScenarioSweep<'a, C: ControlLaw> {
    runner: ScenarioRunner<'a, C>,
    air_density: f64,
}

impl<'a, C: ControlLaw + Sync> ScenarioSweep<'a, C> {
    pub fn new(runner: ScenarioRunner<'a, C>) -> Self {
        Self {
            runner,
            air_density: crate::config::SEA_LEVEL_DENSITY,
        }
    }

    pub fn with_air_density(mut self, air_density: f64) -> Self {
        self.air_density = air_density;
        self
    }

    pub fn run(&self, wind_speeds: &[f64], wind_directions: &[f64]) -> Result<SweepSummary> {
        if wind_speeds.is_empty() {
            return Err(SimError::EmptyGrid("wind_speeds"));
        }
        if wind_directions.is_empty() {
            return Err(SimError::EmptyGrid("wind_directions"));
        }

        let grid: Vec<(f64, f64)> = wind_speeds
            .iter()
            .flat_map(|&ws| wind_directions.iter().map(move |&wd| (ws, wd)))
            .collect();
        debug!("running wind-grid sweep over {} cases", grid.len());

        // rayon preserves input order in the collected results, so the
        // summary is independent of completion order.
        let outcomes: Vec<((f64, f64), Result<ScenarioResult>)> = grid
            .par_iter()
            .map(|&(ws, wd)| {
                let mut env = Environment::new(ws, wd);
                env.air_density = self.air_density;
                ((ws, wd), self.runner.run_scenario(&env))
            })
            .collect();

        let mut rows = Vec::with_capacity(outcomes.len());
        let mut details = HashMap::with_capacity(outcomes.len());
        let mut skipped = Vec::new();

        for ((ws, wd), outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    let m = &result.metrics;
                    rows.push(SummaryRow {
                        wind_speed: ws,
                        wind_direction: wd,
                        max_lateral_deviation: m.max_lateral_deviation,
                        final_lateral_position: m.final_lateral_position,
                        max_roll_angle: m.max_roll_angle,
                        max_yaw_angle: m.max_yaw_angle,
                        landing_accuracy: m.landing_accuracy,
                    });
                    details.insert(case_id(ws, wd), result);
                }
                Err(err) => {
                    warn!(
                        "skipping scenario (wind_speed={}, wind_direction={}): {}",
                        ws, wd, err
                    );
                    skipped.push(SkippedCase {
                        wind_speed: ws,
                        wind_direction: wd,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(SweepSummary {
            rows,
            details,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AircraftProperties, LateralCoefficients};
    use crate::dynamics::controls::PdControlLaw;
    use crate::dynamics::integrator::IntegratorConfig;
    use crate::scenario::runner::ApproachConfig;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn short_approach() -> ApproachConfig {
        ApproachConfig {
            duration: 5.0,
            ..Default::default()
        }
    }

    fn make_sweep<'a>(
        props: &'a AircraftProperties,
        coeffs: &'a LateralCoefficients,
        law: &'a PdControlLaw,
    ) -> ScenarioSweep<'a, PdControlLaw> {
        let runner = ScenarioRunner::new(
            props,
            coeffs,
            law,
            short_approach(),
            IntegratorConfig::default(),
        )
        .unwrap();
        ScenarioSweep::new(runner)
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        assert!(matches!(
            sweep.run(&[], &[0.0]),
            Err(SimError::EmptyGrid(_))
        ));
        assert!(matches!(
            sweep.run(&[5.0], &[]),
            Err(SimError::EmptyGrid(_))
        ));
    }

    #[test]
    fn test_cartesian_product_order() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        let summary = sweep.run(&[0.0, 5.0], &[0.0, FRAC_PI_2]).unwrap();
        assert_eq!(summary.rows.len(), 4);
        assert!(summary.skipped.is_empty());

        let grid: Vec<(f64, f64)> = summary
            .rows
            .iter()
            .map(|r| (r.wind_speed, r.wind_direction))
            .collect();
        assert_eq!(
            grid,
            vec![(0.0, 0.0), (0.0, FRAC_PI_2), (5.0, 0.0), (5.0, FRAC_PI_2)]
        );
    }

    #[test]
    fn test_details_keyed_by_case_id() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        let summary = sweep.run(&[5.0], &[FRAC_PI_2]).unwrap();
        let detail = summary.get_detail(5.0, FRAC_PI_2).unwrap();
        assert_eq!(detail.time.len(), detail.states.len());
    }

    #[test]
    fn test_failed_case_is_skipped_and_reported() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        // A negative wind speed fails scenario validation; the rest of the
        // grid must still complete.
        let summary = sweep.run(&[5.0, -1.0], &[0.0]).unwrap();

        assert_eq!(summary.rows.len(), 1);
        assert_relative_eq!(summary.rows[0].wind_speed, 5.0);

        assert_eq!(summary.skipped.len(), 1);
        let skipped = &summary.skipped[0];
        assert_relative_eq!(skipped.wind_speed, -1.0);
        assert!(skipped.reason.contains("wind_speed"));

        // Skipped cases carry no detail entry either.
        assert!(summary.get_detail(-1.0, 0.0).is_none());
        assert!(summary.get_detail(5.0, 0.0).is_some());
    }

    #[test]
    fn test_close_grid_points_keep_distinct_details() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        // Directions closer than any fixed decimal rounding granularity.
        let directions = [1e-5, 2e-5];
        let summary = sweep.run(&[5.0], &directions).unwrap();

        assert_eq!(summary.details.len(), 2);
        for &wd in &directions {
            assert!(summary.get_detail(5.0, wd).is_some());
        }
    }

    #[test]
    fn test_repeated_sweeps_are_bit_identical() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        let speeds = [0.0, 4.0, 8.0];
        let directions = [0.0, FRAC_PI_2];
        let a = sweep.run(&speeds, &directions).unwrap();
        let b = sweep.run(&speeds, &directions).unwrap();

        assert_eq!(a.rows, b.rows);
        assert_eq!(a.to_csv(), b.to_csv());
    }

    #[test]
    fn test_csv_header_and_row_count() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        let summary = sweep.run(&[0.0, 5.0], &[0.0]).unwrap();
        let csv = summary.to_csv();
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("wind_speed,wind_direction"));
    }

    #[test]
    fn test_zero_wind_row_is_clean() {
        let props = AircraftProperties::light_utility();
        let coeffs = LateralCoefficients::twin_otter();
        let law = PdControlLaw::default();
        let sweep = make_sweep(&props, &coeffs, &law);

        let summary = sweep.run(&[0.0], &[1.0]).unwrap();
        assert_relative_eq!(summary.rows[0].max_lateral_deviation, 0.0, epsilon = 1e-6);
    }
}
