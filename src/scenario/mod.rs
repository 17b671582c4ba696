pub mod runner;
pub mod sweep;

pub use runner::{ApproachConfig, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use sweep::{case_id, ScenarioSweep, SkippedCase, SummaryRow, SweepSummary};
