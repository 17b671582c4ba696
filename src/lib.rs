//! Nonlinear six-degree-of-freedom simulation of crosswind landing
//! approaches, with coefficient sensitivity analysis, Monte Carlo uncertainty
//! propagation and literature validation of the lateral-directional
//! derivative set.

pub mod analysis;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod scenario;
pub mod state;

pub use analysis::{
    deviation_proxy, LiteratureValidator, ReferenceDatabase, SensitivityAnalyzer,
    UncertaintyPropagator, ValidationRecord, WindCondition,
};
pub use config::{
    AircraftProperties, Environment, LateralCoefficients, ScenarioConfig, SEA_LEVEL_DENSITY,
};
pub use dynamics::{ControlLaw, IntegratorConfig, PdControlLaw, Rk45Integrator};
pub use error::{Result, SimError};
pub use scenario::{ApproachConfig, ScenarioRunner, ScenarioSweep, SweepSummary};
pub use state::{AircraftState, StateVector, STATE_DIM};
