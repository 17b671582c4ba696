pub mod aircraft;
pub mod coefficients;
pub mod environment;
pub mod loader;

pub use aircraft::AircraftProperties;
pub use coefficients::{
    LateralCoefficients, RollDerivatives, SideForceDerivatives, YawDerivatives, COEFFICIENT_NAMES,
};
pub use environment::{Environment, SEA_LEVEL_DENSITY};
pub use loader::{ScenarioConfig, SweepGrid};
