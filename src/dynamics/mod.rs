pub mod aerodynamics;
pub mod controls;
pub mod equations;
pub mod integrator;

pub use aerodynamics::{lateral_forces_moments, AirData, LateralForcesMoments};
pub use controls::{ControlCommand, ControlGains, ControlLaw, PdControlLaw};
pub use equations::{state_derivative, GRAVITY};
pub use integrator::{IntegrationOutput, IntegratorConfig, Rk45Integrator};
