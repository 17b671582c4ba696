pub mod proxy;
pub mod sensitivity;
pub mod uncertainty;
pub mod validation;

pub use proxy::{deviation_proxy, WindCondition};
pub use sensitivity::{SensitivityAnalyzer, SensitivityResult};
pub use uncertainty::{UncertaintyPropagator, UncertaintyResult};
pub use validation::{
    AgreementBand, LiteratureValidator, ReferenceDatabase, ReliabilityGrade, ValidationRecord,
};
