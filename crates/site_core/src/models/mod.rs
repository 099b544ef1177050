pub mod candidate;
pub mod environment;
pub mod request;
pub mod season;

pub use candidate::{
    CameraSetup, Candidate, Category, Factor, FlagKind, Role, Severity, ValidationFlag,
};
pub use environment::{derive_thermal, ThermalPhase, WindThermalState};
pub use request::{SiteRequest, ThermalObservation, WindObservation, REQUEST_SCHEMA_VERSION};
pub use season::{Season, Weather};
