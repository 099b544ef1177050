//! Scoring and placement engine.

pub mod aspect_scorer;
pub mod bearing;
pub mod candidate_generator;
pub mod config;
pub mod scoring;
pub mod site_engine;
pub mod stand_position;
pub mod validation;
pub mod weights;

pub use aspect_scorer::{AspectScore, AspectScorer, DefaultAspectScorer};
pub use candidate_generator::{
    default_movement_bearing, resolve_roles, CandidateGeneration, DefaultCandidateGenerator,
    GenerationContext,
};
pub use config::EngineConfig;
pub use scoring::ScoringEngine;
pub use site_engine::{CategoryReport, SiteEngine, SiteEngineBuilder, SiteReport};
pub use stand_position::{PlacementMode, StandPlacement, StandPositionCalculator, StandPositioner};
pub use validation::{
    BaselineReading, BaselineValidator, DefaultBaselineValidator, VegetationBaselines,
};
pub use weights::{FactorWeights, WeightTables};
