//! Terrain model: elevation coverage, slope/aspect derivation and mapped
//! features.

pub mod features;
pub mod grid;
pub mod model;
pub mod point;

pub use features::{FeatureFix, FeatureKind, TerrainFeature};
pub use grid::ElevationGrid;
pub use model::{TerrainModel, TerrainSample, TerrainSource};
pub use point::TerrainPoint;
