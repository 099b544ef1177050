//! Terrain coverage for one request: a full elevation grid or a single
//! pre-computed sample.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::bearing;
use crate::error::{Result, SiteError};
use crate::terrain::grid::ElevationGrid;
use crate::terrain::point::TerrainPoint;

/// Slope and aspect already derived by the caller, assumed uniform within
/// `coverage_radius_m` of the sample location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct TerrainSample {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub elevation_m: f64,
    #[validate(range(min = 0.0, max = 90.0))]
    pub slope_degrees: f64,
    pub aspect_degrees: f64,
    #[validate(range(min = 0.0))]
    pub coverage_radius_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerrainSource {
    Grid(ElevationGrid),
    Sample(TerrainSample),
}

/// Immutable terrain lookup.
#[derive(Debug, Clone)]
pub struct TerrainModel {
    source: TerrainSource,
}

impl TerrainModel {
    pub fn new(source: TerrainSource) -> Result<Self> {
        match &source {
            TerrainSource::Grid(grid) => grid.check()?,
            TerrainSource::Sample(sample) => sample.validate()?,
        }
        Ok(Self { source })
    }

    pub fn from_grid(grid: ElevationGrid) -> Result<Self> {
        Self::new(TerrainSource::Grid(grid))
    }

    pub fn from_sample(sample: TerrainSample) -> Result<Self> {
        Self::new(TerrainSource::Sample(sample))
    }

    pub fn covers(&self, latitude: f64, longitude: f64) -> bool {
        match &self.source {
            TerrainSource::Grid(grid) => grid.locate(latitude, longitude).is_some(),
            TerrainSource::Sample(sample) => {
                bearing::haversine_m(sample.latitude, sample.longitude, latitude, longitude)
                    <= sample.coverage_radius_m
            }
        }
    }

    /// Terrain at a coordinate; `InvalidCoordinates` outside coverage.
    pub fn point_at(&self, latitude: f64, longitude: f64) -> Result<TerrainPoint> {
        match &self.source {
            TerrainSource::Grid(grid) => grid.point_at(latitude, longitude),
            TerrainSource::Sample(sample) => {
                if !self.covers(latitude, longitude) {
                    return Err(SiteError::InvalidCoordinates { latitude, longitude });
                }
                Ok(TerrainPoint::from_slope_aspect(
                    latitude,
                    longitude,
                    sample.elevation_m,
                    sample.slope_degrees,
                    sample.aspect_degrees,
                ))
            }
        }
    }

    /// Terrain at a coordinate if covered.
    pub fn try_point_at(&self, latitude: f64, longitude: f64) -> Option<TerrainPoint> {
        if self.covers(latitude, longitude) {
            self.point_at(latitude, longitude).ok()
        } else {
            None
        }
    }
}
