//! Evaluation request: everything the engine needs, already fetched.

use chrono::{DateTime, FixedOffset, Timelike};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::validation::VegetationBaselines;
use crate::error::{Result, SiteError};
use crate::models::{Category, Role, Season, ThermalPhase, Weather};
use crate::terrain::{TerrainFeature, TerrainSource};

pub const REQUEST_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    REQUEST_SCHEMA_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct WindObservation {
    /// Meteorological "from" bearing
    pub bearing_degrees: f64,
    #[validate(range(min = 0.0, max = 200.0))]
    pub speed_mph: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ThermalObservation {
    pub phase: ThermalPhase,
    #[validate(range(min = 0.0, max = 1.0))]
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SiteRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// RFC 3339 with the local UTC offset; the offset sets the thermal clock.
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    pub terrain: TerrainSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub wind: Option<WindObservation>,
    #[validate(range(min = -80.0, max = 140.0))]
    pub temperature_f: f64,
    /// Derived from the local hour when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub thermal: Option<ThermalObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deer_movement_bearing: Option<f64>,
    #[serde(default)]
    #[validate]
    pub baselines: VegetationBaselines,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate]
    pub features: Vec<TerrainFeature>,
    /// Empty means all categories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    /// Empty means each category's default roles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
}

impl SiteRequest {
    /// Field ranges, schema version and finiteness of free-form bearings.
    pub fn check(&self) -> Result<()> {
        if self.schema_version != REQUEST_SCHEMA_VERSION {
            return Err(SiteError::InvalidInput(format!(
                "unsupported schema version {} (expected {REQUEST_SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        self.validate()?;

        let bearings = [
            self.wind.map(|w| w.bearing_degrees),
            self.deer_movement_bearing,
        ];
        if bearings.iter().flatten().any(|b| !b.is_finite()) {
            return Err(SiteError::InvalidInput("bearings must be finite".to_string()));
        }
        Ok(())
    }

    /// Local clock hour with minutes as a fraction.
    pub fn local_hour(&self) -> f64 {
        self.timestamp.hour() as f64 + self.timestamp.minute() as f64 / 60.0
    }

    /// Explicit season, else derived from the local date.
    pub fn season(&self) -> Season {
        self.season.unwrap_or_else(|| Season::from_date(self.timestamp.date_naive()))
    }

    pub fn weather(&self) -> Weather {
        self.weather.unwrap_or_default()
    }

    /// Requested categories in canonical order, all when none requested.
    pub fn categories(&self) -> Vec<Category> {
        if self.categories.is_empty() {
            return Category::ALL.to_vec();
        }
        Category::ALL.iter().copied().filter(|c| self.categories.contains(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "latitude": 44.0,
        "longitude": -72.0,
        "timestamp": "2024-11-05T17:30:00-05:00",
        "terrain": {"type": "sample", "latitude": 44.0, "longitude": -72.0,
                    "elevation_m": 400.0, "slope_degrees": 12.0, "aspect_degrees": 180.0,
                    "coverage_radius_m": 800.0},
        "temperature_f": 38.0
    }"#;

    #[test]
    fn test_minimal_request_defaults() {
        let request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(request.schema_version, 1);
        assert!(request.check().is_ok());
        assert!((request.local_hour() - 17.5).abs() < 1e-9);
        assert_eq!(request.season(), Season::Rut);
        assert_eq!(request.weather(), Weather::Clear);
        assert_eq!(request.categories(), Category::ALL.to_vec());
    }

    #[test]
    fn test_categories_canonical_order() {
        let mut request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        request.categories = vec![Category::Camera, Category::Bedding, Category::Camera];
        assert_eq!(request.categories(), vec![Category::Bedding, Category::Camera]);
    }

    #[test]
    fn test_check_rejects_out_of_range() {
        let mut request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        request.latitude = 95.0;
        assert!(matches!(request.check(), Err(SiteError::InvalidInput(_))));

        let mut request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        request.wind = Some(WindObservation { bearing_degrees: 10.0, speed_mph: -4.0 });
        assert!(request.check().is_err());

        let mut request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        request.deer_movement_bearing = Some(f64::NAN);
        assert!(request.check().is_err());
    }

    #[test]
    fn test_check_rejects_schema_version() {
        let mut request: SiteRequest = serde_json::from_str(MINIMAL).unwrap();
        request.schema_version = 2;
        let err = request.check().unwrap_err();
        assert!(err.to_string().contains("schema version 2"));
    }
}
