//! Mapped features supplied by the caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::bearing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Water,
    Food,
    /// Forest/field transition
    Edge,
    /// Trail segment or crossing point
    Trail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct TerrainFeature {
    pub kind: FeatureKind,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A feature located relative to a reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureFix<'a> {
    pub feature: &'a TerrainFeature,
    pub distance_m: f64,
    pub bearing: f64,
}

/// Every feature of the given kinds within `max_distance_m`, nearest first.
pub fn within<'a>(
    features: &'a [TerrainFeature],
    kinds: &[FeatureKind],
    latitude: f64,
    longitude: f64,
    max_distance_m: f64,
) -> Vec<FeatureFix<'a>> {
    let mut fixes: Vec<FeatureFix<'a>> = features
        .iter()
        .filter(|f| kinds.contains(&f.kind))
        .map(|f| FeatureFix {
            feature: f,
            distance_m: bearing::haversine_m(latitude, longitude, f.latitude, f.longitude),
            bearing: bearing::bearing_between(latitude, longitude, f.latitude, f.longitude),
        })
        .filter(|fix| fix.distance_m <= max_distance_m)
        .collect();
    // Stable sort keeps input order for equal distances
    fixes.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    fixes
}

/// Nearest feature of the given kinds within `max_distance_m`.
pub fn nearest<'a>(
    features: &'a [TerrainFeature],
    kinds: &[FeatureKind],
    latitude: f64,
    longitude: f64,
    max_distance_m: f64,
) -> Option<FeatureFix<'a>> {
    within(features, kinds, latitude, longitude, max_distance_m).into_iter().next()
}

/// Number of features of `kind` within `radius_m`.
pub fn count_within(
    features: &[TerrainFeature],
    kind: FeatureKind,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
) -> u32 {
    features
        .iter()
        .filter(|f| f.kind == kind)
        .filter(|f| bearing::haversine_m(latitude, longitude, f.latitude, f.longitude) <= radius_m)
        .count() as u32
}
