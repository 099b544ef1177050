//! Candidate records and their scoring vocabulary.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Site category a candidate is proposed for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bedding,
    Feeding,
    Stand,
    Camera,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Bedding, Category::Feeding, Category::Stand, Category::Camera];

    /// Roles this category can produce, in generation order.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Category::Bedding => &[Role::Primary, Role::Secondary, Role::Escape],
            Category::Feeding => &[Role::Primary, Role::Secondary, Role::Emergency],
            Category::Stand => {
                &[Role::Primary, Role::Secondary, Role::Morning, Role::Evening, Role::AllDay]
            }
            Category::Camera => &[Role::Primary, Role::Secondary],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Bedding => "bedding",
            Category::Feeding => "feeding",
            Category::Stand => "stand",
            Category::Camera => "camera",
        }
    }
}

/// Placement role within a category. Declaration order is the ranking
/// tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Primary,
    Secondary,
    Escape,
    Emergency,
    Morning,
    Evening,
    AllDay,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Escape => "escape",
            Role::Emergency => "emergency",
            Role::Morning => "morning",
            Role::Evening => "evening",
            Role::AllDay => "all_day",
        }
    }
}

/// Raw score keys. Every factor is scored 0–100.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Slope-facing direction against wind and temperature
    Aspect,
    /// Scent management relative to the prevailing wind
    Wind,
    /// Scent management relative to thermal drafts
    Thermal,
    /// Slope suitability for the category
    Terrain,
    /// Vegetation cover (bedding cover)
    Cover,
    /// Alignment with deer travel
    Travel,
    /// Closeness to supporting features (water, food, edges)
    Proximity,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Aspect,
        Factor::Wind,
        Factor::Thermal,
        Factor::Terrain,
        Factor::Cover,
        Factor::Travel,
        Factor::Proximity,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    TemporalMismatch,
    LowDataConfidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Cross-check result attached to a candidate. Adjusts confidence and
/// presentation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFlag {
    pub kind: FlagKind,
    pub severity: Severity,
    pub message: String,
}

/// Camera-specific placement details.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSetup {
    /// Downward tilt, 20–45°
    pub pitch_degrees: f64,
    pub expected_trail_crossings: u32,
}

/// One proposed site for a category/role, offset from the request anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub category: Category,
    pub role: Role,
    pub bearing_degrees: f64,
    pub distance_meters: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub raw_scores: BTreeMap<Factor, f64>,
    confidence: f64,
    pub rationale: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ValidationFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSetup>,
}

impl Candidate {
    pub fn new(category: Category, role: Role, bearing_degrees: f64, distance_meters: f64) -> Self {
        Self {
            category,
            role,
            bearing_degrees: crate::engine::bearing::normalize(bearing_degrees),
            distance_meters: distance_meters.max(0.0),
            latitude: 0.0,
            longitude: 0.0,
            raw_scores: BTreeMap::new(),
            confidence: 0.0,
            rationale: Vec::new(),
            flags: Vec::new(),
            camera: None,
        }
    }

    pub fn push_rationale(&mut self, reason: impl Into<String>) {
        self.rationale.push(reason.into());
    }

    pub fn set_raw(&mut self, factor: Factor, score: f64) {
        self.raw_scores.insert(factor, score.clamp(0.0, 100.0));
    }

    pub fn raw(&self, factor: Factor) -> Option<f64> {
        self.raw_scores.get(&factor).copied()
    }

    /// Final confidence, 0–100. Written only by scoring and validation.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub(crate) fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence.clamp(0.0, 100.0);
    }

    /// Polar offset `(bearing, distance)` from the anchor.
    pub fn offset(&self) -> (f64, f64) {
        (self.bearing_degrees, self.distance_meters)
    }

    pub fn has_flag(&self, kind: FlagKind) -> bool {
        self.flags.iter().any(|f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_normalizes_bearing() {
        let c = Candidate::new(Category::Bedding, Role::Primary, 390.0, 150.0);
        assert!((c.bearing_degrees - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_raw_scores_clamped() {
        let mut c = Candidate::new(Category::Stand, Role::Morning, 0.0, 80.0);
        c.set_raw(Factor::Wind, 140.0);
        c.set_raw(Factor::Aspect, -5.0);
        assert_eq!(c.raw(Factor::Wind), Some(100.0));
        assert_eq!(c.raw(Factor::Aspect), Some(0.0));
        assert_eq!(c.raw(Factor::Cover), None);
    }

    #[test]
    fn test_allowed_roles_per_category() {
        assert!(Category::Bedding.allowed_roles().contains(&Role::Escape));
        assert!(!Category::Bedding.allowed_roles().contains(&Role::Morning));
        assert!(Category::Feeding.allowed_roles().contains(&Role::Emergency));
        assert_eq!(Category::Stand.allowed_roles().len(), 5);
    }

    #[test]
    fn test_raw_scores_serialize_with_factor_keys() {
        let mut c = Candidate::new(Category::Camera, Role::Primary, 45.0, 100.0);
        c.set_raw(Factor::Proximity, 70.0);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["raw_scores"]["proximity"], 70.0);
        assert_eq!(json["category"], "camera");
        assert!(json.get("flags").is_none());
    }
}
