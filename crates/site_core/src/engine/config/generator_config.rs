use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Value kept per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    pub bedding: T,
    pub feeding: T,
    pub stand: T,
    pub camera: T,
}

impl<T: Copy> PerCategory<T> {
    pub fn get(&self, category: Category) -> T {
        match category {
            Category::Bedding => self.bedding,
            Category::Feeding => self.feeding,
            Category::Stand => self.stand,
            Category::Camera => self.camera,
        }
    }
}

/// Preferred slope band, inclusive (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeRange {
    pub min_deg: f64,
    pub max_deg: f64,
}

/// Candidate generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub bedding_distance_m: f64,
    pub feeding_distance_m: f64,
    /// Clockwise offset of every secondary from its primary (degrees)
    pub secondary_offset_deg: f64,
    /// Escape bedding sits at this fraction of the primary distance
    pub escape_distance_factor: f64,
    /// Water/food features further than this are ignored for emergency feeding
    pub emergency_search_radius_m: f64,
    /// Emergency distance fraction when no feature is known
    pub emergency_fallback_factor: f64,

    pub camera_min_distance_m: f64,
    pub camera_max_distance_m: f64,
    pub camera_min_pitch_deg: f64,
    pub camera_max_pitch_deg: f64,
    /// Trail features within this radius of a camera count as expected crossings
    pub trail_detection_radius_m: f64,
    pub max_cameras: usize,
    /// Fan spread used when no edge is mapped (degrees)
    pub camera_fan_offset_deg: f64,
    /// Edges within this radius of a site earn proximity credit
    pub edge_influence_radius_m: f64,

    /// Minimum distance between two candidates of the same category (meters)
    pub min_separation_m: PerCategory<f64>,
    /// Outward nudge applied to a crowded candidate (meters)
    pub separation_step_m: f64,
    pub separation_max_steps: u32,

    pub slope_ranges: PerCategory<SlopeRange>,
    /// Score lost per degree outside the preferred slope band
    pub slope_falloff_per_deg: f64,
    /// Target current vegetation cover (%)
    pub cover_targets_pct: PerCategory<f64>,
    /// Score lost per percentage point away from the cover target
    pub cover_falloff_per_pct: PerCategory<f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bedding_distance_m: 150.0,
            feeding_distance_m: 200.0,
            secondary_offset_deg: 30.0,
            escape_distance_factor: 0.5,
            emergency_search_radius_m: 400.0,
            emergency_fallback_factor: 0.5,
            camera_min_distance_m: 50.0,
            camera_max_distance_m: 150.0,
            camera_min_pitch_deg: 20.0,
            camera_max_pitch_deg: 45.0,
            trail_detection_radius_m: 30.0,
            max_cameras: 3,
            camera_fan_offset_deg: 45.0,
            edge_influence_radius_m: 200.0,
            min_separation_m: PerCategory { bedding: 50.0, feeding: 50.0, stand: 40.0, camera: 30.0 },
            separation_step_m: 10.0,
            separation_max_steps: 20,
            slope_ranges: PerCategory {
                bedding: SlopeRange { min_deg: 10.0, max_deg: 25.0 },
                feeding: SlopeRange { min_deg: 0.0, max_deg: 10.0 },
                stand: SlopeRange { min_deg: 5.0, max_deg: 20.0 },
                camera: SlopeRange { min_deg: 0.0, max_deg: 15.0 },
            },
            slope_falloff_per_deg: 5.0,
            cover_targets_pct: PerCategory { bedding: 100.0, feeding: 35.0, stand: 60.0, camera: 50.0 },
            cover_falloff_per_pct: PerCategory { bedding: 1.0, feeding: 2.0, stand: 2.0, camera: 2.0 },
        }
    }
}

impl GeneratorConfig {
    pub fn camera_band_mid_m(&self) -> f64 {
        (self.camera_min_distance_m + self.camera_max_distance_m) / 2.0
    }
}
