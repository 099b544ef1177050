use serde::{Deserialize, Serialize};

use crate::engine::bearing;

/// Gradient magnitude (rise over run) below which ground is perfectly flat.
pub const FLAT_GRADIENT_EPSILON: f64 = 1e-6;

/// Terrain attributes at one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub slope_degrees: f64,
    /// Direction the slope faces (its downhill direction), `[0, 360)`
    pub aspect_degrees: f64,
    pub uphill_bearing: f64,
    pub downhill_bearing: f64,
    /// Slope and aspect are undefined (perfectly flat ground)
    pub degenerate: bool,
}

impl TerrainPoint {
    /// Build from a known slope and aspect.
    pub fn from_slope_aspect(
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
        slope_degrees: f64,
        aspect_degrees: f64,
    ) -> Self {
        let slope = slope_degrees.clamp(0.0, 90.0);
        let degenerate = slope.to_radians().tan() < FLAT_GRADIENT_EPSILON;
        let aspect = if degenerate { 0.0 } else { bearing::normalize(aspect_degrees) };
        Self {
            latitude,
            longitude,
            elevation_m,
            slope_degrees: if degenerate { 0.0 } else { slope },
            aspect_degrees: aspect,
            uphill_bearing: bearing::leeward(aspect),
            downhill_bearing: aspect,
            degenerate,
        }
    }

    /// Build from elevation change per meter toward east and north.
    pub fn from_gradient(
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
        dz_east: f64,
        dz_north: f64,
    ) -> Self {
        let magnitude = dz_east.hypot(dz_north);
        if magnitude < FLAT_GRADIENT_EPSILON {
            return Self::from_slope_aspect(latitude, longitude, elevation_m, 0.0, 0.0);
        }
        let slope = magnitude.atan().to_degrees();
        // Steepest descent runs against the gradient
        let aspect = (-dz_east).atan2(-dz_north).to_degrees();
        Self::from_slope_aspect(latitude, longitude, elevation_m, slope, aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uphill_is_opposite_aspect() {
        let p = TerrainPoint::from_slope_aspect(44.0, -72.0, 300.0, 15.0, 350.0);
        assert!((p.uphill_bearing - 170.0).abs() < 1e-9);
        assert!((p.downhill_bearing - 350.0).abs() < 1e-9);
        assert!(!p.degenerate);
    }

    #[test]
    fn test_gradient_rising_north_faces_south() {
        let p = TerrainPoint::from_gradient(44.0, -72.0, 300.0, 0.0, 0.2);
        assert!((p.aspect_degrees - 180.0).abs() < 1e-9, "aspect = {}", p.aspect_degrees);
        assert!((p.uphill_bearing - 0.0).abs() < 1e-9);
        assert!((p.slope_degrees - 0.2f64.atan().to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn test_gradient_rising_east_faces_west() {
        let p = TerrainPoint::from_gradient(44.0, -72.0, 300.0, 0.3, 0.0);
        assert!((p.aspect_degrees - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_ground_is_degenerate() {
        let p = TerrainPoint::from_gradient(44.0, -72.0, 300.0, 0.0, 0.0);
        assert!(p.degenerate);
        assert_eq!(p.slope_degrees, 0.0);
        assert_eq!(p.aspect_degrees, 0.0);
        assert_eq!(p.uphill_bearing, 180.0);
    }
}
