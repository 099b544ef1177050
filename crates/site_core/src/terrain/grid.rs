//! Regular elevation grid with Horn slope/aspect derivation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, SiteError};
use crate::terrain::point::TerrainPoint;

/// Meters per degree of latitude (equirectangular approximation).
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Row-major elevation raster. Row 0 is the northern edge, columns run east.
/// The origin is the centre of the north-west cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ElevationGrid {
    #[validate(range(min = -90.0, max = 90.0))]
    pub origin_latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub origin_longitude: f64,
    #[validate(range(min = 0.1))]
    pub cell_size_m: f64,
    #[validate(range(min = 3))]
    pub rows: usize,
    #[validate(range(min = 3))]
    pub cols: usize,
    pub elevations_m: Vec<f64>,
}

impl ElevationGrid {
    pub fn new(
        origin_latitude: f64,
        origin_longitude: f64,
        cell_size_m: f64,
        rows: usize,
        cols: usize,
        elevations_m: Vec<f64>,
    ) -> Result<Self> {
        let grid = Self { origin_latitude, origin_longitude, cell_size_m, rows, cols, elevations_m };
        grid.check()?;
        Ok(grid)
    }

    /// Shape and value checks beyond the field ranges.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        let expected = self.rows.checked_mul(self.cols).ok_or_else(|| {
            SiteError::InvalidInput(format!("elevation grid {}x{} is too large", self.rows, self.cols))
        })?;
        if expected == 0 || self.elevations_m.len() != expected {
            return Err(SiteError::InvalidInput(format!(
                "elevation grid has {} values, expected {expected} ({}x{})",
                self.elevations_m.len(),
                self.rows,
                self.cols
            )));
        }
        if self.elevations_m.iter().any(|z| !z.is_finite()) {
            return Err(SiteError::InvalidInput("elevation grid contains non-finite values".into()));
        }
        Ok(())
    }

    fn meters_per_deg_lon(&self) -> f64 {
        METERS_PER_DEG_LAT * self.origin_latitude.to_radians().cos()
    }

    /// Fractional `(row, col)` of a coordinate, or `None` outside coverage.
    /// Coverage extends half a cell beyond the outer cell centres.
    pub fn locate(&self, latitude: f64, longitude: f64) -> Option<(f64, f64)> {
        let row = (self.origin_latitude - latitude) * METERS_PER_DEG_LAT / self.cell_size_m;
        let col = (longitude - self.origin_longitude) * self.meters_per_deg_lon() / self.cell_size_m;
        let inside = |v: f64, n: usize| v >= -0.5 && v <= n as f64 - 0.5;
        if inside(row, self.rows) && inside(col, self.cols) {
            Some((row, col))
        } else {
            None
        }
    }

    fn at(&self, row: isize, col: isize) -> f64 {
        let r = row.clamp(0, self.rows as isize - 1) as usize;
        let c = col.clamp(0, self.cols as isize - 1) as usize;
        self.elevations_m[r * self.cols + c]
    }

    /// Bilinear elevation at a fractional cell position.
    pub fn elevation_at(&self, row: f64, col: f64) -> f64 {
        let row = row.clamp(0.0, (self.rows - 1) as f64);
        let col = col.clamp(0.0, (self.cols - 1) as f64);
        let r0 = row.floor() as isize;
        let c0 = col.floor() as isize;
        let fr = row - r0 as f64;
        let fc = col - c0 as f64;

        let top = self.at(r0, c0) * (1.0 - fc) + self.at(r0, c0 + 1) * fc;
        let bottom = self.at(r0 + 1, c0) * (1.0 - fc) + self.at(r0 + 1, c0 + 1) * fc;
        top * (1.0 - fr) + bottom * fr
    }

    /// Elevation change per meter `(east, north)` at the nearest cell, using
    /// Horn's 3x3 weighted finite difference. Edge cells replicate neighbours.
    pub fn gradient(&self, row: f64, col: f64) -> (f64, f64) {
        let r = row.round() as isize;
        let c = col.round() as isize;
        let z = |dr: isize, dc: isize| self.at(r + dr, c + dc);

        let (a, b, cc) = (z(-1, -1), z(-1, 0), z(-1, 1));
        let (d, f) = (z(0, -1), z(0, 1));
        let (g, h, i) = (z(1, -1), z(1, 0), z(1, 1));

        let scale = 8.0 * self.cell_size_m;
        let dz_east = ((cc + 2.0 * f + i) - (a + 2.0 * d + g)) / scale;
        let dz_south = ((g + 2.0 * h + i) - (a + 2.0 * b + cc)) / scale;
        (dz_east, -dz_south)
    }

    /// Terrain attributes at a coordinate.
    pub fn point_at(&self, latitude: f64, longitude: f64) -> Result<TerrainPoint> {
        let (row, col) = self
            .locate(latitude, longitude)
            .ok_or(SiteError::InvalidCoordinates { latitude, longitude })?;
        let (dz_east, dz_north) = self.gradient(row, col);
        Ok(TerrainPoint::from_gradient(
            latitude,
            longitude,
            self.elevation_at(row, col),
            dz_east,
            dz_north,
        ))
    }

    /// Latitude/longitude of a cell centre.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let lat = self.origin_latitude - row as f64 * self.cell_size_m / METERS_PER_DEG_LAT;
        let lon = self.origin_longitude + col as f64 * self.cell_size_m / self.meters_per_deg_lon();
        (lat, lon)
    }
}
