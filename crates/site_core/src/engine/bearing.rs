//! Compass bearing math.
//!
//! Bearings are degrees clockwise from north in `[0, 360)`. Every comparison
//! goes through [`angular_distance`] and every blend through
//! [`circular_mean`]; linear subtraction or averaging of bearings breaks at
//! the 0°/360° seam.

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

const DEGENERATE_RESULTANT: f64 = 1e-9;

/// Normalize any angle to `[0, 360)`.
pub fn normalize(bearing: f64) -> f64 {
    let b = bearing.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0, and keeps -0.0
    if b >= 360.0 {
        0.0
    } else {
        b + 0.0
    }
}

/// Shortest angular distance between two bearings, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize(a - b);
    d.min(360.0 - d)
}

/// Bearing rotated by `offset` degrees (clockwise for positive offsets).
pub fn offset(bearing: f64, offset: f64) -> f64 {
    normalize(bearing + offset)
}

/// Bearing directly downwind of a wind blowing *from* `wind_bearing`.
pub fn leeward(wind_bearing: f64) -> f64 {
    normalize(wind_bearing + 180.0)
}

/// Weighted circular mean of `(bearing, weight)` pairs.
///
/// Combines the sine and cosine components of each bearing. Returns `None`
/// when the weighted vectors cancel out (e.g. two equally weighted opposite
/// bearings) and the mean direction is undefined.
pub fn circular_mean(samples: &[(f64, f64)]) -> Option<f64> {
    let mut east = 0.0_f64;
    let mut north = 0.0_f64;
    for &(bearing, weight) in samples {
        let r = bearing.to_radians();
        east += weight * r.sin();
        north += weight * r.cos();
    }

    if east.hypot(north) < DEGENERATE_RESULTANT {
        return None;
    }
    Some(normalize(east.atan2(north).to_degrees()))
}

/// Blend `a` toward `b`; `weight_b` in `[0, 1]` is the share given to `b`.
///
/// Falls back to the heavier input when the circular mean is undefined.
pub fn blend(a: f64, b: f64, weight_b: f64) -> f64 {
    let w = weight_b.clamp(0.0, 1.0);
    circular_mean(&[(a, 1.0 - w), (b, w)]).unwrap_or(if w > 0.5 { normalize(b) } else { normalize(a) })
}

/// Of several candidate bearings, the one closest to `target`.
/// Ties resolve to the earliest candidate.
pub fn nearest_to(target: f64, candidates: &[f64]) -> Option<f64> {
    candidates.iter().copied().fold(None, |best: Option<f64>, b| match best {
        Some(current) if angular_distance(current, target) <= angular_distance(b, target) => {
            Some(current)
        }
        _ => Some(normalize(b)),
    })
}

/// Point reached by travelling `distance_m` from `(lat, lon)` along `bearing`.
pub fn destination(latitude: f64, longitude: f64, bearing: f64, distance_m: f64) -> (f64, f64) {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing.to_radians();
    let lat1 = latitude.to_radians();
    let lon1 = longitude.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon_deg = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    (lat2.to_degrees(), lon_deg)
}

/// Great-circle distance in meters.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial great-circle bearing from one point to another.
pub fn bearing_between(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    let lat1 = from_lat.to_radians();
    let lat2 = to_lat.to_radians();
    let dlon = (to_lon - from_lon).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize(x.atan2(y).to_degrees())
}

/// Straight-line distance between two polar offsets taken from the same anchor.
pub fn polar_separation_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (bearing_a, dist_a) = a;
    let (bearing_b, dist_b) = b;
    let delta = angular_distance(bearing_a, bearing_b).to_radians();
    (dist_a * dist_a + dist_b * dist_b - 2.0 * dist_a * dist_b * delta.cos()).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_normalize_wraps() {
        assert!(approx_eq(normalize(370.0), 10.0, 1e-9));
        assert!(approx_eq(normalize(-10.0), 350.0, 1e-9));
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(-1e-15), 0.0);
        assert!(normalize(-0.0).is_sign_positive());
    }

    #[test]
    fn test_angular_distance_across_north() {
        assert!(approx_eq(angular_distance(350.0, 10.0), 20.0, 1e-9));
        assert!(approx_eq(angular_distance(10.0, 350.0), 20.0, 1e-9));
        assert!(approx_eq(angular_distance(0.0, 180.0), 180.0, 1e-9));
    }

    #[test]
    fn test_blend_350_and_10_is_north() {
        let mean = circular_mean(&[(350.0, 1.0), (10.0, 1.0)]).unwrap();
        assert!(angular_distance(mean, 0.0) < 1e-9, "mean = {mean}, expected 0 not 180");
        assert!(angular_distance(blend(350.0, 10.0, 0.5), 0.0) < 1e-9);
    }

    #[test]
    fn test_circular_mean_opposites_undefined() {
        assert!(circular_mean(&[(90.0, 1.0), (270.0, 1.0)]).is_none());
        // blend falls back to the first input on an exact tie
        assert!(approx_eq(blend(90.0, 270.0, 0.5), 90.0, 1e-9));
    }

    #[test]
    fn test_weighted_blend_leans_to_heavier() {
        let b = blend(90.0, 180.0, 0.25);
        assert!(b > 90.0 && b < 135.0, "blend = {b}");
    }

    #[test]
    fn test_nearest_to() {
        assert_eq!(nearest_to(10.0, &[100.0, 290.0]), Some(290.0));
        assert_eq!(nearest_to(10.0, &[100.0, 280.0]), Some(100.0));
        assert_eq!(nearest_to(10.0, &[]), None);
    }

    #[test]
    fn test_destination_and_back() {
        let (lat, lon) = destination(44.0, -72.0, 90.0, 1_000.0);
        let d = haversine_m(44.0, -72.0, lat, lon);
        assert!(approx_eq(d, 1_000.0, 0.5), "distance = {d}");
        let b = bearing_between(44.0, -72.0, lat, lon);
        assert!(angular_distance(b, 90.0) < 0.1, "bearing = {b}");
    }

    #[test]
    fn test_polar_separation() {
        assert!(approx_eq(polar_separation_m((0.0, 100.0), (0.0, 40.0)), 60.0, 1e-9));
        assert!(approx_eq(polar_separation_m((0.0, 100.0), (180.0, 100.0)), 200.0, 1e-9));
    }

    proptest! {
        #[test]
        fn prop_normalize_in_range(b in -10_000.0f64..10_000.0f64) {
            let n = normalize(b);
            prop_assert!((0.0..360.0).contains(&n));
        }

        #[test]
        fn prop_angular_distance_symmetric(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            let d1 = angular_distance(a, b);
            let d2 = angular_distance(b, a);
            prop_assert!((d1 - d2).abs() < 1e-9);
            prop_assert!((0.0..=180.0).contains(&d1));
        }

        #[test]
        fn prop_blend_stays_between_inputs(a in 0.0f64..360.0, turn in 0.0f64..170.0, w in 0.0f64..1.0) {
            let b = normalize(a + turn);
            let mixed = blend(a, b, w);
            let span = angular_distance(a, b);
            prop_assert!(angular_distance(mixed, a) <= span + 1e-6);
            prop_assert!(angular_distance(mixed, b) <= span + 1e-6);
        }
    }
}
