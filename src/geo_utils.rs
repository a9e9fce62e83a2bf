//! # Geographic Utilities
//!
//! Distance kernels and marker-placement geometry for GPS tracks.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`distance_m`] / [`distance_km`] | Geodesic distance between two track points |
//! | [`polyline_length_m`] | Total length of a point sequence in meters |
//! | [`track_midpoint`] | The point where a mid-of-track marker is drawn |
//! | [`offset_point`] | Shift a coordinate by metric offsets |
//! | [`meters_to_degrees`] | Convert meters to approximate degrees at a latitude |
//! | [`compute_bounds`] / [`compute_center`] | Bounding box and centroid for map centering |
//!
//! ## Distance formulas
//!
//! Both formulas come from the `geo` crate and expect WGS84 coordinates:
//!
//! - [`DistanceFormula::Haversine`] - great-circle distance on a sphere with
//!   the mean Earth radius. Accurate to ~0.3%, well inside GPS noise, and the
//!   default.
//! - [`DistanceFormula::Geodesic`] - Karney's algorithm on the WGS84
//!   ellipsoid, for callers who need ellipsoidal accuracy.
//!
//! Whichever formula is chosen must stay fixed across runs: statistics are
//! only comparable when the formula is stable.

use crate::TrackPoint;
use geo::{Distance, Geodesic, Haversine, Point};

// =============================================================================
// Distance Functions
// =============================================================================

/// Geodesic distance formula used for all point-pair distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceFormula {
    /// Great-circle distance on a spherical Earth (mean radius)
    #[default]
    Haversine,
    /// Karney geodesic on the WGS84 ellipsoid
    Geodesic,
}

/// Calculate the surface distance between two track points in meters.
#[inline]
pub fn distance_m(p1: &TrackPoint, p2: &TrackPoint, formula: DistanceFormula) -> f64 {
    let a = Point::new(p1.longitude, p1.latitude);
    let b = Point::new(p2.longitude, p2.latitude);
    match formula {
        DistanceFormula::Haversine => Haversine::distance(a, b),
        DistanceFormula::Geodesic => Geodesic::distance(a, b),
    }
}

/// Calculate the surface distance between two track points in kilometers.
#[inline]
pub fn distance_km(p1: &TrackPoint, p2: &TrackPoint, formula: DistanceFormula) -> f64 {
    distance_m(p1, p2, formula) / 1000.0
}

/// Calculate the total length of a point sequence in meters.
///
/// Sums the pairwise distance between consecutive points. Empty or
/// single-point sequences return 0.0.
pub fn polyline_length_m(points: &[TrackPoint], formula: DistanceFormula) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| distance_m(&w[0], &w[1], formula))
        .sum()
}

/// Convert meters to approximate degrees at a given latitude.
///
/// At the equator 1 degree of longitude is ~111,320 meters; the span shrinks
/// with cos(latitude) toward the poles.
#[inline]
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let lat_rad = latitude.to_radians();
    let meters_per_degree = 111_320.0 * lat_rad.cos().max(0.1);
    meters / meters_per_degree
}

// =============================================================================
// Marker Placement
// =============================================================================

/// The point of a track where a mid-of-track marker is drawn.
///
/// Picks the point at index ceil(n / 2), clamped to the last index so that
/// one- and two-point sequences still resolve. Returns `None` for an empty
/// sequence.
pub fn track_midpoint(points: &[TrackPoint]) -> Option<&TrackPoint> {
    if points.is_empty() {
        return None;
    }
    let index = ((points.len() + 1) / 2).min(points.len() - 1);
    Some(&points[index])
}

/// Shift a coordinate north and east by metric offsets.
///
/// Used to nudge the terminal marker of a side track so it does not sit on
/// top of the main track's marker when both end at the same spot. Returns
/// the shifted `(latitude, longitude)` pair.
pub fn offset_point(latitude: f64, longitude: f64, north_m: f64, east_m: f64) -> (f64, f64) {
    // Degrees of latitude are nearly constant; longitude shrinks with cos(lat)
    let d_lat = north_m / 111_320.0;
    let d_lon = meters_to_degrees(east_m, latitude);
    (latitude + d_lat, longitude + d_lon)
}

// =============================================================================
// Bounding Box and Center
// =============================================================================

/// Bounding box of a point sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Get the center of the bounds as a `(latitude, longitude)` pair.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Compute the bounding box of a point sequence.
///
/// Returns `None` for empty input.
pub fn compute_bounds(points: &[TrackPoint]) -> Option<Bounds> {
    if points.is_empty() {
        return None;
    }

    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lon = f64::MAX;
    let mut max_lon = f64::MIN;

    for p in points {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lon = min_lon.min(p.longitude);
        max_lon = max_lon.max(p.longitude);
    }

    Some(Bounds {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    })
}

/// Compute the centroid of a point sequence as a `(latitude, longitude)` pair.
///
/// Arithmetic mean of all coordinates, suitable for centering a map view on
/// a track. Returns `None` for empty input. Tracks crossing the antimeridian
/// will average to an unexpected longitude.
pub fn compute_center(points: &[TrackPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let sum_lat: f64 = points.iter().map(|p| p.latitude).sum();
    let sum_lon: f64 = points.iter().map(|p| p.longitude).sum();
    let n = points.len() as f64;

    Some((sum_lat / n, sum_lon / n))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn point(latitude: f64, longitude: f64) -> TrackPoint {
        let time = Utc.with_ymd_and_hms(2024, 7, 14, 8, 30, 0).unwrap();
        TrackPoint::new(latitude, longitude, 0.0, time, 0.0)
    }

    #[test]
    fn test_distance_same_point() {
        let p = point(51.5074, -0.1278);
        assert_eq!(distance_m(&p, &p, DistanceFormula::Haversine), 0.0);
    }

    #[test]
    fn test_haversine_known_value() {
        // London to Paris is approximately 344 km
        let london = point(51.5074, -0.1278);
        let paris = point(48.8566, 2.3522);
        let dist = distance_m(&london, &paris, DistanceFormula::Haversine);
        assert!(approx_eq(dist, 343_560.0, 5000.0));
    }

    #[test]
    fn test_formulas_agree_within_ellipsoidal_error() {
        let london = point(51.5074, -0.1278);
        let paris = point(48.8566, 2.3522);
        let sphere = distance_m(&london, &paris, DistanceFormula::Haversine);
        let ellipsoid = distance_m(&london, &paris, DistanceFormula::Geodesic);
        assert!((sphere - ellipsoid).abs() / sphere < 0.01);
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length_m(&[], DistanceFormula::Haversine), 0.0);
        let single = [point(51.5074, -0.1278)];
        assert_eq!(polyline_length_m(&single, DistanceFormula::Haversine), 0.0);
    }

    #[test]
    fn test_polyline_length_two_points() {
        let track = [point(51.5074, -0.1278), point(51.5080, -0.1280)];
        let length = polyline_length_m(&track, DistanceFormula::Haversine);
        assert!(length > 0.0);
        assert!(length < 100.0); // about 68m
    }

    #[test]
    fn test_track_midpoint_empty() {
        assert!(track_midpoint(&[]).is_none());
    }

    #[test]
    fn test_track_midpoint_indices() {
        let single = [point(47.0, 11.0)];
        assert_eq!(track_midpoint(&single).unwrap().latitude, 47.0);

        // ceil(n / 2): index 1 of 2, index 3 of 5
        let two: Vec<TrackPoint> = (0..2).map(|i| point(47.0 + i as f64, 11.0)).collect();
        assert_eq!(track_midpoint(&two).unwrap().latitude, 48.0);

        let five: Vec<TrackPoint> = (0..5).map(|i| point(47.0 + i as f64, 11.0)).collect();
        assert_eq!(track_midpoint(&five).unwrap().latitude, 50.0);
    }

    #[test]
    fn test_offset_point_moves_metric_distance() {
        let origin = point(47.0, 11.0);

        let (north_lat, north_lon) = offset_point(47.0, 11.0, 50.0, 0.0);
        let north = point(north_lat, north_lon);
        let d_north = distance_m(&origin, &north, DistanceFormula::Haversine);
        assert!(approx_eq(d_north, 50.0, 1.0));

        let (east_lat, east_lon) = offset_point(47.0, 11.0, 0.0, 50.0);
        let east = point(east_lat, east_lon);
        let d_east = distance_m(&origin, &east, DistanceFormula::Haversine);
        assert!(approx_eq(d_east, 50.0, 2.0));
    }

    #[test]
    fn test_meters_to_degrees() {
        // At the equator, 111.32 km = 1 degree
        let deg = meters_to_degrees(111_320.0, 0.0);
        assert!(approx_eq(deg, 1.0, 0.01));

        // At higher latitude, the same distance spans more degrees
        assert!(meters_to_degrees(111_320.0, 45.0) > 1.0);
    }

    #[test]
    fn test_compute_bounds() {
        let track = [
            point(51.50, -0.13),
            point(51.51, -0.12),
            point(51.505, -0.125),
        ];
        let bounds = compute_bounds(&track).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lon, -0.13);
        assert_eq!(bounds.max_lon, -0.12);
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_compute_center() {
        let track = [point(51.50, -0.10), point(51.52, -0.12)];
        let (lat, lon) = compute_center(&track).unwrap();
        assert!(approx_eq(lat, 51.51, 0.001));
        assert!(approx_eq(lon, -0.11, 0.001));
        assert!(compute_center(&[]).is_none());
    }
}
