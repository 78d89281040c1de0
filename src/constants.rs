//! # Constants and type definitions for sightline
//!
//! This module centralizes the **physical constants**, **conversion factors** and
//! **common type aliases** shared by the sight-reduction pipeline.
//!
//! ## Overview
//!
//! - Geodetic and lunar constants used by the elevation corrections
//! - Unit conversions (degrees ↔ radians, degrees ↔ arc-minutes)
//! - Core type aliases (angles, distances, geographic points and polygons)

use serde::{Deserialize, Serialize};

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Arc-minutes in one degree. One arc-minute of great circle is one nautical mile.
pub const ARCMIN_PER_DEGREE: f64 = 60.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Earth radius used by the lunar parallax correction, in kilometers
pub const PARALLAX_EARTH_RADIUS: Kilometer = 6357.0;

/// Mean Earth–Moon distance, in kilometers
pub const MOON_DISTANCE: Kilometer = 384_400.0;

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_MAJOR_AXIS: Kilometer = 6378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_MINOR_AXIS: Kilometer = 6356.7523142;

/// Reference radius of the geomagnetic spherical harmonic expansion, in kilometers
pub const GEOMAG_REFERENCE_RADIUS: Kilometer = 6371.2;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arc-minutes (equivalently, great-circle distance in nautical miles)
pub type ArcMinute = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Duration in seconds
pub type Second = f64;

/// A closed polygon of geographic vertices, in drawing order.
pub type Polygon = Vec<GeoPoint>;

// -------------------------------------------------------------------------------------------------
// Geographic point
// -------------------------------------------------------------------------------------------------

/// A point on the Earth's surface.
///
/// `lat` is the geodetic latitude in degrees (north positive) and `lon` the
/// longitude in degrees (east positive). Longitudes are not normalized: points
/// produced by the great-circle routines lie in (-180, 180], points handed to
/// the renderer may be shifted by multiples of 360.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: Degree,
    pub lon: Degree,
}

impl GeoPoint {
    pub fn new(lat: Degree, lon: Degree) -> Self {
        GeoPoint { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if self.lon < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{ns} {:.4}°{ew}",
            self.lat.abs(),
            self.lon.abs()
        )
    }
}

/// Wrap an angle into the half-open interval `[0, 360)`.
pub fn normalize_degrees(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid may round a tiny negative input up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into the interval `[-180, 180]`.
pub fn wrap_signed_degrees(angle: Degree) -> Degree {
    if (-180.0..=180.0).contains(&angle) {
        return angle;
    }
    let a = normalize_degrees(angle);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);

        for a in [-1080.5, -359.9, -0.1, 0.0, 12.3, 359.999, 360.0, 1e6] {
            let n = normalize_degrees(a);
            assert!((0.0..360.0).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn test_wrap_signed_degrees() {
        assert_eq!(wrap_signed_degrees(190.0), -170.0);
        assert_eq!(wrap_signed_degrees(-190.0), 170.0);
        assert_eq!(wrap_signed_degrees(180.0), 180.0);
        assert_eq!(wrap_signed_degrees(540.0), 180.0);
        assert_eq!(wrap_signed_degrees(-180.0), -180.0);
        assert_eq!(wrap_signed_degrees(3.6e6 + 10.0), 10.0);
        assert!(wrap_signed_degrees(1e300).abs() <= 180.0);
        assert!(wrap_signed_degrees(f64::INFINITY).is_nan());
    }

    #[test]
    fn test_geo_point_display() {
        let p = GeoPoint::new(-33.5, 151.25);
        assert_eq!(p.to_string(), "33.5000°S 151.2500°E");
    }
}
