//! # Great-circle navigation on a spherical Earth
//!
//! Direct and inverse problems on the sphere, in the units a navigator uses:
//! positions in degrees, bearings in degrees clockwise from true north and
//! distances in arc-minutes (one arc-minute of great circle is one nautical mile).
//!
//! * [`destination`] – point reached from a start point along an initial bearing.
//! * [`bearing_distance`] – initial bearing and distance from one point to another.
//!
//! The sphere approximation is adequate here: the uncertainty regions drawn by
//! [`Sight`](crate::sight::Sight) are several arc-minutes wide, far larger than
//! the ellipsoidal error of the spherical formulas.

use crate::constants::{
    normalize_degrees, wrap_signed_degrees, ArcMinute, Degree, GeoPoint, ARCMIN_PER_DEGREE,
};

/// Point reached by travelling `distance` arc-minutes from `start` along the
/// initial true bearing `bearing`.
///
/// Arguments
/// -----------------
/// * `start`: departure point.
/// * `bearing`: initial course in degrees, clockwise from true north (any range).
/// * `distance`: great-circle distance in arc-minutes.
///
/// Return
/// ----------
/// * The arrival point, longitude wrapped into `[-180, 180]`.
pub fn destination(start: GeoPoint, bearing: Degree, distance: ArcMinute) -> GeoPoint {
    let lat1 = start.lat.to_radians();
    let lon1 = start.lon.to_radians();
    let brg = bearing.to_radians();
    let delta = (distance / ARCMIN_PER_DEGREE).to_radians();

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();

    let sin_lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * brg.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1 + (brg.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * sin_lat2);

    GeoPoint::new(lat2.to_degrees(), wrap_signed_degrees(lon2.to_degrees()))
}

/// Initial true bearing and great-circle distance from `from` to `to`.
///
/// Arguments
/// -----------------
/// * `from`: departure point.
/// * `to`: arrival point.
///
/// Return
/// ----------
/// * `(bearing, distance)`: bearing in `[0, 360)` degrees, distance in arc-minutes.
///   Coincident points give a zero bearing and a zero distance.
pub fn bearing_distance(from: GeoPoint, to: GeoPoint) -> (Degree, ArcMinute) {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_lat2, cos_lat2) = lat2.sin_cos();

    // haversine form, well conditioned for short legs
    let hav = ((lat2 - lat1) / 2.0).sin().powi(2)
        + cos_lat1 * cos_lat2 * (dlon / 2.0).sin().powi(2);
    let delta = 2.0 * hav.sqrt().clamp(0.0, 1.0).asin();

    let y = dlon.sin() * cos_lat2;
    let x = cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * dlon.cos();
    let bearing = if y == 0.0 && x == 0.0 {
        0.0
    } else {
        normalize_degrees(y.atan2(x).to_degrees())
    };

    (bearing, delta.to_degrees() * ARCMIN_PER_DEGREE)
}

/// Great-circle distance between two points, in arc-minutes.
pub fn distance(from: GeoPoint, to: GeoPoint) -> ArcMinute {
    bearing_distance(from, to).1
}
