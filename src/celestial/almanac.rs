//! # Low-precision almanac
//!
//! A self-contained [`CelestialOracle`] for the bodies whose positions follow from
//! short closed-form expressions:
//!
//! - **Sun**: the low-precision formulae of the *Astronomical Almanac* (mean
//!   longitude, mean anomaly, equation of center), accurate to about 0.01° in
//!   declination and a few seconds of time in hour angle between 1950 and 2050.
//! - **Stars**: J2000.0 mean catalog positions of the 57 navigational stars and Polaris,
//!   precessed to the mean equinox of date (IAU 1976 angles).
//!
//! The Moon and the planets need full theories (ELP2000, VSOP87) and are reported
//! as [`NavError::EphemerisUnavailable`]; hosts provide them through their own
//! oracle.
//!
//! Nutation and aberration (up to ~20″) are neglected, which is far below the
//! certainty of a sextant or compass sight.

use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};

use crate::{
    celestial::{catalog::CatalogStar, sub_point_from_equatorial, Body, CelestialOracle},
    constants::{normalize_degrees, Degree, GeoPoint, Radian, RADEG, RADSEC, T2000},
    nav_errors::NavError,
    time::mjd_tt,
};

/// Equatorial coordinates referred to the mean equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    /// Right ascension, degrees in `[0, 360)`.
    pub ra: Degree,
    /// Declination, degrees.
    pub dec: Degree,
}

impl Equatorial {
    fn from_unit_vector(v: &Vector3<f64>) -> Self {
        Equatorial {
            ra: normalize_degrees(v.y.atan2(v.x).to_degrees()),
            dec: v.z.clamp(-1.0, 1.0).asin().to_degrees(),
        }
    }
}

/// Built-in oracle for the Sun and the navigational stars.
#[derive(Debug, Clone, Copy, Default)]
pub struct Almanac;

impl Almanac {
    pub fn new() -> Self {
        Almanac
    }

    /// Apparent equatorial coordinates of `body` at `epoch`.
    ///
    /// Return
    /// ----------
    /// * Right ascension and declination of date, or
    ///   [`NavError::EphemerisUnavailable`] for the Moon and the planets.
    pub fn equatorial(&self, body: Body, epoch: &Epoch) -> Result<Equatorial, NavError> {
        let tjm = mjd_tt(epoch);
        match body {
            Body::Sun => Ok(sun_position(tjm)),
            Body::Star(id) => Ok(star_position(id.star(), tjm)),
            other => Err(NavError::EphemerisUnavailable(other.to_string())),
        }
    }
}

impl CelestialOracle for Almanac {
    fn sub_point(&self, body: Body, epoch: &Epoch) -> Result<GeoPoint, NavError> {
        let eq = self.equatorial(body, epoch)?;
        Ok(sub_point_from_equatorial(eq.ra, eq.dec, epoch))
    }
}

/// Mean obliquity of the ecliptic (IAU 1976), radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date, TT scale.
pub fn mean_obliquity(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Low-precision position of the Sun.
fn sun_position(tjm: f64) -> Equatorial {
    let n = tjm - T2000;

    let mean_longitude = normalize_degrees(280.460 + 0.9856474 * n);
    let mean_anomaly = normalize_degrees(357.528 + 0.9856003 * n) * RADEG;
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
        * RADEG;

    let ecliptic = Vector3::new(ecliptic_longitude.cos(), ecliptic_longitude.sin(), 0.0);
    let to_equator = Rotation3::from_axis_angle(&Vector3::x_axis(), mean_obliquity(tjm));

    Equatorial::from_unit_vector(&(to_equator * ecliptic))
}

/// Precession matrix from the mean equator and equinox of J2000 to those of date.
fn precession(tjm: f64) -> Rotation3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    Rotation3::from_axis_angle(&Vector3::z_axis(), z)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), -theta)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), zeta)
}

fn star_position(star: &CatalogStar, tjm: f64) -> Equatorial {
    let (sin_ra, cos_ra) = star.ra.sin_cos();
    let (sin_dec, cos_dec) = star.dec.sin_cos();
    let j2000 = Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec);

    Equatorial::from_unit_vector(&(precession(tjm) * j2000))
}
