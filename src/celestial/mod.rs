//! # Celestial bodies and their geographic positions
//!
//! A sight is taken on one [`Body`]: the Sun, the Moon, one of the five navigational
//! planets or one of the 57 navigational stars (or Polaris) of [`catalog`]. Body names are
//! resolved once, when the observation is entered, so an unknown name is rejected
//! with [`NavError::UnknownBody`] before any solving starts.
//!
//! The solver only needs the **sub-point** of the body: the place on Earth where
//! the body stands at the zenith at a given instant. It obtains it from a
//! [`CelestialOracle`]. The crate ships [`Almanac`](crate::celestial::almanac::Almanac),
//! a low-precision oracle for the Sun and the stars; a host with a full ephemeris
//! implements the trait for the Moon and planets.
//!
//! ```text
//! (body, instant) --oracle--> (RA, Dec) --GMST--> sub-point (lat = Dec, lon = RA − GMST)
//! ```

pub mod almanac;
pub mod catalog;

use std::str::FromStr;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    constants::{wrap_signed_degrees, Degree, GeoPoint},
    nav_errors::NavError,
    time::{gmst, mjd_utc},
};

use self::catalog::StarId;

/// A body a sight can be taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Star(StarId),
}

impl Body {
    /// Sun and Moon show a disc, so the observer may bring either limb to the horizon.
    pub fn has_limb(&self) -> bool {
        matches!(self, Body::Sun | Body::Moon)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Star(id) => id.name(),
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Body {
    type Err = NavError;

    /// Resolve a body name, case-insensitively.
    ///
    /// Sun, Moon and planets are matched first, then the star catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let body = match name.to_ascii_lowercase().as_str() {
            "sun" => Body::Sun,
            "moon" => Body::Moon,
            "mercury" => Body::Mercury,
            "venus" => Body::Venus,
            "mars" => Body::Mars,
            "jupiter" => Body::Jupiter,
            "saturn" => Body::Saturn,
            _ => match StarId::from_name(name) {
                Some(id) => Body::Star(id),
                None => {
                    warn!("Unknown celestial body: {name}");
                    return Err(NavError::UnknownBody(name.to_string()));
                }
            },
        };
        Ok(body)
    }
}

impl TryFrom<&str> for Body {
    type Error = NavError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which part of the body's disc was brought to the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Limb {
    Upper,
    Lower,
    #[default]
    Center,
}

/// Provider of the geographic position of a body at an instant.
///
/// Implementors map `(body, epoch)` to the body's sub-point. Bodies outside the
/// provider's coverage are reported with [`NavError::EphemerisUnavailable`].
///
/// Any `Fn(Body, &Epoch) -> Result<GeoPoint, NavError>` closure is an oracle.
pub trait CelestialOracle {
    fn sub_point(&self, body: Body, epoch: &Epoch) -> Result<GeoPoint, NavError>;
}

impl<F> CelestialOracle for F
where
    F: Fn(Body, &Epoch) -> Result<GeoPoint, NavError>,
{
    fn sub_point(&self, body: Body, epoch: &Epoch) -> Result<GeoPoint, NavError> {
        self(body, epoch)
    }
}

/// Sub-point of a body from its equatorial coordinates of date.
///
/// Arguments
/// -----------------
/// * `ra`: right ascension, degrees, referred to the mean equinox of date.
/// * `dec`: declination, degrees.
/// * `epoch`: instant of the observation.
///
/// Return
/// ----------
/// * The sub-point: latitude equals the declination, longitude is the right ascension
///   minus the Greenwich sidereal time (east positive), wrapped into `[-180, 180]`.
pub fn sub_point_from_equatorial(ra: Degree, dec: Degree, epoch: &Epoch) -> GeoPoint {
    let gst = gmst(mjd_utc(epoch)).to_degrees();
    GeoPoint::new(dec, wrap_signed_degrees(ra - gst))
}
