//! Sextant altitude corrections.
//!
//! A raw sextant reading is the angle between the visible sea horizon and the
//! chosen part of the body's disc. Four corrections turn it into the geocentric
//! elevation of the body's center:
//!
//! | term       | cause                                           | sign of effect |
//! |------------|-------------------------------------------------|----------------|
//! | dip        | the eye is above the sea, the horizon dips      | lowers         |
//! | refraction | the atmosphere lifts the image                  | lowers         |
//! | limb       | upper/lower edge of the Sun or Moon was shot    | ∓ 0.25°        |
//! | parallax   | the Moon is close, seen from the surface        | raises         |
//!
//! Every term is evaluated from the **raw** elevation; their sum is subtracted once.

use crate::{
    celestial::{Body, Limb},
    constants::{Degree, Meter, MOON_DISTANCE, PARALLAX_EARTH_RADIUS},
};

/// Elevation above which the high-altitude refraction formula is used, degrees.
const REFRACTION_REGIME_LIMIT: Degree = 15.0;

/// Semi-diameter used for Sun and Moon limb shots, degrees.
const SEMI_DIAMETER: Degree = 0.25;

/// The four correction terms of one sight, in degrees.
///
/// Each term is the amount **subtracted** from the raw elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElevationCorrections {
    pub dip: Degree,
    pub refraction: Degree,
    pub limb: Degree,
    pub parallax: Degree,
}

impl ElevationCorrections {
    /// Evaluate the corrections of a sight.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: observed body, selects the limb and parallax terms.
    /// * `limb`: which edge of the disc was brought to the horizon.
    /// * `elevation`: raw sextant elevation, degrees.
    /// * `height`: height of eye above sea level, meters.
    pub fn compute(body: Body, limb: Limb, elevation: Degree, height: Meter) -> Self {
        ElevationCorrections {
            dip: dip(height, elevation),
            refraction: refraction(elevation),
            limb: limb_correction(body, limb),
            parallax: parallax(body, elevation),
        }
    }

    pub fn total(&self) -> Degree {
        self.dip + self.refraction + self.limb + self.parallax
    }

    /// Corrected elevation of `elevation`.
    pub fn apply(&self, elevation: Degree) -> Degree {
        elevation - self.total()
    }
}

/// Dip of the sea horizon: `1.753′ · √h · cos(e)`.
pub fn dip(height: Meter, elevation: Degree) -> Degree {
    1.753 * height.sqrt() * elevation.to_radians().cos() / 60.0
}

/// Astronomical refraction.
///
/// Above 15° the two-term cotangent series, below it the rational low-altitude fit.
pub fn refraction(elevation: Degree) -> Degree {
    let minutes = if elevation >= REFRACTION_REGIME_LIMIT {
        let t = elevation.to_radians().tan();
        0.97127 / t - 0.00137 / t.powi(3)
    } else {
        let e = elevation;
        (34.122 + 4.197 * e + 0.00427 * e * e) / (1.0 + 0.505 * e + 0.0845 * e * e)
    };
    minutes / 60.0
}

pub fn limb_correction(body: Body, limb: Limb) -> Degree {
    if !body.has_limb() {
        return 0.0;
    }
    match limb {
        Limb::Upper => SEMI_DIAMETER,
        Limb::Lower => -SEMI_DIAMETER,
        Limb::Center => 0.0,
    }
}

/// Lunar horizontal parallax scaled by `cos(e)`; zero for every other body.
pub fn parallax(body: Body, elevation: Degree) -> Degree {
    match body {
        Body::Moon => {
            -(PARALLAX_EARTH_RADIUS / MOON_DISTANCE).asin().to_degrees()
                * elevation.to_radians().cos()
        }
        _ => 0.0,
    }
}
