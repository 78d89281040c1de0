//! # Sight reduction
//!
//! A [`Sight`] is one celestial observation together with the area of position it
//! implies. It is solved once, inside [`Sight::new`]:
//!
//! 1. The input is validated ([`SightInput::validate`]).
//! 2. The raw elevation is corrected for dip, refraction, limb and parallax
//!    ([`corrections`]).
//! 3. Each uncertain quantity is turned into a sampling grid ([`ScanRange`]):
//!
//! | axis      | center                | unmeasured domain | coarsest step |
//! |-----------|-----------------------|-------------------|---------------|
//! | azimuth   | azimuth in `[0, 360)` | `±180°`           | 1°            |
//! | elevation | corrected elevation   | `(0°, 90°]`       | 1°            |
//! | time      | sight instant         | n/a               | 60 s          |
//!
//! 4. The body's sub-point is evaluated at each time sample.
//! 5. Without a bearing the elevation circles are swept
//!    ([`line_of_position::elevation_locus`]); with one, the bearing search is run
//!    over the grid ([`line_of_position::bearing_locus`]).
//!
//! The result is a set of convex polygons. Only the visibility flag changes after
//! construction.

pub mod corrections;
pub mod line_of_position;

use hifitime::Epoch;
use tracing::debug;

use crate::{
    celestial::{Body, Limb},
    constants::{normalize_degrees, Degree, GeoPoint, Meter, Polygon, Second},
    nav_errors::NavError,
    navigator::Navigator,
    render::Colour,
    scan::ScanRange,
    time::offset_epoch,
};

use self::{
    corrections::ElevationCorrections,
    line_of_position::{bearing_locus, elevation_locus, BearingSearch, MagneticCorrection},
};

/// The measurements of one sight.
///
/// Build it with [`SightInput::new`] and the `with_*` methods; unset quantities are
/// unmeasured, certainties default to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SightInput {
    pub body: Body,
    pub limb: Limb,
    pub epoch: Epoch,
    /// Half-width of the time uncertainty, seconds.
    pub time_certainty: Second,
    /// Raw sextant elevation, degrees.
    pub elevation: Option<Degree>,
    pub elevation_certainty: Degree,
    /// Bearing of the body, degrees.
    pub azimuth: Option<Degree>,
    pub azimuth_certainty: Degree,
    /// The azimuth was read on a magnetic compass.
    pub magnetic: bool,
    /// Height of eye above sea level, meters.
    pub height: Meter,
    pub colour: Colour,
}

impl SightInput {
    pub fn new(body: Body, epoch: Epoch) -> Self {
        SightInput {
            body,
            limb: Limb::Center,
            epoch,
            time_certainty: 0.0,
            elevation: None,
            elevation_certainty: 0.0,
            azimuth: None,
            azimuth_certainty: 0.0,
            magnetic: false,
            height: 0.0,
            colour: Colour::default(),
        }
    }

    pub fn with_elevation(mut self, elevation: Degree, certainty: Degree) -> Self {
        self.elevation = Some(elevation);
        self.elevation_certainty = certainty;
        self
    }

    /// Set the measured bearing; `magnetic` when read on a compass rather than true.
    pub fn with_azimuth(mut self, azimuth: Degree, certainty: Degree, magnetic: bool) -> Self {
        self.azimuth = Some(azimuth);
        self.azimuth_certainty = certainty;
        self.magnetic = magnetic;
        self
    }

    pub fn with_limb(mut self, limb: Limb) -> Self {
        self.limb = limb;
        self
    }

    pub fn with_height(mut self, height: Meter) -> Self {
        self.height = height;
        self
    }

    pub fn with_time_certainty(mut self, certainty: Second) -> Self {
        self.time_certainty = certainty;
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    /// Check that the sight can be solved.
    ///
    /// Errors
    /// ----------
    /// [`NavError::InvalidObservation`] when neither elevation nor azimuth is measured,
    /// when a measured value is not finite, when the elevation lies beyond ±90°, or when a certainty or the height is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.elevation.is_none() && self.azimuth.is_none() {
            return Err(NavError::InvalidObservation(
                "neither elevation nor azimuth measured".into(),
            ));
        }

        let measured = [("elevation", self.elevation), ("azimuth", self.azimuth)];
        for (name, value) in measured {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(NavError::InvalidObservation(format!("{name} is {v}")));
            }
        }
        if let Some(e) = self.elevation.filter(|e| e.abs() > 90.0) {
            return Err(NavError::InvalidObservation(format!(
                "elevation {e} is outside [-90, 90]"
            )));
        }

        let magnitudes = [
            ("time certainty", self.time_certainty),
            ("elevation certainty", self.elevation_certainty),
            ("azimuth certainty", self.azimuth_certainty),
            ("height", self.height),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(NavError::InvalidObservation(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A solved sight: its measurements, corrected elevation and area of position.
#[derive(Debug, Clone, PartialEq)]
pub struct Sight {
    input: SightInput,
    corrections: Option<ElevationCorrections>,
    corrected_elevation: Option<Degree>,
    visible: bool,
    polygons: Vec<Polygon>,
}

impl Sight {
    /// Validate, correct and solve a sight.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: the measurements.
    /// * `navigator`: oracle, geomagnetic model and scan settings.
    ///
    /// Return
    /// ----------
    /// * The solved sight. It may hold no polygon when every slice was degenerate.
    ///
    /// Errors
    /// ----------
    /// * [`NavError::InvalidObservation`] for an unsolvable input,
    /// * any oracle error, e.g. [`NavError::EphemerisUnavailable`],
    /// * geomagnetic model errors for magnetic bearings,
    /// * [`NavError::NonConvergent`] when the bearing search hits its iteration bound.
    pub fn new(mut input: SightInput, navigator: &Navigator) -> Result<Self, NavError> {
        input.validate()?;
        input.azimuth = input.azimuth.map(normalize_degrees);

        let corrections = input
            .elevation
            .map(|e| ElevationCorrections::compute(input.body, input.limb, e, input.height));
        let corrected_elevation = input
            .elevation
            .zip(corrections)
            .map(|(e, c)| c.apply(e));

        let polygons = Self::solve(&input, corrected_elevation, navigator)?;
        debug!(
            "{} sight at {}: corrected elevation {:?}, {} polygons",
            input.body,
            input.epoch,
            corrected_elevation,
            polygons.len()
        );

        Ok(Sight {
            input,
            corrections,
            corrected_elevation,
            visible: true,
            polygons,
        })
    }

    fn solve(
        input: &SightInput,
        corrected_elevation: Option<Degree>,
        navigator: &Navigator,
    ) -> Result<Vec<Polygon>, NavError> {
        let config = navigator.scan_config();

        let azimuth = ScanRange::project(
            input.azimuth,
            input.azimuth_certainty,
            config.azimuth_domain,
            config.azimuth_step,
        );
        let mut elevation = ScanRange::project(
            corrected_elevation,
            input.elevation_certainty,
            config.elevation_domain,
            config.elevation_step,
        );
        if corrected_elevation.is_none() {
            // below the horizon is meaningless for an unmeasured elevation
            elevation.min = elevation.step;
        }
        let time = ScanRange::project(
            Some(0.0),
            input.time_certainty,
            config.time_domain,
            config.time_step,
        );

        let sub_points = time
            .ascending()
            .map(|dt| navigator.sub_point(input.body, &offset_epoch(&input.epoch, dt)))
            .collect::<Result<Vec<GeoPoint>, NavError>>()?;
        if let Some(p) = sub_points
            .iter()
            .find(|p| !p.lat.is_finite() || !p.lon.is_finite())
        {
            return Err(NavError::EphemerisUnavailable(format!(
                "{} has no finite sub-point ({}, {})",
                input.body, p.lat, p.lon
            )));
        }

        if input.azimuth.is_none() {
            return Ok(elevation_locus(&sub_points, &elevation, azimuth.step));
        }

        let mut search = BearingSearch::new(config, input.azimuth_certainty);
        if input.magnetic {
            search = search.with_magnetic(MagneticCorrection {
                model: navigator.geomagnetic_model()?,
                height: input.height,
                epoch: input.epoch,
            });
        }
        bearing_locus(&search, &sub_points, &elevation, &azimuth)
    }

    pub fn input(&self) -> &SightInput {
        &self.input
    }

    pub fn body(&self) -> Body {
        self.input.body
    }

    pub fn epoch(&self) -> Epoch {
        self.input.epoch
    }

    /// Azimuth normalized into `[0, 360)`.
    pub fn azimuth(&self) -> Option<Degree> {
        self.input.azimuth
    }

    pub fn colour(&self) -> Colour {
        self.input.colour
    }

    /// Elevation after dip, refraction, limb and parallax; `None` when unmeasured.
    pub fn corrected_elevation(&self) -> Option<Degree> {
        self.corrected_elevation
    }

    pub fn corrections(&self) -> Option<&ElevationCorrections> {
        self.corrections.as_ref()
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
