//! # Geomagnetic declination
//!
//! A compass bearing is measured from magnetic north. Before it can be compared
//! with a true bearing, the local **magnetic declination** (angle from true north to
//! magnetic north, east positive) is subtracted. The solver asks for it through the
//! [`MagneticDeclination`] trait.
//!
//! [`GeomagneticModel`] implements the trait from a spherical-harmonic main-field
//! model stored in the `.COF` text format of the IGRF distribution (`IGRF11.COF`).
//! A file holds one block per model epoch:
//!
//! ```text
//!    IGRF11  2010.00 13  8  0 2010.00 2015.00   -1.0  600.0           IGRF11   0
//!      1  0  -29496.5       0.0     11.4       0.0                    IGRF11   1
//!      1  1   -1585.9    4945.1     16.7     -28.8                    IGRF11   2
//!      ...
//! ```
//!
//! Header: model name, epoch, main-field degree, secular-variation degree, (unused),
//! first and last valid year, altitude bounds. Coefficient lines: `n m g h [ġ ḣ]`
//! in nT and nT/year.
//!
//! ## Evaluation
//!
//! 1. The block covering the date is selected. A block carrying secular variation is
//!    extrapolated linearly from its epoch; a block without it is interpolated
//!    linearly towards the next block.
//! 2. The geodetic position (WGS84) is converted to geocentric radius and colatitude.
//! 3. The field is summed with Schmidt semi-normalized associated Legendre functions
//!    and rotated back to the geodetic north/east/down frame.
//! 4. Declination is `atan2(east, north)`.
//!
//! Loading is done once per [`Navigator`](crate::navigator::Navigator), on the first
//! magnetic sight or explicitly at startup.

use camino::Utf8Path;
use hifitime::Epoch;
use nalgebra::DMatrix;
use tracing::info;

use crate::{
    constants::{
        Degree, GeoPoint, Kilometer, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS,
        GEOMAG_REFERENCE_RADIUS,
    },
    nav_errors::NavError,
    time::decimal_year,
};

/// Highest spherical-harmonic degree accepted in a model header (IGRF and WMM stop at 13).
pub const MAX_MODEL_DEGREE: usize = 13;

/// Provider of magnetic declination.
pub trait MagneticDeclination {
    /// Magnetic declination at `position`, `height` meters above sea level, at `epoch`.
    ///
    /// Return
    /// ----------
    /// * Declination in degrees, east positive.
    fn declination(&self, position: GeoPoint, height: Meter, epoch: &Epoch)
        -> Result<Degree, NavError>;
}

/// Main-field vector in the local geodetic frame, nT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldComponents {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}

impl FieldComponents {
    pub fn declination(&self) -> Degree {
        self.east.atan2(self.north).to_degrees()
    }

    pub fn inclination(&self) -> Degree {
        self.down.atan2(self.north.hypot(self.east)).to_degrees()
    }
}

/// One model block of a `.COF` file.
#[derive(Debug, Clone)]
struct CoefficientSet {
    name: String,
    epoch: f64,
    max_degree: usize,
    sv_degree: usize,
    year_min: f64,
    year_max: f64,
    g: DMatrix<f64>,
    h: DMatrix<f64>,
    g_dot: DMatrix<f64>,
    h_dot: DMatrix<f64>,
}

impl CoefficientSet {
    fn from_header(fields: &[&str], line_no: usize) -> Result<Self, NavError> {
        if fields.len() < 7 {
            return Err(NavError::InvalidGeomagneticModel(format!(
                "line {line_no}: header needs at least 7 fields"
            )));
        }
        let num = |i: usize| -> Result<f64, NavError> {
            fields[i].parse::<f64>().map_err(|_| {
                NavError::InvalidGeomagneticModel(format!(
                    "line {line_no}: invalid header field '{}'",
                    fields[i]
                ))
            })
        };

        let degree = |i: usize| -> Result<usize, NavError> {
            match fields[i].parse::<usize>() {
                Ok(n) if n <= MAX_MODEL_DEGREE => Ok(n),
                _ => Err(NavError::InvalidGeomagneticModel(format!(
                    "line {line_no}: degree '{}' is not an integer in 0..={MAX_MODEL_DEGREE}",
                    fields[i]
                ))),
            }
        };

        let max_degree = degree(2)?;
        let sv_degree = degree(3)?;
        let size = max_degree.max(sv_degree) + 1;

        Ok(CoefficientSet {
            name: fields[0].to_string(),
            epoch: num(1)?,
            max_degree,
            sv_degree,
            year_min: num(5)?,
            year_max: num(6)?,
            g: DMatrix::zeros(size, size),
            h: DMatrix::zeros(size, size),
            g_dot: DMatrix::zeros(size, size),
            h_dot: DMatrix::zeros(size, size),
        })
    }

    fn push_coefficient(&mut self, fields: &[&str], line_no: usize) -> Result<(), NavError> {
        let invalid = |what: &str| {
            NavError::InvalidGeomagneticModel(format!("line {line_no}: {what}"))
        };
        if fields.len() < 4 {
            return Err(invalid("coefficient line needs at least 4 fields"));
        }
        let n: usize = fields[0].parse().map_err(|_| invalid("invalid degree"))?;
        let m: usize = fields[1].parse().map_err(|_| invalid("invalid order"))?;
        if m > n || n == 0 || n >= self.g.nrows() {
            return Err(invalid(&format!("degree/order ({n}, {m}) out of range")));
        }
        // trailing model name and line counter are not numeric
        let values: Vec<f64> = fields[2..]
            .iter()
            .map_while(|s| s.parse::<f64>().ok())
            .collect();
        if values.len() < 2 {
            return Err(invalid("missing g/h coefficients"));
        }
        let value = |i: usize| values.get(i).copied().unwrap_or(0.0);
        self.g[(n, m)] = value(0);
        self.h[(n, m)] = value(1);
        self.g_dot[(n, m)] = value(2);
        self.h_dot[(n, m)] = value(3);
        Ok(())
    }
}

/// Spherical-harmonic geomagnetic main-field model.
#[derive(Debug, Clone)]
pub struct GeomagneticModel {
    sets: Vec<CoefficientSet>,
}

impl GeomagneticModel {
    /// Load a `.COF` coefficient file.
    ///
    /// Errors
    /// ----------
    /// * [`NavError::GeomagneticModelNotFound`] when the file does not exist,
    /// * [`NavError::IoError`] when it cannot be read,
    /// * [`NavError::InvalidGeomagneticModel`] when it cannot be parsed.
    pub fn from_file(path: &Utf8Path) -> Result<Self, NavError> {
        if !path.is_file() {
            return Err(NavError::GeomagneticModelNotFound(path.to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let model = Self::parse(&text)?;
        info!(
            "Loaded geomagnetic model {} ({} epochs)",
            path,
            model.sets.len()
        );
        Ok(model)
    }

    /// Parse the text of a `.COF` coefficient file.
    pub fn parse(text: &str) -> Result<Self, NavError> {
        let mut sets: Vec<CoefficientSet> = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some(first) = fields.first() else {
                continue;
            };

            if first.parse::<usize>().is_ok() {
                let current = sets.last_mut().ok_or_else(|| {
                    NavError::InvalidGeomagneticModel(format!(
                        "line {line_no}: coefficient before any model header"
                    ))
                })?;
                current.push_coefficient(&fields, line_no)?;
            } else {
                sets.push(CoefficientSet::from_header(&fields, line_no)?);
            }
        }

        if sets.is_empty() {
            return Err(NavError::InvalidGeomagneticModel(
                "no model header found".into(),
            ));
        }
        Ok(GeomagneticModel { sets })
    }

    /// Names of the model blocks, in file order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.name.as_str())
    }

    /// Gauss coefficients `(degree, g, h)` valid at `year`.
    fn coefficients_at(
        &self,
        year: f64,
    ) -> Result<(usize, DMatrix<f64>, DMatrix<f64>), NavError> {
        let last = self.sets.len() - 1;
        let index = self
            .sets
            .iter()
            .position(|s| year >= s.year_min && year < s.year_max)
            .or_else(|| {
                let s = &self.sets[last];
                (year >= s.year_min && year <= s.year_max).then_some(last)
            })
            .ok_or(NavError::GeomagneticDateOutOfRange(year))?;

        let set = &self.sets[index];
        if set.sv_degree > 0 || index == last {
            let dt = year - set.epoch;
            let g = &set.g + &set.g_dot * dt;
            let h = &set.h + &set.h_dot * dt;
            return Ok((set.max_degree, g, h));
        }

        let next = &self.sets[index + 1];
        let frac = (year - set.epoch) / (next.epoch - set.epoch);
        let degree = set.max_degree.max(next.max_degree);
        let size = degree + 1;
        let mut g = DMatrix::zeros(size, size);
        let mut h = DMatrix::zeros(size, size);
        for n in 1..=degree {
            for m in 0..=n {
                let at = |c: &DMatrix<f64>| -> f64 {
                    if n < c.nrows() {
                        c[(n, m)]
                    } else {
                        0.0
                    }
                };
                g[(n, m)] = at(&set.g) + (at(&next.g) - at(&set.g)) * frac;
                h[(n, m)] = at(&set.h) + (at(&next.h) - at(&set.h)) * frac;
            }
        }
        Ok((degree, g, h))
    }

    /// Main-field vector at a geodetic position.
    ///
    /// Arguments
    /// -----------------
    /// * `position`: geodetic latitude and longitude, degrees.
    /// * `altitude`: height above the WGS84 ellipsoid, kilometers.
    /// * `year`: decimal year.
    pub fn field(
        &self,
        position: GeoPoint,
        altitude: Kilometer,
        year: f64,
    ) -> Result<FieldComponents, NavError> {
        let (degree, g, h) = self.coefficients_at(year)?;

        // geodetic → geocentric (radius, colatitude) and the rotation angle between them
        let a2 = EARTH_MAJOR_AXIS * EARTH_MAJOR_AXIS;
        let b2 = EARTH_MINOR_AXIS * EARTH_MINOR_AXIS;
        let c2 = a2 - b2;
        let a4 = a2 * a2;
        let b4 = b2 * b2;
        let c4 = a4 - b4;

        let (sin_lat, cos_lat) = position.lat.to_radians().sin_cos();
        let sin_lat2 = sin_lat * sin_lat;
        let cos_lat2 = cos_lat * cos_lat;

        let q = (a2 - c2 * sin_lat2).sqrt();
        let q1 = altitude * q;
        let q2 = ((q1 + a2) / (q1 + b2)).powi(2);
        let cos_theta = sin_lat / (q2 * cos_lat2 + sin_lat2).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let r = (altitude * altitude + 2.0 * q1 + (a4 - c4 * sin_lat2) / (q * q)).sqrt();
        let d = (a2 * cos_lat2 + b2 * sin_lat2).sqrt();
        let cos_rot = (altitude + d) / r;
        let sin_rot = c2 * cos_lat * sin_lat / (r * d);

        let (p, dp) = schmidt_legendre(degree, cos_theta, sin_theta);

        let lon = position.lon.to_radians();
        let ratio = GEOMAG_REFERENCE_RADIUS / r;
        let mut b_r = 0.0;
        let mut b_theta = 0.0;
        let mut b_phi = 0.0;
        let mut scale = ratio * ratio;
        for n in 1..=degree {
            scale *= ratio;
            for m in 0..=n {
                let (sin_m, cos_m) = (m as f64 * lon).sin_cos();
                let gh = g[(n, m)] * cos_m + h[(n, m)] * sin_m;
                b_r += scale * (n as f64 + 1.0) * gh * p[(n, m)];
                b_theta -= scale * gh * dp[(n, m)];
                b_phi += scale * m as f64 * (g[(n, m)] * sin_m - h[(n, m)] * cos_m) * p[(n, m)];
            }
        }
        let b_phi = b_phi / sin_theta.max(1e-10);

        // geocentric north/down rotated into the geodetic frame
        let north = -b_theta;
        let down = -b_r;
        Ok(FieldComponents {
            north: north * cos_rot + down * sin_rot,
            east: b_phi,
            down: down * cos_rot - north * sin_rot,
        })
    }
}

impl MagneticDeclination for GeomagneticModel {
    fn declination(
        &self,
        position: GeoPoint,
        height: Meter,
        epoch: &Epoch,
    ) -> Result<Degree, NavError> {
        let field = self.field(position, height / 1000.0, decimal_year(epoch))?;
        Ok(field.declination())
    }
}

/// Schmidt semi-normalized associated Legendre functions `P(n, m)(cos θ)` and their
/// θ-derivatives, for `n ≤ degree`.
fn schmidt_legendre(
    degree: usize,
    cos_theta: f64,
    sin_theta: f64,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let size = degree + 1;
    let mut p = DMatrix::zeros(size, size);
    let mut dp = DMatrix::zeros(size, size);
    p[(0, 0)] = 1.0;

    for n in 1..=degree {
        let nf = n as f64;
        // sectoral term
        if n == 1 {
            p[(1, 1)] = sin_theta;
            dp[(1, 1)] = cos_theta;
        } else {
            let k = ((2.0 * nf - 1.0) / (2.0 * nf)).sqrt();
            p[(n, n)] = k * sin_theta * p[(n - 1, n - 1)];
            dp[(n, n)] = k * (sin_theta * dp[(n - 1, n - 1)] + cos_theta * p[(n - 1, n - 1)]);
        }

        for m in 0..n {
            let mf = m as f64;
            let denom = (nf * nf - mf * mf).sqrt();
            let k = ((nf - 1.0) * (nf - 1.0) - mf * mf).max(0.0).sqrt();
            let (p2, dp2) = if n >= 2 && m <= n - 2 {
                (p[(n - 2, m)], dp[(n - 2, m)])
            } else {
                (0.0, 0.0)
            };
            p[(n, m)] = ((2.0 * nf - 1.0) * cos_theta * p[(n - 1, m)] - k * p2) / denom;
            dp[(n, m)] = ((2.0 * nf - 1.0)
                * (cos_theta * dp[(n - 1, m)] - sin_theta * p[(n - 1, m)])
                - k * dp2)
                / denom;
        }
    }

    (p, dp)
}
