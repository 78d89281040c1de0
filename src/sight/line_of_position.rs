//! # Loci of possible positions
//!
//! The geometric core of sight reduction. Two constructions exist, depending on
//! whether a bearing was measured:
//!
//! ## Elevation only
//!
//! Every position from which the body stands at elevation `e` lies on a small
//! circle around the sub-point, of radius `90° − e`. The band between the lowest
//! and highest sampled circles is swept radially, one trace bearing at a time:
//!
//! ```text
//! for trace in [-180°, 180°]:
//!     slice = [ destination(sub_point(t), trace, 60·(90 − e)) for e, for t ]
//!     polygon = convex hull(previous slice ∪ slice)
//! ```
//!
//! Consecutive slices are unioned pairwise so that each polygon is one sector of
//! the band.
//!
//! ## Bearing (with or without elevation)
//!
//! For each sampled elevation and bearing, [`BearingSearch::bearing_point`] finds
//! the point on the elevation circle from which the body is seen at that bearing.
//! A slice whose consecutive points jump by more than
//! [`ScanConfig::max_point_jump`] straddles a discontinuity of the search and is
//! discarded whole.

use hifitime::Epoch;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    constants::{
        normalize_degrees, wrap_signed_degrees, ArcMinute, Degree, GeoPoint, Meter, Polygon,
        ARCMIN_PER_DEGREE,
    },
    geomag::MagneticDeclination,
    great_circle::{bearing_distance, destination, distance},
    hull::reduce_to_convex_polygon,
    nav_errors::NavError,
    scan::{ScanConfig, ScanRange},
};

/// Context of a magnetic bearing: the variation is evaluated at each trial point.
#[derive(Clone, Copy)]
pub struct MagneticCorrection<'a> {
    pub model: &'a dyn MagneticDeclination,
    /// Height of eye, meters.
    pub height: Meter,
    /// Instant of the sight.
    pub epoch: Epoch,
}

/// Damped bisection search of the position matching a bearing.
#[derive(Clone, Copy)]
pub struct BearingSearch<'a> {
    pub config: &'a ScanConfig,
    /// Certainty of the measured azimuth, degrees; sets the convergence tolerance.
    pub azimuth_certainty: Degree,
    /// `None` for a true bearing.
    pub magnetic: Option<MagneticCorrection<'a>>,
}

impl<'a> BearingSearch<'a> {
    pub fn new(config: &'a ScanConfig, azimuth_certainty: Degree) -> Self {
        BearingSearch {
            config,
            azimuth_certainty,
            magnetic: None,
        }
    }

    pub fn with_magnetic(mut self, magnetic: MagneticCorrection<'a>) -> Self {
        self.magnetic = Some(magnetic);
        self
    }

    /// Find the observer position that sees the body at `elevation` and `bearing`.
    ///
    /// The trial point walks around the elevation circle centered on `sub_point`.
    /// The bearing from the trial point back to the sub-point (reduced by the
    /// magnetic variation for magnetic sights) is compared with the target; the
    /// trace step is reversed and divided by [`ScanConfig::bisection_damping`]
    /// whenever the error changes sign or stops shrinking.
    ///
    /// Arguments
    /// -----------------
    /// * `sub_point`: geographic position of the body.
    /// * `elevation`: corrected elevation, degrees.
    /// * `bearing`: target bearing, degrees, any range.
    ///
    /// Return
    /// ----------
    /// * `Ok(Some(point))` when the search converged close enough to the target,
    /// * `Ok(None)` when it settled on a point whose bearing error is too large,
    /// * `Err(NavError::NonConvergent)` when the iteration bound was hit,
    /// * any error of the magnetic model.
    pub fn bearing_point(
        &self,
        sub_point: GeoPoint,
        elevation: Degree,
        bearing: Degree,
    ) -> Result<Option<GeoPoint>, NavError> {
        let config = self.config;
        let target = normalize_degrees(bearing);

        let tolerance = self.azimuth_certainty / config.bisection_tolerance_divisor;
        let radius = ARCMIN_PER_DEGREE * (90.0 - elevation);

        let mut trace: Degree = 0.0;
        let mut step = config.bisection_initial_step;
        let mut last_error: Degree = 1000.0;
        let mut point = None;
        let mut iterations = 0;

        while step.abs() > tolerance {
            if iterations >= config.max_bisection_iterations {
                return Err(NavError::NonConvergent { iterations });
            }
            iterations += 1;

            let candidate = destination(sub_point, trace, radius);
            let (mut seen, _) = bearing_distance(candidate, sub_point);
            if let Some(magnetic) = &self.magnetic {
                seen -= magnetic
                    .model
                    .declination(candidate, magnetic.height, &magnetic.epoch)?;
            }

            let error = wrap_signed_degrees(target - seen);
            if error * last_error < 0.0 || error.abs() >= last_error.abs() {
                step = -step / config.bisection_damping;
            }

            last_error = error;
            point = Some(candidate);
            trace = wrap_signed_degrees(trace + step);
        }

        let accepted = last_error.abs() < config.bisection_acceptance_factor * step.abs();
        trace!(
            "bearing {target:.3}: {iterations} iterations, error {last_error:.5}, accepted {accepted}"
        );
        Ok(point.filter(|_| accepted))
    }
}

/// Convex polygons covering the positions consistent with an elevation, any bearing.
///
/// Arguments
/// -----------------
/// * `sub_points`: sub-point of the body at each sampled instant.
/// * `elevation`: scan of the corrected elevation; samples outside `[-90, 90]` are skipped.
/// * `trace_step`: bearing step used to trace the elevation circles, degrees.
///
/// Return
/// ----------
/// * One polygon per trace bearing, covering the band between it and the previous one.
pub fn elevation_locus(
    sub_points: &[GeoPoint],
    elevation: &ScanRange,
    trace_step: Degree,
) -> Vec<Polygon> {
    let traces = ScanRange {
        min: -180.0,
        max: 180.0,
        step: trace_step,
    };
    let radii: Vec<ArcMinute> = elevation
        .ascending()
        .filter(|e| e.abs() <= 90.0)
        .map(|e| ARCMIN_PER_DEGREE * (90.0 - e))
        .collect();

    let mut polygons = Vec::new();
    let mut previous: Vec<GeoPoint> = Vec::new();

    for t in traces.ascending() {
        let slice: Vec<GeoPoint> = radii
            .iter()
            .flat_map(|r| sub_points.iter().map(move |sp| destination(*sp, t, *r)))
            .collect();

        let merged: Vec<GeoPoint> = previous.iter().chain(slice.iter()).copied().collect();
        let hull = reduce_to_convex_polygon(merged);
        if !hull.is_empty() {
            polygons.push(hull);
        }
        previous = slice;
    }
    polygons
}

/// Convex polygons covering the positions consistent with a bearing.
///
/// Elevation slices are visited from the highest sample down. A slice with a jump
/// larger than [`ScanConfig::max_point_jump`] between consecutive points is dropped;
/// it still becomes the `previous` slice of the next one.
pub fn bearing_locus(
    search: &BearingSearch<'_>,
    sub_points: &[GeoPoint],
    elevation: &ScanRange,
    azimuth: &ScanRange,
) -> Result<Vec<Polygon>, NavError> {
    let max_jump = search.config.max_point_jump;
    let mut polygons = Vec::new();
    let mut previous: Vec<GeoPoint> = Vec::new();

    for e in elevation.descending().filter(|e| e.abs() <= 90.0) {
        let mut slice: Vec<GeoPoint> = Vec::new();
        for az in azimuth.ascending() {
            for sp in sub_points {
                if let Some(p) = search.bearing_point(*sp, e, az)? {
                    slice.push(p);
                }
            }
        }

        let jump = slice
            .iter()
            .tuple_windows()
            .map(|(a, b)| distance(*a, *b))
            .find(|d| *d > max_jump);

        match jump {
            Some(d) => debug!("Discarding elevation slice {e:.3}°: points {d:.1}' apart"),
            None => {
                let merged: Vec<GeoPoint> = previous.iter().chain(slice.iter()).copied().collect();
                let hull = reduce_to_convex_polygon(merged);
                if hull.len() > 1 {
                    polygons.push(hull);
                }
            }
        }
        previous = slice;
    }
    Ok(polygons)
}
