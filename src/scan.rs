//! # Uncertainty scan ranges
//!
//! Each measured quantity of a sight (time, elevation, azimuth) is known only to
//! within a certainty interval. The solver samples every interval on a regular
//! grid; [`ScanRange::project`] turns a `(center, certainty)` pair into that grid.
//!
//! ```text
//! measured:    [center - certainty, center + certainty], n = floor(certainty / stepsize) + 1
//!              step = 2 * certainty / n
//! unmeasured:  [-constant, +constant], step = stepsize
//! ```
//!
//! The adaptive step splits the interval into a whole number `n` of sub-intervals,
//! so the upper bound is always sampled. A zero certainty collapses the range to a
//! single sample at the center.
//!
//! The step sizes and domain constants of the three axes live in [`ScanConfig`].

use serde::{Deserialize, Serialize};

use crate::constants::{ArcMinute, Degree, Second};

/// Sampling grid over one uncertain quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ScanRange {
    /// Build the scan range of one quantity.
    ///
    /// Arguments
    /// -----------------
    /// * `center`: measured value, `None` when the quantity was not measured.
    /// * `certainty`: half-width of the uncertainty interval (ignored when unmeasured).
    /// * `constant`: half-width of the whole domain, scanned when unmeasured.
    /// * `stepsize`: coarsest sampling step.
    ///
    /// Return
    /// ----------
    /// * The `[min, max]` interval and its sampling step.
    pub fn project(center: Option<f64>, certainty: f64, constant: f64, stepsize: f64) -> Self {
        match center {
            None => ScanRange {
                min: -constant,
                max: constant,
                step: stepsize,
            },
            Some(c) => ScanRange {
                min: c - certainty,
                max: c + certainty,
                step: 2.0 * certainty / ((certainty / stepsize).floor() + 1.0),
            },
        }
    }

    /// Number of sub-intervals between `min` and `max`.
    ///
    /// The quotient `(max - min) / step` is an integer up to rounding for ranges built by
    /// [`ScanRange::project`]; it is rounded when within `1e-9` of an integer and floored
    /// otherwise. Degenerate ranges (zero or non-finite step, empty interval) have none.
    pub fn intervals(&self) -> usize {
        let span = self.max - self.min;
        if !(self.step > 0.0) || !self.step.is_finite() || !(span > 0.0) {
            return 0;
        }
        let q = span / self.step;
        let rounded = q.round();
        if (q - rounded).abs() < 1e-9 {
            rounded as usize
        } else {
            q.floor() as usize
        }
    }

    /// Samples from `min` up to `max` inclusive.
    ///
    /// An empty interval (`max < min`) yields nothing; a single point yields it once.
    pub fn ascending(&self) -> impl Iterator<Item = f64> + '_ {
        let n = if self.max < self.min { None } else { Some(self.intervals()) };
        n.into_iter()
            .flat_map(move |n| (0..=n).map(move |i| self.min + i as f64 * self.step))
    }

    /// Samples from `max` down to `min` inclusive.
    pub fn descending(&self) -> impl Iterator<Item = f64> + '_ {
        let n = if self.max < self.min { None } else { Some(self.intervals()) };
        n.into_iter()
            .flat_map(move |n| (0..=n).map(move |i| self.max - i as f64 * self.step))
    }
}

/// Sampling and search parameters of the sight solver.
///
/// The defaults reproduce the grid of the classic plot: one-degree azimuth and
/// elevation steps, one-minute time steps, and the damped bisection constants of
/// the bearing search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Coarsest azimuth (and trace bearing) step, degrees.
    pub azimuth_step: Degree,
    /// Half-width of the azimuth domain scanned when the azimuth is unmeasured.
    pub azimuth_domain: Degree,
    /// Coarsest elevation step, degrees.
    pub elevation_step: Degree,
    /// Half-width of the elevation domain scanned when the elevation is unmeasured.
    pub elevation_domain: Degree,
    /// Coarsest time step, seconds.
    pub time_step: Second,
    /// Domain constant of the time axis. The time center is always measured (zero offset).
    pub time_domain: Second,
    /// Adjacent bearing-locus points further apart than this discard their elevation slice.
    pub max_point_jump: ArcMinute,
    /// Initial trace step of the bearing search, degrees.
    pub bisection_initial_step: Degree,
    /// Divisor applied to the trace step each time the search overshoots.
    pub bisection_damping: f64,
    /// The search stops once the trace step is below `azimuth_certainty / bisection_tolerance_divisor`.
    pub bisection_tolerance_divisor: f64,
    /// A solution is accepted when its bearing error is below this multiple of the final step.
    pub bisection_acceptance_factor: f64,
    /// Upper bound on bearing search iterations.
    pub max_bisection_iterations: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            azimuth_step: 1.0,
            azimuth_domain: 180.0,
            elevation_step: 1.0,
            elevation_domain: 90.0,
            time_step: 60.0,
            time_domain: 1.0,
            max_point_jump: 30.0 * 60.0,
            bisection_initial_step: 240.0,
            bisection_damping: 2.1,
            bisection_tolerance_divisor: 16.0,
            bisection_acceptance_factor: 64.0,
            max_bisection_iterations: 10_000,
        }
    }
}
