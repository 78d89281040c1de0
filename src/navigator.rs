//! # Navigator: oracle, geomagnetic model and solver settings
//!
//! This module defines the [`Navigator`](crate::navigator::Navigator) struct, the
//! context every sight is reduced against. It wires together:
//!
//! 1. **Celestial oracle** ([`CelestialOracle`]): sub-point of a body at an instant.
//!    Defaults to the built-in [`Almanac`].
//! 2. **Geomagnetic model** ([`MagneticDeclination`]): needed by magnetic bearings
//!    only. The `.COF` file is opened lazily on the first magnetic sight through a
//!    [`OnceCell`](once_cell::sync::OnceCell), then reused for every later sight.
//! 3. **Scan settings** ([`ScanConfig`]): grid steps and bisection constants.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use sightline::navigator::{Navigator, NavigatorConfig};
//! use sightline::sight::SightInput;
//! use sightline::celestial::{Body, Limb};
//! use sightline::time::utc_epoch;
//!
//! let nav = Navigator::new(NavigatorConfig::default());
//!
//! let input = SightInput::new(Body::Sun, utc_epoch(2024, 3, 20, 12, 0, 0))
//!     .with_elevation(45.0, 0.5)
//!     .with_limb(Limb::Upper)
//!     .with_height(2.0);
//!
//! let sight = nav.reduce(input).unwrap();
//! println!("{} polygons", sight.polygons().len());
//! ```
//!
//! ## Notes
//!
//! - A failed geomagnetic load is returned to the caller and **not** cached: the
//!   next magnetic sight tries again.
//! - Call [`load_geomagnetic_model`](crate::navigator::Navigator::load_geomagnetic_model)
//!   at startup to surface a missing file before any sight is entered.

use camino::Utf8PathBuf;
use hifitime::Epoch;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{
    celestial::{almanac::Almanac, Body, CelestialOracle},
    constants::GeoPoint,
    geomag::{GeomagneticModel, MagneticDeclination},
    nav_errors::NavError,
    scan::ScanConfig,
    sight::{Sight, SightInput},
};

type SharedOracle = Box<dyn CelestialOracle + Send + Sync>;
type SharedDeclination = Box<dyn MagneticDeclination + Send + Sync>;

/// Settings of a [`Navigator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Directory holding the data files.
    pub data_dir: Utf8PathBuf,
    /// Geomagnetic coefficient file name, relative to `data_dir`.
    pub geomag_file: String,
    pub scan: ScanConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        NavigatorConfig {
            data_dir: Utf8PathBuf::from("."),
            geomag_file: "IGRF11.COF".to_string(),
            scan: ScanConfig::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        NavigatorConfig {
            data_dir: data_dir.into(),
            ..NavigatorConfig::default()
        }
    }

    /// Full path of the geomagnetic coefficient file.
    pub fn geomag_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.geomag_file)
    }
}

pub struct Navigator {
    config: NavigatorConfig,
    oracle: SharedOracle,
    geomag: OnceCell<SharedDeclination>,
}

impl Navigator {
    /// Construct a navigator using the built-in [`Almanac`].
    ///
    /// Nothing is read from disk here; the geomagnetic model is loaded on first use.
    pub fn new(config: NavigatorConfig) -> Self {
        Self::with_oracle(config, Almanac)
    }

    /// Construct a navigator with a host-provided ephemeris.
    ///
    /// Arguments
    /// -----------------
    /// * `config`: data location and scan settings.
    /// * `oracle`: any [`CelestialOracle`], including a plain closure
    ///   `Fn(Body, &Epoch) -> Result<GeoPoint, NavError>`.
    pub fn with_oracle(
        config: NavigatorConfig,
        oracle: impl CelestialOracle + Send + Sync + 'static,
    ) -> Self {
        Navigator {
            config,
            oracle: Box::new(oracle),
            geomag: OnceCell::new(),
        }
    }

    /// Replace the geomagnetic model by an already built provider.
    ///
    /// The coefficient file is then never read.
    pub fn with_declination(
        mut self,
        declination: impl MagneticDeclination + Send + Sync + 'static,
    ) -> Self {
        let declination: SharedDeclination = Box::new(declination);
        self.geomag = OnceCell::with_value(declination);
        self
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.config.scan
    }

    pub fn oracle(&self) -> &(dyn CelestialOracle + Send + Sync) {
        self.oracle.as_ref()
    }

    /// Sub-point of `body` at `epoch`, from the configured oracle.
    pub fn sub_point(&self, body: Body, epoch: &Epoch) -> Result<GeoPoint, NavError> {
        self.oracle.sub_point(body, epoch)
    }

    /// Get the lazily-initialized geomagnetic model.
    ///
    /// If this is the first call, the coefficient file at
    /// [`NavigatorConfig::geomag_path`] is parsed and cached in an internal
    /// [`OnceCell`]. Subsequent calls return the same reference.
    ///
    /// Return
    /// ----------
    /// * The declination provider, or the load error
    ///   ([`NavError::GeomagneticModelNotFound`], [`NavError::InvalidGeomagneticModel`], I/O).
    pub fn geomagnetic_model(&self) -> Result<&(dyn MagneticDeclination + Send + Sync), NavError> {
        self.geomag
            .get_or_try_init(|| {
                let model = GeomagneticModel::from_file(&self.config.geomag_path())?;
                Ok::<SharedDeclination, NavError>(Box::new(model))
            })
            .map(|model| model.as_ref())
    }

    /// Load the geomagnetic model now instead of on the first magnetic sight.
    pub fn load_geomagnetic_model(&self) -> Result<(), NavError> {
        self.geomagnetic_model().map(|_| ())
    }

    /// Whether the geomagnetic model has been loaded (or injected).
    pub fn is_geomagnetic_model_loaded(&self) -> bool {
        self.geomag.get().is_some()
    }

    /// Reduce a sight against this navigator.
    ///
    /// See also
    /// ------------
    /// * [`Sight::new`] – The solver itself.
    pub fn reduce(&self, input: SightInput) -> Result<Sight, NavError> {
        Sight::new(input, self)
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("config", &self.config)
            .field("geomagnetic_model_loaded", &self.is_geomagnetic_model_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod navigator_test {
    use super::*;
    use crate::time::utc_epoch;

    struct Constant(f64);

    impl MagneticDeclination for Constant {
        fn declination(&self, _: GeoPoint, _: f64, _: &Epoch) -> Result<f64, NavError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert_eq!(config.geomag_path(), Utf8PathBuf::from("./IGRF11.COF"));
        assert_eq!(config.scan, ScanConfig::default());

        let config = NavigatorConfig::new("/opt/data");
        assert_eq!(config.geomag_path(), Utf8PathBuf::from("/opt/data/IGRF11.COF"));
    }

    #[test]
    fn test_missing_model_is_reported_and_not_cached() {
        let nav = Navigator::new(NavigatorConfig::new("/nonexistent/sightline"));
        assert!(!nav.is_geomagnetic_model_loaded());
        assert_eq!(
            nav.load_geomagnetic_model(),
            Err(NavError::GeomagneticModelNotFound(
                "/nonexistent/sightline/IGRF11.COF".into()
            ))
        );
        assert!(!nav.is_geomagnetic_model_loaded());
    }

    #[test]
    fn test_injected_declination() {
        let nav = Navigator::new(NavigatorConfig::new("/nonexistent/sightline"))
            .with_declination(Constant(-3.5));
        assert!(nav.is_geomagnetic_model_loaded());
        let d = nav
            .geomagnetic_model()
            .unwrap()
            .declination(GeoPoint::default(), 0.0, &utc_epoch(2012, 1, 1, 0, 0, 0))
            .unwrap();
        assert_eq!(d, -3.5);
    }

    #[test]
    fn test_closure_oracle() {
        let nav = Navigator::with_oracle(NavigatorConfig::default(), |body: Body, _: &Epoch| -> Result<GeoPoint, NavError> {
            match body {
                Body::Moon => Ok(GeoPoint::new(5.0, 6.0)),
                other => Err(NavError::EphemerisUnavailable(other.to_string())),
            }
        });
        let epoch = utc_epoch(2020, 1, 1, 0, 0, 0);
        assert_eq!(nav.sub_point(Body::Moon, &epoch), Ok(GeoPoint::new(5.0, 6.0)));
        assert!(nav.sub_point(Body::Sun, &epoch).is_err());
    }
}
