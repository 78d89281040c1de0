#![allow(dead_code)]

use camino::Utf8PathBuf;
use hifitime::Epoch;
use sightline::{
    celestial::Body,
    constants::{GeoPoint, Polygon},
    great_circle::distance,
    nav_errors::NavError,
    navigator::{Navigator, NavigatorConfig},
};
use tempfile::TempDir;

/// Single-epoch axial dipole: magnetic north is true north everywhere.
pub const AXIAL_DIPOLE_COF: &str = "\
   DIP10   2010.00  1  1  0 2010.00 2015.00   -1.0  600.0           DIP10    0
     1  0  -29496.5       0.0      0.0       0.0                    DIP10    1
     1  1       0.0       0.0      0.0       0.0                    DIP10    2
";

/// Dipole with a strong equatorial term: several degrees of declination.
pub const TILTED_DIPOLE_COF: &str = "\
   TLT10   2010.00  1  1  0 2010.00 2015.00   -1.0  600.0           TLT10    0
     1  0  -29000.0       0.0      0.0       0.0                    TLT10    1
     1  1   -1500.0    4500.0      0.0       0.0                    TLT10    2
";

/// Navigator whose oracle puts every body at the same sub-point.
pub fn fixed_navigator(config: NavigatorConfig, sub_point: GeoPoint) -> Navigator {
    let oracle = move |_: Body, _: &Epoch| -> Result<GeoPoint, NavError> { Ok(sub_point) };
    Navigator::with_oracle(config, oracle)
}

/// Temporary data directory holding `IGRF11.COF` with the given content.
pub fn data_dir_with_model(content: &str) -> (TempDir, NavigatorConfig) {
    let dir = tempfile::tempdir().expect("create temporary data directory");
    let path = dir.path().join("IGRF11.COF");
    std::fs::write(&path, content).expect("write coefficient file");

    let data_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .expect("temporary directory path is UTF-8");
    (dir, NavigatorConfig::new(data_dir))
}

/// Assert that every vertex lies between `inner` and `outer` arc-minutes from `center`.
pub fn assert_within_band(polygons: &[Polygon], center: GeoPoint, inner: f64, outer: f64) {
    for vertex in polygons.iter().flatten() {
        let d = distance(*vertex, center);
        assert!(
            d >= inner - 1e-6 && d <= outer + 1e-6,
            "{vertex} is {d}' from {center}, expected [{inner}, {outer}]"
        );
    }
}
