mod common;

use common::{data_dir_with_model, fixed_navigator, AXIAL_DIPOLE_COF, TILTED_DIPOLE_COF};
use sightline::{
    celestial::Body,
    constants::GeoPoint,
    nav_errors::NavError,
    navigator::NavigatorConfig,
    sight::SightInput,
    time::utc_epoch,
};

fn bearing_sight(magnetic: bool) -> SightInput {
    SightInput::new(Body::Sun, utc_epoch(2012, 7, 1, 15, 0, 0))
        .with_elevation(35.0, 0.5)
        .with_azimuth(200.0, 2.0, magnetic)
        .with_height(3.0)
}

#[test]
fn test_magnetic_sight_reports_missing_model() {
    let nav = fixed_navigator(
        NavigatorConfig::new("/nonexistent/sightline"),
        GeoPoint::new(20.0, 10.0),
    );
    assert_eq!(
        nav.reduce(bearing_sight(true)),
        Err(NavError::GeomagneticModelNotFound(
            "/nonexistent/sightline/IGRF11.COF".into()
        ))
    );
    assert!(!nav.is_geomagnetic_model_loaded());
}

#[test]
fn test_axial_dipole_matches_true_bearing() {
    let (_dir, config) = data_dir_with_model(AXIAL_DIPOLE_COF);
    let nav = fixed_navigator(config, GeoPoint::new(20.0, 10.0));

    let true_sight = nav.reduce(bearing_sight(false)).unwrap();
    assert!(!nav.is_geomagnetic_model_loaded());

    let magnetic_sight = nav.reduce(bearing_sight(true)).unwrap();
    assert!(nav.is_geomagnetic_model_loaded());

    assert!(!true_sight.polygons().is_empty());
    assert_eq!(magnetic_sight.polygons(), true_sight.polygons());
}

#[test]
fn test_declination_moves_the_locus() {
    let (_dir, config) = data_dir_with_model(TILTED_DIPOLE_COF);
    let nav = fixed_navigator(config, GeoPoint::new(20.0, 10.0));
    nav.load_geomagnetic_model().unwrap();

    let true_sight = nav.reduce(bearing_sight(false)).unwrap();
    let magnetic_sight = nav.reduce(bearing_sight(true)).unwrap();
    assert_ne!(magnetic_sight.polygons(), true_sight.polygons());
}

#[test]
fn test_model_outside_date_range() {
    let (_dir, config) = data_dir_with_model(AXIAL_DIPOLE_COF);
    let nav = fixed_navigator(config, GeoPoint::new(20.0, 10.0));
    let input = SightInput::new(Body::Sun, utc_epoch(2030, 1, 1, 0, 0, 0))
        .with_azimuth(120.0, 1.0, true);
    assert!(matches!(
        nav.reduce(input),
        Err(NavError::GeomagneticDateOutOfRange(_))
    ));
}
