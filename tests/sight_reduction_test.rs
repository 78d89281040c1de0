mod common;

use approx::assert_abs_diff_eq;
use common::{assert_within_band, fixed_navigator};
use sightline::{
    celestial::{Body, Limb},
    constants::GeoPoint,
    great_circle::bearing_distance,
    nav_errors::NavError,
    navigator::{Navigator, NavigatorConfig},
    scan::ScanConfig,
    sight::{line_of_position::BearingSearch, SightInput},
    time::utc_epoch,
};

#[test]
fn test_sun_upper_limb_elevation_sight() {
    let nav = Navigator::new(NavigatorConfig::new("/nonexistent/sightline"));
    let epoch = utc_epoch(2024, 3, 20, 12, 0, 0);
    let input = SightInput::new("Sun".parse().unwrap(), epoch)
        .with_limb(Limb::Upper)
        .with_height(2.0)
        .with_elevation(45.0, 0.5);

    let sight = nav.reduce(input).unwrap();

    let corrected = sight.corrected_elevation().unwrap();
    assert!(corrected.is_finite());
    assert!(corrected < 45.0);
    // dip 1.75', refraction 0.97', upper limb 15'
    assert_abs_diff_eq!(45.0 - corrected, 0.2954, epsilon = 1e-3);
    assert!(!sight.polygons().is_empty());
    assert!(!nav.is_geomagnetic_model_loaded());

    let sub_point = nav.sub_point(Body::Sun, &epoch).unwrap();
    assert_within_band(
        sight.polygons(),
        sub_point,
        (90.0 - corrected - 0.5) * 60.0,
        (90.0 - corrected + 0.5) * 60.0,
    );
}

#[test]
fn test_moon_bearing_only_sight() {
    let sub_point = GeoPoint::new(5.0, 30.0);
    let nav = fixed_navigator(NavigatorConfig::new("/nonexistent/sightline"), sub_point);
    let input = SightInput::new(Body::Moon, utc_epoch(2019, 8, 10, 22, 0, 0))
        .with_azimuth(90.0, 1.0, false);

    let sight = nav.reduce(input).unwrap();

    assert!(sight.corrected_elevation().is_none());
    assert!(sight.corrections().is_none());
    assert!(!sight.polygons().is_empty());
    assert!(!nav.is_geomagnetic_model_loaded());

    // azimuth samples 89..91, each accepted within 64 terminal steps of 1/16°
    for vertex in sight.polygons().iter().flatten() {
        let (bearing, dist) = bearing_distance(*vertex, sub_point);
        if dist > 1e-6 {
            assert!((85.0..=95.0).contains(&bearing), "{vertex}: {bearing}");
        }
    }
}

#[test]
fn test_unknown_body_is_rejected() {
    assert_eq!(
        "Xyzzy".parse::<Body>(),
        Err(NavError::UnknownBody("Xyzzy".into()))
    );
}

#[test]
fn test_star_sight_with_almanac() {
    let nav = Navigator::new(NavigatorConfig::default());
    let input = SightInput::new("Vega".parse().unwrap(), utc_epoch(2021, 9, 1, 20, 0, 0))
        .with_elevation(60.0, 0.2)
        .with_azimuth(250.0, 2.0, false)
        .with_time_certainty(120.0);

    let sight = nav.reduce(input).unwrap();
    assert_eq!(sight.corrections().unwrap().limb, 0.0);
    assert_eq!(sight.corrections().unwrap().parallax, 0.0);
    assert!(!sight.polygons().is_empty());
}

#[test]
fn test_almanac_reports_missing_ephemeris() {
    let nav = Navigator::new(NavigatorConfig::default());
    let input = SightInput::new(Body::Moon, utc_epoch(2019, 8, 10, 22, 0, 0))
        .with_azimuth(90.0, 1.0, false);
    assert_eq!(
        nav.reduce(input),
        Err(NavError::EphemerisUnavailable("Moon".into()))
    );
}

#[test]
fn test_invalid_observations() {
    let nav = fixed_navigator(NavigatorConfig::default(), GeoPoint::default());
    let epoch = utc_epoch(2019, 8, 10, 22, 0, 0);

    let nothing = SightInput::new(Body::Sun, epoch);
    assert!(matches!(
        nav.reduce(nothing),
        Err(NavError::InvalidObservation(_))
    ));

    let negative = SightInput::new(Body::Sun, epoch).with_elevation(30.0, -1.0);
    assert!(matches!(
        nav.reduce(negative),
        Err(NavError::InvalidObservation(_))
    ));
}

#[test]
fn test_zero_azimuth_certainty_fails_to_converge() {
    let config = NavigatorConfig {
        scan: ScanConfig {
            max_bisection_iterations: 100,
            ..ScanConfig::default()
        },
        ..NavigatorConfig::default()
    };
    let nav = fixed_navigator(config, GeoPoint::new(0.0, 0.0));
    let input = SightInput::new(Body::Sun, utc_epoch(2019, 8, 10, 22, 0, 0))
        .with_elevation(40.0, 0.0)
        .with_azimuth(45.0, 0.0, false);
    assert_eq!(
        nav.reduce(input),
        Err(NavError::NonConvergent { iterations: 100 })
    );
}

#[test]
fn test_bearing_point_round_trip() {
    let config = ScanConfig::default();
    let search = BearingSearch::new(&config, 0.5);
    let sub_point = GeoPoint::new(15.0, 140.0);

    for (elevation, bearing) in [(20.0, 30.0), (35.0, 160.0), (50.0, 300.0)] {
        let Some(point) = search.bearing_point(sub_point, elevation, bearing).unwrap() else {
            panic!("no solution at {elevation}° / {bearing}°");
        };
        let (back, dist) = bearing_distance(point, sub_point);
        let terminal_step = 0.5 / 16.0;
        let error = (back - bearing + 540.0).rem_euclid(360.0) - 180.0;
        assert!(error.abs() < 64.0 * terminal_step, "{error}");
        assert_abs_diff_eq!(dist, (90.0 - elevation) * 60.0, epsilon = 1e-6);
    }
}
