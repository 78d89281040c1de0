//! # Convex polygon reduction
//!
//! Reduces an unordered cloud of geographic points to the polygon that encloses
//! them, using an angular gift-wrapping sweep.
//!
//! Points are treated as planar coordinates with `lat` on the x axis and `lon` on
//! the y axis. This is only valid over the small angular extent of one scan slice,
//! which is all the solver ever hands in.
//!
//! ## Algorithm
//!
//! 1. Start at the point with the smallest `lon`.
//! 2. From the last vertex, take the remaining point whose heading
//!    ([`calc_angle`], in `[0, 2π)`) is the smallest one not below the previous
//!    heading; equal headings go to the farther point.
//! 3. Drop every copy of the chosen vertex from the remaining set.
//! 4. Stop when closing back to the first vertex needs a smaller heading than the
//!    next candidate, or when the set is exhausted.

use crate::constants::{GeoPoint, Polygon, DPI};

/// Heading from `p2` to `p1` in the `(lat, lon)` plane, in `[0, 2π)`.
pub fn calc_angle(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let phi = (p1.lon - p2.lon).atan2(p1.lat - p2.lat);
    if phi < 0.0 {
        phi + DPI
    } else {
        phi
    }
}

/// Reduce `points` to an enclosing convex polygon whose vertices are input points.
///
/// Arguments
/// -----------------
/// * `points`: the unordered point cloud, consumed.
///
/// Return
/// ----------
/// * The polygon vertices in sweep order. Empty for an empty input, a single vertex
///   when every input point coincides.
pub fn reduce_to_convex_polygon(mut points: Vec<GeoPoint>) -> Polygon {
    let mut polygon = Polygon::new();

    if points.is_empty() {
        return polygon;
    }

    let mut next = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        if p.lon < points[next].lon {
            next = i;
        }
    }

    let mut theta = 0.0;
    while !points.is_empty() {
        // removed by index first: a NaN vertex never compares equal to itself
        let vertex = points.remove(next);
        polygon.push(vertex);
        points.retain(|p| *p != vertex);

        // Candidate search. As in a plain linear scan, the first remaining point is
        // the fallback and seeds the tie-break distance.
        let mut min_phi = DPI;
        let mut max_dist = 0.0;
        next = 0;
        for (i, p) in points.iter().enumerate() {
            let phi = calc_angle(*p, vertex);
            let dist = (p.lat - vertex.lat).hypot(p.lon - vertex.lon);
            if max_dist == 0.0 {
                max_dist = dist;
            }

            if (phi >= theta && phi < min_phi) || (phi == min_phi && dist > max_dist) {
                next = i;
                min_phi = phi;
                max_dist = dist;
            }
        }

        if polygon.len() > 1 && calc_angle(polygon[0], vertex) < min_phi {
            break;
        }

        theta = min_phi;
    }

    polygon
}

#[cfg(test)]
mod hull_test {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn test_calc_angle_quadrants() {
        let o = pt(0.0, 0.0);
        assert_eq!(calc_angle(pt(1.0, 0.0), o), 0.0);
        assert_eq!(calc_angle(pt(0.0, 1.0), o), std::f64::consts::FRAC_PI_2);
        assert_eq!(calc_angle(pt(-1.0, 0.0), o), std::f64::consts::PI);
        assert_eq!(calc_angle(pt(0.0, -1.0), o), 3.0 * std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(reduce_to_convex_polygon(vec![]).is_empty());
        assert_eq!(
            reduce_to_convex_polygon(vec![pt(1.0, 2.0), pt(1.0, 2.0), pt(1.0, 2.0)]),
            vec![pt(1.0, 2.0)]
        );
    }

    #[test]
    fn test_square_with_interior_points() {
        let points = vec![
            pt(0.5, 0.5),
            pt(1.0, 1.0),
            pt(0.0, 1.0),
            pt(0.2, 0.7),
            pt(1.0, 0.0),
            pt(0.0, 0.0),
            pt(0.5, 0.5),
        ];
        // first point of minimal lon is (1, 0); the sweep turns left from there
        let hull = reduce_to_convex_polygon(points);
        assert_eq!(
            hull,
            vec![pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0), pt(0.0, 0.0)]
        );
    }

    #[test]
    fn test_vertices_subset_and_monotonic_turns() {
        // ring of points around (10, 20) plus interior clutter
        let mut points = Vec::new();
        for k in 0..24 {
            let a = k as f64 * DPI / 24.0;
            points.push(pt(10.0 + 0.3 * a.cos(), 20.0 + 0.3 * a.sin()));
            points.push(pt(10.0 + 0.1 * a.cos(), 20.0 + 0.05 * a.sin()));
        }
        let hull = reduce_to_convex_polygon(points.clone());
        assert!(hull.len() >= 3);
        assert!(hull.iter().all(|v| points.contains(v)));

        let turns: Vec<f64> = hull.windows(2).map(|w| calc_angle(w[1], w[0])).collect();
        assert!(turns.windows(2).all(|w| w[1] >= w[0]), "{turns:?}");

        // every interior point lies inside the hull (left of every edge)
        let mut closed = hull.clone();
        closed.push(hull[0]);
        for p in points.iter().filter(|p| !hull.contains(p)) {
            for e in closed.windows(2) {
                let cross = (e[1].lat - e[0].lat) * (p.lon - e[0].lon)
                    - (e[1].lon - e[0].lon) * (p.lat - e[0].lat);
                assert!(cross >= -1e-12);
            }
        }
    }

    #[test]
    fn test_collinear_points() {
        let hull = reduce_to_convex_polygon(vec![pt(0.0, 0.0), pt(0.0, 2.0), pt(0.0, 1.0)]);
        assert_eq!(hull.first(), Some(&pt(0.0, 0.0)));
        assert!(hull.contains(&pt(0.0, 2.0)));
        assert!(hull.len() <= 3);
    }

    #[test]
    fn test_non_finite_points_terminate() {
        let nan = pt(f64::NAN, 0.0);
        assert_eq!(reduce_to_convex_polygon(vec![nan, nan, nan]).len(), 3);

        let hull = reduce_to_convex_polygon(vec![pt(0.0, 0.0), nan, pt(1.0, 1.0)]);
        assert!(hull.len() <= 3);
    }
}
