//! # Drawing a solved sight
//!
//! The renderer hands the polygons of a [`Sight`] to the host's drawing code. It
//! only owns the geographic culling; projection and rasterization stay with the
//! host behind two traits:
//!
//! - [`ViewPort`]: the current chart view (center longitude, visible box, geo → pixel).
//! - [`DrawSurface`]: pen, brush and filled polygons.
//!
//! Per polygon:
//!
//! 1. Each vertex longitude is placed relative to the view center. A polygon with
//!    vertices both in `(90°, 180°]` and in `(180°, 270°)` east of the center wraps
//!    around the back of the projection and is skipped.
//! 2. Longitudes are shifted by whole turns into `[center − 180, center + 180]`.
//! 3. The `(lon, lat)` bounding box of the shifted vertices is tested against the
//!    view box; polygons outside the view are skipped.
//! 4. Remaining polygons are projected and drawn filled.
//!
//! The sight itself is never modified.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{normalize_degrees, wrap_signed_degrees, Degree, GeoPoint},
    sight::Sight,
};

/// An RGBA display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Colour {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Colour {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Colour::new(red, green, blue, 255)
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::opaque(0, 0, 0)
    }
}

/// Axis-aligned box in `(lon, lat)`, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    pub min_lon: Degree,
    pub max_lon: Degree,
    pub min_lat: Degree,
    pub max_lat: Degree,
}

impl GeoBoundingBox {
    pub fn new(min_lon: Degree, max_lon: Degree, min_lat: Degree, max_lat: Degree) -> Self {
        GeoBoundingBox {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// A box containing nothing; it intersects no other box.
    pub fn empty() -> Self {
        GeoBoundingBox::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn expand(&mut self, lon: Degree, lat: Degree) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Whether the boxes overlap or one contains the other. Shared edges count.
    pub fn intersects(&self, other: &GeoBoundingBox) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || self.max_lon < other.min_lon
            || self.min_lon > other.max_lon
            || self.max_lat < other.min_lat
            || self.min_lat > other.max_lat)
    }
}

/// Device coordinates of a projected vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        PixelPoint { x, y }
    }
}

/// The chart view a sight is drawn into.
pub trait ViewPort {
    /// Longitude at the center of the view, degrees.
    fn center_lon(&self) -> Degree;

    /// Visible `(lon, lat)` box, longitudes in the view's own range.
    fn bounding_box(&self) -> GeoBoundingBox;

    /// Geographic to pixel projection.
    fn project(&self, point: GeoPoint) -> PixelPoint;
}

/// The host's drawing primitives.
pub trait DrawSurface {
    fn set_pen(&mut self, colour: Colour, width: u32);
    fn set_brush(&mut self, colour: Colour);
    fn draw_polygon(&mut self, points: &[PixelPoint]);
}

impl Sight {
    /// Draw the area of position of this sight.
    ///
    /// Nothing is drawn for an invisible sight.
    ///
    /// Return
    /// ----------
    /// * The number of polygons that survived culling and were drawn.
    pub fn draw<S, V>(&self, surface: &mut S, view: &V) -> usize
    where
        S: DrawSurface + ?Sized,
        V: ViewPort + ?Sized,
    {
        if !self.is_visible() {
            return 0;
        }

        surface.set_pen(self.colour(), 1);
        surface.set_brush(self.colour());

        self.polygons()
            .iter()
            .filter(|polygon| draw_polygon(surface, view, polygon))
            .count()
    }
}

/// Cull, project and draw one polygon.
///
/// Return
/// ----------
/// * `true` when the polygon was drawn.
pub fn draw_polygon<S, V>(surface: &mut S, view: &V, polygon: &[GeoPoint]) -> bool
where
    S: DrawSurface + ?Sized,
    V: ViewPort + ?Sized,
{
    let center = view.center_lon();
    let mut rear_east = false;
    let mut rear_west = false;
    let mut bbox = GeoBoundingBox::empty();

    let shifted: Vec<GeoPoint> = polygon
        .iter()
        .map(|vertex| {
            let relative = normalize_degrees(vertex.lon - center);
            rear_east |= relative > 90.0 && relative <= 180.0;
            rear_west |= relative > 180.0 && relative < 270.0;

            let offset = vertex.lon - center;
            let lon = if (-180.0..=180.0).contains(&offset) {
                vertex.lon
            } else {
                center + wrap_signed_degrees(offset)
            };
            bbox.expand(lon, vertex.lat);
            GeoPoint::new(vertex.lat, lon)
        })
        .collect();

    if (rear_east && rear_west) || !view.bounding_box().intersects(&bbox) {
        return false;
    }

    let points: Vec<PixelPoint> = shifted.into_iter().map(|p| view.project(p)).collect();
    surface.draw_polygon(&points);
    true
}
