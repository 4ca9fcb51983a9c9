//! Planar points and the polygon containment test used by the rasterizer.

use glam::DVec2;
use std::hash::{Hash, Hasher};
use std::ops::Add;

/// A point in tree space.
///
/// Equality compares components exactly, with no epsilon. Hashing follows
/// the same rule (the two zero signs hash alike so that `Hash` agrees with
/// `PartialEq`); points carrying `NaN` are never equal to anything.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Ordered vertex list, implicitly closed from the last vertex back to the first.
pub type Polygon = Vec<Point>;

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `distance` in the direction `angle` (radians).
    ///
    /// ### Parameters
    /// - `distance` - Length of the step; negative values step backwards.
    /// - `angle` - Direction measured from the positive x axis.
    ///
    /// ### Returns
    /// `(x + distance * cos(angle), y + distance * sin(angle))`.
    pub fn moved(self, distance: f64, angle: f64) -> Self {
        (DVec2::from(self) + DVec2::from_angle(angle) * distance).into()
    }

    /// Ray-casting parity test against an implicitly closed polygon.
    ///
    /// Walks every edge `(p1, p2)`, the closing edge included. An edge takes
    /// part only when `y` lies in its half-open span (`p1.y <= y < p2.y` or
    /// the mirrored case), so horizontal edges never count and the
    /// interpolation below never divides by zero. A crossing toggles the
    /// result when the interpolated x is strictly less than `self.x`.
    ///
    /// ### Returns
    /// `true` if an odd number of edges were crossed. An empty polygon
    /// contains nothing.
    pub fn is_within_polygon(&self, polygon: &[Point]) -> bool {
        let mut inside = false;

        for (p1, p2) in edges(polygon) {
            if !(p1.y <= self.y && self.y < p2.y || p2.y <= self.y && self.y < p1.y) {
                continue;
            }

            let boundary_x = (p2.x - p1.x) * (self.y - p1.y) / (p2.y - p1.y) + p1.x;
            if boundary_x < self.x {
                inside = !inside;
            }
        }

        inside
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Free-function form of [`Point::moved`].
pub fn move_point(point: Point, distance: f64, angle: f64) -> Point {
    point.moved(distance, angle)
}

/// Free-function form of [`Point::is_within_polygon`].
pub fn is_within_polygon(point: Point, polygon: &[Point]) -> bool {
    point.is_within_polygon(polygon)
}

/// Iterates the edges of a closed polygon, ending with the closing edge
/// from the last vertex back to the first.
pub fn edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Axis-aligned bounds of a point set as `(min, max)`, or `None` when empty.
pub fn bounds(points: &[Point]) -> Option<(Point, Point)> {
    let first = DVec2::from(*points.first()?);
    let (min, max) = points
        .iter()
        .map(|&p| DVec2::from(p))
        .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Some((min.into(), max.into()))
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // 0.0 == -0.0, so both must hash alike
        let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
        bits(self.x).hash(state);
        bits(self.y).hash(state);
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}; {}]", self.x, self.y)
    }
}
