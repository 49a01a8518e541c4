use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Determinant threshold below which two segments are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-9;
/// Vectors shorter than this have no usable direction.
pub const LENGTH_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn cross(self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Unit vector in the same direction, or `None` for near-zero vectors.
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len < LENGTH_EPSILON {
            return None;
        }
        Some(Point::new(self.x / len, self.y / len))
    }

    /// Counter-clockwise perpendicular (in y-down screen space this turns right).
    pub fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Angle of this vector in radians; 0 for near-zero vectors.
    pub fn angle(self) -> f32 {
        if self.length() < LENGTH_EPSILON {
            return 0.0;
        }
        self.y.atan2(self.x)
    }

    pub fn from_angle(angle: f32) -> Point {
        Point::new(angle.cos(), angle.sin())
    }

    pub fn rotate_about(self, pivot: Point, angle: f32) -> Point {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle a route has to keep clear of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Builds bounds from two opposite corners in any order.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn expand(&self, margin: f32) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Corners in clockwise order starting at the top-left (y-down).
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }
}

pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let r = p2 - p1;
    let s = p4 - p3;
    let d = r.cross(s);
    if d.abs() < PARALLEL_EPSILON {
        return false;
    }
    let q = p3 - p1;
    let t = q.cross(s) / d;
    let u = q.cross(r) / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

pub fn point_in_box(p: Point, bounds: &Bounds, margin: f32) -> bool {
    p.x >= bounds.min_x - margin
        && p.x <= bounds.max_x + margin
        && p.y >= bounds.min_y - margin
        && p.y <= bounds.max_y + margin
}

pub fn segment_intersects_box(p1: Point, p2: Point, bounds: &Bounds, margin: f32) -> bool {
    if point_in_box(p1, bounds, margin) || point_in_box(p2, bounds, margin) {
        return true;
    }
    let corners = bounds.expand(margin).corners();
    (0..4).any(|idx| segments_intersect(p1, p2, corners[idx], corners[(idx + 1) % 4]))
}

pub fn polyline_length(points: &[Point]) -> f32 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}
