//! # Geometry Primitives
//!
//! Overlap and containment tests used by the spatial hash and exposed to the
//! host for ad-hoc hit tests.
//!
//! Boundary conventions differ on purpose and are part of the contract:
//! - rectangles overlap only when they share interior area (touching edges do not count)
//! - circles overlap when the centre distance is `<=` the radius sum (touching counts)
//! - point containment is inclusive on every edge

use bytemuck::{Pod, Zeroable};

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Aabb {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Aabb {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns true if the two rectangles share interior area.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Returns true if the point lies inside or on the edge of the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Circle given by centre and radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Circle {
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Radius.
    pub radius: f32,
}

impl Circle {
    /// Creates a circle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Returns true if the circles touch or intersect.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        distance_sq(self.x, self.y, other.x, other.y) <= reach * reach
    }

    /// Returns true if the point lies inside or on the circle.
    #[inline]
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        distance_sq(self.x, self.y, px, py) <= self.radius * self.radius
    }
}

/// Squared euclidean distance between two points.
#[inline]
#[must_use]
pub fn distance_sq(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Rectangle overlap test on raw coordinates.
///
/// # Arguments
///
/// * `x1`, `y1`, `w1`, `h1` - First rectangle (top-left corner and size)
/// * `x2`, `y2`, `w2`, `h2` - Second rectangle
#[inline]
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn aabb_overlap(x1: f32, y1: f32, w1: f32, h1: f32, x2: f32, y2: f32, w2: f32, h2: f32) -> bool {
    Aabb::new(x1, y1, w1, h1).overlaps(&Aabb::new(x2, y2, w2, h2))
}

/// Circle overlap test on raw coordinates. Touching circles overlap.
#[inline]
#[must_use]
pub fn circle_overlap(x1: f32, y1: f32, r1: f32, x2: f32, y2: f32, r2: f32) -> bool {
    Circle::new(x1, y1, r1).overlaps(&Circle::new(x2, y2, r2))
}

/// Inclusive point-in-rectangle test.
#[inline]
#[must_use]
pub fn point_in_rect(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    Aabb::new(rx, ry, rw, rh).contains(px, py)
}

/// Inclusive point-in-circle test.
#[inline]
#[must_use]
pub fn point_in_circle(px: f32, py: f32, cx: f32, cy: f32, radius: f32) -> bool {
    Circle::new(cx, cy, radius).contains(px, py)
}

/// Number of king moves between two tiles.
#[inline]
#[must_use]
pub const fn chebyshev(dx: i32, dy: i32) -> u32 {
    let ax = dx.unsigned_abs();
    let ay = dy.unsigned_abs();
    if ax > ay {
        ax
    } else {
        ay
    }
}

/// Shortest 8-connected distance with unit orthogonal and `sqrt(2)` diagonal steps.
#[inline]
#[must_use]
pub fn octile(dx: i32, dy: i32) -> f64 {
    let ax = f64::from(dx.unsigned_abs());
    let ay = f64::from(dy.unsigned_abs());
    let (lo, hi) = if ax < ay { (ax, ay) } else { (ay, ax) };
    lo * std::f64::consts::SQRT_2 + (hi - lo)
}
