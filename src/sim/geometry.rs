//! Axis-aligned boxes and point projections shared by the shape primitives

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction used when a penetration vector has no defined direction
/// (query centre exactly on the shape's reference point or edge)
pub const DEGENERATE_AXIS: Vec2 = Vec2::Y;

/// Squared lengths below this are treated as zero
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Axis-aligned bounding box as (x, y, w, h), y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from left, top, right, bottom edges
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Smallest box enclosing the given points, `None` when empty
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_ltrb(min.x, min.y, max.x, max.y))
    }

    /// Box enclosing a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Closed-interval overlap test (touching edges count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Closed-interval point test
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Projection of `p` on the infinite line through `a` and `b`.
///
/// Returns `None` when `a` and `b` coincide and the line is undefined.
pub fn point_on_line(p: Vec2, a: Vec2, b: Vec2) -> Option<Vec2> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return None;
    }
    let t = (p - a).dot(ab) / len_sq;
    Some(a + ab * t)
}

/// Projection of `p` on the segment `a`-`b`, clamped to the endpoints.
///
/// A zero-length segment projects everything onto `a`.
pub fn point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Vector of length `depth` pointing from `from` toward `toward`.
///
/// Falls back to [`DEGENERATE_AXIS`] when the two points coincide. A negative
/// depth flips the vector.
pub fn penetration_vector(from: Vec2, toward: Vec2, depth: f32) -> Vec2 {
    match (toward - from).try_normalize() {
        Some(dir) => dir * depth,
        None => {
            log::debug!("degenerate penetration at {from}, using fixed axis");
            DEGENERATE_AXIS * depth
        }
    }
}
