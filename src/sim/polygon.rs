//! Polygon primitive and its rectangle special case

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, penetration_vector, point_on_segment};
use super::shape::Collider;
use crate::error::SimError;

/// Closed polygon; the last vertex connects back to the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, SimError> {
        if vertices.len() < 3 {
            return Err(SimError::TooFewVertices {
                got: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Edges in order, starting with the closing edge (last vertex -> first)
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[(i + n - 1) % n], self.vertices[i]))
    }
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = SimError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Vec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl Collider for Polygon {
    fn bounding_box(&self) -> Aabb {
        // Construction guarantees at least three vertices
        Aabb::from_points(self.vertices.iter().copied()).unwrap_or_default()
    }

    /// Horizontal ray cast toward +x, flipping parity at every crossing
    fn contains_point(&self, point: Vec2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            // Horizontal edges run parallel to the ray
            if a.y == b.y {
                continue;
            }
            // Half-open in y so a vertex shared by two edges is crossed once
            if (a.y > point.y) == (b.y > point.y) {
                continue;
            }
            let cross_x = (point.y - a.y) * (b.x - a.x) / (b.y - a.y) + a.x;
            if cross_x > point.x && cross_x >= a.x.min(b.x) && cross_x <= a.x.max(b.x) {
                inside = !inside;
            }
        }
        inside
    }

    /// First penetrated edge wins; a centre inside the polygon with no edge in
    /// reach is still a hit, reported as a zero vector.
    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        for (a, b) in self.edges() {
            let closest = point_on_segment(center, a, b);
            let dist_sq = center.distance_squared(closest);
            if dist_sq < radius * radius {
                let dist = dist_sq.sqrt();
                return Some(penetration_vector(center, closest, radius - dist));
            }
        }

        if self.contains_point(center) {
            return Some(Vec2::ZERO);
        }

        None
    }
}

/// Axis-aligned rectangle stored as its 4-corner polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectangleParams", into = "RectangleParams")]
pub struct Rectangle {
    origin: Vec2,
    size: Vec2,
    polygon: Polygon,
}

#[derive(Serialize, Deserialize)]
struct RectangleParams {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        let vertices = vec![
            Vec2::new(x, y),
            Vec2::new(x, y + h),
            Vec2::new(x + w, y + h),
            Vec2::new(x + w, y),
        ];
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
            polygon: Polygon { vertices },
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn as_polygon(&self) -> &Polygon {
        &self.polygon
    }
}

impl From<RectangleParams> for Rectangle {
    fn from(p: RectangleParams) -> Self {
        Self::new(p.x, p.y, p.w, p.h)
    }
}

impl From<Rectangle> for RectangleParams {
    fn from(r: Rectangle) -> Self {
        Self {
            x: r.origin.x,
            y: r.origin.y,
            w: r.size.x,
            h: r.size.y,
        }
    }
}

impl Collider for Rectangle {
    fn bounding_box(&self) -> Aabb {
        self.polygon.bounding_box()
    }

    fn contains_point(&self, point: Vec2) -> bool {
        self.polygon.contains_point(point)
    }

    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        self.polygon.circle_penetration(center, radius)
    }
}
