//! Closed set of collision shapes behind one capability trait

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::capsule::Capsule;
use super::circle::Circle;
use super::geometry::Aabb;
use super::polygon::{Polygon, Rectangle};

/// What every collision primitive can answer
pub trait Collider {
    /// Conservative axis-aligned enclosure (loose for arcs)
    fn bounding_box(&self) -> Aabb;

    /// Whether the point lies strictly inside the shape
    fn contains_point(&self, point: Vec2) -> bool;

    /// Overlap with a circle of `radius` centred at `center`.
    ///
    /// The returned vector points from the circle's centre toward the shape's
    /// surface and its length is the overlap depth, so subtracting it from the
    /// centre pushes the circle just outside.
    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2>;
}

/// Static level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum Shape {
    Circle(Circle),
    Capsule(Capsule),
    Polygon(Polygon),
    Rectangle(Rectangle),
    Arc(ArcSegment),
}

impl Collider for Shape {
    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Circle(s) => s.bounding_box(),
            Shape::Capsule(s) => s.bounding_box(),
            Shape::Polygon(s) => s.bounding_box(),
            Shape::Rectangle(s) => s.bounding_box(),
            Shape::Arc(s) => s.bounding_box(),
        }
    }

    fn contains_point(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle(s) => s.contains_point(point),
            Shape::Capsule(s) => s.contains_point(point),
            Shape::Polygon(s) => s.contains_point(point),
            Shape::Rectangle(s) => s.contains_point(point),
            Shape::Arc(s) => s.contains_point(point),
        }
    }

    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        match self {
            Shape::Circle(s) => s.circle_penetration(center, radius),
            Shape::Capsule(s) => s.circle_penetration(center, radius),
            Shape::Polygon(s) => s.circle_penetration(center, radius),
            Shape::Rectangle(s) => s.circle_penetration(center, radius),
            Shape::Arc(s) => s.circle_penetration(center, radius),
        }
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Capsule> for Shape {
    fn from(s: Capsule) -> Self {
        Shape::Capsule(s)
    }
}

impl From<Polygon> for Shape {
    fn from(s: Polygon) -> Self {
        Shape::Polygon(s)
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<ArcSegment> for Shape {
    fn from(s: ArcSegment) -> Self {
        Shape::Arc(s)
    }
}
