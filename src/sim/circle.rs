//! Circle primitive

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, penetration_vector};
use super::shape::Collider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Collider for Circle {
    fn bounding_box(&self) -> Aabb {
        Aabb::around(self.center, self.radius)
    }

    fn contains_point(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        let reach = self.radius + radius;
        let dist_sq = center.distance_squared(self.center);
        if dist_sq >= reach * reach {
            return None;
        }
        let dist = dist_sq.sqrt();
        Some(penetration_vector(center, self.center, reach - dist))
    }
}
