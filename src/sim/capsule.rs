//! Capsule primitive: a segment thickened by a radius

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, penetration_vector, point_on_segment};
use super::shape::Collider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec2, end: Vec2, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Closest point of the core segment to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point_on_segment(point, self.start, self.end)
    }
}

impl Collider for Capsule {
    fn bounding_box(&self) -> Aabb {
        let min = self.start.min(self.end) - Vec2::splat(self.radius);
        let max = self.start.max(self.end) + Vec2::splat(self.radius);
        Aabb::from_ltrb(min.x, min.y, max.x, max.y)
    }

    fn contains_point(&self, point: Vec2) -> bool {
        point.distance_squared(self.closest_point(point)) < self.radius * self.radius
    }

    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        let closest = self.closest_point(center);
        let reach = self.radius + radius;
        let dist_sq = center.distance_squared(closest);
        if dist_sq >= reach * reach {
            return None;
        }
        let dist = dist_sq.sqrt();
        Some(penetration_vector(center, closest, reach - dist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::circle::Circle;

    #[test]
    fn test_bounding_box_covers_caps() {
        let c = Capsule::new(Vec2::new(48.0, 360.0), Vec2::new(32.0, 360.0), 8.0);
        assert_eq!(c.bounding_box(), Aabb::new(24.0, 352.0, 32.0, 16.0));
    }

    #[test]
    fn test_projection_is_clamped_to_segment() {
        let c = Capsule::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 5.0);
        // Beyond the end cap the closest point is the endpoint, not the infinite line
        assert_eq!(c.closest_point(Vec2::new(130.0, 2.0)), Vec2::new(100.0, 0.0));
        assert!(!c.contains_point(Vec2::new(103.0, 4.5)));
        assert!(c.contains_point(Vec2::new(103.0, 0.0)));
    }

    #[test]
    fn test_penetration_from_above() {
        let c = Capsule::new(Vec2::new(0.0, 300.0), Vec2::new(100.0, 300.0), 8.0);
        let pen = c.circle_penetration(Vec2::new(50.0, 282.0), 12.0).unwrap();
        assert!((pen - Vec2::new(0.0, 2.0)).length() < 1e-5);
        assert!(c.circle_penetration(Vec2::new(50.0, 279.0), 12.0).is_none());
    }

    #[test]
    fn test_zero_length_capsule_is_a_circle() {
        let p = Vec2::new(20.0, 20.0);
        let capsule = Capsule::new(p, p, 6.0);
        let circle = Circle::new(p, 6.0);
        let query = Vec2::new(27.0, 24.0);
        let a = capsule.circle_penetration(query, 4.0).unwrap();
        let b = circle.circle_penetration(query, 4.0).unwrap();
        assert!((a - b).length() < 1e-5);
    }
}
