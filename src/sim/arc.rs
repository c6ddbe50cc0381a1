//! Annular wedge geometry for arc blocks and the catcher
//!
//! An arc segment is defined around a centre by:
//! - inner and outer radius (swapped at construction if given out of order)
//! - two angles, wrapped into [0, 2π), plus a sweep predicate chosen once
//!   from the order of the angles before and after wrapping
//!
//! Angles are measured with `atan2` in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, penetration_vector};
use super::shape::Collider;
use crate::{cartesian_to_polar, polar_to_cartesian, wrap_angle};

/// Which side of the stored angle pair the arc occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sweep {
    /// Swept region is `angle0 < θ < angle1`
    Within,
    /// Region crosses angle zero: `θ < angle0 || θ > angle1`, the pair bounds the excluded gap
    Wraps,
}

/// A thick arc band between two radii and two angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArcParams", into = "ArcParams")]
pub struct ArcSegment {
    /// Centre of the circle the band is cut from
    pub center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    /// Angles exactly as supplied, kept for serialization
    raw_start: f32,
    raw_end: f32,
    /// Wrapped angles in [0, 2π), `angle0 <= angle1` unless `Within`
    angle0: f32,
    angle1: f32,
    sweep: Sweep,
}

#[derive(Serialize, Deserialize)]
struct ArcParams {
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    end: f32,
}

impl ArcSegment {
    /// Arc centred at `center`, swept counter-clockwise from `start` to `end`
    pub fn new(center: Vec2, inner_radius: f32, outer_radius: f32, start: f32, end: f32) -> Self {
        let (inner_radius, outer_radius) = if inner_radius > outer_radius {
            (outer_radius, inner_radius)
        } else {
            (inner_radius, outer_radius)
        };

        // Order before wrapping decides which side of zero the band sits on
        let wrapped_start = wrap_angle(start);
        let wrapped_end = wrap_angle(end);
        let (angle0, angle1, sweep) = if start < end {
            if wrapped_start < wrapped_end {
                (wrapped_start, wrapped_end, Sweep::Within)
            } else {
                (wrapped_end, wrapped_start, Sweep::Wraps)
            }
        } else if wrapped_start < wrapped_end {
            (wrapped_start, wrapped_end, Sweep::Wraps)
        } else {
            (wrapped_end, wrapped_start, Sweep::Wraps)
        };

        Self {
            center,
            inner_radius,
            outer_radius,
            raw_start: start,
            raw_end: end,
            angle0,
            angle1,
            sweep,
        }
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Wrapped angle pair as stored (see [`Sweep`] for their meaning)
    pub fn angles(&self) -> (f32, f32) {
        (self.angle0, self.angle1)
    }

    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    /// Check if an angle (any range) is inside the swept region
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = wrap_angle(theta);
        match self.sweep {
            Sweep::Within => self.angle0 < theta && theta < self.angle1,
            Sweep::Wraps => theta < self.angle0 || theta > self.angle1,
        }
    }

    /// Angle of a point as seen from the arc's centre, in [0, 2π)
    #[inline]
    fn angle_of(&self, point: Vec2) -> f32 {
        cartesian_to_polar(point - self.center).1
    }
}

impl From<ArcParams> for ArcSegment {
    fn from(p: ArcParams) -> Self {
        Self::new(p.center, p.inner_radius, p.outer_radius, p.start, p.end)
    }
}

impl From<ArcSegment> for ArcParams {
    fn from(a: ArcSegment) -> Self {
        Self {
            center: a.center,
            inner_radius: a.inner_radius,
            outer_radius: a.outer_radius,
            start: a.raw_start,
            end: a.raw_end,
        }
    }
}

impl Collider for ArcSegment {
    /// Box around five samples: both ends of each radial edge and the outer
    /// midpoint. Loose, and wrong for some sweeps (e.g. when the band crosses
    /// an axis away from its midpoint).
    fn bounding_box(&self) -> Aabb {
        let mid = (self.angle0 + self.angle1) / 2.0;
        let samples = [
            polar_to_cartesian(self.inner_radius, self.angle0),
            polar_to_cartesian(self.outer_radius, self.angle0),
            polar_to_cartesian(self.outer_radius, self.angle1),
            polar_to_cartesian(self.inner_radius, self.angle1),
            polar_to_cartesian(self.outer_radius, mid),
        ];
        Aabb::from_points(samples.into_iter().map(|p| p + self.center)).unwrap_or_default()
    }

    fn contains_point(&self, point: Vec2) -> bool {
        let dist_sq = point.distance_squared(self.center);
        self.inner_radius * self.inner_radius < dist_sq
            && dist_sq < self.outer_radius * self.outer_radius
            && self.contains_angle(self.angle_of(point))
    }

    /// Only the curved borders collide. The flat radial sides are not
    /// handled: a circle outside the angular range never hits.
    fn circle_penetration(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        if !self.contains_angle(self.angle_of(center)) {
            return None;
        }

        let dist_sq = center.distance_squared(self.center);
        let near = self.inner_radius - radius;
        let far = self.outer_radius + radius;
        if !(near * near < dist_sq && dist_sq < far * far) {
            return None;
        }

        let dist = dist_sq.sqrt();
        let depth = if dist > (self.inner_radius + self.outer_radius) / 2.0 {
            // Outer border
            self.outer_radius + radius - dist
        } else {
            // Inner border: negative depth flips the vector away from the centre
            self.inner_radius - radius - dist
        };
        Some(penetration_vector(center, self.center, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    fn arc(start: f32, end: f32) -> ArcSegment {
        ArcSegment::new(Vec2::ZERO, 48.0, 64.0, start, end)
    }

    #[test]
    fn test_radii_are_ordered() {
        let a = ArcSegment::new(Vec2::ZERO, 100.0, 84.0, 0.0, 1.0);
        assert_eq!(a.inner_radius(), 84.0);
        assert_eq!(a.outer_radius(), 100.0);
    }

    #[test]
    fn test_ascending_without_wrap() {
        let a = arc(0.2, 1.0);
        assert_eq!(a.sweep(), Sweep::Within);
        assert!(a.contains_angle(0.5));
        assert!(!a.contains_angle(1.5));
        assert!(!a.contains_angle(0.1));
    }

    #[test]
    fn test_ascending_across_zero() {
        // -0.5 wraps to 2π - 0.5, which is above 0.5 after wrapping
        let a = arc(-0.5, 0.5);
        assert_eq!(a.sweep(), Sweep::Wraps);
        let (a0, a1) = a.angles();
        assert!((a0 - 0.5).abs() < 1e-6);
        assert!((a1 - (TAU - 0.5)).abs() < 1e-5);
        assert!(a.contains_angle(0.0));
        assert!(a.contains_angle(-0.25));
        assert!(a.contains_angle(0.25));
        assert!(!a.contains_angle(PI));
    }

    #[test]
    fn test_descending_keeps_wrapped_order() {
        // start > end before wrapping, start < end after wrapping
        let a = arc(TAU + 0.5, 1.0);
        assert_eq!(a.sweep(), Sweep::Wraps);
        let (a0, a1) = a.angles();
        assert!((a0 - 0.5).abs() < 1e-5);
        assert!((a1 - 1.0).abs() < 1e-6);
        assert!(!a.contains_angle(0.75));
        assert!(a.contains_angle(0.25));
        assert!(a.contains_angle(2.0));
    }

    #[test]
    fn test_descending_swaps_wrapped_order() {
        // start > end both before and after wrapping
        let a = arc(1.0, 0.5);
        assert_eq!(a.sweep(), Sweep::Wraps);
        assert_eq!(a.angles(), (0.5, 1.0));
        assert!(!a.contains_angle(0.75));
        assert!(a.contains_angle(3.0));
    }

    #[test]
    fn test_contains_point_in_band() {
        // Screen space: angle π/2 points down
        let a = arc(PI / 4.0, 3.0 * PI / 4.0);
        assert!(a.contains_point(Vec2::new(0.0, 56.0)));
        assert!(!a.contains_point(Vec2::new(0.0, 40.0)));
        assert!(!a.contains_point(Vec2::new(0.0, 70.0)));
        assert!(!a.contains_point(Vec2::new(0.0, -56.0)));
    }

    #[test]
    fn test_outer_border_penetration() {
        let a = arc(PI / 4.0, 3.0 * PI / 4.0);
        // Ball below the band, overlapping the outer border by 2
        let pen = a.circle_penetration(Vec2::new(0.0, 74.0), 12.0).unwrap();
        assert!((pen - Vec2::new(0.0, -2.0)).length() < 1e-4);
    }

    #[test]
    fn test_inner_border_penetration_points_outward() {
        let a = arc(PI / 4.0, 3.0 * PI / 4.0);
        // Ball inside the hole, overlapping the inner border by 4
        let pen = a.circle_penetration(Vec2::new(0.0, 40.0), 12.0).unwrap();
        assert!((pen - Vec2::new(0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_sides_do_not_collide() {
        let a = arc(PI / 4.0, 3.0 * PI / 4.0);
        // Right next to the radial edge at π/4 but outside the angular range
        let p = polar_to_cartesian(56.0, PI / 4.0 - 0.05);
        assert!(a.circle_penetration(p, 12.0).is_none());
    }

    #[test]
    fn test_bounding_box_samples_five_points() {
        let a = ArcSegment::new(Vec2::new(300.0, 128.0), 48.0, 64.0, 0.0, PI / 2.0);
        let b = a.bounding_box();
        assert!((b.left() - 300.0).abs() < 1e-3);
        assert!((b.top() - 128.0).abs() < 1e-3);
        assert!((b.right() - 364.0).abs() < 1e-3);
        assert!((b.bottom() - 192.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_sweep_partitions_circle(start in -20.0f32..20.0, end in -20.0f32..20.0) {
            let a = arc(start, end);
            let (lo, hi) = a.angles();
            prop_assert!(lo <= hi);
            for i in 0..1000 {
                let theta = i as f32 / 1000.0 * TAU;
                // Boundary samples are allowed either way
                if (theta - lo).abs() < 1e-4 || (theta - hi).abs() < 1e-4 {
                    continue;
                }
                let between = lo < theta && theta < hi;
                let expected = match a.sweep() {
                    Sweep::Within => between,
                    Sweep::Wraps => !between,
                };
                prop_assert_eq!(a.contains_angle(theta), expected);
                // Same answer for the angle expressed one turn away
                prop_assert_eq!(a.contains_angle(theta - TAU), expected);
            }
        }

        #[test]
        fn prop_ascending_short_sweep_covers_midpoint(start in -10.0f32..10.0, span in 0.05f32..6.0) {
            let a = arc(start, start + span);
            prop_assert!(a.contains_angle(start + span / 2.0));
        }
    }
}
