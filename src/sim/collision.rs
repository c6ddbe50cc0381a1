//! Bounce response for Verlet balls
//!
//! There is no explicit normal-based reflection. The previous position is
//! mirrored across the line through the current position and an anchor
//! point, then current and previous swap places. The velocity component
//! along that line flips and the perpendicular component is kept.

use glam::Vec2;

use super::geometry::point_on_line;
use super::shape::Collider;
use super::state::Ball;

/// Mirror `p` across the infinite line through `a` and `b`.
///
/// Returns the mirrored point and the projection it was mirrored about, or
/// `None` when the line is undefined.
pub fn reflect_across_line(p: Vec2, a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
    let foot = point_on_line(p, a, b)?;
    Some((foot * 2.0 - p, foot))
}

/// Reflect-and-swap bounce against the line from the ball's centre to `anchor`.
///
/// Returns the projection of the previous position on that line. When the
/// anchor coincides with the centre nothing moves and `None` comes back; the
/// caller still counts the contact.
pub fn bounce(ball: &mut Ball, anchor: Vec2) -> Option<Vec2> {
    let Some((mirrored, foot)) = reflect_across_line(ball.prev, ball.pos, anchor) else {
        log::debug!("ball {:?}: no bounce line at {}, skipping bounce", ball.id, ball.pos);
        return None;
    };
    ball.prev = ball.pos;
    ball.pos = mirrored;
    Some(foot)
}

/// Penetration of the ball into `shape`, if any
#[inline]
pub fn ball_penetration(ball: &Ball, shape: &impl Collider) -> Option<Vec2> {
    shape.circle_penetration(ball.pos, ball.radius)
}
