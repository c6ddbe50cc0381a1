//! Mustyqatse - a ball-bouncing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shape primitives, quadtree, Verlet dynamics)
//! - `settings`: Data-driven physics and scoring tuning
//! - `error`: Error type shared by the simulation

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (screen space, y grows downward)
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 540.0;

    /// Verlet dynamics defaults
    pub const GRAVITY: f32 = 0.04;
    pub const FRICTION: f32 = 0.003;
    /// Contacts allowed before a ball is retired
    pub const MAX_BUMPS: u32 = 64;

    /// Quadtree depth, sized for tens to low hundreds of static blocks
    pub const INDEX_DEPTH: u32 = 6;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const LAUNCH_ACCELERATION: f32 = 2.8;
    pub const STARTING_BALLS: u32 = 12;

    /// Emitter sits at the top of the field
    pub const EMITTER_X: f32 = 320.0;
    pub const EMITTER_Y: f32 = 24.0;
    pub const EMITTER_RADIUS: f32 = 12.0;

    /// Catcher (paddle) is an arc whose centre rides the bottom edge
    pub const CATCHER_X: f32 = 320.0;
    pub const CATCHER_INNER_RADIUS: f32 = 84.0;
    pub const CATCHER_OUTER_RADIUS: f32 = 100.0;
    pub const CATCHER_FOLLOW: f32 = 0.1;

    /// Scoring
    pub const BASE_POINTS: u64 = 100;
    pub const MULTIPLIER_STEP: f32 = 0.5;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta wrapped into [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), wrap_angle(pos.y.atan2(pos.x)))
}
