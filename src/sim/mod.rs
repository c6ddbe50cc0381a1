//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (blocks and balls by id, index queries as ordered sets)
//! - No rendering or platform dependencies

pub mod arc;
pub mod capsule;
pub mod circle;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod polygon;
pub mod quadtree;
pub mod shape;
pub mod state;
pub mod tick;

pub use arc::{ArcSegment, Sweep};
pub use capsule::Capsule;
pub use circle::Circle;
pub use collision::{ball_penetration, bounce, reflect_across_line};
pub use events::{EventDispatcher, EventKind, GameEvent, RemovalReason};
pub use geometry::{Aabb, DEGENERATE_AXIS, point_on_line, point_on_segment};
pub use layout::LevelLayout;
pub use polygon::{Polygon, Rectangle};
pub use quadtree::{Indexed, QuadTree};
pub use shape::{Collider, Shape};
pub use state::{
    Ball, BallId, Block, BlockId, Catcher, Emitter, GamePhase, GameState, Level, Scoreboard,
};
pub use tick::{TickInput, launch, new_turn, tick};
