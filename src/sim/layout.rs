//! Plain geometric level descriptions
//!
//! A layout is what a level loader or the editor hands to the simulation:
//! field size, ball budget, emitter and catcher placement, and the list of
//! block shapes. Block ids and touched flags belong to the running level,
//! not the layout.

use std::f32::consts::PI;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::capsule::Capsule;
use super::circle::Circle;
use super::polygon::Rectangle;
use super::shape::Shape;
use crate::consts::*;
use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub width: f32,
    pub height: f32,
    pub starting_balls: u32,
    pub emitter: Circle,
    pub catcher: ArcSegment,
    pub shapes: Vec<Shape>,
}

impl LevelLayout {
    /// Empty field with the default emitter and catcher
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            starting_balls: STARTING_BALLS,
            emitter: Circle::new(Vec2::new(width / 2.0, EMITTER_Y), EMITTER_RADIUS),
            catcher: default_catcher(Vec2::new(width / 2.0, height)),
            shapes: Vec::new(),
        }
    }

    /// The first level of the game
    pub fn demo() -> Self {
        let mut layout = Self::empty(FIELD_WIDTH, FIELD_HEIGHT);
        layout.emitter = Circle::new(Vec2::new(EMITTER_X, EMITTER_Y), EMITTER_RADIUS);
        layout.catcher = default_catcher(Vec2::new(CATCHER_X, FIELD_HEIGHT));

        // Zig-zag row of bumpers
        layout.shapes.extend((0..16).map(|i| {
            let center = Vec2::new(480.0 - 192.0 + 24.0 * i as f32, 250.0 + (i % 2) as f32 * 24.0);
            Shape::from(Circle::new(center, 16.0))
        }));

        // Three fans of arc segments opening downward
        const FAN: u32 = 9;
        for center in [Vec2::new(300.0, 128.0), Vec2::new(480.0, 80.0), Vec2::new(660.0, 128.0)] {
            layout.shapes.extend((0..FAN).map(|i| {
                let start = i as f32 * PI / FAN as f32;
                let end = PI / FAN as f32 * (i as f32 + 0.9);
                Shape::from(ArcSegment::new(center, 48.0, 64.0, start, end))
            }));
        }

        layout.shapes.extend((0..12).map(|i| {
            let x = 32.0 + 48.0 * i as f32;
            Shape::from(Capsule::new(Vec2::new(x, 360.0), Vec2::new(x + 16.0, 360.0), 8.0))
        }));

        layout.shapes.extend(
            (0..13).map(|i| Shape::from(Rectangle::new(32.0 + 48.0 * i as f32, 400.0, 24.0, 16.0))),
        );

        layout
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let layout = Self::from_json(&json)?;
        log::info!(
            "Loaded layout from {}: {} shapes, {} balls",
            path.display(),
            layout.shapes.len(),
            layout.starting_balls
        );
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Dome-shaped catcher whose centre rides the given point
pub fn default_catcher(center: Vec2) -> ArcSegment {
    ArcSegment::new(
        center,
        CATCHER_INNER_RADIUS,
        CATCHER_OUTER_RADIUS,
        -0.75 * PI,
        -0.25 * PI,
    )
}
