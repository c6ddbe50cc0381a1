//! Game settings and physics tuning
//!
//! Loaded from JSON; every field falls back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Verlet dynamics and broadphase tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Per-tick bias subtracted from the previous y position
    pub gravity: f32,
    /// Fraction of implicit velocity lost each tick
    pub friction: f32,
    /// Contacts allowed before a ball is retired
    pub max_bumps: u32,
    /// Maximum quadtree depth
    pub index_depth: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            max_bumps: MAX_BUMPS,
            index_depth: INDEX_DEPTH,
        }
    }
}

/// Ball launch tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchTuning {
    pub ball_radius: f32,
    /// Initial displacement per tick toward the aim point
    pub acceleration: f32,
}

impl Default for LaunchTuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            acceleration: LAUNCH_ACCELERATION,
        }
    }
}

/// Score awarded on first contact with a block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub base_points: u64,
    /// Multiplier growth per touched block, reset every turn
    pub multiplier_step: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            base_points: BASE_POINTS,
            multiplier_step: MULTIPLIER_STEP,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub launch: LaunchTuning,
    pub scoring: ScoringTuning,
    /// Easing factor the catcher uses to chase its target x
    pub catcher_follow: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            launch: LaunchTuning::default(),
            scoring: ScoringTuning::default(),
            catcher_follow: CATCHER_FOLLOW,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Frictionless, gravity-free physics (handy for deterministic checks)
    pub fn frictionless() -> Self {
        let mut settings = Self::default();
        settings.physics.gravity = 0.0;
        settings.physics.friction = 0.0;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "physics": { "gravity": 0.1 } }"#).unwrap();
        assert_eq!(settings.physics.gravity, 0.1);
        assert_eq!(settings.physics.friction, FRICTION);
        assert_eq!(settings.physics.index_depth, INDEX_DEPTH);
        assert_eq!(settings.launch, LaunchTuning::default());
        assert_eq!(settings.catcher_follow, CATCHER_FOLLOW);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.scoring.base_points = 250;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Settings::from_json("{ physics: ").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
