//! Game state and core simulation types
//!
//! Balls carry no velocity field: motion is the difference between the
//! current and previous position (Verlet). Blocks are static shapes indexed
//! by a quadtree and kept sorted by id.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::circle::Circle;
use super::geometry::Aabb;
use super::layout::LevelLayout;
use super::quadtree::{Indexed, QuadTree};
use super::shape::{Collider, Shape};
use crate::error::SimError;
use crate::settings::{ScoringTuning, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Every block cleared
    Won,
    /// Out of balls with none in flight
    Lost,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    /// Position one tick ago
    pub prev: Vec2,
    pub radius: f32,
    /// Block contacts so far
    pub bumps: u32,
}

impl Ball {
    /// Ball at rest at `pos`
    pub fn new(id: BallId, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            prev: pos,
            radius,
            bumps: 0,
        }
    }

    /// Displacement per tick
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, self.radius)
    }

    /// Scale the current velocity by `1 + multiplier`
    pub fn accelerate(&mut self, multiplier: f32) {
        self.prev -= self.velocity() * multiplier;
    }

    pub fn accelerate_in_direction(&mut self, angle: f32, amount: f32) {
        self.prev -= Vec2::new(angle.cos(), angle.sin()) * amount;
    }

    /// Add `amount` of velocity toward `target`; no-op when already there
    pub fn accelerate_towards(&mut self, target: Vec2, amount: f32) {
        self.prev -= (target - self.pos).normalize_or_zero() * amount;
    }

    /// One Verlet step. Gravity biases the previous position so it shows up
    /// as velocity on the next step.
    pub fn integrate(&mut self, gravity: f32, friction: f32) {
        let old = self.pos;
        self.pos = self.pos * (2.0 - friction) - self.prev * (1.0 - friction);
        self.prev = old;
        self.prev.y -= gravity;
    }
}

/// A static block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BlockRecord")]
pub struct Block {
    pub id: BlockId,
    pub shape: Shape,
    /// Hit at least once; cleared at the end of the turn
    pub touched: bool,
    /// Cached at construction, the index relies on it not changing
    #[serde(skip_serializing)]
    bounds: Aabb,
}

/// Serialized form of a block; bounds are always recomputed from the shape
#[derive(Deserialize)]
struct BlockRecord {
    id: BlockId,
    shape: Shape,
    #[serde(default)]
    touched: bool,
}

impl From<BlockRecord> for Block {
    fn from(r: BlockRecord) -> Self {
        Self {
            touched: r.touched,
            ..Self::new(r.id, r.shape)
        }
    }
}

impl Block {
    pub fn new(id: BlockId, shape: Shape) -> Self {
        let bounds = shape.bounding_box();
        Self {
            id,
            shape,
            touched: false,
            bounds,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl Indexed for Block {
    type Key = BlockId;

    fn key(&self) -> BlockId {
        self.id
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Where new balls appear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub shape: Circle,
}

impl Emitter {
    pub fn position(&self) -> Vec2 {
        self.shape.center
    }
}

/// The player's paddle: an arc that eases toward a target x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    pub arc: ArcSegment,
    /// Fraction of the remaining distance covered per tick
    pub follow: f32,
}

impl Catcher {
    pub fn new(arc: ArcSegment, follow: f32) -> Self {
        Self { arc, follow }
    }

    pub fn center(&self) -> Vec2 {
        self.arc.center
    }

    pub fn follow_x(&mut self, target_x: f32) {
        let x = self.arc.center.x;
        self.arc.center.x = x * (1.0 - self.follow) + target_x * self.follow;
    }

    pub fn bounds(&self) -> Aabb {
        self.arc.bounding_box()
    }
}

/// Blocks plus the quadtree over them
#[derive(Debug, Clone)]
pub struct Level {
    bounds: Aabb,
    /// Sorted by id
    blocks: Vec<Block>,
    index: QuadTree<BlockId>,
    index_depth: u32,
    next_block_id: u32,
}

impl Level {
    pub fn new(bounds: Aabb, index_depth: u32) -> Self {
        Self {
            bounds,
            blocks: Vec::new(),
            index: QuadTree::new(bounds, index_depth),
            index_depth,
            next_block_id: 1,
        }
    }

    pub fn from_layout(layout: &LevelLayout, index_depth: u32) -> Result<Self, SimError> {
        let bounds = Aabb::new(0.0, 0.0, layout.width, layout.height);
        let mut level = Self::new(bounds, index_depth);
        for shape in &layout.shapes {
            let id = level.allocate_id();
            level.blocks.push(Block::new(id, shape.clone()));
        }
        level.rebuild_index()?;
        log::info!("Level ready: {} blocks", level.blocks.len());
        Ok(level)
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    /// Field rectangle; walls are its left and right edges, the floor its bottom
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.position(id).ok().map(|i| &self.blocks[i])
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.position(id).ok().map(|i| &mut self.blocks[i])
    }

    fn position(&self, id: BlockId) -> Result<usize, usize> {
        self.blocks.binary_search_by_key(&id, |b| b.id)
    }

    pub fn index(&self) -> &QuadTree<BlockId> {
        &self.index
    }

    /// Ids of blocks whose boxes touch `rect`, in id order
    pub fn candidates(&self, rect: &Aabb) -> BTreeSet<BlockId> {
        self.index.query(rect)
    }

    pub fn add_block(&mut self, shape: Shape) -> BlockId {
        let id = self.allocate_id();
        let block = Block::new(id, shape);
        self.index.insert(&block);
        // Fresh ids are the largest, so pushing keeps the order
        self.blocks.push(block);
        id
    }

    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, SimError> {
        let pos = self.position(id).map_err(|_| SimError::UnknownBlock(id))?;
        self.index.remove(&self.blocks[pos])?;
        Ok(self.blocks.remove(pos))
    }

    /// Take out every touched block. The index is left stale; call
    /// [`Level::rebuild_index`] afterwards.
    pub fn drain_touched(&mut self) -> Vec<Block> {
        let (touched, kept): (Vec<Block>, Vec<Block>) =
            std::mem::take(&mut self.blocks).into_iter().partition(|b| b.touched);
        self.blocks = kept;
        touched
    }

    /// Throw the index away and build a new one over the remaining blocks
    pub fn rebuild_index(&mut self) -> Result<(), SimError> {
        self.index = QuadTree::build(&self.blocks, Some(self.bounds), self.index_depth)?;
        log::debug!("Rebuilt block index over {} blocks", self.blocks.len());
        Ok(())
    }
}

/// Score and the per-turn multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub multiplier: f32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            multiplier: 1.0,
        }
    }
}

impl Scoreboard {
    /// Award a first touch, returning the points given
    pub fn award(&mut self, tuning: &ScoringTuning) -> u64 {
        let points = (tuning.base_points as f32 * self.multiplier).round() as u64;
        self.score += points;
        self.multiplier += tuning.multiplier_step;
        points
    }

    pub fn reset_multiplier(&mut self) {
        self.multiplier = 1.0;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub level: Level,
    pub emitter: Emitter,
    pub catcher: Catcher,
    /// Balls in flight (sorted by id for determinism)
    pub balls: Vec<Ball>,
    /// Balls left to launch
    pub available_balls: u32,
    pub scoreboard: Scoreboard,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Turns started so far
    pub turn: u32,
    next_ball_id: u32,
}

impl GameState {
    pub fn new(layout: &LevelLayout, settings: Settings) -> Result<Self, SimError> {
        let level = Level::from_layout(layout, settings.physics.index_depth)?;
        let catcher = Catcher::new(layout.catcher.clone(), settings.catcher_follow);
        Ok(Self {
            level,
            emitter: Emitter {
                shape: layout.emitter.clone(),
            },
            catcher,
            balls: Vec::new(),
            available_balls: layout.starting_balls,
            scoreboard: Scoreboard::default(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            turn: 0,
            next_ball_id: 1,
            settings,
        })
    }

    /// Demo level with default settings
    pub fn demo() -> Result<Self, SimError> {
        Self::new(&LevelLayout::demo(), Settings::default())
    }

    /// Place a resting ball at `pos` without spending from the budget
    pub fn spawn_ball(&mut self, pos: Vec2) -> BallId {
        let id = BallId(self.next_ball_id);
        self.next_ball_id += 1;
        self.balls.push(Ball::new(id, pos, self.settings.launch.ball_radius));
        id
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }
}
