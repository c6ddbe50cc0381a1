//! Fixed timestep simulation tick
//!
//! Advances every ball one Verlet step, resolves walls, blocks and the
//! catcher, retires drained or runaway balls, and runs the turn logic.

use glam::Vec2;

use super::collision::{ball_penetration, bounce};
use super::events::{EventDispatcher, GameEvent, RemovalReason};
use super::state::{Ball, BallId, GamePhase, GameState, Level, Scoreboard};
use crate::error::SimError;
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x the catcher chases
    pub catcher_target_x: Option<f32>,
    /// Launch a ball toward this point (click)
    pub launch_toward: Option<Vec2>,
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing once the game is won or lost.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    events: &mut EventDispatcher,
) -> Result<(), SimError> {
    if state.is_over() {
        return Ok(());
    }

    state.time_ticks += 1;

    if let Some(target) = input.launch_toward {
        launch(state, target, events)?;
        if state.is_over() {
            return Ok(());
        }
    }

    step_balls(state, events);

    if let Some(x) = input.catcher_target_x {
        state.catcher.follow_x(x);
    }

    let removed = retire_balls(state, events);
    if removed > 0 && state.balls.is_empty() {
        new_turn(state, events)?;
    }

    Ok(())
}

/// Integrate and collide every ball in flight
fn step_balls(state: &mut GameState, events: &mut EventDispatcher) {
    let GameState {
        settings,
        level,
        catcher,
        balls,
        scoreboard,
        ..
    } = state;
    let physics = settings.physics;
    let bounds = level.bounds();

    for ball in balls.iter_mut() {
        ball.integrate(physics.gravity, physics.friction);

        // Walls flip horizontal motion without pushing the ball back in
        if ball.pos.x < bounds.left() + ball.radius || ball.pos.x + ball.radius > bounds.right() {
            std::mem::swap(&mut ball.pos.x, &mut ball.prev.x);
        }

        collide_blocks(ball, level, scoreboard, settings, events);

        if catcher.bounds().intersects(&ball.bounds())
            && ball_penetration(ball, &catcher.arc).is_some()
            && bounce(ball, catcher.center()).is_some()
        {
            log::trace!("ball {:?} bounced off the catcher at {}", ball.id, ball.pos);
            events.emit(&GameEvent::CatcherBounce {
                ball: ball.id,
                pos: ball.pos,
            });
        }
    }
}

fn collide_blocks(
    ball: &mut Ball,
    level: &mut Level,
    scoreboard: &mut Scoreboard,
    settings: &Settings,
    events: &mut EventDispatcher,
) {
    for id in level.candidates(&ball.bounds()) {
        let Some(block) = level.block_mut(id) else {
            log::warn!("index returned missing block {:?}", id);
            continue;
        };
        let Some(penetration) = ball_penetration(ball, &block.shape) else {
            continue;
        };

        // A zero penetration (centre deep inside a polygon) has no line to
        // bounce along, the contact still counts
        let anchor = ball.pos + penetration;
        bounce(ball, anchor);
        ball.bumps += 1;
        log::trace!("ball {:?} hit block {:?} (bump {})", ball.id, id, ball.bumps);

        if !block.touched {
            block.touched = true;
            let multiplier = scoreboard.multiplier;
            let points = scoreboard.award(&settings.scoring);
            events.emit(&GameEvent::BlockTouched {
                block: id,
                ball: ball.id,
                pos: ball.pos,
                points,
                multiplier,
            });
        }
    }
}

/// Remove balls below the floor or over the bump cap; returns how many went
fn retire_balls(state: &mut GameState, events: &mut EventDispatcher) -> usize {
    let floor = state.level.bounds().bottom();
    let max_bumps = state.settings.physics.max_bumps;
    let before = state.balls.len();

    state.balls.retain(|ball| {
        let reason = if ball.pos.y > floor + ball.radius {
            RemovalReason::Drained
        } else if ball.bumps > max_bumps {
            RemovalReason::BumpLimit
        } else {
            return true;
        };
        log::debug!("ball {:?} removed: {:?} at {}", ball.id, reason, ball.pos);
        events.emit(&GameEvent::BallRemoved {
            ball: ball.id,
            pos: ball.pos,
            reason,
        });
        false
    });

    before - state.balls.len()
}

/// Spend a ball (if any are left) toward `target`, then start a new turn
pub fn launch(
    state: &mut GameState,
    target: Vec2,
    events: &mut EventDispatcher,
) -> Result<Option<BallId>, SimError> {
    if state.is_over() {
        return Ok(None);
    }

    let mut launched = None;
    if state.available_balls > 0 {
        state.available_balls -= 1;
        let from = state.emitter.position();
        let acceleration = state.settings.launch.acceleration;
        let id = state.spawn_ball(from);
        if let Some(ball) = state.ball_mut(id) {
            ball.accelerate_towards(target, acceleration);
        }
        log::debug!("launched ball {:?} toward {} ({} left)", id, target, state.available_balls);
        events.emit(&GameEvent::BallLaunched {
            ball: id,
            from,
            toward: target,
        });
        launched = Some(id);
    }

    new_turn(state, events)?;
    Ok(launched)
}

/// Close the current turn: reset the multiplier, clear touched blocks and
/// check for a win or a loss
pub fn new_turn(state: &mut GameState, events: &mut EventDispatcher) -> Result<(), SimError> {
    state.turn += 1;
    state.scoreboard.reset_multiplier();

    let cleared = state.level.drain_touched();

    if state.level.blocks().is_empty() {
        state.phase = GamePhase::Won;
        log::info!("Level cleared on turn {}, score {}", state.turn, state.scoreboard.score);
        events.emit(&GameEvent::Won {
            score: state.scoreboard.score,
        });
    } else if state.available_balls == 0 && state.balls.is_empty() {
        state.phase = GamePhase::Lost;
        log::info!(
            "Out of balls on turn {} with {} blocks left, score {}",
            state.turn,
            state.level.blocks().len(),
            state.scoreboard.score
        );
        events.emit(&GameEvent::Lost {
            score: state.scoreboard.score,
        });
    } else {
        log::info!("Turn {}: {} balls left", state.turn, state.available_balls);
    }

    for block in &cleared {
        events.emit(&GameEvent::BlockCleared {
            block: block.id,
            center: block.bounds().center(),
        });
    }

    if !cleared.is_empty() {
        state.level.rebuild_index()?;
    }

    Ok(())
}
