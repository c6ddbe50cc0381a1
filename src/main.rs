//! Mustyqatse headless runner
//!
//! Loads optional settings (first argument, JSON), builds the demo level and
//! lets a seeded autoplayer launch balls until the level is won or lost.
//!
//! Usage: `mustyqatse [settings.json] [seed]`

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use mustyqatse::Settings;
use mustyqatse::sim::{EventDispatcher, EventKind, GameEvent, GameState, LevelLayout, TickInput, tick};

/// Give up after this many ticks (about half an hour at 60 Hz)
const MAX_TICKS: u64 = 60 * 60 * 30;

const DEFAULT_SEED: u64 = 0x6d75_7374_7971;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mustyqatse (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run() -> Result<(), mustyqatse::SimError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    let layout = LevelLayout::demo();
    let mut state = GameState::new(&layout, settings)?;
    let mut rng = Pcg32::seed_from_u64(seed);

    let touched = Rc::new(Cell::new(0u32));
    let mut events = EventDispatcher::new();
    {
        let touched = Rc::clone(&touched);
        events.subscribe(EventKind::BlockTouched, move |_| touched.set(touched.get() + 1));
    }
    events.subscribe(EventKind::BallRemoved, |e| {
        if let GameEvent::BallRemoved { ball, reason, .. } = e {
            log::info!("ball {:?} gone ({:?})", ball, reason);
        }
    });

    log::info!(
        "Demo level: {} blocks, {} balls, seed {seed}",
        state.level.blocks().len(),
        state.available_balls
    );

    while !state.is_over() && state.time_ticks < MAX_TICKS {
        let mut input = TickInput::default();

        // Aim somewhere in the middle band once the field is clear of balls
        if state.balls.is_empty() {
            let x = rng.random_range(layout.width * 0.1..layout.width * 0.9);
            let y = rng.random_range(layout.height * 0.3..layout.height * 0.7);
            input.launch_toward = Some(Vec2::new(x, y));
        }

        // Chase the lowest ball
        input.catcher_target_x = state
            .balls
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos.x);

        tick(&mut state, &input, &mut events)?;
    }

    log::info!(
        "Finished after {} ticks and {} turns: {:?}, score {}, {} blocks touched, {} left",
        state.time_ticks,
        state.turn,
        state.phase,
        state.scoreboard.score,
        touched.get(),
        state.level.blocks().len()
    );
    println!("{:?} with score {}", state.phase, state.scoreboard.score);
    Ok(())
}
