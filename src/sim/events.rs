//! Gameplay notifications for scoring, particles and sound
//!
//! Every kind of event is known up front, so the dispatcher keeps one handler
//! list per [`EventKind`] in a fixed array. Emitting an event nobody listens
//! to is a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BallId, BlockId};

/// Why a ball left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Fell below the floor
    Drained,
    /// Hit the bump cap
    BumpLimit,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched { ball: BallId, from: Vec2, toward: Vec2 },
    /// First contact with a block; later contacts with the same block are silent
    BlockTouched { block: BlockId, ball: BallId, pos: Vec2, points: u64, multiplier: f32 },
    CatcherBounce { ball: BallId, pos: Vec2 },
    BallRemoved { ball: BallId, pos: Vec2, reason: RemovalReason },
    /// A touched block was cleared at the end of a turn
    BlockCleared { block: BlockId, center: Vec2 },
    Won { score: u64 },
    Lost { score: u64 },
}

/// Discriminant of [`GameEvent`], used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    BallLaunched,
    BlockTouched,
    CatcherBounce,
    BallRemoved,
    BlockCleared,
    Won,
    Lost,
}

impl EventKind {
    pub const COUNT: usize = 7;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::BallLaunched,
        EventKind::BlockTouched,
        EventKind::CatcherBounce,
        EventKind::BallRemoved,
        EventKind::BlockCleared,
        EventKind::Won,
        EventKind::Lost,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::BallLaunched { .. } => EventKind::BallLaunched,
            GameEvent::BlockTouched { .. } => EventKind::BlockTouched,
            GameEvent::CatcherBounce { .. } => EventKind::CatcherBounce,
            GameEvent::BallRemoved { .. } => EventKind::BallRemoved,
            GameEvent::BlockCleared { .. } => EventKind::BlockCleared,
            GameEvent::Won { .. } => EventKind::Won,
            GameEvent::Lost { .. } => EventKind::Lost,
        }
    }
}

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Typed handler table, one list per event kind
pub struct EventDispatcher {
    handlers: [Vec<Handler>; EventKind::COUNT],
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(EventKind, usize)> = EventKind::ALL
            .iter()
            .map(|&k| (k, self.handlers[k.index()].len()))
            .collect();
        f.debug_struct("EventDispatcher").field("handlers", &counts).finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Default::default(),
        }
    }

    /// Register a handler; handlers run in subscription order
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&GameEvent) + 'static) {
        self.handlers[kind.index()].push(Box::new(handler));
    }

    pub fn emit(&mut self, event: &GameEvent) {
        log::trace!("event {:?}", event);
        for handler in &mut self.handlers[event.kind().index()] {
            handler(event);
        }
    }

    /// Number of handlers registered for `kind`
    pub fn listeners(&self, kind: EventKind) -> usize {
        self.handlers[kind.index()].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_kind_matches_variant() {
        let e = GameEvent::Won { score: 10 };
        assert_eq!(e.kind(), EventKind::Won);
        let e = GameEvent::BallRemoved {
            ball: BallId(1),
            pos: Vec2::ZERO,
            reason: RemovalReason::Drained,
        };
        assert_eq!(e.kind(), EventKind::BallRemoved);
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_emit_reaches_only_matching_handlers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let log = Rc::clone(&seen);
        dispatcher.subscribe(EventKind::Won, move |e| log.borrow_mut().push(e.clone()));
        let log = Rc::clone(&seen);
        dispatcher.subscribe(EventKind::Won, move |e| log.borrow_mut().push(e.clone()));

        dispatcher.emit(&GameEvent::Lost { score: 5 });
        assert!(seen.borrow().is_empty());

        dispatcher.emit(&GameEvent::Won { score: 7 });
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(dispatcher.listeners(EventKind::Won), 2);
        assert_eq!(dispatcher.listeners(EventKind::Lost), 0);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let mut dispatcher = EventDispatcher::default();
        dispatcher.emit(&GameEvent::BlockCleared {
            block: BlockId(3),
            center: Vec2::ONE,
        });
    }
}
