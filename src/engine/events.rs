//! Outbound event surface. The session pushes events into an injected
//! [`EventSink`]; no global dispatcher exists.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::game::{Card, PileId};

/// Audio hints for the host. The engine decides when a cue fires; the host
/// decides what it sounds like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    DealCard,
    CardFlip,
    CardPlace,
    CardReturn,
    FoundationMove,
    WinGame,
    GameStart,
    StockRefill,
    Firework,
    Error,
}

/// One frame of animation output: where each in-flight card (and fragment)
/// should be drawn this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub cards: Vec<FrameCard>,
    pub fragments: Vec<FrameFragment>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCard {
    pub card: Card,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub face_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFragment {
    pub card: Card,
    /// Cell of the 4x4 fragment grid this piece came from.
    pub grid_x: u8,
    pub grid_y: u8,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PileChanged { pile: PileId },
    CardFlipped { pile: PileId, card: Card },
    AnimationFrame(AnimationFrame),
    MoveRejected { reason: &'static str },
    GameWon,
    SoundCue(SoundCue),
}

pub trait EventSink {
    fn emit(&self, event: GameEvent);
}

/// Buffering sink for hosts that poll, and for tests.
#[derive(Debug, Clone, Default)]
pub struct QueueSink {
    queue: Rc<RefCell<VecDeque<GameEvent>>>,
}

impl QueueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl EventSink for QueueSink {
    fn emit(&self, event: GameEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}
