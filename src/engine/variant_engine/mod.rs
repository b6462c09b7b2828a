//! Engine dispatch and capability surface for the game variants.
//!
//! Extension point for new variants:
//! 1. Add a concrete engine type and implement [`VariantEngine`].
//! 2. Register it in [`ENGINE_REGISTRY`].
//! 3. Ensure [`crate::engine::variant`] has matching metadata.

use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, DrawMode, DrawResult, GameMode, PileId};

mod freecell;
mod klondike;
mod pyramid;
mod spider;
mod thirty_one;

pub use freecell::FreecellEngine;
pub use klondike::KlondikeEngine;
pub use pyramid::PyramidEngine;
pub use spider::SpiderEngine;
pub use thirty_one::ThirtyOneEngine;

/// What a variant supports. The session consults this instead of matching
/// on [`GameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantCapabilities {
    pub stock_draw: bool,
    pub draw_mode_selection: bool,
    pub tableau_moves: bool,
    pub foundation_moves: bool,
    pub freecells: bool,
    pub pair_removal: bool,
    pub turn_machine: bool,
    pub auto_finish: bool,
}

impl VariantCapabilities {
    pub const fn disabled() -> Self {
        Self {
            stock_draw: false,
            draw_mode_selection: false,
            tableau_moves: false,
            foundation_moves: false,
            freecells: false,
            pair_removal: false,
            turn_machine: false,
            auto_finish: false,
        }
    }
}

/// One engine per variant, stateless; all game state lives in the
/// [`VariantStateStore`]. Defaults answer "unsupported" so each engine only
/// overrides what its variant actually does.
pub trait VariantEngine: Sync {
    fn mode(&self) -> GameMode;

    fn capabilities(&self) -> VariantCapabilities;

    fn tableau_count(&self) -> usize {
        0
    }

    fn freecell_count(&self) -> usize {
        0
    }

    fn draw_stock(&self, _state: &mut VariantStateStore) -> DrawResult {
        DrawResult::NoOp
    }

    fn set_draw_mode(&self, _state: &mut VariantStateStore, _draw_mode: DrawMode) -> bool {
        false
    }

    fn can_move(
        &self,
        _state: &VariantStateStore,
        _src: PileId,
        _start: usize,
        _dst: PileId,
    ) -> bool {
        false
    }

    fn apply_move(
        &self,
        _state: &mut VariantStateStore,
        _src: PileId,
        _start: usize,
        _dst: PileId,
    ) -> bool {
        false
    }

    fn can_lift_for_foundation(&self, _state: &VariantStateStore, _source: PileId) -> bool {
        false
    }

    /// Pops the foundation-bound card so it can fly; the scheduler settles
    /// it via [`settle_on_foundation`](Self::settle_on_foundation) on
    /// arrival or cancellation.
    fn lift_for_foundation(&self, _state: &mut VariantStateStore, _source: PileId) -> Option<Card> {
        None
    }

    fn settle_on_foundation(&self, _state: &mut VariantStateStore, _card: Card) -> bool {
        false
    }

    /// Drains the column flip recorded by the last successful mutation.
    fn take_flip(&self, _state: &mut VariantStateStore) -> Option<(PileId, Card)> {
        None
    }

    fn is_won(&self, state: &VariantStateStore) -> bool;

    /// Cards resident in this variant's piles. The conservation check adds
    /// in-flight mutation-bearing cards on top.
    fn card_count(&self, state: &VariantStateStore) -> usize;
}

const KLONDIKE_ENGINE: KlondikeEngine = KlondikeEngine;
const SPIDER_ENGINE: SpiderEngine = SpiderEngine;
const FREECELL_ENGINE: FreecellEngine = FreecellEngine;
const PYRAMID_ENGINE: PyramidEngine = PyramidEngine;
const THIRTY_ONE_ENGINE: ThirtyOneEngine = ThirtyOneEngine;

const ENGINE_REGISTRY: [&'static dyn VariantEngine; 5] = [
    &KLONDIKE_ENGINE,
    &SPIDER_ENGINE,
    &FREECELL_ENGINE,
    &PYRAMID_ENGINE,
    &THIRTY_ONE_ENGINE,
];

pub fn all_engines() -> &'static [&'static dyn VariantEngine] {
    &ENGINE_REGISTRY
}

pub fn engine_for_mode(mode: GameMode) -> &'static dyn VariantEngine {
    all_engines()
        .iter()
        .copied()
        .find(|engine| engine.mode() == mode)
        .unwrap_or(&KLONDIKE_ENGINE)
}
