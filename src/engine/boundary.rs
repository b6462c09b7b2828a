//! Thin façade over the active variant engine.
//!
//! The session and scheduler call these helpers instead of touching
//! concrete engines directly. That keeps variant-specific behavior behind a
//! stable API and makes it easier to add new modes without rewriting the
//! tick loop.

use crate::engine::variant_engine::{engine_for_mode, VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, DrawMode, DrawResult, GameMode, PileId};

fn engine(mode: GameMode) -> &'static dyn VariantEngine {
    let selected = engine_for_mode(mode);
    debug_assert_eq!(selected.mode(), mode);
    selected
}

pub fn capabilities(mode: GameMode) -> VariantCapabilities {
    engine(mode).capabilities()
}

pub fn tableau_count(mode: GameMode) -> usize {
    engine(mode).tableau_count()
}

pub fn freecell_count(mode: GameMode) -> usize {
    engine(mode).freecell_count()
}

pub fn draw_stock(state: &mut VariantStateStore, mode: GameMode) -> DrawResult {
    engine(mode).draw_stock(state)
}

pub fn set_draw_mode(state: &mut VariantStateStore, mode: GameMode, draw_mode: DrawMode) -> bool {
    engine(mode).set_draw_mode(state, draw_mode)
}

pub fn can_move(
    state: &VariantStateStore,
    mode: GameMode,
    src: PileId,
    start: usize,
    dst: PileId,
) -> bool {
    engine(mode).can_move(state, src, start, dst)
}

pub fn apply_move(
    state: &mut VariantStateStore,
    mode: GameMode,
    src: PileId,
    start: usize,
    dst: PileId,
) -> bool {
    engine(mode).apply_move(state, src, start, dst)
}

pub fn can_lift_for_foundation(state: &VariantStateStore, mode: GameMode, source: PileId) -> bool {
    engine(mode).can_lift_for_foundation(state, source)
}

pub fn lift_for_foundation(
    state: &mut VariantStateStore,
    mode: GameMode,
    source: PileId,
) -> Option<Card> {
    engine(mode).lift_for_foundation(state, source)
}

pub fn settle_on_foundation(state: &mut VariantStateStore, mode: GameMode, card: Card) -> bool {
    engine(mode).settle_on_foundation(state, card)
}

pub fn take_flip(state: &mut VariantStateStore, mode: GameMode) -> Option<(PileId, Card)> {
    engine(mode).take_flip(state)
}

pub fn is_won(state: &VariantStateStore, mode: GameMode) -> bool {
    engine(mode).is_won(state)
}

pub fn card_count(state: &VariantStateStore, mode: GameMode) -> usize {
    engine(mode).card_count(state)
}
