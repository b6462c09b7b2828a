use crate::engine::variant_engine::{VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{DrawResult, GameMode, PileId, PyramidPick};

#[derive(Debug, Clone, Copy)]
pub struct PyramidEngine;

fn pick_for(pile: PileId) -> Option<PyramidPick> {
    match pile {
        PileId::Pyramid(index) => Some(PyramidPick::Slot(index)),
        PileId::Waste => Some(PyramidPick::Waste),
        _ => None,
    }
}

impl VariantEngine for PyramidEngine {
    fn mode(&self) -> GameMode {
        GameMode::Pyramid
    }

    fn capabilities(&self) -> VariantCapabilities {
        VariantCapabilities {
            stock_draw: true,
            pair_removal: true,
            ..VariantCapabilities::disabled()
        }
    }

    fn draw_stock(&self, state: &mut VariantStateStore) -> DrawResult {
        state.pyramid_mut().draw_or_recycle()
    }

    /// A pair removal is addressed as a move between the two picks; a lone
    /// King is a move to the discard.
    fn can_move(&self, state: &VariantStateStore, src: PileId, _start: usize, dst: PileId) -> bool {
        let game = state.pyramid();
        if dst == PileId::Discard {
            return pick_for(src).is_some_and(|pick| game.can_remove_king(pick));
        }
        match (pick_for(src), pick_for(dst)) {
            (Some(a), Some(b)) => game.can_remove_pair(a, b),
            _ => false,
        }
    }

    fn apply_move(
        &self,
        state: &mut VariantStateStore,
        src: PileId,
        _start: usize,
        dst: PileId,
    ) -> bool {
        let game = state.pyramid_mut();
        if dst == PileId::Discard {
            return pick_for(src).is_some_and(|pick| game.remove_king(pick));
        }
        match (pick_for(src), pick_for(dst)) {
            (Some(a), Some(b)) => game.remove_pair(a, b),
            _ => false,
        }
    }

    fn is_won(&self, state: &VariantStateStore) -> bool {
        state.pyramid().is_won()
    }

    fn card_count(&self, state: &VariantStateStore) -> usize {
        state.pyramid().card_count()
    }
}
