use crate::engine::variant_engine::{VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{DrawResult, GameMode, PileId};

#[derive(Debug, Clone, Copy)]
pub struct ThirtyOneEngine;

impl VariantEngine for ThirtyOneEngine {
    fn mode(&self) -> GameMode {
        GameMode::ThirtyOne
    }

    fn capabilities(&self) -> VariantCapabilities {
        VariantCapabilities {
            stock_draw: true,
            turn_machine: true,
            ..VariantCapabilities::disabled()
        }
    }

    fn draw_stock(&self, state: &mut VariantStateStore) -> DrawResult {
        if state.thirty_one_mut().draw_from_stock() {
            DrawResult::DrewFromStock
        } else {
            DrawResult::NoOp
        }
    }

    /// The turn machine maps onto pile moves: draw targets the current
    /// player's hand, discarding targets the discard pile. Knock and
    /// lay-down go through the session's dedicated calls.
    fn can_move(&self, state: &VariantStateStore, src: PileId, start: usize, dst: PileId) -> bool {
        let game = state.thirty_one();
        match (src, dst) {
            (PileId::Stock, PileId::Hand(p)) => {
                p == game.current_player() && game.can_draw_from_stock()
            }
            (PileId::Discard, PileId::Hand(p)) => {
                p == game.current_player() && game.can_draw_from_discard()
            }
            (PileId::Hand(p), PileId::Discard) => {
                p == game.current_player() && game.can_discard(start)
            }
            _ => false,
        }
    }

    fn apply_move(
        &self,
        state: &mut VariantStateStore,
        src: PileId,
        start: usize,
        dst: PileId,
    ) -> bool {
        if !self.can_move(state, src, start, dst) {
            return false;
        }
        let game = state.thirty_one_mut();
        match (src, dst) {
            (PileId::Stock, PileId::Hand(_)) => game.draw_from_stock(),
            (PileId::Discard, PileId::Hand(_)) => game.draw_from_discard(),
            (PileId::Hand(_), PileId::Discard) => game.discard(start),
            _ => false,
        }
    }

    fn is_won(&self, state: &VariantStateStore) -> bool {
        state.thirty_one().is_won()
    }

    fn card_count(&self, state: &VariantStateStore) -> usize {
        state.thirty_one().card_count()
    }
}
