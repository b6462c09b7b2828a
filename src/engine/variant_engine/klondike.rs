use crate::engine::variant_engine::{VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, DrawMode, DrawResult, GameMode, PileId};

#[derive(Debug, Clone, Copy)]
pub struct KlondikeEngine;

impl VariantEngine for KlondikeEngine {
    fn mode(&self) -> GameMode {
        GameMode::Klondike
    }

    fn capabilities(&self) -> VariantCapabilities {
        VariantCapabilities {
            stock_draw: true,
            draw_mode_selection: true,
            tableau_moves: true,
            foundation_moves: true,
            auto_finish: true,
            ..VariantCapabilities::disabled()
        }
    }

    fn tableau_count(&self) -> usize {
        7
    }

    fn draw_stock(&self, state: &mut VariantStateStore) -> DrawResult {
        state.klondike_mut().draw_or_recycle()
    }

    fn set_draw_mode(&self, state: &mut VariantStateStore, draw_mode: DrawMode) -> bool {
        let game = state.klondike_mut();
        if game.draw_mode() == draw_mode {
            false
        } else {
            game.set_draw_mode(draw_mode);
            true
        }
    }

    fn can_move(&self, state: &VariantStateStore, src: PileId, start: usize, dst: PileId) -> bool {
        let game = state.klondike();
        match (src, dst) {
            (PileId::Waste, PileId::Tableau(d)) => game.can_move_waste_to_tableau(d),
            (PileId::Waste, PileId::Foundation(_)) => game.can_move_waste_to_foundation(),
            (PileId::Tableau(s), PileId::Tableau(d)) => {
                game.can_move_tableau_run_to_tableau(s, start, d)
            }
            (PileId::Tableau(s), PileId::Foundation(_)) => {
                game.can_move_tableau_top_to_foundation(s)
            }
            (PileId::Foundation(f), PileId::Tableau(d)) => {
                game.can_move_foundation_top_to_tableau(f, d)
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
        let game = state.klondike_mut();
        match (src, dst) {
            (PileId::Waste, PileId::Tableau(d)) => game.move_waste_to_tableau(d),
            (PileId::Tableau(s), PileId::Tableau(d)) => {
                game.move_tableau_run_to_tableau(s, start, d)
            }
            // Foundation-bound moves settle immediately on the synchronous
            // path; the animated path lifts and settles separately.
            (PileId::Waste | PileId::Tableau(_), PileId::Foundation(_)) => game
                .lift_for_foundation(src)
                .map(|card| game.settle_on_foundation(card))
                .unwrap_or(false),
            (PileId::Foundation(f), PileId::Tableau(d)) => {
                game.move_foundation_top_to_tableau(f, d)
            }
            _ => false,
        }
    }

    fn can_lift_for_foundation(&self, state: &VariantStateStore, source: PileId) -> bool {
        let game = state.klondike();
        match source {
            PileId::Waste => game.can_move_waste_to_foundation(),
            PileId::Tableau(s) => game.can_move_tableau_top_to_foundation(s),
            _ => false,
        }
    }

    fn lift_for_foundation(&self, state: &mut VariantStateStore, source: PileId) -> Option<Card> {
        state.klondike_mut().lift_for_foundation(source)
    }

    fn settle_on_foundation(&self, state: &mut VariantStateStore, card: Card) -> bool {
        state.klondike_mut().settle_on_foundation(card)
    }

    fn take_flip(&self, state: &mut VariantStateStore) -> Option<(PileId, Card)> {
        let game = state.klondike_mut();
        let col = game.take_last_flip()?;
        let entry = game.tableau_top(col)?;
        Some((PileId::Tableau(col), entry.card))
    }

    fn is_won(&self, state: &VariantStateStore) -> bool {
        state.klondike().is_won()
    }

    fn card_count(&self, state: &VariantStateStore) -> usize {
        state.klondike().card_count()
    }
}
