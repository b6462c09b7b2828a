use crate::engine::variant_engine::{VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, GameMode, PileId};

#[derive(Debug, Clone, Copy)]
pub struct FreecellEngine;

impl VariantEngine for FreecellEngine {
    fn mode(&self) -> GameMode {
        GameMode::Freecell
    }

    fn capabilities(&self) -> VariantCapabilities {
        VariantCapabilities {
            tableau_moves: true,
            foundation_moves: true,
            freecells: true,
            auto_finish: true,
            ..VariantCapabilities::disabled()
        }
    }

    fn tableau_count(&self) -> usize {
        8
    }

    fn freecell_count(&self) -> usize {
        4
    }

    fn can_move(&self, state: &VariantStateStore, src: PileId, start: usize, dst: PileId) -> bool {
        let game = state.freecell();
        match (src, dst) {
            (PileId::Tableau(s), PileId::Tableau(d)) => {
                game.can_move_tableau_run_to_tableau(s, start, d)
            }
            (PileId::Tableau(s), PileId::Freecell(cell)) => {
                game.can_move_tableau_top_to_freecell(s, cell)
            }
            (PileId::Tableau(s), PileId::Foundation(_)) => {
                game.can_move_tableau_top_to_foundation(s)
            }
            (PileId::Freecell(cell), PileId::Tableau(d)) => {
                game.can_move_freecell_to_tableau(cell, d)
            }
            (PileId::Freecell(cell), PileId::Foundation(_)) => {
                game.can_move_freecell_to_foundation(cell)
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
        let game = state.freecell_mut();
        match (src, dst) {
            (PileId::Tableau(s), PileId::Tableau(d)) => {
                game.move_tableau_run_to_tableau(s, start, d)
            }
            (PileId::Tableau(s), PileId::Freecell(cell)) => {
                game.move_tableau_top_to_freecell(s, cell)
            }
            (PileId::Freecell(cell), PileId::Tableau(d)) => {
                game.move_freecell_to_tableau(cell, d)
            }
            (PileId::Tableau(_) | PileId::Freecell(_), PileId::Foundation(_)) => game
                .lift_for_foundation(src)
                .map(|card| game.settle_on_foundation(card))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn can_lift_for_foundation(&self, state: &VariantStateStore, source: PileId) -> bool {
        let game = state.freecell();
        match source {
            PileId::Tableau(s) => game.can_move_tableau_top_to_foundation(s),
            PileId::Freecell(cell) => game.can_move_freecell_to_foundation(cell),
            _ => false,
        }
    }

    fn lift_for_foundation(&self, state: &mut VariantStateStore, source: PileId) -> Option<Card> {
        state.freecell_mut().lift_for_foundation(source)
    }

    fn settle_on_foundation(&self, state: &mut VariantStateStore, card: Card) -> bool {
        state.freecell_mut().settle_on_foundation(card)
    }

    fn is_won(&self, state: &VariantStateStore) -> bool {
        state.freecell().is_won()
    }

    fn card_count(&self, state: &VariantStateStore) -> usize {
        state.freecell().card_count()
    }
}
