use crate::engine::variant_engine::{VariantCapabilities, VariantEngine};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, DrawResult, GameMode, PileId};

#[derive(Debug, Clone, Copy)]
pub struct SpiderEngine;

impl VariantEngine for SpiderEngine {
    fn mode(&self) -> GameMode {
        GameMode::Spider
    }

    fn capabilities(&self) -> VariantCapabilities {
        VariantCapabilities {
            stock_draw: true,
            tableau_moves: true,
            ..VariantCapabilities::disabled()
        }
    }

    fn tableau_count(&self) -> usize {
        10
    }

    fn draw_stock(&self, state: &mut VariantStateStore) -> DrawResult {
        state.spider_mut().deal_from_stock()
    }

    fn can_move(&self, state: &VariantStateStore, src: PileId, start: usize, dst: PileId) -> bool {
        match (src, dst) {
            (PileId::Tableau(s), PileId::Tableau(d)) => state.spider().can_move_run(s, start, d),
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
        match (src, dst) {
            (PileId::Tableau(s), PileId::Tableau(d)) => state.spider_mut().move_run(s, start, d),
            _ => false,
        }
    }

    fn take_flip(&self, state: &mut VariantStateStore) -> Option<(PileId, Card)> {
        let game = state.spider_mut();
        let col = game.take_last_flip()?;
        let entry = game.tableau_top(col)?;
        Some((PileId::Tableau(col), entry.card))
    }

    fn is_won(&self, state: &VariantStateStore) -> bool {
        state.spider().is_won()
    }

    fn card_count(&self, state: &VariantStateStore) -> usize {
        state.spider().card_count()
    }
}
