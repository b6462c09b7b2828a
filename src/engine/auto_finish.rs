//! Greedy auto-finish scan: freecells in index order, then tableau tops in
//! index order; the first card with a legal foundation destination wins.
//! The session launches one FoundationMove per step and the scheduler
//! re-invokes the driver through follow-up ticks, never recursion.

use tracing::debug;

use crate::engine::boundary;
use crate::engine::variant_state::VariantStateStore;
use crate::game::{GameMode, PileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoFinishMove {
    pub source: PileId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoFinishDriver {
    active: bool,
}

impl AutoFinishDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self, mode: GameMode) -> bool {
        if !boundary::capabilities(mode).auto_finish {
            return false;
        }
        self.active = true;
        true
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// The next foundation-bound source, or `None` when a full scan comes
    /// up empty. An empty scan deactivates the driver.
    pub fn next_move(&mut self, state: &VariantStateStore, mode: GameMode) -> Option<AutoFinishMove> {
        if !self.active {
            return None;
        }

        for cell in 0..boundary::freecell_count(mode) {
            let source = PileId::Freecell(cell);
            if boundary::can_lift_for_foundation(state, mode, source) {
                debug!(?source, "auto-finish step");
                return Some(AutoFinishMove { source });
            }
        }
        for col in 0..boundary::tableau_count(mode) {
            let source = PileId::Tableau(col);
            if boundary::can_lift_for_foundation(state, mode, source) {
                debug!(?source, "auto-finish step");
                return Some(AutoFinishMove { source });
            }
        }

        debug!("auto-finish scan empty");
        self.active = false;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::intents::ModeConfig;
    use crate::game::{Card, Suit, TableauCard, ACE};

    fn store_with_empty_games() -> VariantStateStore {
        VariantStateStore::new(11, &ModeConfig::default())
    }

    #[test]
    fn activation_respects_capabilities() {
        let mut driver = AutoFinishDriver::new();
        assert!(driver.activate(GameMode::Klondike));
        assert!(driver.activate(GameMode::Freecell));
        assert!(!driver.activate(GameMode::Pyramid));
        assert!(!driver.activate(GameMode::ThirtyOne));
    }

    #[test]
    fn freecells_are_scanned_before_tableau_tops() {
        let mut state = store_with_empty_games();
        let game = state.freecell_mut();
        *game = crate::game::FreecellGame::debug_empty();
        game.debug_freecells_mut()[2] = Some(Card::new(Suit::Hearts, ACE));
        game.debug_tableau_mut()[0].push(TableauCard::face_up(Card::new(Suit::Spades, ACE)));

        let mut driver = AutoFinishDriver::new();
        driver.activate(GameMode::Freecell);
        let step = driver.next_move(&state, GameMode::Freecell);
        assert_eq!(step, Some(AutoFinishMove { source: PileId::Freecell(2) }));
    }

    #[test]
    fn empty_scan_deactivates() {
        let mut state = store_with_empty_games();
        *state.klondike_mut() = crate::game::KlondikeGame::debug_empty();

        let mut driver = AutoFinishDriver::new();
        driver.activate(GameMode::Klondike);
        assert_eq!(driver.next_move(&state, GameMode::Klondike), None);
        assert!(!driver.is_active());
    }
}
