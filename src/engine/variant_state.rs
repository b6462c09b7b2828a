use crate::engine::intents::ModeConfig;
use crate::game::{
    FreecellGame, GameMode, KlondikeGame, PyramidGame, SpiderGame, ThirtyOneGame,
};

/// Holds one live game per variant so switching modes never loses a deal in
/// progress. The session owns exactly one store.
#[derive(Debug, Clone)]
pub struct VariantStateStore {
    klondike: KlondikeGame,
    spider: SpiderGame,
    freecell: FreecellGame,
    pyramid: PyramidGame,
    thirty_one: ThirtyOneGame,
}

impl VariantStateStore {
    pub fn new(seed: u64, config: &ModeConfig) -> Self {
        let mut klondike = KlondikeGame::new_with_seed(seed);
        klondike.set_draw_mode(config.draw_mode);
        Self {
            klondike,
            spider: SpiderGame::new_with_seed_and_mode(seed, config.spider_suits),
            freecell: FreecellGame::new_with_seed_and_card_count(seed, config.freecell_cards),
            pyramid: PyramidGame::new_with_seed(seed),
            thirty_one: ThirtyOneGame::new_with_seed(seed, config.thirty_one_players),
        }
    }

    /// Re-deals only the named variant; the other four keep their state.
    pub fn reset_mode(&mut self, mode: GameMode, seed: u64, config: &ModeConfig) {
        match mode {
            GameMode::Klondike => {
                self.klondike = KlondikeGame::new_with_seed(seed);
                self.klondike.set_draw_mode(config.draw_mode);
            }
            GameMode::Spider => {
                self.spider = SpiderGame::new_with_seed_and_mode(seed, config.spider_suits);
            }
            GameMode::Freecell => {
                self.freecell =
                    FreecellGame::new_with_seed_and_card_count(seed, config.freecell_cards);
            }
            GameMode::Pyramid => {
                self.pyramid = PyramidGame::new_with_seed(seed);
            }
            GameMode::ThirtyOne => {
                self.thirty_one = ThirtyOneGame::new_with_seed(seed, config.thirty_one_players);
            }
        }
    }

    pub fn klondike(&self) -> &KlondikeGame {
        &self.klondike
    }

    pub fn klondike_mut(&mut self) -> &mut KlondikeGame {
        &mut self.klondike
    }

    pub fn spider(&self) -> &SpiderGame {
        &self.spider
    }

    pub fn spider_mut(&mut self) -> &mut SpiderGame {
        &mut self.spider
    }

    pub fn freecell(&self) -> &FreecellGame {
        &self.freecell
    }

    pub fn freecell_mut(&mut self) -> &mut FreecellGame {
        &mut self.freecell
    }

    pub fn pyramid(&self) -> &PyramidGame {
        &self.pyramid
    }

    pub fn pyramid_mut(&mut self) -> &mut PyramidGame {
        &mut self.pyramid
    }

    pub fn thirty_one(&self) -> &ThirtyOneGame {
        &self.thirty_one
    }

    pub fn thirty_one_mut(&mut self) -> &mut ThirtyOneGame {
        &mut self.thirty_one
    }

    /// Cards currently held by the named variant's piles. In-flight
    /// mutation-bearing cards are accounted for by the scheduler.
    pub fn pile_card_count(&self, mode: GameMode) -> usize {
        match mode {
            GameMode::Klondike => self.klondike.card_count(),
            GameMode::Spider => self.spider.card_count(),
            GameMode::Freecell => self.freecell.card_count(),
            GameMode::Pyramid => self.pyramid.card_count(),
            GameMode::ThirtyOne => self.thirty_one.card_count(),
        }
    }
}
