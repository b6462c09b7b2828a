//! Win fireworks: foundation cards launched ballistically, exploding into
//! fragment grids. Runs until cancelled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::animation::{ticks_for_ms, AnimatedCard, AnimationTuning, Fragment};
use crate::engine::layout::TableLayout;
use crate::game::{Card, PileId};

/// Fragment grid is 4x4 per exploded card.
pub const FRAGMENT_GRID: u8 = 4;

#[derive(Debug, Clone)]
pub struct Celebration {
    rng: StdRng,
    /// Cards cycled through as launch sources, with their foundation slot.
    sources: Vec<(Card, usize)>,
    next_source: usize,
    launch_countdown: u32,
    cards: Vec<AnimatedCard>,
    fragments: Vec<Fragment>,
}

impl Celebration {
    /// Seeded so a replayed win celebrates identically.
    pub fn new(seed: u64, sources: Vec<(Card, usize)>, tuning: &AnimationTuning) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sources,
            next_source: 0,
            launch_countdown: ticks_for_ms(tuning.celebration_launch_ms),
            cards: Vec::new(),
            fragments: Vec::new(),
        }
    }

    pub fn cards(&self) -> &[AnimatedCard] {
        &self.cards
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// One tick: launch when the countdown elapses, advance every card and
    /// fragment, explode cards inside the band, drop what left the table.
    /// Returns how many cards exploded this tick.
    pub fn tick(&mut self, layout: &TableLayout, tuning: &AnimationTuning) -> usize {
        self.launch_countdown = self.launch_countdown.saturating_sub(1);
        if self.launch_countdown == 0 && !self.sources.is_empty() {
            self.launch(layout, tuning);
            self.launch_countdown = ticks_for_ms(tuning.celebration_launch_ms);
        }

        for flight in &mut self.cards {
            flight.advance(tuning.gravity);
        }
        for fragment in &mut self.fragments {
            fragment.advance(tuning.gravity);
        }

        let exploded = self.explode_in_band(layout, tuning);

        let floor = layout.off_screen_bottom();
        self.cards.retain(|flight| flight.y < floor);
        self.fragments.retain(|fragment| fragment.y < floor);
        exploded
    }

    fn launch(&mut self, layout: &TableLayout, tuning: &AnimationTuning) {
        let (card, slot) = self.sources[self.next_source % self.sources.len()];
        self.next_source = (self.next_source + 1) % self.sources.len();

        let at = layout.slot_center(PileId::Foundation(slot), 0);
        let velocity_x = self.rng.gen_range(-4.0..4.0);
        let velocity_y = -tuning.launch_speed * self.rng.gen_range(0.8..1.2);
        let spin = self.rng.gen_range(-0.25..0.25);
        self.cards
            .push(AnimatedCard::ballistic(card, at, (velocity_x, velocity_y), spin));
    }

    fn explode_in_band(&mut self, layout: &TableLayout, tuning: &AnimationTuning) -> usize {
        let band_top = layout.metrics.height * tuning.explosion_band_top;
        let band_bottom = layout.metrics.height * tuning.explosion_band_bottom;

        let mut exploding = Vec::new();
        for flight in &mut self.cards {
            if flight.exploded || flight.y < band_top || flight.y > band_bottom {
                continue;
            }
            if self.rng.gen_bool(tuning.explosion_probability) {
                flight.exploded = true;
                exploding.push(*flight);
            }
        }
        self.cards.retain(|flight| !flight.exploded);

        let count = exploding.len();
        for flight in exploding {
            self.spawn_fragments(&flight, layout);
        }
        count
    }

    fn spawn_fragments(&mut self, flight: &AnimatedCard, layout: &TableLayout) {
        let piece_w = layout.metrics.card_width / f64::from(FRAGMENT_GRID);
        let piece_h = layout.metrics.card_height / f64::from(FRAGMENT_GRID);
        for grid_y in 0..FRAGMENT_GRID {
            for grid_x in 0..FRAGMENT_GRID {
                // Pieces scatter away from the card's center.
                let offset_x = (f64::from(grid_x) - 1.5) * piece_w;
                let offset_y = (f64::from(grid_y) - 1.5) * piece_h;
                self.fragments.push(Fragment {
                    card: flight.card,
                    grid_x,
                    grid_y,
                    x: flight.x + offset_x,
                    y: flight.y + offset_y,
                    velocity_x: offset_x * 0.3 + self.rng.gen_range(-1.0..1.0),
                    velocity_y: offset_y * 0.3 - self.rng.gen_range(1.0..3.0),
                    rotation: 0.0,
                    spin: self.rng.gen_range(-0.4..0.4),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::DEFAULT_ANIMATION_TUNING;
    use crate::engine::layout::{TableLayout, TableMetrics};
    use crate::game::{GameMode, Suit};

    fn celebration() -> (Celebration, TableLayout, AnimationTuning) {
        let sources = Suit::ALL
            .iter()
            .enumerate()
            .map(|(slot, &suit)| (Card::new(suit, 13), slot))
            .collect();
        let tuning = DEFAULT_ANIMATION_TUNING;
        (
            Celebration::new(7, sources, &tuning),
            TableLayout::new(GameMode::Klondike, TableMetrics::default()),
            tuning,
        )
    }

    #[test]
    fn launches_on_the_configured_interval() {
        let (mut celebration, layout, tuning) = celebration();
        let interval = ticks_for_ms(tuning.celebration_launch_ms) as usize;
        for _ in 0..interval {
            celebration.tick(&layout, &tuning);
        }
        assert_eq!(celebration.cards().len(), 1);
    }

    #[test]
    fn same_seed_replays_the_same_show() {
        let (mut a, layout, tuning) = celebration();
        let (mut b, _, _) = celebration();
        for _ in 0..240 {
            a.tick(&layout, &tuning);
            b.tick(&layout, &tuning);
        }
        assert_eq!(a.cards(), b.cards());
        assert_eq!(a.fragments(), b.fragments());
    }

    #[test]
    fn cards_eventually_fall_off_the_table() {
        let (mut celebration, layout, tuning) = celebration();
        for _ in 0..5000 {
            celebration.tick(&layout, &tuning);
        }
        let floor = layout.off_screen_bottom();
        assert!(celebration.cards().iter().all(|flight| flight.y < floor));
    }

    #[test]
    fn exploded_fragments_come_in_grids_of_sixteen() {
        let (mut celebration, layout, tuning) = celebration();
        let mut high_probability = tuning;
        high_probability.explosion_probability = 1.0;
        for _ in 0..600 {
            celebration.tick(&layout, &high_probability);
            if !celebration.fragments().is_empty() {
                break;
            }
        }
        assert_eq!(celebration.fragments().len() % 16, 0);
        assert!(!celebration.fragments().is_empty());
    }
}
