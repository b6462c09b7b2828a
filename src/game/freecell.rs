use super::{Card, Deck, PileId, TableauCard};
use crate::engine::rules::{
    can_stack_alternating, can_stack_foundation, freecell_stack_capacity, is_alternating_descending,
    EmptyTableauRule,
};

/// How many cards are dealt. The smaller modes are practice deals that drop
/// whole suits, so every dealt suit still builds a full Ace-to-King run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreecellCardCountMode {
    TwentySix,
    ThirtyNine,
    FiftyTwo,
}

impl FreecellCardCountMode {
    pub fn card_count(self) -> u8 {
        match self {
            Self::TwentySix => 26,
            Self::ThirtyNine => 39,
            Self::FiftyTwo => 52,
        }
    }

    pub fn suit_count(self) -> u8 {
        self.card_count() / 13
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FreecellGame {
    card_count_mode: FreecellCardCountMode,
    foundations: [Vec<Card>; 4],
    freecells: [Option<Card>; 4],
    tableau: [Vec<TableauCard>; 8],
}

impl FreecellGame {
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_with_seed_and_card_count(seed, FreecellCardCountMode::FiftyTwo)
    }

    pub fn new_with_seed_and_card_count(seed: u64, card_count_mode: FreecellCardCountMode) -> Self {
        let mut deck = freecell_deck(card_count_mode);
        deck.shuffle(seed);

        let mut game = Self {
            card_count_mode,
            foundations: std::array::from_fn(|_| Vec::new()),
            freecells: [None; 4],
            tableau: std::array::from_fn(|_| Vec::new()),
        };

        let mut col = 0;
        while let Some(card) = deck.draw_top() {
            game.tableau[col % 8].push(TableauCard::face_up(card));
            col += 1;
        }

        game
    }

    pub fn card_count_mode(&self) -> FreecellCardCountMode {
        self.card_count_mode
    }

    pub fn foundations(&self) -> &[Vec<Card>; 4] {
        &self.foundations
    }

    pub fn freecells(&self) -> &[Option<Card>; 4] {
        &self.freecells
    }

    pub fn tableau(&self) -> &[Vec<TableauCard>; 8] {
        &self.tableau
    }

    pub fn freecell_card(&self, cell: usize) -> Option<Card> {
        self.freecells.get(cell).and_then(|slot| *slot)
    }

    pub fn tableau_top(&self, col: usize) -> Option<TableauCard> {
        self.tableau.get(col).and_then(|pile| pile.last().copied())
    }

    pub fn tableau_len(&self, col: usize) -> Option<usize> {
        self.tableau.get(col).map(Vec::len)
    }

    pub fn tableau_card(&self, col: usize, index: usize) -> Option<TableauCard> {
        self.tableau
            .get(col)
            .and_then(|pile| pile.get(index))
            .copied()
    }

    pub fn is_won(&self) -> bool {
        let foundation_count: usize = self.foundations.iter().map(Vec::len).sum();
        foundation_count == usize::from(self.card_count_mode.card_count())
    }

    pub fn card_count(&self) -> usize {
        self.foundations.iter().map(Vec::len).sum::<usize>()
            + self.freecells.iter().flatten().count()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
    }

    pub fn empty_freecell_count(&self) -> usize {
        self.freecells.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn empty_column_count_excluding(&self, dst: usize) -> usize {
        self.tableau
            .iter()
            .enumerate()
            .filter(|(col, pile)| *col != dst && pile.is_empty())
            .count()
    }

    /// `(empty freecells + 1) * 2^(empty columns)` with the destination
    /// column excluded from the empty count when it is itself empty.
    pub fn max_movable_run_len(&self, dst: usize) -> usize {
        freecell_stack_capacity(
            self.empty_freecell_count(),
            self.empty_column_count_excluding(dst),
        )
    }

    pub fn can_place_on_foundation(&self, card: Card) -> bool {
        let Some(idx) = card.suit.foundation_index() else {
            return false;
        };
        can_stack_foundation(self.foundations[idx].last(), card)
    }

    pub fn can_move_tableau_top_to_foundation(&self, src: usize) -> bool {
        let Some(entry) = self.tableau_top(src) else {
            return false;
        };
        self.can_place_on_foundation(entry.card)
    }

    pub fn can_move_freecell_to_foundation(&self, cell: usize) -> bool {
        let Some(card) = self.freecell_card(cell) else {
            return false;
        };
        self.can_place_on_foundation(card)
    }

    pub fn can_move_tableau_top_to_freecell(&self, src: usize, cell: usize) -> bool {
        if cell >= self.freecells.len() || src >= self.tableau.len() {
            return false;
        }
        self.freecells[cell].is_none() && !self.tableau[src].is_empty()
    }

    pub fn move_tableau_top_to_freecell(&mut self, src: usize, cell: usize) -> bool {
        if !self.can_move_tableau_top_to_freecell(src, cell) {
            return false;
        }
        let Some(entry) = self.tableau[src].pop() else {
            return false;
        };
        self.freecells[cell] = Some(entry.card);
        true
    }

    pub fn can_move_freecell_to_tableau(&self, cell: usize, dst: usize) -> bool {
        if dst >= self.tableau.len() {
            return false;
        }
        let Some(card) = self.freecell_card(cell) else {
            return false;
        };
        can_stack_alternating(self.tableau[dst].last(), card, EmptyTableauRule::AnyCard)
    }

    pub fn move_freecell_to_tableau(&mut self, cell: usize, dst: usize) -> bool {
        if !self.can_move_freecell_to_tableau(cell, dst) {
            return false;
        }
        let Some(card) = self.freecells[cell].take() else {
            return false;
        };
        self.tableau[dst].push(TableauCard::face_up(card));
        true
    }

    pub fn can_move_tableau_run_to_tableau(&self, src: usize, start: usize, dst: usize) -> bool {
        if src == dst || src >= self.tableau.len() || dst >= self.tableau.len() {
            return false;
        }

        let source = &self.tableau[src];
        if start >= source.len() {
            return false;
        }

        let run = &source[start..];
        if run.len() > self.max_movable_run_len(dst) {
            return false;
        }
        if !is_alternating_descending(run) {
            return false;
        }

        can_stack_alternating(
            self.tableau[dst].last(),
            run[0].card,
            EmptyTableauRule::AnyCard,
        )
    }

    pub fn move_tableau_run_to_tableau(&mut self, src: usize, start: usize, dst: usize) -> bool {
        if !self.can_move_tableau_run_to_tableau(src, start, dst) {
            return false;
        }
        let moved = self.tableau[src].split_off(start);
        self.tableau[dst].extend(moved);
        true
    }

    /// Pops the foundation-bound card from a tableau column or freecell.
    /// The caller settles it on the foundation when the flight lands.
    pub fn lift_for_foundation(&mut self, source: PileId) -> Option<Card> {
        match source {
            PileId::Tableau(src) => {
                if !self.can_move_tableau_top_to_foundation(src) {
                    return None;
                }
                self.tableau[src].pop().map(|entry| entry.card)
            }
            PileId::Freecell(cell) => {
                if !self.can_move_freecell_to_foundation(cell) {
                    return None;
                }
                self.freecells[cell].take()
            }
            _ => None,
        }
    }

    pub fn settle_on_foundation(&mut self, card: Card) -> bool {
        let Some(idx) = card.suit.foundation_index() else {
            return false;
        };
        self.foundations[idx].push(card);
        true
    }
}

fn freecell_deck(card_count_mode: FreecellCardCountMode) -> Deck {
    let mut deck = Deck::standard();
    if card_count_mode != FreecellCardCountMode::FiftyTwo {
        let suits = &super::Suit::ALL[..usize::from(card_count_mode.suit_count())];
        let kept: Vec<Card> = deck
            .cards()
            .iter()
            .copied()
            .filter(|card| suits.contains(&card.suit))
            .collect();
        deck = Deck::from_cards(kept);
    }
    deck
}

#[cfg(test)]
impl FreecellGame {
    pub(crate) fn debug_empty() -> Self {
        Self {
            card_count_mode: FreecellCardCountMode::FiftyTwo,
            foundations: std::array::from_fn(|_| Vec::new()),
            freecells: [None; 4],
            tableau: std::array::from_fn(|_| Vec::new()),
        }
    }

    pub(crate) fn debug_freecells_mut(&mut self) -> &mut [Option<Card>; 4] {
        &mut self.freecells
    }

    pub(crate) fn debug_foundations_mut(&mut self) -> &mut [Vec<Card>; 4] {
        &mut self.foundations
    }

    pub(crate) fn debug_tableau_mut(&mut self) -> &mut [Vec<TableauCard>; 8] {
        &mut self.tableau
    }
}
