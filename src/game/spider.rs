use super::{Card, Deck, DrawResult, MultiDeck, Suit, TableauCard, ACE, KING};
use crate::engine::rules::is_same_suit_descending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpiderSuitMode {
    One,
    Two,
    Four,
}

impl SpiderSuitMode {
    pub fn suit_count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    pub fn from_suit_count(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    fn suits(self) -> &'static [Suit] {
        match self {
            Self::One => &[Suit::Spades],
            Self::Two => &[Suit::Spades, Suit::Hearts],
            Self::Four => &Suit::ALL,
        }
    }
}

/// Two-deck Spider. Completed King-to-Ace runs are detected here but only
/// retired through [`retire_completed_run`](Self::retire_completed_run), so
/// the animation layer can fly all thirteen cards before the tableau loses
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpiderGame {
    suit_mode: SpiderSuitMode,
    stock: Vec<Card>,
    tableau: [Vec<TableauCard>; 10],
    foundations: [Vec<Card>; 8],
    last_flip: Option<usize>,
}

impl SpiderGame {
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_with_seed_and_mode(seed, SpiderSuitMode::One)
    }

    pub fn new_with_seed_and_mode(seed: u64, suit_mode: SpiderSuitMode) -> Self {
        let mut shoe = spider_shoe(suit_mode);
        shoe.shuffle(seed);

        let mut game = Self {
            suit_mode,
            stock: Vec::new(),
            tableau: std::array::from_fn(|_| Vec::new()),
            foundations: std::array::from_fn(|_| Vec::new()),
            last_flip: None,
        };

        for col in 0..10 {
            let col_size = if col < 4 { 6 } else { 5 };
            for row in 0..col_size {
                let card = shoe.draw().expect("spider deal consumes 104 cards");
                game.tableau[col].push(if row == col_size - 1 {
                    TableauCard::face_up(card)
                } else {
                    TableauCard::face_down(card)
                });
            }
        }

        while let Some(card) = shoe.draw() {
            game.stock.push(card);
        }

        game
    }

    pub fn suit_mode(&self) -> SpiderSuitMode {
        self.suit_mode
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn tableau(&self) -> &[Vec<TableauCard>; 10] {
        &self.tableau
    }

    pub fn foundations(&self) -> &[Vec<Card>; 8] {
        &self.foundations
    }

    pub fn completed_runs(&self) -> usize {
        self.foundations
            .iter()
            .filter(|pile| !pile.is_empty())
            .count()
    }

    pub fn is_won(&self) -> bool {
        self.completed_runs() >= 8
    }

    pub fn can_deal_from_stock(&self) -> bool {
        self.stock.len() >= 10 && self.tableau.iter().all(|pile| !pile.is_empty())
    }

    pub fn deal_from_stock(&mut self) -> DrawResult {
        if !self.can_deal_from_stock() {
            return DrawResult::NoOp;
        }
        for col in 0..10 {
            let Some(card) = self.stock.pop() else {
                return DrawResult::NoOp;
            };
            self.tableau[col].push(TableauCard::face_up(card));
        }
        DrawResult::DealtRow
    }

    pub fn can_move_run(&self, src: usize, start: usize, dst: usize) -> bool {
        if src == dst || src >= self.tableau.len() || dst >= self.tableau.len() {
            return false;
        }

        let source = &self.tableau[src];
        if start >= source.len() || !source[start].face_up {
            return false;
        }

        if !is_same_suit_descending(&source[start..]) {
            return false;
        }

        let first = source[start];
        match self.tableau[dst].last() {
            None => true,
            Some(top) => top.face_up && top.card.rank == first.card.rank + 1,
        }
    }

    pub fn move_run(&mut self, src: usize, start: usize, dst: usize) -> bool {
        if !self.can_move_run(src, start, dst) {
            return false;
        }

        let moved = self.tableau[src].split_off(start);
        self.tableau[dst].extend(moved);
        self.flip_exposed_top(src);
        true
    }

    /// The column currently ending in a face-up King-to-Ace same-suit run,
    /// if any. Detection is separate from retirement so callers can sequence
    /// the removal.
    pub fn completed_run_column(&self) -> Option<usize> {
        (0..self.tableau.len()).find(|&col| self.completed_run_suit(col).is_some())
    }

    pub fn completed_run_suit(&self, col: usize) -> Option<Suit> {
        let pile = self.tableau.get(col)?;
        if pile.len() < 13 {
            return None;
        }

        let run = &pile[pile.len() - 13..];
        let first = run.first()?;
        if first.card.rank != KING || !first.face_up {
            return None;
        }

        let valid = is_same_suit_descending(run)
            && run.last().is_some_and(|entry| entry.card.rank == ACE);
        valid.then_some(first.card.suit)
    }

    /// Cards of the run about to retire, King first. Used to build the
    /// retirement flight.
    pub fn completed_run_cards(&self, col: usize) -> Option<Vec<Card>> {
        self.completed_run_suit(col)?;
        let pile = &self.tableau[col];
        Some(
            pile[pile.len() - 13..]
                .iter()
                .map(|entry| entry.card)
                .collect(),
        )
    }

    /// Removes the completed run from `col` and parks one representative
    /// card (the run's Ace) on the first empty foundation slot.
    pub fn retire_completed_run(&mut self, col: usize) -> Option<Suit> {
        let suit = self.completed_run_suit(col)?;
        let new_len = self.tableau[col].len() - 13;
        self.tableau[col].truncate(new_len);
        self.flip_exposed_top(col);

        if let Some(slot) = self.foundations.iter_mut().find(|pile| pile.is_empty()) {
            slot.push(Card::new(suit, ACE));
        }
        Some(suit)
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

    pub fn card_count(&self) -> usize {
        // A retired run removes 13 cards from the tableau and keeps one
        // representative on the foundation; account for all 13.
        self.stock.len()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
            + self.completed_runs() * 13
    }

    pub fn take_last_flip(&mut self) -> Option<usize> {
        self.last_flip.take()
    }

    fn flip_exposed_top(&mut self, col: usize) {
        if let Some(entry) = self.tableau[col].last_mut() {
            if !entry.face_up {
                entry.face_up = true;
                self.last_flip = Some(col);
            }
        }
    }
}

/// Spider plays a 104-card shoe built from two decks whose suits are masked
/// down to the selected mode. Pooling through [`MultiDeck`] is what
/// interleaves the two decks in a single shuffle.
fn spider_shoe(suit_mode: SpiderSuitMode) -> MultiDeck {
    let suits = suit_mode.suits();
    let decks: Vec<Deck> = (0..2)
        .map(|_| {
            let mut cards = Vec::with_capacity(52);
            let copies = 4 / suits.len();
            for _ in 0..copies {
                for &suit in suits {
                    for rank in 1..=13 {
                        cards.push(Card::new(suit, rank));
                    }
                }
            }
            Deck::from_cards(cards)
        })
        .collect();
    MultiDeck::from_decks(decks)
}

#[cfg(test)]
impl SpiderGame {
    pub(crate) fn debug_new(
        suit_mode: SpiderSuitMode,
        stock: Vec<Card>,
        tableau: [Vec<TableauCard>; 10],
    ) -> Self {
        Self {
            suit_mode,
            stock,
            tableau,
            foundations: std::array::from_fn(|_| Vec::new()),
            last_flip: None,
        }
    }
}
