use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{Card, Suit};

/// An ordered sequence of cards. Index 0 is the bottom; the last element is
/// the top. Drawing from an empty deck is a normal condition and returns
/// `None` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: Vec<Card>,
    with_jokers: bool,
}

impl Deck {
    /// A standard ordered 52-card deck.
    pub fn standard() -> Self {
        Self {
            cards: standard_cards(),
            with_jokers: false,
        }
    }

    /// A standard deck plus two jokers (54 cards).
    pub fn standard_with_jokers() -> Self {
        let mut cards = standard_cards();
        cards.push(Card::joker(false));
        cards.push(Card::joker(true));
        Self {
            cards,
            with_jokers: true,
        }
    }

    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            with_jokers: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn draw_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn draw_bottom(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn add_top(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn add_bottom(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn peek_top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn peek_bottom(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Deterministic Fisher-Yates permutation: the same seed always produces
    /// the same order, which is what makes seed replay possible.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Rebuilds the ordered deck this one started from, discarding any
    /// in-progress draw state.
    pub fn reset(&mut self) {
        *self = if self.with_jokers {
            Self::standard_with_jokers()
        } else {
            Self::standard()
        };
    }

    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            with_jokers: false,
        }
    }
}

/// N decks treated as one shoe. `shuffle` pools every member's cards and
/// redistributes the whole sequence into `decks[0]`, so multi-deck variants
/// interleave cards instead of shuffling each deck in isolation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiDeck {
    decks: Vec<Deck>,
}

impl MultiDeck {
    pub fn standard(deck_count: usize) -> Self {
        Self {
            decks: (0..deck_count).map(|_| Deck::standard()).collect(),
        }
    }

    pub fn from_decks(decks: Vec<Deck>) -> Self {
        Self { decks }
    }

    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn total_len(&self) -> usize {
        self.decks.iter().map(Deck::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.iter().all(Deck::is_empty)
    }

    pub fn shuffle(&mut self, seed: u64) {
        let mut pooled: Vec<Card> = self
            .decks
            .iter_mut()
            .flat_map(|deck| std::mem::replace(deck, Deck::empty()).cards)
            .collect();
        let mut rng = StdRng::seed_from_u64(seed);
        pooled.shuffle(&mut rng);
        if let Some(first) = self.decks.first_mut() {
            *first = Deck::from_cards(pooled);
        }
    }

    /// Draws from the first non-empty member deck in index order. The
    /// tie-break matters: replays depend on it.
    pub fn draw(&mut self) -> Option<Card> {
        self.decks.iter_mut().find_map(Deck::draw_top)
    }
}

fn standard_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in 1..=13 {
            cards.push(Card::new(suit, rank));
        }
    }
    cards
}
