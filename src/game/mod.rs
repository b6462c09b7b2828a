pub mod deck;
pub mod freecell;
pub mod klondike;
pub mod pile;
pub mod pyramid;
pub mod spider;
pub mod thirty_one;


pub use deck::{Deck, MultiDeck};
pub use freecell::{FreecellCardCountMode, FreecellGame};
pub use klondike::KlondikeGame;
pub use pile::{PileId, TableauCard};
pub use pyramid::{PyramidGame, PyramidPick};
pub use spider::{SpiderGame, SpiderSuitMode};
pub use thirty_one::{LayDown, ThirtyOneGame, TurnPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Klondike,
    Spider,
    Freecell,
    Pyramid,
    ThirtyOne,
}

impl GameMode {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "klondike" => Some(Self::Klondike),
            "spider" => Some(Self::Spider),
            "freecell" => Some(Self::Freecell),
            "pyramid" => Some(Self::Pyramid),
            "thirty-one" => Some(Self::ThirtyOne),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Klondike => "klondike",
            Self::Spider => "spider",
            Self::Freecell => "freecell",
            Self::Pyramid => "pyramid",
            Self::ThirtyOne => "thirty-one",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Klondike => "Klondike",
            Self::Spider => "Spider",
            Self::Freecell => "FreeCell",
            Self::Pyramid => "Pyramid",
            Self::ThirtyOne => "Thirty-One",
        }
    }
}

/// What a stock activation did. `DealtRow` is Spider's ten-card row deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    DrewFromStock,
    RecycledWaste,
    DealtRow,
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    One,
    Three,
}

impl DrawMode {
    pub fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Three => 3,
        }
    }

    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::One),
            3 => Some(Self::Three),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    Joker,
}

impl Suit {
    /// The four standard suits, in foundation order. Jokers are excluded.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    pub fn short(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
            Suit::Joker => "J",
        }
    }

    pub fn foundation_index(self) -> Option<usize> {
        match self {
            Suit::Clubs => Some(0),
            Suit::Diamonds => Some(1),
            Suit::Hearts => Some(2),
            Suit::Spades => Some(3),
            Suit::Joker => None,
        }
    }
}

/// Jokers carry this rank; every other card is 1 (Ace) through 13 (King).
pub const JOKER_RANK: u8 = 0;

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

/// Immutable card value. Equality is by suit, rank and art variant; face-up
/// state lives in [`TableauCard`] because it is pile state, not card state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
    pub alternate_art: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Self {
        Self {
            suit,
            rank,
            alternate_art: false,
        }
    }

    pub fn joker(alternate_art: bool) -> Self {
        Self {
            suit: Suit::Joker,
            rank: JOKER_RANK,
            alternate_art,
        }
    }

    pub fn is_joker(&self) -> bool {
        self.suit == Suit::Joker
    }

    pub fn is_face(&self) -> bool {
        matches!(self.rank, JACK | QUEEN | KING)
    }

    pub fn label(&self) -> String {
        format!("{}{}", rank_label(self.rank), self.suit.short())
    }

    pub fn color_red(&self) -> bool {
        self.suit.is_red()
    }
}

pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        JOKER_RANK => "*",
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}
