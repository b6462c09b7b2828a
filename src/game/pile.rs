use super::Card;

/// A card sitting in a tableau pile. Face-up state is pile state: only the
/// trailing run of a pile is ever face-up in a legally reached position, and
/// a card turns face-up only when a removal exposes it as the new top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableauCard {
    pub card: Card,
    pub face_up: bool,
}

impl TableauCard {
    pub fn face_up(card: Card) -> Self {
        Self {
            card,
            face_up: true,
        }
    }

    pub fn face_down(card: Card) -> Self {
        Self {
            card,
            face_up: false,
        }
    }
}

/// Addresses a pile within the active variant. Indices are validated by the
/// engine before use; a stale index from the UI is a rejected move, never a
/// panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileId {
    Stock,
    Waste,
    Foundation(usize),
    Tableau(usize),
    Freecell(usize),
    /// One of the 28 pyramid layout slots, row-major from the apex.
    Pyramid(usize),
    /// The pyramid discard pile that removed pairs retire to.
    Discard,
    /// A Thirty-One player's hand.
    Hand(usize),
}

impl PileId {
    pub fn label(self) -> String {
        match self {
            PileId::Stock => "stock".to_string(),
            PileId::Waste => "waste".to_string(),
            PileId::Foundation(idx) => format!("foundation[{idx}]"),
            PileId::Tableau(idx) => format!("tableau[{idx}]"),
            PileId::Freecell(idx) => format!("freecell[{idx}]"),
            PileId::Pyramid(idx) => format!("pyramid[{idx}]"),
            PileId::Discard => "discard".to_string(),
            PileId::Hand(idx) => format!("hand[{idx}]"),
        }
    }
}
