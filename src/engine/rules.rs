//! Shared legality predicates. Variant games call these instead of
//! restating rank and color arithmetic.

use crate::game::{Card, TableauCard, ACE, KING};

/// What an empty tableau column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTableauRule {
    KingOnly,
    AnyCard,
}

/// Foundations build same-suit, Ace up. Jokers never land on a foundation.
pub fn can_stack_foundation(top: Option<&Card>, card: Card) -> bool {
    if card.is_joker() {
        return false;
    }
    match top {
        None => card.rank == ACE,
        Some(top) => top.suit == card.suit && card.rank == top.rank + 1,
    }
}

/// Alternating-color descending tableau placement, Klondike and Freecell
/// style. The destination top must be face-up.
pub fn can_stack_alternating(top: Option<&TableauCard>, card: Card, empty: EmptyTableauRule) -> bool {
    match top {
        None => match empty {
            EmptyTableauRule::KingOnly => card.rank == KING,
            EmptyTableauRule::AnyCard => true,
        },
        Some(top) => {
            top.face_up
                && top.card.color_red() != card.color_red()
                && top.card.rank == card.rank + 1
        }
    }
}

/// True when `cards` is a face-up alternating-color run descending by one.
pub fn is_alternating_descending(cards: &[TableauCard]) -> bool {
    cards.iter().all(|entry| entry.face_up)
        && cards.windows(2).all(|pair| {
            pair[0].card.color_red() != pair[1].card.color_red()
                && pair[0].card.rank == pair[1].card.rank + 1
        })
}

/// True when `cards` is a face-up same-suit run descending by one. Spider
/// moves and run completion both key off this.
pub fn is_same_suit_descending(cards: &[TableauCard]) -> bool {
    cards.iter().all(|entry| entry.face_up)
        && cards.windows(2).all(|pair| {
            pair[0].card.suit == pair[1].card.suit
                && pair[0].card.rank == pair[1].card.rank + 1
        })
}

/// Freecell supermove capacity: `(empty freecells + 1) * 2^(empty columns)`.
/// The caller excludes the destination column from `empty_columns`.
pub fn freecell_stack_capacity(empty_cells: usize, empty_columns: usize) -> usize {
    (empty_cells + 1) << empty_columns.min(usize::BITS as usize - 1)
}

/// Pyramid pairing: two ranks that sum to thirteen. Kings leave alone via
/// the dedicated king removal, so a King never pairs.
pub fn pair_sums_to_thirteen(a: u8, b: u8) -> bool {
    a != KING && b != KING && a + b == 13
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Suit, JACK, QUEEN};

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn foundation_accepts_ace_when_empty() {
        assert!(can_stack_foundation(None, card(Suit::Hearts, ACE)));
        assert!(!can_stack_foundation(None, card(Suit::Hearts, 2)));
    }

    #[test]
    fn foundation_builds_same_suit_ascending() {
        let top = card(Suit::Spades, 4);
        assert!(can_stack_foundation(Some(&top), card(Suit::Spades, 5)));
        assert!(!can_stack_foundation(Some(&top), card(Suit::Clubs, 5)));
        assert!(!can_stack_foundation(Some(&top), card(Suit::Spades, 6)));
    }

    #[test]
    fn foundation_rejects_jokers() {
        assert!(!can_stack_foundation(None, Card::joker(false)));
    }

    #[test]
    fn empty_tableau_rule_gates_non_kings() {
        let queen = card(Suit::Hearts, QUEEN);
        assert!(!can_stack_alternating(None, queen, EmptyTableauRule::KingOnly));
        assert!(can_stack_alternating(None, queen, EmptyTableauRule::AnyCard));
        assert!(can_stack_alternating(
            None,
            card(Suit::Hearts, KING),
            EmptyTableauRule::KingOnly
        ));
    }

    #[test]
    fn alternating_placement_requires_color_and_rank() {
        let top = TableauCard::face_up(card(Suit::Clubs, 9));
        assert!(can_stack_alternating(
            Some(&top),
            card(Suit::Hearts, 8),
            EmptyTableauRule::KingOnly
        ));
        assert!(!can_stack_alternating(
            Some(&top),
            card(Suit::Spades, 8),
            EmptyTableauRule::KingOnly
        ));
        assert!(!can_stack_alternating(
            Some(&top),
            card(Suit::Hearts, 7),
            EmptyTableauRule::KingOnly
        ));
    }

    #[test]
    fn face_down_top_accepts_nothing() {
        let top = TableauCard::face_down(card(Suit::Clubs, 9));
        assert!(!can_stack_alternating(
            Some(&top),
            card(Suit::Hearts, 8),
            EmptyTableauRule::AnyCard
        ));
    }

    #[test]
    fn same_suit_descending_checks_every_link() {
        let run = vec![
            TableauCard::face_up(card(Suit::Spades, 7)),
            TableauCard::face_up(card(Suit::Spades, 6)),
            TableauCard::face_up(card(Suit::Spades, 5)),
        ];
        assert!(is_same_suit_descending(&run));

        let mut broken = run.clone();
        broken[1].card = card(Suit::Hearts, 6);
        assert!(!is_same_suit_descending(&broken));

        let mut hidden = run;
        hidden[0].face_up = false;
        assert!(!is_same_suit_descending(&hidden));
    }

    #[test]
    fn capacity_formula_matches_worked_examples() {
        assert_eq!(freecell_stack_capacity(0, 0), 1);
        assert_eq!(freecell_stack_capacity(4, 0), 5);
        assert_eq!(freecell_stack_capacity(0, 2), 4);
        assert_eq!(freecell_stack_capacity(2, 2), 12);
    }

    #[test]
    fn thirteen_pairs() {
        assert!(pair_sums_to_thirteen(QUEEN, ACE));
        assert!(pair_sums_to_thirteen(JACK, 2));
        assert!(pair_sums_to_thirteen(6, 7));
        assert!(!pair_sums_to_thirteen(KING, 0));
        assert!(!pair_sums_to_thirteen(5, 5));
    }
}
