use super::{Card, Deck, DrawResult, KING};
use crate::engine::rules::pair_sums_to_thirteen;

/// Number of slots in the triangular layout: rows 0..=6, row `r` holding
/// `r + 1` cards.
pub const PYRAMID_SLOTS: usize = 28;

/// A card the player can pick for pairing: a layout slot or the waste top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PyramidPick {
    Slot(usize),
    Waste,
}

/// Pyramid layout as a flat row-major array. Slot `(r, c)` lives at index
/// `r * (r + 1) / 2 + c` and is covered by its two children at
/// `(r + 1, c)` and `(r + 1, c + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PyramidGame {
    layout: [Option<Card>; PYRAMID_SLOTS],
    stock: Vec<Card>,
    waste: Vec<Card>,
    discard: Vec<Card>,
}

pub fn slot_index(row: usize, col: usize) -> usize {
    row * (row + 1) / 2 + col
}

pub fn slot_position(index: usize) -> (usize, usize) {
    let mut row = 0;
    while slot_index(row + 1, 0) <= index {
        row += 1;
    }
    (row, index - slot_index(row, 0))
}

impl PyramidGame {
    pub fn new_with_seed(seed: u64) -> Self {
        let mut deck = Deck::standard();
        deck.shuffle(seed);

        let mut layout = [None; PYRAMID_SLOTS];
        for slot in layout.iter_mut() {
            *slot = deck.draw_top();
        }

        let mut stock = Vec::new();
        while let Some(card) = deck.draw_top() {
            stock.push(card);
        }

        Self {
            layout,
            stock,
            waste: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub fn layout(&self) -> &[Option<Card>; PYRAMID_SLOTS] {
        &self.layout
    }

    pub fn slot(&self, index: usize) -> Option<Card> {
        self.layout.get(index).copied().flatten()
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn waste_top(&self) -> Option<Card> {
        self.waste.last().copied()
    }

    pub fn waste_len(&self) -> usize {
        self.waste.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// A slot is exposed when it holds a card and neither covering child
    /// does. The bottom row has no children.
    pub fn is_exposed(&self, index: usize) -> bool {
        if index >= PYRAMID_SLOTS || self.layout[index].is_none() {
            return false;
        }
        let (row, col) = slot_position(index);
        if row == 6 {
            return true;
        }
        let left = slot_index(row + 1, col);
        let right = slot_index(row + 1, col + 1);
        self.layout[left].is_none() && self.layout[right].is_none()
    }

    fn pick_card(&self, pick: PyramidPick) -> Option<Card> {
        match pick {
            PyramidPick::Slot(index) => {
                if self.is_exposed(index) {
                    self.layout[index]
                } else {
                    None
                }
            }
            PyramidPick::Waste => self.waste_top(),
        }
    }

    pub fn can_remove_king(&self, pick: PyramidPick) -> bool {
        self.pick_card(pick).is_some_and(|card| card.rank == KING)
    }

    pub fn remove_king(&mut self, pick: PyramidPick) -> bool {
        if !self.can_remove_king(pick) {
            return false;
        }
        self.take_pick(pick);
        true
    }

    pub fn can_remove_pair(&self, a: PyramidPick, b: PyramidPick) -> bool {
        if a == b {
            return false;
        }
        let (Some(first), Some(second)) = (self.pick_card(a), self.pick_card(b)) else {
            return false;
        };
        pair_sums_to_thirteen(first.rank, second.rank)
    }

    pub fn remove_pair(&mut self, a: PyramidPick, b: PyramidPick) -> bool {
        if !self.can_remove_pair(a, b) {
            return false;
        }
        self.take_pick(a);
        self.take_pick(b);
        true
    }

    pub fn can_draw(&self) -> bool {
        !self.stock.is_empty() || !self.waste.is_empty()
    }

    pub fn draw_or_recycle(&mut self) -> DrawResult {
        if let Some(card) = self.stock.pop() {
            self.waste.push(card);
            return DrawResult::DrewFromStock;
        }
        if self.waste.is_empty() {
            return DrawResult::NoOp;
        }
        while let Some(card) = self.waste.pop() {
            self.stock.push(card);
        }
        DrawResult::RecycledWaste
    }

    pub fn is_won(&self) -> bool {
        self.layout.iter().all(Option::is_none)
    }

    pub fn card_count(&self) -> usize {
        self.layout.iter().flatten().count()
            + self.stock.len()
            + self.waste.len()
            + self.discard.len()
    }

    fn take_pick(&mut self, pick: PyramidPick) {
        let card = match pick {
            PyramidPick::Slot(index) => self.layout[index].take(),
            PyramidPick::Waste => self.waste.pop(),
        };
        if let Some(card) = card {
            self.discard.push(card);
        }
    }
}

#[cfg(test)]
impl PyramidGame {
    pub(crate) fn debug_empty() -> Self {
        Self {
            layout: [None; PYRAMID_SLOTS],
            stock: Vec::new(),
            waste: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub(crate) fn debug_layout_mut(&mut self) -> &mut [Option<Card>; PYRAMID_SLOTS] {
        &mut self.layout
    }

    pub(crate) fn debug_stock_mut(&mut self) -> &mut Vec<Card> {
        &mut self.stock
    }

    pub(crate) fn debug_waste_mut(&mut self) -> &mut Vec<Card> {
        &mut self.waste
    }
}
