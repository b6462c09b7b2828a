use rand::Rng;

use super::{Card, Deck, DrawMode, DrawResult, PileId, TableauCard};
use crate::engine::rules::{
    can_stack_alternating, can_stack_foundation, is_alternating_descending, EmptyTableauRule,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KlondikeGame {
    draw_mode: DrawMode,
    stock: Vec<Card>,
    waste: Vec<Card>,
    foundations: [Vec<Card>; 4],
    tableau: [Vec<TableauCard>; 7],
    last_flip: Option<usize>,
}

impl KlondikeGame {
    pub fn new_shuffled() -> Self {
        let mut rng = rand::thread_rng();
        Self::new_with_seed(rng.gen())
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut deck = Deck::standard();
        deck.shuffle(seed);

        let mut game = Self {
            draw_mode: DrawMode::One,
            stock: Vec::new(),
            waste: Vec::new(),
            foundations: std::array::from_fn(|_| Vec::new()),
            tableau: std::array::from_fn(|_| Vec::new()),
            last_flip: None,
        };

        for col in 0..7 {
            for row in 0..=col {
                let card = deck.draw_top().expect("full deck covers the deal");
                game.tableau[col].push(if row == col {
                    TableauCard::face_up(card)
                } else {
                    TableauCard::face_down(card)
                });
            }
        }

        while let Some(card) = deck.draw_top() {
            game.stock.push(card);
        }

        game
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Removes up to `count` cards from the stock without placing them on the
    /// waste. The animation layer owns them until each one arrives; callers
    /// that want the immediate effect push the result straight back via
    /// [`place_on_waste`](Self::place_on_waste).
    pub fn take_stock_cards(&mut self, count: u8) -> Vec<Card> {
        let count = usize::from(count.max(1));
        let mut taken = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(card) = self.stock.pop() else {
                break;
            };
            taken.push(card);
        }
        taken
    }

    pub fn place_on_waste(&mut self, card: Card) {
        self.waste.push(card);
    }

    pub fn can_recycle_waste(&self) -> bool {
        self.stock.is_empty() && !self.waste.is_empty()
    }

    pub fn recycle_waste(&mut self) -> DrawResult {
        if !self.can_recycle_waste() {
            return DrawResult::NoOp;
        }
        while let Some(card) = self.waste.pop() {
            self.stock.push(card);
        }
        DrawResult::RecycledWaste
    }

    /// Synchronous draw used by tests and hosts that skip animation.
    pub fn draw_or_recycle(&mut self) -> DrawResult {
        if !self.stock.is_empty() {
            for card in self.take_stock_cards(self.draw_mode.count()) {
                self.place_on_waste(card);
            }
            return DrawResult::DrewFromStock;
        }
        self.recycle_waste()
    }

    pub fn can_move_waste_to_foundation(&self) -> bool {
        let Some(card) = self.waste.last().copied() else {
            return false;
        };
        self.can_place_on_foundation(card)
    }

    pub fn can_move_waste_to_tableau(&self, dst: usize) -> bool {
        let Some(card) = self.waste.last().copied() else {
            return false;
        };
        if dst >= self.tableau.len() {
            return false;
        }
        can_stack_alternating(self.tableau[dst].last(), card, EmptyTableauRule::KingOnly)
    }

    pub fn move_waste_to_tableau(&mut self, dst: usize) -> bool {
        if !self.can_move_waste_to_tableau(dst) {
            return false;
        }
        let Some(card) = self.waste.pop() else {
            return false;
        };
        self.tableau[dst].push(TableauCard::face_up(card));
        true
    }

    pub fn can_move_tableau_top_to_foundation(&self, src: usize) -> bool {
        let Some(entry) = self.tableau_top(src) else {
            return false;
        };
        entry.face_up && self.can_place_on_foundation(entry.card)
    }

    pub fn can_move_foundation_top_to_tableau(&self, foundation_idx: usize, dst: usize) -> bool {
        if foundation_idx >= self.foundations.len() || dst >= self.tableau.len() {
            return false;
        }
        let Some(card) = self.foundations[foundation_idx].last().copied() else {
            return false;
        };
        can_stack_alternating(self.tableau[dst].last(), card, EmptyTableauRule::KingOnly)
    }

    pub fn move_foundation_top_to_tableau(&mut self, foundation_idx: usize, dst: usize) -> bool {
        if !self.can_move_foundation_top_to_tableau(foundation_idx, dst) {
            return false;
        }
        let Some(card) = self.foundations[foundation_idx].pop() else {
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

        let first = source[start];
        if !first.face_up || !is_alternating_descending(&source[start..]) {
            return false;
        }

        can_stack_alternating(self.tableau[dst].last(), first.card, EmptyTableauRule::KingOnly)
    }

    pub fn move_tableau_run_to_tableau(&mut self, src: usize, start: usize, dst: usize) -> bool {
        if !self.can_move_tableau_run_to_tableau(src, start, dst) {
            return false;
        }

        let moved = self.tableau[src].split_off(start);
        self.tableau[dst].extend(moved);
        self.flip_exposed_top(src);
        true
    }

    /// Pops the foundation-bound card from the waste or a tableau column,
    /// flipping any newly exposed card. The caller pushes it onto the
    /// foundation once its animation lands (or immediately on cancel).
    pub fn lift_for_foundation(&mut self, source: PileId) -> Option<Card> {
        match source {
            PileId::Waste => {
                if !self.can_move_waste_to_foundation() {
                    return None;
                }
                self.waste.pop()
            }
            PileId::Tableau(src) => {
                if !self.can_move_tableau_top_to_foundation(src) {
                    return None;
                }
                let card = self.tableau[src].pop()?.card;
                self.flip_exposed_top(src);
                Some(card)
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

    pub fn can_place_on_foundation(&self, card: Card) -> bool {
        let Some(idx) = card.suit.foundation_index() else {
            return false;
        };
        can_stack_foundation(self.foundations[idx].last(), card)
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

    pub fn waste_top(&self) -> Option<Card> {
        self.waste.last().copied()
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn waste_len(&self) -> usize {
        self.waste.len()
    }

    pub fn foundations(&self) -> &[Vec<Card>; 4] {
        &self.foundations
    }

    pub fn tableau(&self) -> &[Vec<TableauCard>; 7] {
        &self.tableau
    }

    pub fn is_won(&self) -> bool {
        self.foundations.iter().all(|pile| pile.len() == 13)
    }

    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(Vec::len).sum::<usize>()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
    }

    /// The column whose top card was turned face-up by the last mutation, if
    /// any. Draining this is how the session surfaces flip events.
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

#[cfg(test)]
impl KlondikeGame {
    pub(crate) fn debug_empty() -> Self {
        Self {
            draw_mode: DrawMode::One,
            stock: Vec::new(),
            waste: Vec::new(),
            foundations: std::array::from_fn(|_| Vec::new()),
            tableau: std::array::from_fn(|_| Vec::new()),
            last_flip: None,
        }
    }

    pub(crate) fn debug_stock_mut(&mut self) -> &mut Vec<Card> {
        &mut self.stock
    }

    pub(crate) fn debug_waste_mut(&mut self) -> &mut Vec<Card> {
        &mut self.waste
    }

    pub(crate) fn debug_foundations_mut(&mut self) -> &mut [Vec<Card>; 4] {
        &mut self.foundations
    }

    pub(crate) fn debug_tableau_mut(&mut self) -> &mut [Vec<TableauCard>; 7] {
        &mut self.tableau
    }
}
