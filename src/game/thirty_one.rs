use rand::Rng;

use super::{Card, Deck, ACE};

pub const HAND_SIZE: usize = 3;
pub const STARTING_TOKENS: u8 = 3;

/// Where the current player's turn stands. The round machine is
/// `Draw -> Discard -> (Knock | continue) -> RoundEnd on knock wraparound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Draw,
    Discard,
    RoundEnd,
}

/// Instant-win hand combinations a player may declare, ending the round
/// with every other player losing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayDown {
    ThreeAces,
    ThirtyOneInSuit,
    TwoFacePlusAce,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThirtyOnePlayer {
    hand: Vec<Card>,
    tokens: u8,
    alive: bool,
}

impl ThirtyOnePlayer {
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn tokens(&self) -> u8 {
        self.tokens
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Thirty-One is a turn and scoring state machine, not a pile game. Cards
/// still flow through the shared deck model so conservation holds across
/// hands, stock and discard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThirtyOneGame {
    players: Vec<ThirtyOnePlayer>,
    stock: Vec<Card>,
    discard: Vec<Card>,
    current: usize,
    phase: TurnPhase,
    knocker: Option<usize>,
    last_round_losers: Vec<usize>,
}

impl ThirtyOneGame {
    pub fn new_shuffled(player_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_with_seed(rng.gen(), player_count)
    }

    pub fn new_with_seed(seed: u64, player_count: usize) -> Self {
        let player_count = player_count.clamp(2, 8);
        let mut game = Self {
            players: (0..player_count)
                .map(|_| ThirtyOnePlayer {
                    hand: Vec::new(),
                    tokens: STARTING_TOKENS,
                    alive: true,
                })
                .collect(),
            stock: Vec::new(),
            discard: Vec::new(),
            current: 0,
            phase: TurnPhase::Draw,
            knocker: None,
            last_round_losers: Vec::new(),
        };
        game.deal_round(seed);
        game
    }

    /// Reshuffles and deals a fresh round to the surviving players. Tokens
    /// carry over; eliminated players are skipped.
    pub fn deal_round(&mut self, seed: u64) {
        let mut deck = Deck::standard();
        deck.shuffle(seed);

        for player in &mut self.players {
            player.hand.clear();
        }
        self.stock.clear();
        self.discard.clear();
        self.knocker = None;
        self.last_round_losers.clear();

        for _ in 0..HAND_SIZE {
            for player in &mut self.players {
                if player.alive {
                    if let Some(card) = deck.draw_top() {
                        player.hand.push(card);
                    }
                }
            }
        }

        while let Some(card) = deck.draw_top() {
            self.stock.push(card);
        }
        if let Some(card) = self.stock.pop() {
            self.discard.push(card);
        }

        self.current = self
            .players
            .iter()
            .position(|player| player.alive)
            .unwrap_or(0);
        self.phase = TurnPhase::Draw;
    }

    pub fn players(&self) -> &[ThirtyOnePlayer] {
        &self.players
    }

    pub fn current_player(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn knocker(&self) -> Option<usize> {
        self.knocker
    }

    pub fn last_round_losers(&self) -> &[usize] {
        &self.last_round_losers
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn can_draw_from_stock(&self) -> bool {
        self.phase == TurnPhase::Draw && !self.stock.is_empty()
    }

    pub fn draw_from_stock(&mut self) -> bool {
        if !self.can_draw_from_stock() {
            return false;
        }
        let Some(card) = self.stock.pop() else {
            return false;
        };
        self.players[self.current].hand.push(card);
        self.phase = TurnPhase::Discard;
        true
    }

    pub fn can_draw_from_discard(&self) -> bool {
        self.phase == TurnPhase::Draw && !self.discard.is_empty()
    }

    pub fn draw_from_discard(&mut self) -> bool {
        if !self.can_draw_from_discard() {
            return false;
        }
        let Some(card) = self.discard.pop() else {
            return false;
        };
        self.players[self.current].hand.push(card);
        self.phase = TurnPhase::Discard;
        true
    }

    pub fn can_discard(&self, hand_index: usize) -> bool {
        self.phase == TurnPhase::Discard && hand_index < self.players[self.current].hand.len()
    }

    /// Discards back down to three cards and passes the turn. When the turn
    /// wraps back around to the knocker the round ends instead.
    pub fn discard(&mut self, hand_index: usize) -> bool {
        if !self.can_discard(hand_index) {
            return false;
        }
        let card = self.players[self.current].hand.remove(hand_index);
        self.discard.push(card);

        let next = self.next_alive_after(self.current);
        if self.knocker == Some(next) {
            self.end_round();
            return true;
        }

        self.current = next;
        self.phase = TurnPhase::Draw;
        if self.stock.is_empty() {
            self.recycle_discard();
        }
        true
    }

    /// Knocking replaces the player's draw; every other player gets one
    /// more turn before the showdown.
    pub fn can_knock(&self) -> bool {
        self.phase == TurnPhase::Draw && self.knocker.is_none()
    }

    pub fn knock(&mut self) -> bool {
        if !self.can_knock() {
            return false;
        }
        self.knocker = Some(self.current);
        self.current = self.next_alive_after(self.current);
        self.phase = TurnPhase::Draw;
        true
    }

    /// The lay-down the current player could declare, if any. With four
    /// cards in hand every three-card subset is checked.
    pub fn available_lay_down(&self) -> Option<LayDown> {
        if self.phase == TurnPhase::RoundEnd {
            return None;
        }
        let hand = &self.players[self.current].hand;
        if hand.len() == HAND_SIZE {
            return detect_lay_down(hand);
        }
        if hand.len() == HAND_SIZE + 1 {
            for skip in 0..hand.len() {
                let subset: Vec<Card> = hand
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, card)| *card)
                    .collect();
                if let Some(lay_down) = detect_lay_down(&subset) {
                    return Some(lay_down);
                }
            }
        }
        None
    }

    /// Declaring a lay-down ends the round immediately; every other living
    /// player loses a token.
    pub fn lay_down(&mut self) -> Option<LayDown> {
        let lay_down = self.available_lay_down()?;
        let winner = self.current;
        self.last_round_losers = (0..self.players.len())
            .filter(|&idx| idx != winner && self.players[idx].alive)
            .collect();
        for idx in self.last_round_losers.clone() {
            self.lose_token(idx);
        }
        self.phase = TurnPhase::RoundEnd;
        Some(lay_down)
    }

    pub fn is_won(&self) -> bool {
        self.players.iter().filter(|player| player.alive).count() == 1
    }

    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.discard.len()
            + self.players.iter().map(|player| player.hand.len()).sum::<usize>()
    }

    fn next_alive_after(&self, idx: usize) -> usize {
        let count = self.players.len();
        (1..=count)
            .map(|offset| (idx + offset) % count)
            .find(|&candidate| self.players[candidate].alive)
            .unwrap_or(idx)
    }

    /// Knock has wrapped around. Every hand is scored and the lowest hand
    /// (all of them, on a tie) loses a token.
    fn end_round(&mut self) {
        self.phase = TurnPhase::RoundEnd;

        let scores: Vec<(usize, u8)> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.alive)
            .map(|(idx, player)| (idx, hand_value(&player.hand)))
            .collect();
        let Some(lowest) = scores.iter().map(|&(_, score)| score).min() else {
            return;
        };

        self.last_round_losers = scores
            .iter()
            .filter(|&&(_, score)| score == lowest)
            .map(|&(idx, _)| idx)
            .collect();
        for idx in self.last_round_losers.clone() {
            self.lose_token(idx);
        }
    }

    /// A player out of tokens plays on borrowed time; the next loss
    /// eliminates them.
    fn lose_token(&mut self, idx: usize) {
        let player = &mut self.players[idx];
        if player.tokens > 0 {
            player.tokens -= 1;
        } else {
            player.alive = false;
        }
    }

    fn recycle_discard(&mut self) {
        let Some(top) = self.discard.pop() else {
            return;
        };
        while let Some(card) = self.discard.pop() {
            self.stock.push(card);
        }
        self.discard.push(top);
    }
}

fn card_value(card: Card) -> u8 {
    match card.rank {
        ACE => 11,
        rank if rank >= 10 => 10,
        rank => rank,
    }
}

/// Best same-suit point total. Ace counts 11, face cards 10.
pub fn hand_value(hand: &[Card]) -> u8 {
    super::Suit::ALL
        .iter()
        .map(|&suit| {
            hand.iter()
                .filter(|card| card.suit == suit)
                .map(|&card| card_value(card))
                .sum()
        })
        .max()
        .unwrap_or(0)
}

pub fn detect_lay_down(hand: &[Card]) -> Option<LayDown> {
    if hand.len() != HAND_SIZE {
        return None;
    }
    if hand.iter().all(|card| card.rank == ACE) {
        return Some(LayDown::ThreeAces);
    }
    if hand_value(hand) == 31 {
        return Some(LayDown::ThirtyOneInSuit);
    }
    let faces = hand.iter().filter(|card| card.is_face()).count();
    let aces = hand.iter().filter(|card| card.rank == ACE).count();
    if faces == 2 && aces == 1 {
        return Some(LayDown::TwoFacePlusAce);
    }
    None
}

#[cfg(test)]
impl ThirtyOneGame {
    pub(crate) fn debug_new(hands: Vec<Vec<Card>>, stock: Vec<Card>, discard: Vec<Card>) -> Self {
        Self {
            players: hands
                .into_iter()
                .map(|hand| ThirtyOnePlayer {
                    hand,
                    tokens: STARTING_TOKENS,
                    alive: true,
                })
                .collect(),
            stock,
            discard,
            current: 0,
            phase: TurnPhase::Draw,
            knocker: None,
            last_round_losers: Vec::new(),
        }
    }

    pub(crate) fn debug_tokens_mut(&mut self, idx: usize) -> &mut u8 {
        &mut self.players[idx].tokens
    }
}
