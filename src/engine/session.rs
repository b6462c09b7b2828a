//! Session front door: intents in, events out, one `tick()` entry point.

use rand::Rng;
use tracing::{debug, trace};

use crate::engine::animation::AnimationTuning;
use crate::engine::auto_finish::AutoFinishDriver;
use crate::engine::boundary;
use crate::engine::error::MoveError;
use crate::engine::events::{EventSink, GameEvent, SoundCue};
use crate::engine::intents::{Intent, ModeConfig};
use crate::engine::scheduler::{AnimationScheduler, FollowUp, SchedulerEvent};
use crate::engine::variant_state::VariantStateStore;
use crate::game::{Card, DrawResult, GameMode, PileId, TurnPhase};

pub struct GameSession<S: EventSink> {
    mode: GameMode,
    seed: u64,
    config: ModeConfig,
    state: VariantStateStore,
    scheduler: AnimationScheduler,
    auto_finish: AutoFinishDriver,
    sink: S,
    move_count: u32,
    selection: Option<(PileId, usize)>,
    /// Cards the current deal put on the table; the conservation check
    /// holds piles + in-flight against this every tick.
    expected_cards: usize,
}

impl<S: EventSink> GameSession<S> {
    pub fn new(mode: GameMode, seed: Option<u64>, config: ModeConfig, sink: S) -> Self {
        Self::with_tuning(mode, seed, config, AnimationTuning::for_mode(mode), sink)
    }

    /// Overrides the animation profile for this session. Switching game
    /// modes reverts to the per-mode profile.
    pub fn with_tuning(
        mode: GameMode,
        seed: Option<u64>,
        config: ModeConfig,
        tuning: AnimationTuning,
        sink: S,
    ) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let state = VariantStateStore::new(seed, &config);
        let expected_cards = state.pile_card_count(mode);
        let mut session = Self {
            mode,
            seed,
            config,
            state,
            scheduler: AnimationScheduler::with_tuning(mode, tuning),
            auto_finish: AutoFinishDriver::new(),
            sink,
            move_count: 0,
            selection: None,
            expected_cards,
        };
        session.announce_deal();
        session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn selection(&self) -> Option<(PileId, usize)> {
        self.selection
    }

    pub fn state(&self) -> &VariantStateStore {
        &self.state
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// True while a phase is running or a scheduled follow-up is still due.
    pub fn is_animating(&self) -> bool {
        self.scheduler.is_busy() || self.scheduler.has_follow_ups()
    }

    pub fn handle(&mut self, intent: Intent) -> Result<(), MoveError> {
        trace!(?intent, "intent");
        let outcome = self.dispatch(intent);
        if let Err(error) = &outcome {
            debug!(?intent, %error, "intent rejected");
            self.sink.emit(GameEvent::MoveRejected {
                reason: error.reason(),
            });
            self.sink.emit(GameEvent::SoundCue(SoundCue::Error));
        }
        outcome
    }

    fn dispatch(&mut self, intent: Intent) -> Result<(), MoveError> {
        match intent {
            Intent::NewGame { seed } => {
                self.deal(seed.unwrap_or_else(|| rand::thread_rng().gen()));
                Ok(())
            }
            Intent::RestartGame => {
                self.deal(self.seed);
                Ok(())
            }
            Intent::Shuffle { seed } => {
                self.deal(seed);
                Ok(())
            }
            Intent::DrawStock => self.draw_stock(),
            Intent::SelectCard { pile, index } => self.select_card(pile, index),
            Intent::MoveCards { src, start, dst } => self.move_cards(src, start, dst),
            Intent::ActivateSelection => self.activate_selection(),
            Intent::Knock => self.knock(),
            Intent::LayDown => self.lay_down(),
            Intent::NextRound => self.next_round(),
            Intent::AutoFinish => self.start_auto_finish(),
            Intent::CancelAnimation => {
                self.auto_finish.deactivate();
                if self.scheduler.is_busy() {
                    // Interrupted flights snap home on the next tick.
                    self.sink.emit(GameEvent::SoundCue(SoundCue::CardReturn));
                }
                self.scheduler.cancel();
                Ok(())
            }
            Intent::SetDrawMode(draw_mode) => {
                self.config.draw_mode = draw_mode;
                boundary::set_draw_mode(&mut self.state, self.mode, draw_mode);
                Ok(())
            }
            Intent::SetGameMode(mode) => {
                self.auto_finish.deactivate();
                // Settle what the old variant still owes before the switch;
                // after it, arrivals would route through the new engine.
                self.settle_animations();
                self.mode = mode;
                self.scheduler.set_mode(mode);
                self.expected_cards = self.state.pile_card_count(mode);
                self.selection = None;
                self.emit_all_piles_changed();
                Ok(())
            }
        }
    }

    /// Advances the animation clock by one fixed tick, applying every
    /// arrival's mutation and surfacing frames and sounds.
    pub fn tick(&mut self) {
        let events = self.scheduler.tick();
        for event in events {
            self.apply_scheduler_event(event);
        }
        debug_assert_eq!(
            self.state.pile_card_count(self.mode) + self.scheduler.in_flight_mutation_cards(),
            self.expected_cards,
            "card conservation"
        );
    }

    fn apply_scheduler_event(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Frame(frame) => {
                self.sink.emit(GameEvent::AnimationFrame(frame));
            }
            SchedulerEvent::DealCardLanded => {
                self.sink.emit(GameEvent::SoundCue(SoundCue::DealCard));
            }
            SchedulerEvent::DealComplete => {
                self.emit_all_piles_changed();
            }
            SchedulerEvent::StockCardArrived(card) => {
                self.state.klondike_mut().place_on_waste(card);
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Waste });
                self.sink.emit(GameEvent::SoundCue(SoundCue::CardPlace));
            }
            SchedulerEvent::FoundationCardArrived(card) => {
                self.settle_foundation_arrival(card);
            }
            SchedulerEvent::SequenceCardArrived => {
                self.sink.emit(GameEvent::SoundCue(SoundCue::CardPlace));
            }
            SchedulerEvent::SequenceRetired { col } => {
                self.retire_sequence(col);
            }
            SchedulerEvent::CardExploded => {
                self.sink.emit(GameEvent::SoundCue(SoundCue::Firework));
            }
            SchedulerEvent::AutoFinishReady => {
                self.auto_finish_step();
            }
        }
    }

    /// Cancels and drains until the table is idle. A drained retirement can
    /// launch the next completed run, so one pass is not always enough.
    fn settle_animations(&mut self) {
        loop {
            self.scheduler.cancel();
            self.tick();
            if !self.scheduler.is_busy() {
                return;
            }
        }
    }

    fn deal(&mut self, seed: u64) {
        self.auto_finish.deactivate();
        // Apply whatever the cancelled phase still owed before re-dealing.
        self.settle_animations();

        self.seed = seed;
        self.state.reset_mode(self.mode, seed, &self.config);
        self.expected_cards = self.state.pile_card_count(self.mode);
        self.move_count = 0;
        self.selection = None;
        debug!(seed, mode = self.mode.id(), "deal");
        self.announce_deal();
    }

    fn announce_deal(&mut self) {
        self.sink.emit(GameEvent::SoundCue(SoundCue::GameStart));
        self.emit_all_piles_changed();
        let flights = self.deal_flights();
        self.scheduler.begin_dealing(flights);
    }

    /// Visual catch-up flights for the fresh deal; the piles are already
    /// populated.
    fn deal_flights(&self) -> Vec<(Card, PileId, usize)> {
        let mut flights = Vec::new();
        match self.mode {
            GameMode::Klondike => {
                for (col, pile) in self.state.klondike().tableau().iter().enumerate() {
                    for (row, entry) in pile.iter().enumerate() {
                        flights.push((entry.card, PileId::Tableau(col), row));
                    }
                }
            }
            GameMode::Spider => {
                for (col, pile) in self.state.spider().tableau().iter().enumerate() {
                    for (row, entry) in pile.iter().enumerate() {
                        flights.push((entry.card, PileId::Tableau(col), row));
                    }
                }
            }
            GameMode::Freecell => {
                for (col, pile) in self.state.freecell().tableau().iter().enumerate() {
                    for (row, entry) in pile.iter().enumerate() {
                        flights.push((entry.card, PileId::Tableau(col), row));
                    }
                }
            }
            GameMode::Pyramid => {
                for (slot, card) in self.state.pyramid().layout().iter().enumerate() {
                    if let Some(card) = card {
                        flights.push((*card, PileId::Pyramid(slot), 0));
                    }
                }
            }
            GameMode::ThirtyOne => {
                for (player, hand) in self.state.thirty_one().players().iter().enumerate() {
                    for (idx, card) in hand.hand().iter().enumerate() {
                        flights.push((*card, PileId::Hand(player), idx));
                    }
                }
            }
        }
        flights
    }

    fn draw_stock(&mut self) -> Result<(), MoveError> {
        if self.scheduler.is_busy() {
            return Err(MoveError::AnimationBusy);
        }

        if self.mode == GameMode::Klondike {
            return self.draw_klondike_stock();
        }

        match boundary::draw_stock(&mut self.state, self.mode) {
            DrawResult::NoOp => Err(MoveError::illegal("nothing to draw")),
            DrawResult::RecycledWaste => {
                self.move_count += 1;
                self.sink.emit(GameEvent::SoundCue(SoundCue::StockRefill));
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Stock });
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Waste });
                Ok(())
            }
            DrawResult::DrewFromStock | DrawResult::DealtRow => {
                self.move_count += 1;
                self.sink.emit(GameEvent::SoundCue(SoundCue::DealCard));
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Stock });
                self.emit_all_piles_changed();
                self.check_sequence_completion();
                self.check_for_win();
                Ok(())
            }
        }
    }

    /// Klondike draws fly: the cards leave the stock now and land on the
    /// waste as each flight arrives.
    fn draw_klondike_stock(&mut self) -> Result<(), MoveError> {
        let game = self.state.klondike_mut();
        if game.stock_len() > 0 {
            let cards = game.take_stock_cards(self.config.draw_mode.count());
            self.move_count += 1;
            self.sink.emit(GameEvent::PileChanged { pile: PileId::Stock });
            self.scheduler.begin_stock_to_waste(cards);
            return Ok(());
        }
        match game.recycle_waste() {
            DrawResult::RecycledWaste => {
                self.move_count += 1;
                self.sink.emit(GameEvent::SoundCue(SoundCue::StockRefill));
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Stock });
                self.sink.emit(GameEvent::PileChanged { pile: PileId::Waste });
                Ok(())
            }
            _ => Err(MoveError::illegal("nothing to draw")),
        }
    }

    fn select_card(&mut self, pile: PileId, index: usize) -> Result<(), MoveError> {
        if !self.selection_target_valid(pile, index) {
            self.selection = None;
            return Err(MoveError::InvalidIndex { pile, index });
        }
        self.selection = Some((pile, index));
        Ok(())
    }

    fn selection_target_valid(&self, pile: PileId, index: usize) -> bool {
        match (self.mode, pile) {
            (GameMode::Klondike, PileId::Tableau(col)) => self
                .state
                .klondike()
                .tableau_card(col, index)
                .is_some_and(|entry| entry.face_up),
            (GameMode::Klondike, PileId::Waste) => self.state.klondike().waste_top().is_some(),
            (GameMode::Spider, PileId::Tableau(col)) => self
                .state
                .spider()
                .tableau_card(col, index)
                .is_some_and(|entry| entry.face_up),
            (GameMode::Freecell, PileId::Tableau(col)) => {
                self.state.freecell().tableau_card(col, index).is_some()
            }
            (GameMode::Freecell, PileId::Freecell(cell)) => {
                self.state.freecell().freecell_card(cell).is_some()
            }
            (GameMode::Pyramid, PileId::Pyramid(slot)) => self.state.pyramid().is_exposed(slot),
            (GameMode::Pyramid, PileId::Waste) => self.state.pyramid().waste_top().is_some(),
            (GameMode::ThirtyOne, PileId::Hand(player)) => self
                .state
                .thirty_one()
                .players()
                .get(player)
                .is_some_and(|p| index < p.hand().len()),
            _ => false,
        }
    }

    fn move_cards(&mut self, src: PileId, start: usize, dst: PileId) -> Result<(), MoveError> {
        self.selection = None;

        // Foundation-bound moves animate; re-entry force-completes the
        // previous flight inside the scheduler.
        if matches!(dst, PileId::Foundation(_))
            && boundary::can_lift_for_foundation(&self.state, self.mode, src)
        {
            return self.launch_foundation_move(src, false);
        }

        if self.scheduler.is_busy() && !self.scheduler.is_celebrating() {
            return Err(MoveError::AnimationBusy);
        }

        if !boundary::apply_move(&mut self.state, self.mode, src, start, dst) {
            return Err(MoveError::illegal("move not allowed"));
        }

        self.move_count += 1;
        self.sink.emit(GameEvent::PileChanged { pile: src });
        self.sink.emit(GameEvent::PileChanged { pile: dst });
        self.sink.emit(GameEvent::SoundCue(SoundCue::CardPlace));
        self.emit_flips();
        self.check_sequence_completion();
        self.check_for_win();
        Ok(())
    }

    fn activate_selection(&mut self) -> Result<(), MoveError> {
        let Some((pile, index)) = self.selection.take() else {
            return Err(MoveError::illegal("nothing selected"));
        };
        if !self.selection_target_valid(pile, index) {
            return Err(MoveError::InvalidIndex { pile, index });
        }
        if boundary::can_lift_for_foundation(&self.state, self.mode, pile) {
            return self.launch_foundation_move(pile, false);
        }
        Err(MoveError::illegal("selection has no foundation move"))
    }

    fn launch_foundation_move(&mut self, source: PileId, auto: bool) -> Result<(), MoveError> {
        // Rejections must leave the board untouched, so the busy check runs
        // before the card is lifted.
        if !self.scheduler.accepts_foundation_move() {
            return Err(MoveError::AnimationBusy);
        }
        let Some(card) = boundary::lift_for_foundation(&mut self.state, self.mode, source) else {
            return Err(MoveError::illegal("card is not foundation-bound"));
        };
        let Some(foundation_idx) = card.suit.foundation_index() else {
            // Unreachable for lifted cards; put it back rather than lose it.
            boundary::settle_on_foundation(&mut self.state, self.mode, card);
            return Err(MoveError::illegal("card has no foundation"));
        };

        match self
            .scheduler
            .begin_foundation_move(card, source, foundation_idx, auto)
        {
            Some(forced) => {
                for event in forced {
                    self.apply_scheduler_event(event);
                }
                self.sink.emit(GameEvent::PileChanged { pile: source });
                self.emit_flips();
                Ok(())
            }
            None => {
                // Unreachable after the accepts check; keep the card safe.
                boundary::settle_on_foundation(&mut self.state, self.mode, card);
                Err(MoveError::AnimationBusy)
            }
        }
    }

    fn settle_foundation_arrival(&mut self, card: Card) {
        boundary::settle_on_foundation(&mut self.state, self.mode, card);
        self.move_count += 1;
        if let Some(idx) = card.suit.foundation_index() {
            self.sink.emit(GameEvent::PileChanged {
                pile: PileId::Foundation(idx),
            });
        }
        self.sink
            .emit(GameEvent::SoundCue(SoundCue::FoundationMove));
        self.check_for_win();
    }

    fn retire_sequence(&mut self, col: usize) {
        if self.state.spider_mut().retire_completed_run(col).is_some() {
            self.sink.emit(GameEvent::PileChanged {
                pile: PileId::Tableau(col),
            });
            self.sink.emit(GameEvent::PileChanged {
                pile: PileId::Foundation(0),
            });
            self.sink
                .emit(GameEvent::SoundCue(SoundCue::FoundationMove));
            self.emit_flips();
            self.check_for_win();
            // One mutation can complete two runs (a stock row-deal, say);
            // the next one flies as soon as this retirement lands.
            self.check_sequence_completion();
        }
    }

    /// A Spider move may have completed a King-to-Ace run; fly it out.
    fn check_sequence_completion(&mut self) {
        if self.mode != GameMode::Spider || self.scheduler.is_busy() {
            return;
        }
        let Some(col) = self.state.spider().completed_run_column() else {
            return;
        };
        if let Some(cards) = self.state.spider().completed_run_cards(col) {
            self.scheduler.begin_sequence_complete(col, cards);
        }
    }

    fn knock(&mut self) -> Result<(), MoveError> {
        if !boundary::capabilities(self.mode).turn_machine {
            return Err(MoveError::illegal("variant has no turn machine"));
        }
        if self.scheduler.is_busy() {
            return Err(MoveError::AnimationBusy);
        }
        if !self.state.thirty_one_mut().knock() {
            return Err(MoveError::illegal("knocking is not allowed now"));
        }
        self.move_count += 1;
        self.sink.emit(GameEvent::SoundCue(SoundCue::CardPlace));
        Ok(())
    }

    fn lay_down(&mut self) -> Result<(), MoveError> {
        if !boundary::capabilities(self.mode).turn_machine {
            return Err(MoveError::illegal("variant has no turn machine"));
        }
        if self.scheduler.is_busy() {
            return Err(MoveError::AnimationBusy);
        }
        if self.state.thirty_one_mut().lay_down().is_none() {
            return Err(MoveError::illegal("hand has no lay-down"));
        }
        self.move_count += 1;
        for player in 0..self.state.thirty_one().players().len() {
            self.sink.emit(GameEvent::PileChanged {
                pile: PileId::Hand(player),
            });
        }
        self.sink.emit(GameEvent::SoundCue(SoundCue::CardFlip));
        self.check_for_win();
        Ok(())
    }

    /// Deals the next Thirty-One round after a showdown. Tokens and
    /// eliminations carry over, so this never goes through a full re-deal.
    fn next_round(&mut self) -> Result<(), MoveError> {
        if !boundary::capabilities(self.mode).turn_machine {
            return Err(MoveError::illegal("variant has no rounds"));
        }
        if self.state.thirty_one().phase() != TurnPhase::RoundEnd {
            return Err(MoveError::illegal("round still in progress"));
        }
        if boundary::is_won(&self.state, self.mode) {
            return Err(MoveError::illegal("game is over"));
        }
        self.settle_animations();
        self.state
            .thirty_one_mut()
            .deal_round(rand::thread_rng().gen());
        self.expected_cards = self.state.pile_card_count(self.mode);
        self.selection = None;
        self.announce_deal();
        Ok(())
    }

    fn start_auto_finish(&mut self) -> Result<(), MoveError> {
        if !self.auto_finish.activate(self.mode) {
            return Err(MoveError::illegal("variant has no auto-finish"));
        }
        self.auto_finish_step();
        Ok(())
    }

    /// One driver step: launch the next foundation flight, or retry later
    /// when the table is busy, or deactivate on an empty scan.
    fn auto_finish_step(&mut self) {
        if !self.auto_finish.is_active() {
            return;
        }
        if self.scheduler.is_busy() {
            self.scheduler.schedule_follow_up(
                self.scheduler.tuning().auto_finish_retry_ms,
                FollowUp::AutoFinishStep,
            );
            return;
        }
        match self.auto_finish.next_move(&self.state, self.mode) {
            Some(step) => {
                let _ = self.launch_foundation_move(step.source, true);
            }
            None => {
                self.check_for_win();
            }
        }
    }

    fn check_for_win(&mut self) {
        if self.scheduler.is_celebrating() || !boundary::is_won(&self.state, self.mode) {
            return;
        }
        debug!(mode = self.mode.id(), "won");
        self.auto_finish.deactivate();
        let sources = self.celebration_sources();
        let forced = self.scheduler.begin_celebration(self.seed, sources);
        for event in forced {
            self.apply_scheduler_event(event);
        }
        self.sink.emit(GameEvent::GameWon);
        self.sink.emit(GameEvent::SoundCue(SoundCue::WinGame));
    }

    /// Foundation tops seed the celebration launches.
    fn celebration_sources(&self) -> Vec<(Card, usize)> {
        match self.mode {
            GameMode::Klondike => top_cards(self.state.klondike().foundations()),
            GameMode::Freecell => top_cards(self.state.freecell().foundations()),
            GameMode::Spider => self
                .state
                .spider()
                .foundations()
                .iter()
                .enumerate()
                .filter_map(|(slot, pile)| pile.last().map(|card| (*card, slot.min(3))))
                .collect(),
            // Non-foundation variants celebrate with a standard spread.
            GameMode::Pyramid | GameMode::ThirtyOne => crate::game::Suit::ALL
                .iter()
                .enumerate()
                .map(|(slot, &suit)| (Card::new(suit, 13), slot))
                .collect(),
        }
    }

    fn emit_flips(&mut self) {
        while let Some((pile, card)) = boundary::take_flip(&mut self.state, self.mode) {
            self.sink.emit(GameEvent::CardFlipped { pile, card });
            self.sink.emit(GameEvent::SoundCue(SoundCue::CardFlip));
        }
    }

    #[cfg(test)]
    pub(crate) fn debug_state_mut(&mut self) -> &mut VariantStateStore {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn debug_set_expected_cards(&mut self, expected: usize) {
        self.expected_cards = expected;
    }

    fn emit_all_piles_changed(&mut self) {
        for pile in self.all_piles() {
            self.sink.emit(GameEvent::PileChanged { pile });
        }
    }

    /// Every pile the active variant shows. Full-resync announcements
    /// (deal, mode switch) walk this list.
    fn all_piles(&self) -> Vec<PileId> {
        let mut piles = Vec::new();
        match self.mode {
            GameMode::Klondike => {
                piles.push(PileId::Stock);
                piles.push(PileId::Waste);
                piles.extend((0..4).map(PileId::Foundation));
            }
            GameMode::Spider => {
                piles.push(PileId::Stock);
                let slots = self.state.spider().foundations().len();
                piles.extend((0..slots).map(PileId::Foundation));
            }
            GameMode::Freecell => {
                piles.extend((0..boundary::freecell_count(self.mode)).map(PileId::Freecell));
                piles.extend((0..4).map(PileId::Foundation));
            }
            GameMode::Pyramid => {
                piles.push(PileId::Stock);
                piles.push(PileId::Waste);
                piles.push(PileId::Discard);
                let slots = self.state.pyramid().layout().len();
                piles.extend((0..slots).map(PileId::Pyramid));
            }
            GameMode::ThirtyOne => {
                piles.push(PileId::Stock);
                piles.push(PileId::Discard);
                let players = self.state.thirty_one().players().len();
                piles.extend((0..players).map(PileId::Hand));
            }
        }
        piles.extend((0..boundary::tableau_count(self.mode)).map(PileId::Tableau));
        piles
    }
}

/// Top card of each foundation, paired with its slot.
fn top_cards(foundations: &[Vec<Card>; 4]) -> Vec<(Card, usize)> {
    foundations
        .iter()
        .enumerate()
        .filter_map(|(slot, pile)| pile.last().map(|card| (*card, slot)))
        .collect()
}
