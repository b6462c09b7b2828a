//! Phase state machine driven by a fixed 1/60 s tick.
//!
//! The scheduler owns in-flight cards and the timing of their arrivals; it
//! never touches game state. Arrivals surface as [`SchedulerEvent`]s and
//! the session applies the corresponding mutation, so a cancelled phase can
//! apply everything that was still pending without losing a card.

use std::collections::VecDeque;

use tracing::debug;

use crate::engine::animation::{ticks_for_ms, AnimatedCard, AnimationTuning};
use crate::engine::celebration::Celebration;
use crate::engine::events::{AnimationFrame, FrameCard, FrameFragment};
use crate::engine::layout::{TableLayout, TableMetrics};
use crate::game::{Card, GameMode, PileId};

#[derive(Debug, Clone)]
struct DealingPhase {
    /// Cards still waiting to launch, with their landing slot.
    queue: VecDeque<(Card, PileId, usize)>,
    launch_countdown: u32,
    flights: Vec<AnimatedCard>,
}

#[derive(Debug, Clone)]
struct StockToWastePhase {
    /// Pre-removed from the stock; owned here until each arrival.
    pending: VecDeque<Card>,
    in_flight: Option<AnimatedCard>,
}

#[derive(Debug, Clone)]
struct FoundationMovePhase {
    flight: AnimatedCard,
    /// Re-arm the auto-finish driver after this arrival.
    auto_finish: bool,
}

#[derive(Debug, Clone)]
struct SequencePhase {
    col: usize,
    /// King first; cards stay in the tableau until the whole run arrives.
    pending: VecDeque<Card>,
    release_countdown: u32,
    flights: Vec<AnimatedCard>,
    arrived: usize,
    total: usize,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Dealing(DealingPhase),
    StockToWaste(StockToWastePhase),
    FoundationMove(FoundationMovePhase),
    SequenceComplete(SequencePhase),
    WinCelebration(Celebration),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dealing(_) => "dealing",
            Phase::StockToWaste(_) => "stock-to-waste",
            Phase::FoundationMove(_) => "foundation-move",
            Phase::SequenceComplete(_) => "sequence-complete",
            Phase::WinCelebration(_) => "win-celebration",
        }
    }
}

/// What a tick produced. Mutation-bearing arrivals must be applied by the
/// caller in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    Frame(AnimationFrame),
    DealCardLanded,
    DealComplete,
    StockCardArrived(Card),
    FoundationCardArrived(Card),
    SequenceCardArrived,
    SequenceRetired { col: usize },
    /// A celebrating card burst into fragments.
    CardExploded,
    AutoFinishReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    AutoFinishStep,
}

#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    phase: Phase,
    layout: TableLayout,
    tuning: AnimationTuning,
    cancel_requested: bool,
    follow_ups: Vec<(u32, FollowUp)>,
}

impl AnimationScheduler {
    pub fn new(mode: GameMode) -> Self {
        Self::with_tuning(mode, AnimationTuning::for_mode(mode))
    }

    pub fn with_tuning(mode: GameMode, tuning: AnimationTuning) -> Self {
        Self {
            phase: Phase::Idle,
            layout: TableLayout::new(mode, TableMetrics::default()),
            tuning,
            cancel_requested: false,
            follow_ups: Vec::new(),
        }
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.layout = TableLayout::new(mode, self.layout.metrics);
        self.tuning = AnimationTuning::for_mode(mode);
    }

    pub fn tuning(&self) -> &AnimationTuning {
        &self.tuning
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_celebrating(&self) -> bool {
        matches!(self.phase, Phase::WinCelebration(_))
    }

    pub fn has_follow_ups(&self) -> bool {
        !self.follow_ups.is_empty()
    }

    /// Only an idle table or a re-entrant foundation flight can take a new
    /// foundation launch; every other phase refuses it.
    pub fn accepts_foundation_move(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::FoundationMove(_))
    }

    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    /// Cards owned by the scheduler that have already left a pile and not
    /// yet landed. Counted by the conservation check.
    pub fn in_flight_mutation_cards(&self) -> usize {
        match &self.phase {
            Phase::StockToWaste(phase) => {
                phase.pending.len() + usize::from(phase.in_flight.is_some())
            }
            Phase::FoundationMove(_) => 1,
            // Dealing and sequence flights are visual; their cards still
            // live in real piles. Celebration clones are snapshots.
            _ => 0,
        }
    }

    pub fn begin_dealing(&mut self, cards: Vec<(Card, PileId, usize)>) -> bool {
        if self.is_busy() || cards.is_empty() {
            return false;
        }
        debug!(count = cards.len(), "phase dealing");
        self.phase = Phase::Dealing(DealingPhase {
            queue: cards.into(),
            launch_countdown: 0,
            flights: Vec::new(),
        });
        true
    }

    /// `cards` were already removed from the stock, oldest first.
    pub fn begin_stock_to_waste(&mut self, cards: Vec<Card>) -> bool {
        if self.is_busy() || cards.is_empty() {
            return false;
        }
        debug!(count = cards.len(), "phase stock-to-waste");
        self.phase = Phase::StockToWaste(StockToWastePhase {
            pending: cards.into(),
            in_flight: None,
        });
        true
    }

    /// Launches a lifted card toward its foundation slot. Re-entry while a
    /// previous foundation flight is active force-completes it, returning
    /// the arrival the caller must apply first. Any other active phase
    /// refuses the launch.
    pub fn begin_foundation_move(
        &mut self,
        card: Card,
        source: PileId,
        foundation_idx: usize,
        auto_finish: bool,
    ) -> Option<Vec<SchedulerEvent>> {
        let mut events = Vec::new();
        let mut rearm = false;
        match &self.phase {
            Phase::Idle => {}
            Phase::FoundationMove(previous) => {
                debug!("force-completing foundation flight");
                events.push(SchedulerEvent::FoundationCardArrived(previous.flight.card));
                rearm = previous.auto_finish;
            }
            _ => return None,
        }
        if rearm {
            self.schedule_follow_up(self.tuning.auto_finish_rearm_ms, FollowUp::AutoFinishStep);
        }

        let from = self.layout.slot_center(source, 0);
        let to = self.layout.slot_center(PileId::Foundation(foundation_idx), 0);
        let flight = AnimatedCard::arc(
            card,
            from,
            to,
            ticks_for_ms(self.tuning.foundation_flight_ms),
            &self.tuning,
        );
        debug!(card = %card.label(), foundation_idx, "phase foundation-move");
        self.phase = Phase::FoundationMove(FoundationMovePhase {
            flight,
            auto_finish,
        });
        Some(events)
    }

    /// `cards` is the completing run, King first; the tableau keeps them
    /// until [`SchedulerEvent::SequenceRetired`] fires.
    pub fn begin_sequence_complete(&mut self, col: usize, cards: Vec<Card>) -> bool {
        if self.is_busy() || cards.is_empty() {
            return false;
        }
        debug!(col, "phase sequence-complete");
        let total = cards.len();
        self.phase = Phase::SequenceComplete(SequencePhase {
            col,
            pending: cards.into(),
            release_countdown: 0,
            flights: Vec::new(),
            arrived: 0,
            total,
        });
        true
    }

    /// Enters the celebration, force-draining any pending mutations first.
    /// The returned arrivals must be applied before the win is announced.
    pub fn begin_celebration(
        &mut self,
        seed: u64,
        sources: Vec<(Card, usize)>,
    ) -> Vec<SchedulerEvent> {
        let events = self.drain_pending();
        debug!("phase win-celebration");
        self.phase = Phase::WinCelebration(Celebration::new(seed, sources, &self.tuning));
        events
    }

    pub fn schedule_follow_up(&mut self, ms: u64, kind: FollowUp) {
        self.follow_ups.push((ticks_for_ms(ms), kind));
    }

    /// Cooperative: takes effect on the next tick.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    pub fn tick(&mut self) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();

        if self.cancel_requested {
            self.cancel_requested = false;
            if self.is_busy() {
                debug!(phase = self.phase.name(), "cancelling");
                events.extend(self.drain_pending());
                self.phase = Phase::Idle;
            }
            self.follow_ups.clear();
            return events;
        }

        if matches!(self.phase, Phase::Dealing(_)) {
            self.tick_dealing(&mut events);
        } else if matches!(self.phase, Phase::StockToWaste(_)) {
            self.tick_stock(&mut events);
        } else if matches!(self.phase, Phase::FoundationMove(_)) {
            self.tick_foundation(&mut events);
        } else if matches!(self.phase, Phase::SequenceComplete(_)) {
            self.tick_sequence(&mut events);
        } else if matches!(self.phase, Phase::WinCelebration(_)) {
            self.tick_celebration(&mut events);
        }

        self.tick_follow_ups(&mut events);

        if self.is_busy() {
            events.push(SchedulerEvent::Frame(self.frame()));
        }
        events
    }

    fn tick_dealing(&mut self, events: &mut Vec<SchedulerEvent>) {
        let Phase::Dealing(phase) = &mut self.phase else {
            return;
        };

        if phase.launch_countdown == 0 {
            if let Some((card, pile, index)) = phase.queue.pop_front() {
                let to = self.layout.slot_center(pile, index);
                phase.flights.push(AnimatedCard::arc(
                    card,
                    self.layout.deal_origin(),
                    to,
                    ticks_for_ms(self.tuning.deal_flight_ms),
                    &self.tuning,
                ));
                phase.launch_countdown = ticks_for_ms(self.tuning.deal_stagger_ms);
            }
        } else {
            phase.launch_countdown -= 1;
        }

        let gravity = self.tuning.gravity;
        let mut landed = 0;
        phase.flights.retain_mut(|flight| {
            if flight.advance(gravity) {
                landed += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..landed {
            events.push(SchedulerEvent::DealCardLanded);
        }

        if phase.queue.is_empty() && phase.flights.is_empty() {
            events.push(SchedulerEvent::DealComplete);
            self.phase = Phase::Idle;
        }
    }

    fn tick_stock(&mut self, events: &mut Vec<SchedulerEvent>) {
        let Phase::StockToWaste(phase) = &mut self.phase else {
            return;
        };

        if phase.in_flight.is_none() {
            if let Some(card) = phase.pending.pop_front() {
                phase.in_flight = Some(AnimatedCard::arc(
                    card,
                    self.layout.slot_center(PileId::Stock, 0),
                    self.layout.slot_center(PileId::Waste, 0),
                    ticks_for_ms(self.tuning.stock_flight_ms),
                    &self.tuning,
                ));
            }
        }

        if let Some(flight) = &mut phase.in_flight {
            if flight.advance(self.tuning.gravity) {
                events.push(SchedulerEvent::StockCardArrived(flight.card));
                phase.in_flight = None;
            }
        }

        if phase.pending.is_empty() && phase.in_flight.is_none() {
            self.phase = Phase::Idle;
        }
    }

    fn tick_foundation(&mut self, events: &mut Vec<SchedulerEvent>) {
        let Phase::FoundationMove(phase) = &mut self.phase else {
            return;
        };

        if phase.flight.advance(self.tuning.gravity) {
            events.push(SchedulerEvent::FoundationCardArrived(phase.flight.card));
            if phase.auto_finish {
                let rearm = self.tuning.auto_finish_rearm_ms;
                self.phase = Phase::Idle;
                self.schedule_follow_up(rearm, FollowUp::AutoFinishStep);
            } else {
                self.phase = Phase::Idle;
            }
        }
    }

    fn tick_sequence(&mut self, events: &mut Vec<SchedulerEvent>) {
        let Phase::SequenceComplete(phase) = &mut self.phase else {
            return;
        };

        if phase.release_countdown == 0 {
            if let Some(card) = phase.pending.pop_front() {
                let from = self.layout.slot_center(PileId::Tableau(phase.col), 0);
                let to = self.layout.slot_center(PileId::Foundation(0), 0);
                phase.flights.push(AnimatedCard::arc(
                    card,
                    from,
                    to,
                    ticks_for_ms(self.tuning.sequence_flight_ms),
                    &self.tuning,
                ));
                phase.release_countdown = ticks_for_ms(self.tuning.sequence_reveal_ms);
            }
        } else {
            phase.release_countdown -= 1;
        }

        let gravity = self.tuning.gravity;
        let mut landed = 0;
        phase.flights.retain_mut(|flight| {
            if flight.advance(gravity) {
                landed += 1;
                false
            } else {
                true
            }
        });
        phase.arrived += landed;
        for _ in 0..landed {
            events.push(SchedulerEvent::SequenceCardArrived);
        }

        if phase.arrived == phase.total {
            events.push(SchedulerEvent::SequenceRetired { col: phase.col });
            self.phase = Phase::Idle;
        }
    }

    fn tick_celebration(&mut self, events: &mut Vec<SchedulerEvent>) {
        let Phase::WinCelebration(celebration) = &mut self.phase else {
            return;
        };
        let exploded = celebration.tick(&self.layout, &self.tuning);
        for _ in 0..exploded {
            events.push(SchedulerEvent::CardExploded);
        }
    }

    fn tick_follow_ups(&mut self, events: &mut Vec<SchedulerEvent>) {
        let mut due = Vec::new();
        self.follow_ups.retain_mut(|(ticks, kind)| {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                due.push(*kind);
                false
            } else {
                true
            }
        });
        for kind in due {
            match kind {
                FollowUp::AutoFinishStep => events.push(SchedulerEvent::AutoFinishReady),
            }
        }
    }

    /// Applies every pending mutation of the current phase immediately.
    fn drain_pending(&mut self) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();
        match &mut self.phase {
            Phase::Idle | Phase::WinCelebration(_) => {}
            Phase::Dealing(_) => events.push(SchedulerEvent::DealComplete),
            Phase::StockToWaste(phase) => {
                if let Some(flight) = phase.in_flight.take() {
                    events.push(SchedulerEvent::StockCardArrived(flight.card));
                }
                while let Some(card) = phase.pending.pop_front() {
                    events.push(SchedulerEvent::StockCardArrived(card));
                }
            }
            Phase::FoundationMove(phase) => {
                events.push(SchedulerEvent::FoundationCardArrived(phase.flight.card));
            }
            Phase::SequenceComplete(phase) => {
                events.push(SchedulerEvent::SequenceRetired { col: phase.col });
            }
        }
        events
    }

    fn frame(&self) -> AnimationFrame {
        let mut cards = Vec::new();
        let mut fragments = Vec::new();

        let mut push = |flight: &AnimatedCard| {
            cards.push(FrameCard {
                card: flight.card,
                x: flight.x,
                y: flight.y,
                rotation: flight.rotation,
                face_up: flight.face_up,
            });
        };

        match &self.phase {
            Phase::Idle => {}
            Phase::Dealing(phase) => phase.flights.iter().for_each(&mut push),
            Phase::StockToWaste(phase) => phase.in_flight.iter().for_each(&mut push),
            Phase::FoundationMove(phase) => push(&phase.flight),
            Phase::SequenceComplete(phase) => phase.flights.iter().for_each(&mut push),
            Phase::WinCelebration(celebration) => {
                celebration.cards().iter().for_each(&mut push);
                for piece in celebration.fragments() {
                    fragments.push(FrameFragment {
                        card: piece.card,
                        grid_x: piece.grid_x,
                        grid_y: piece.grid_y,
                        x: piece.x,
                        y: piece.y,
                        rotation: piece.rotation,
                    });
                }
            }
        }

        AnimationFrame { cards, fragments }
    }
}
