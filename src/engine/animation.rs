//! Card flight primitives and the per-variant tuning profile.
//!
//! Everything here is driven by the scheduler's fixed tick; no wall-clock
//! time is read.

use std::f64::consts::PI;

use crate::game::{Card, GameMode};

/// Fixed animation tick, 1/60 s.
pub const TICK_MS: u64 = 16;

/// Whole ticks covering at least `ms` milliseconds, never zero.
pub fn ticks_for_ms(ms: u64) -> u32 {
    (ms.div_ceil(TICK_MS).max(1)) as u32
}

/// Tuned timing and physics constants, selected per variant. Hosts may
/// override the profile at session construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTuning {
    pub deal_flight_ms: u64,
    pub deal_stagger_ms: u64,
    pub stock_flight_ms: u64,
    pub foundation_flight_ms: u64,
    pub sequence_flight_ms: u64,
    /// Release interval between cards of a completing Spider run.
    pub sequence_reveal_ms: u64,
    /// Follow-up delay re-arming the auto-finish driver after an arrival.
    pub auto_finish_rearm_ms: u64,
    /// Retry delay when the driver fires while another phase is active.
    pub auto_finish_retry_ms: u64,
    pub celebration_launch_ms: u64,
    /// Peak height of the arc lift, in table units.
    pub arc_lift: f64,
    pub arc_spin: f64,
    /// Per-tick downward acceleration for ballistic motion.
    pub gravity: f64,
    pub launch_speed: f64,
    /// Vertical band (fractions of table height) inside which a
    /// celebrating card may explode.
    pub explosion_band_top: f64,
    pub explosion_band_bottom: f64,
    pub explosion_probability: f64,
}

pub const DEFAULT_ANIMATION_TUNING: AnimationTuning = AnimationTuning {
    deal_flight_ms: 180,
    deal_stagger_ms: 40,
    stock_flight_ms: 140,
    foundation_flight_ms: 220,
    sequence_flight_ms: 300,
    sequence_reveal_ms: 250,
    auto_finish_rearm_ms: 50,
    auto_finish_retry_ms: 200,
    celebration_launch_ms: 100,
    arc_lift: 60.0,
    arc_spin: 0.6,
    gravity: 0.55,
    launch_speed: 9.0,
    explosion_band_top: 0.15,
    explosion_band_bottom: 0.55,
    explosion_probability: 0.035,
};

const SPIDER_ANIMATION_TUNING: AnimationTuning = AnimationTuning {
    // The ten-column row deal reads better slightly faster.
    deal_stagger_ms: 25,
    ..DEFAULT_ANIMATION_TUNING
};

impl AnimationTuning {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Spider => SPIDER_ANIMATION_TUNING,
            _ => DEFAULT_ANIMATION_TUNING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Arc {
        from: (f64, f64),
        to: (f64, f64),
        lift: f64,
        spin: f64,
        total: u32,
        elapsed: u32,
    },
    Ballistic {
        velocity_x: f64,
        velocity_y: f64,
        spin: f64,
    },
}

/// A card in flight. Arc flights lerp between two slots with a sine lift
/// and rotation decaying to zero; ballistic flights fall under gravity and
/// never arrive on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedCard {
    pub card: Card,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub face_up: bool,
    pub exploded: bool,
    motion: Motion,
}

impl AnimatedCard {
    pub fn arc(card: Card, from: (f64, f64), to: (f64, f64), total_ticks: u32, tuning: &AnimationTuning) -> Self {
        Self {
            card,
            x: from.0,
            y: from.1,
            rotation: tuning.arc_spin,
            face_up: true,
            exploded: false,
            motion: Motion::Arc {
                from,
                to,
                lift: tuning.arc_lift,
                spin: tuning.arc_spin,
                total: total_ticks.max(1),
                elapsed: 0,
            },
        }
    }

    pub fn ballistic(card: Card, at: (f64, f64), velocity: (f64, f64), spin: f64) -> Self {
        Self {
            card,
            x: at.0,
            y: at.1,
            rotation: 0.0,
            face_up: true,
            exploded: false,
            motion: Motion::Ballistic {
                velocity_x: velocity.0,
                velocity_y: velocity.1,
                spin,
            },
        }
    }

    /// Steps one tick. Returns true when an arc flight has reached its
    /// target this tick.
    pub fn advance(&mut self, gravity: f64) -> bool {
        match &mut self.motion {
            Motion::Arc {
                from,
                to,
                lift,
                spin,
                total,
                elapsed,
            } => {
                *elapsed += 1;
                let t = f64::from(*elapsed) / f64::from(*total);
                if t >= 1.0 {
                    self.x = to.0;
                    self.y = to.1;
                    self.rotation = 0.0;
                    return true;
                }
                self.x = from.0 + (to.0 - from.0) * t;
                self.y = from.1 + (to.1 - from.1) * t - *lift * (t * PI).sin();
                self.rotation = *spin * (1.0 - t);
                false
            }
            Motion::Ballistic {
                velocity_x,
                velocity_y,
                spin,
            } => {
                *velocity_y += gravity;
                self.x += *velocity_x;
                self.y += *velocity_y;
                self.rotation += *spin;
                false
            }
        }
    }

    pub fn has_arrived(&self) -> bool {
        matches!(self.motion, Motion::Arc { total, elapsed, .. } if elapsed >= total)
    }

    pub fn target(&self) -> Option<(f64, f64)> {
        match self.motion {
            Motion::Arc { to, .. } => Some(to),
            Motion::Ballistic { .. } => None,
        }
    }

    /// Jumps an arc flight straight to its target.
    pub fn force_complete(&mut self) {
        if let Motion::Arc { to, total, ref mut elapsed, .. } = self.motion {
            *elapsed = total;
            self.x = to.0;
            self.y = to.1;
            self.rotation = 0.0;
        }
    }
}

/// One piece of an exploded celebration card, addressed by its cell in the
/// 4x4 grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub card: Card,
    pub grid_x: u8,
    pub grid_y: u8,
    pub x: f64,
    pub y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub rotation: f64,
    pub spin: f64,
}

impl Fragment {
    pub fn advance(&mut self, gravity: f64) {
        self.velocity_y += gravity;
        self.x += self.velocity_x;
        self.y += self.velocity_y;
        self.rotation += self.spin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Suit;

    fn card() -> Card {
        Card::new(Suit::Hearts, 7)
    }

    #[test]
    fn tick_conversion_rounds_up_and_never_zero() {
        assert_eq!(ticks_for_ms(16), 1);
        assert_eq!(ticks_for_ms(17), 2);
        assert_eq!(ticks_for_ms(50), 4);
        assert_eq!(ticks_for_ms(200), 13);
        assert_eq!(ticks_for_ms(250), 16);
        assert_eq!(ticks_for_ms(0), 1);
    }

    #[test]
    fn arc_flight_arrives_exactly_on_target() {
        let tuning = DEFAULT_ANIMATION_TUNING;
        let mut flight = AnimatedCard::arc(card(), (0.0, 0.0), (100.0, 50.0), 10, &tuning);
        let mut arrived = false;
        for _ in 0..10 {
            arrived = flight.advance(tuning.gravity);
        }
        assert!(arrived);
        assert_eq!((flight.x, flight.y), (100.0, 50.0));
        assert_eq!(flight.rotation, 0.0);
    }

    #[test]
    fn arc_midpoint_lifts_above_the_straight_line() {
        let tuning = DEFAULT_ANIMATION_TUNING;
        let mut flight = AnimatedCard::arc(card(), (0.0, 100.0), (100.0, 100.0), 10, &tuning);
        for _ in 0..5 {
            flight.advance(tuning.gravity);
        }
        assert!(flight.y < 100.0);
    }

    #[test]
    fn force_complete_snaps_to_target() {
        let tuning = DEFAULT_ANIMATION_TUNING;
        let mut flight = AnimatedCard::arc(card(), (0.0, 0.0), (40.0, 40.0), 30, &tuning);
        flight.advance(tuning.gravity);
        flight.force_complete();
        assert!(flight.has_arrived());
        assert_eq!((flight.x, flight.y), (40.0, 40.0));
    }

    #[test]
    fn ballistic_motion_accelerates_downward() {
        let mut flight = AnimatedCard::ballistic(card(), (0.0, 0.0), (1.0, -5.0), 0.1);
        let mut previous_dy = f64::NEG_INFINITY;
        let mut previous_y = 0.0;
        for _ in 0..20 {
            flight.advance(0.5);
            let dy = flight.y - previous_y;
            assert!(dy > previous_dy);
            previous_dy = dy;
            previous_y = flight.y;
        }
        assert!(!flight.has_arrived());
    }
}
