//! Round state machine
//!
//! One `Round` per attempt. Taps come in as raw tile values, events go out
//! for the presentation layer to render. All timing flows through caller
//! supplied timestamps so the logic stays deterministic under test.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::level::{LevelDefinition, MidRoundEffect};
use super::rank::{Rank, rank_for};

/// Phase of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Tiles built, clock not yet started
    Armed,
    /// Clock running
    Active,
    /// All tiles tapped in order
    Completed,
    /// Time limit hit
    Failed,
}

/// End-of-round stats handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    /// Elapsed plus penalties on completion; the configured limit on failure
    pub finish_time: f64,
    pub max_combo: u32,
    pub wrong_taps: u32,
    pub penalty_seconds: f64,
    /// Awarded on completion only
    pub rank: Option<&'static Rank>,
    /// Stamped by the session after consulting the records store
    pub is_new_best: bool,
}

/// Output events produced by taps and clock ticks
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    /// Correct tap; `combo` is the running streak including this tap
    TapAccepted { value: u32, combo: u32 },
    /// Wrong tap; `penalty_seconds` is the accumulated total
    TapRejected { value: u32, penalty_seconds: f64 },
    /// Level wants tile positions reshuffled (values stay put)
    ReshuffleRequested,
    /// Clock tick; remaining time for timed levels, elapsed for untimed
    Tick { display_seconds: f64 },
    Completed(RoundSummary),
    Failed(RoundSummary),
}

/// State for a single attempt at a level
#[derive(Debug, Clone)]
pub struct Round {
    pub level: &'static LevelDefinition,
    /// Shuffled permutation of `1..=tile_count`, in render order
    tiles: Vec<u32>,
    pub next_expected: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub wrong_taps: u32,
    pub penalty_seconds: f64,
    /// Set on the first correct tap, not on round build
    started_at: Option<f64>,
    pub phase: RoundPhase,
    rng: Pcg32,
}

impl Round {
    /// Build a new round with tiles shuffled from `seed`
    pub fn new(level: &'static LevelDefinition, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tiles: Vec<u32> = (1..=level.tile_count).collect();
        tiles.shuffle(&mut rng);
        Self {
            level,
            tiles,
            next_expected: 1,
            combo: 0,
            max_combo: 0,
            wrong_taps: 0,
            penalty_seconds: 0.0,
            started_at: None,
            phase: RoundPhase::Armed,
            rng,
        }
    }

    /// Tile values in render order
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Whether the clock is live
    pub fn running(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    /// Wall time since the first correct tap plus accumulated penalties
    pub fn elapsed(&self, now: f64) -> f64 {
        let base = self.started_at.map_or(0.0, |start| now - start);
        base + self.penalty_seconds
    }

    /// Remaining time for timed levels
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.level
            .is_timed()
            .then(|| self.level.time_limit - self.elapsed(now))
    }

    /// Evaluate a tap on the tile carrying `value`
    pub fn tap(&mut self, value: u32, now: f64) -> Vec<RoundEvent> {
        if !matches!(self.phase, RoundPhase::Armed | RoundPhase::Active) {
            return Vec::new();
        }
        if value < 1 || value > self.level.tile_count {
            return Vec::new();
        }

        if value == self.next_expected {
            // First correct tap is always value 1 and starts the clock
            if self.started_at.is_none() {
                self.started_at = Some(now);
                self.phase = RoundPhase::Active;
            }

            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            self.next_expected += 1;

            let mut events = vec![RoundEvent::TapAccepted {
                value,
                combo: self.combo,
            }];

            if self.next_expected > self.level.tile_count {
                self.phase = RoundPhase::Completed;
                let summary = self.summary(self.elapsed(now), true);
                events.push(RoundEvent::Completed(summary));
            } else if let MidRoundEffect::ReshufflePositions { every } = self.level.effect {
                let done = self.next_expected - 1;
                // A zero interval means the effect is inert, not a panic
                if every > 0 && done % every == 0 {
                    events.push(RoundEvent::ReshuffleRequested);
                }
            }
            events
        } else if value > self.next_expected {
            self.combo = 0;
            self.wrong_taps += 1;
            self.penalty_seconds += self.level.penalty;
            vec![RoundEvent::TapRejected {
                value,
                penalty_seconds: self.penalty_seconds,
            }]
        } else {
            // Already-completed tiles are inert
            Vec::new()
        }
    }

    /// Re-evaluate the clock. Call once per animation frame while active.
    ///
    /// Returns nothing once the round has left `Active`, so a tick that
    /// fires after cancellation was requested is harmless.
    pub fn tick(&mut self, now: f64) -> Vec<RoundEvent> {
        if self.phase != RoundPhase::Active {
            return Vec::new();
        }

        match self.remaining(now) {
            Some(remaining) if remaining <= 0.0 => {
                self.phase = RoundPhase::Failed;
                // Displayed failure time is the configured limit, not the overrun
                let summary = self.summary(self.level.time_limit, false);
                vec![RoundEvent::Failed(summary)]
            }
            Some(remaining) => vec![RoundEvent::Tick {
                display_seconds: remaining,
            }],
            None => vec![RoundEvent::Tick {
                display_seconds: self.elapsed(now),
            }],
        }
    }

    /// A fresh permutation for position-only reshuffles, drawn from the
    /// round's own RNG so replays stay deterministic
    pub fn reshuffle_positions(&mut self) -> Vec<u32> {
        let mut order: Vec<u32> = (0..self.level.tile_count).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn summary(&self, finish_time: f64, ranked: bool) -> RoundSummary {
        RoundSummary {
            finish_time,
            max_combo: self.max_combo,
            wrong_taps: self.wrong_taps,
            penalty_seconds: self.penalty_seconds,
            rank: ranked.then(|| rank_for(finish_time)),
            is_new_best: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::{LEVELS, level};
    use proptest::prelude::*;

    fn standard() -> &'static LevelDefinition {
        level(1).unwrap()
    }

    fn complete_in_order(round: &mut Round, now: f64) {
        for v in 1..=round.level.tile_count {
            round.tap(v, now);
        }
    }

    #[test]
    fn test_tiles_are_a_permutation() {
        for l in &LEVELS {
            let round = Round::new(l, 42);
            let mut seen = round.tiles().to_vec();
            seen.sort_unstable();
            let expected: Vec<u32> = (1..=l.tile_count).collect();
            assert_eq!(seen, expected);
        }
    }

    proptest! {
        #[test]
        fn prop_permutation_for_any_seed(seed: u64) {
            let round = Round::new(standard(), seed);
            let mut seen = round.tiles().to_vec();
            seen.sort_unstable();
            prop_assert_eq!(seen, (1..=25).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_perfect_run_completes() {
        let mut round = Round::new(standard(), 7);
        assert_eq!(round.phase, RoundPhase::Armed);
        complete_in_order(&mut round, 10.0);
        assert_eq!(round.phase, RoundPhase::Completed);
        assert_eq!(round.wrong_taps, 0);
        assert_eq!(round.penalty_seconds, 0.0);
        assert_eq!(round.max_combo, 25);
    }

    #[test]
    fn test_clock_starts_on_first_correct_tap_only() {
        let mut round = Round::new(standard(), 7);

        // Wrong tap while armed: penalty accrues, clock stays unstarted
        let events = round.tap(5, 100.0);
        assert!(matches!(events[0], RoundEvent::TapRejected { .. }));
        assert_eq!(round.phase, RoundPhase::Armed);
        assert!(!round.running());

        // Tapping 1 starts the clock at its own timestamp
        round.tap(1, 200.0);
        assert_eq!(round.phase, RoundPhase::Active);
        assert!((round.elapsed(201.0) - 1.5).abs() < 1e-9); // 1s wall + 0.5s penalty
    }

    #[test]
    fn test_wrong_tap_resets_combo_and_accrues_penalty() {
        let mut round = Round::new(standard(), 7);
        round.tap(1, 0.0);
        round.tap(2, 0.0);
        assert_eq!(round.combo, 2);

        let events = round.tap(10, 0.0);
        assert_eq!(
            events,
            vec![RoundEvent::TapRejected {
                value: 10,
                penalty_seconds: 0.5
            }]
        );
        assert_eq!(round.combo, 0);
        assert_eq!(round.max_combo, 2);
        assert_eq!(round.wrong_taps, 1);
        assert_eq!(round.next_expected, 3);
    }

    #[test]
    fn test_retapping_completed_tile_is_inert() {
        let mut round = Round::new(standard(), 7);
        round.tap(1, 0.0);
        round.tap(2, 0.0);

        let events = round.tap(1, 0.0);
        assert!(events.is_empty());
        assert_eq!(round.combo, 2);
        assert_eq!(round.wrong_taps, 0);
        assert_eq!(round.next_expected, 3);
    }

    #[test]
    fn test_out_of_range_tap_ignored() {
        let mut round = Round::new(standard(), 7);
        assert!(round.tap(0, 0.0).is_empty());
        assert!(round.tap(26, 0.0).is_empty());
        assert_eq!(round.phase, RoundPhase::Armed);
    }

    #[test]
    fn test_taps_after_completion_ignored() {
        let mut round = Round::new(standard(), 7);
        complete_in_order(&mut round, 0.0);
        assert!(round.tap(1, 1.0).is_empty());
        assert!(round.tap(30, 1.0).is_empty());
        assert_eq!(round.phase, RoundPhase::Completed);
    }

    #[test]
    fn test_penalty_inflates_finish_time() {
        // Taps 5 (wrong), then 1..=25 in order; finish = wall time + 0.5
        let mut round = Round::new(standard(), 7);
        round.tap(5, 0.0);
        round.tap(1, 100.0);
        for v in 2..=24 {
            round.tap(v, 100.0);
        }
        let events = round.tap(25, 110.0);
        assert_eq!(round.wrong_taps, 1);
        assert_eq!(round.penalty_seconds, 0.5);
        let summary = match events.last() {
            Some(RoundEvent::Completed(s)) => *s,
            other => panic!("expected completion, got {other:?}"),
        };
        assert!((summary.finish_time - 10.5).abs() < 1e-9);
        assert_eq!(summary.rank.unwrap().name, "GODMODE");
    }

    #[test]
    fn test_timed_expiry_fails_with_configured_limit() {
        let mut round = Round::new(standard(), 7);
        round.tap(1, 0.0);

        assert_eq!(
            round.tick(10.0),
            vec![RoundEvent::Tick {
                display_seconds: 20.0
            }]
        );

        let events = round.tick(31.5);
        let summary = match events.as_slice() {
            [RoundEvent::Failed(s)] => *s,
            other => panic!("expected failure, got {other:?}"),
        };
        assert_eq!(round.phase, RoundPhase::Failed);
        assert_eq!(summary.finish_time, 30.0);
        assert!(summary.rank.is_none());

        // Stale tick after failure is a no-op
        assert!(round.tick(32.0).is_empty());
    }

    #[test]
    fn test_untimed_level_never_fails() {
        static UNTIMED: LevelDefinition = LevelDefinition {
            id: 1,
            name: "ZEN",
            grid_size: 5,
            tile_count: 25,
            time_limit: 0.0,
            penalty: 0.5,
            effect: MidRoundEffect::None,
        };
        let mut round = Round::new(&UNTIMED, 7);
        round.tap(1, 0.0);
        let events = round.tick(1e6);
        assert_eq!(
            events,
            vec![RoundEvent::Tick {
                display_seconds: 1e6
            }]
        );
        assert_eq!(round.phase, RoundPhase::Active);
    }

    #[test]
    fn test_tick_before_clock_start_is_inert() {
        let mut round = Round::new(standard(), 7);
        assert!(round.tick(5.0).is_empty());
        round.tap(3, 0.0); // wrong tap does not arm the clock
        assert!(round.tick(5.0).is_empty());
    }

    #[test]
    fn test_omega_reshuffle_cadence() {
        let omega = level(4).unwrap();
        let mut round = Round::new(omega, 7);
        let mut reshuffles = Vec::new();
        for v in 1..=omega.tile_count {
            let events = round.tap(v, 0.0);
            if events.contains(&RoundEvent::ReshuffleRequested) {
                reshuffles.push(v);
            }
        }
        // Every 6 correct taps, but never on the completing tap
        assert_eq!(reshuffles, vec![6, 12, 18, 24, 30]);
        assert_eq!(round.phase, RoundPhase::Completed);
    }

    #[test]
    fn test_zero_reshuffle_interval_is_inert() {
        static DEGENERATE: LevelDefinition = LevelDefinition {
            id: 1,
            name: "DEGENERATE",
            grid_size: 5,
            tile_count: 25,
            time_limit: 30.0,
            penalty: 0.5,
            effect: MidRoundEffect::ReshufflePositions { every: 0 },
        };
        let mut round = Round::new(&DEGENERATE, 7);
        for v in 1..=25 {
            let events = round.tap(v, 0.0);
            assert!(!events.contains(&RoundEvent::ReshuffleRequested));
        }
        assert_eq!(round.phase, RoundPhase::Completed);
    }

    #[test]
    fn test_reshuffle_positions_is_a_permutation_of_indices() {
        let omega = level(4).unwrap();
        let mut round = Round::new(omega, 7);
        let mut order = round.reshuffle_positions();
        order.sort_unstable();
        assert_eq!(order, (0..36).collect::<Vec<u32>>());
    }

    #[test]
    fn test_invariant_penalty_matches_wrong_taps() {
        let mut round = Round::new(standard(), 7);
        round.tap(1, 0.0);
        for v in [9, 17, 4, 25] {
            round.tap(v, 0.0);
        }
        // 4 not-yet-reached values, all wrong while expecting 2
        assert_eq!(round.wrong_taps, 4);
        let expected = f64::from(round.wrong_taps) * round.level.penalty;
        assert!((round.penalty_seconds - expected).abs() < 1e-9);
    }
}
