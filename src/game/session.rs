//! Game session
//!
//! Owns the selected level, the sound preference, at most one live round,
//! and the injected clock and records store. All input events from the
//! presentation layer land here.

use std::rc::Rc;

use super::clock::Clock;
use super::level::{InvalidLevel, LevelDefinition, level};
use super::round::{Round, RoundEvent};
use crate::records::Records;

pub struct GameSession {
    records: Records,
    clock: Rc<dyn Clock>,
    selected_level: u8,
    sound_enabled: bool,
    round: Option<Round>,
}

impl GameSession {
    /// Build a session, restoring preferences from the records store
    pub fn new(records: Records, clock: Rc<dyn Clock>) -> Self {
        let data = records.load();
        // A stale or corrupt level selection falls back to level 1
        let selected_level = if level(data.selected_level).is_ok() {
            data.selected_level
        } else {
            1
        };
        Self {
            records,
            clock,
            selected_level,
            sound_enabled: data.sound_enabled,
            round: None,
        }
    }

    pub fn selected_level(&self) -> &'static LevelDefinition {
        // Validated on every write, so this cannot miss
        level(self.selected_level).unwrap_or(&crate::game::level::LEVELS[0])
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn best_time(&self, level_id: u8) -> Option<f64> {
        self.records.best_time(level_id)
    }

    /// Change the selected level and persist the preference
    pub fn select_level(&mut self, id: u8) -> Result<(), InvalidLevel> {
        level(id)?;
        self.selected_level = id;
        self.records.set_preferences(self.selected_level, self.sound_enabled);
        Ok(())
    }

    /// Flip the sound preference, persist it, and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.records.set_preferences(self.selected_level, self.sound_enabled);
        self.sound_enabled
    }

    /// Arm a fresh round on the selected level, replacing any live one
    pub fn start_round(&mut self, seed: u64) -> &Round {
        let level = self.selected_level();
        log::info!("Round armed: level {} ({}), seed {seed}", level.id, level.name);
        self.round.insert(Round::new(level, seed))
    }

    /// Drop the live round (player navigated away)
    pub fn abandon_round(&mut self) {
        self.round = None;
    }

    /// Forward a tap into the live round
    pub fn tap(&mut self, value: u32) -> Vec<RoundEvent> {
        let now = self.clock.now();
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        let level_id = round.level.id;
        let events = round.tap(value, now);
        self.finalize(level_id, events)
    }

    /// Re-evaluate the live round's clock
    pub fn tick(&mut self) -> Vec<RoundEvent> {
        let now = self.clock.now();
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        let level_id = round.level.id;
        let events = round.tick(now);
        self.finalize(level_id, events)
    }

    /// Fresh tile position order for a reshuffle effect
    pub fn reshuffle_positions(&mut self) -> Option<Vec<u32>> {
        self.round.as_mut().map(Round::reshuffle_positions)
    }

    /// Record completions against the best-time store and stamp the result.
    /// `level_id` is the completed round's level: the selection may have
    /// moved on while the round was live.
    fn finalize(&mut self, level_id: u8, mut events: Vec<RoundEvent>) -> Vec<RoundEvent> {
        for event in &mut events {
            if let RoundEvent::Completed(summary) = event {
                summary.is_new_best = self
                    .records
                    .record_best_time(level_id, summary.finish_time);
                if summary.is_new_best {
                    log::info!("New best on level {level_id}: {:.2}s", summary.finish_time);
                }
            }
        }
        events
    }
}
