//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// UI button press
    Click,
    /// Correct tap; pitch rises with the sequence position
    Correct { step: u32 },
    /// Wrong tap
    Wrong,
    /// Sequence completed
    Complete,
    /// Time expired
    GameOver,
    /// Grid positions reshuffling
    Shuffle,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, enabled: true }
    }

    /// Mirror the persisted sound preference
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Click => self.play_click(ctx),
            SoundEffect::Correct { step } => self.play_correct(ctx, step),
            SoundEffect::Wrong => self.play_wrong(ctx),
            SoundEffect::Complete => self.play_complete(ctx),
            SoundEffect::GameOver => self.play_game_over(ctx),
            SoundEffect::Shuffle => self.play_shuffle(ctx),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single decaying tone starting at `when`
    fn tone_at(
        &self,
        ctx: &AudioContext,
        when: f64,
        freq: f32,
        duration: f64,
        osc_type: OscillatorType,
        volume: f32,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(volume, when).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, when + duration)
            .ok();
        osc.start_with_when(when).ok();
        osc.stop_with_when(when + duration).ok();
    }

    /// UI click - short square blip
    fn play_click(&self, ctx: &AudioContext) {
        let t = ctx.current_time();
        self.tone_at(ctx, t, 800.0, 0.08, OscillatorType::Square, 0.06);
    }

    /// Correct tap - rising two-note chirp keyed to the sequence position
    fn play_correct(&self, ctx: &AudioContext, step: u32) {
        let t = ctx.current_time();
        let offset = step as f32 * 18.0;
        self.tone_at(ctx, t, 520.0 + offset, 0.12, OscillatorType::Sine, 0.1);
        self.tone_at(ctx, t + 0.05, 680.0 + offset, 0.1, OscillatorType::Sine, 0.07);
    }

    /// Wrong tap - low sawtooth buzz pair
    fn play_wrong(&self, ctx: &AudioContext) {
        let t = ctx.current_time();
        self.tone_at(ctx, t, 180.0, 0.2, OscillatorType::Sawtooth, 0.1);
        self.tone_at(ctx, t + 0.08, 140.0, 0.25, OscillatorType::Sawtooth, 0.08);
    }

    /// Completion - ascending major arpeggio
    fn play_complete(&self, ctx: &AudioContext) {
        let t = ctx.current_time();
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
            self.tone_at(ctx, t + i as f64 * 0.1, freq, 0.3, OscillatorType::Sine, 0.12);
        }
    }

    /// Time expired - falling sawtooth pair
    fn play_game_over(&self, ctx: &AudioContext) {
        let t = ctx.current_time();
        self.tone_at(ctx, t, 300.0, 0.3, OscillatorType::Sawtooth, 0.1);
        self.tone_at(ctx, t + 0.15, 200.0, 0.4, OscillatorType::Sawtooth, 0.1);
    }

    /// Reshuffle - low sweep with a high ping on top
    fn play_shuffle(&self, ctx: &AudioContext) {
        let t = ctx.current_time();
        self.tone_at(ctx, t, 150.0, 0.3, OscillatorType::Sawtooth, 0.08);
        self.tone_at(ctx, t + 0.1, 1200.0, 0.1, OscillatorType::Sine, 0.05);
    }
}
