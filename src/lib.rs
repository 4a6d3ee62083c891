//! Chroma Shift - a neon speed-tap number grid game
//!
//! Core modules:
//! - `game`: Round state machine (levels, taps, timing, ranks)
//! - `records`: Best times and preferences in LocalStorage
//! - `platform`: Browser/native storage and clock abstraction
//! - `audio`: Procedural Web Audio sound effects

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod platform;
pub mod records;

pub use game::{GameSession, Round, RoundEvent, RoundPhase, RoundSummary};
pub use records::{Records, SaveData};

/// Format a time readout as the HUD shows it
pub fn format_time(seconds: f64) -> String {
    format!("{seconds:.2}")
}

/// Format a best time for display, em dash when none exists
pub fn format_best_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{s:.2}s"),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(12.3456), "12.35");
        assert_eq!(format_time(0.0), "0.00");
    }

    #[test]
    fn test_format_best_time() {
        assert_eq!(format_best_time(Some(9.5)), "9.50s");
        assert_eq!(format_best_time(None), "—");
    }
}
