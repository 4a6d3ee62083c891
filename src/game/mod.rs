//! Round logic module
//!
//! Everything that decides the game lives here. This module must stay pure:
//! - Seeded RNG only
//! - Timestamps supplied by the caller, never read from the platform
//! - No rendering or DOM dependencies

pub mod clock;
pub mod level;
pub mod rank;
pub mod round;
pub mod session;

pub use clock::{Clock, ManualClock};
pub use level::{InvalidLevel, LEVELS, LevelDefinition, MidRoundEffect, level};
pub use rank::{RANKS, Rank, rank_for};
pub use round::{Round, RoundEvent, RoundPhase, RoundSummary};
pub use session::GameSession;
