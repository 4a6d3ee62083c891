//! Level catalog
//!
//! Fixed table of level definitions. Pure data, never mutated at runtime.

use thiserror::Error;

/// Unknown level id requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid level id: {0}")]
pub struct InvalidLevel(pub u8);

/// Optional mid-round behavior a level can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidRoundEffect {
    #[default]
    None,
    /// Reshuffle tile positions (not values) every `every` correct taps
    ReshufflePositions { every: u32 },
}

/// A single level definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDefinition {
    pub id: u8,
    pub name: &'static str,
    /// Tiles per grid side
    pub grid_size: u32,
    /// Total tile count (`grid_size` squared)
    pub tile_count: u32,
    /// Time limit in seconds; 0.0 means untimed
    pub time_limit: f64,
    /// Seconds added per wrong tap
    pub penalty: f64,
    pub effect: MidRoundEffect,
}

impl LevelDefinition {
    /// Whether the level has a running-out clock
    pub fn is_timed(&self) -> bool {
        self.time_limit > 0.0
    }
}

/// The shipped catalog
pub static LEVELS: [LevelDefinition; 4] = [
    LevelDefinition {
        id: 1,
        name: "STANDARD",
        grid_size: 5,
        tile_count: 25,
        time_limit: 30.0,
        penalty: 0.5,
        effect: MidRoundEffect::None,
    },
    LevelDefinition {
        id: 2,
        name: "PRO",
        grid_size: 5,
        tile_count: 25,
        time_limit: 22.0,
        penalty: 0.8,
        effect: MidRoundEffect::None,
    },
    LevelDefinition {
        id: 3,
        name: "ELITE",
        grid_size: 5,
        tile_count: 25,
        time_limit: 18.0,
        penalty: 1.0,
        effect: MidRoundEffect::None,
    },
    LevelDefinition {
        id: 4,
        name: "OMEGA",
        grid_size: 6,
        tile_count: 36,
        time_limit: 40.0,
        penalty: 2.0,
        effect: MidRoundEffect::ReshufflePositions { every: 6 },
    },
];

/// Look up a level by id
pub fn level(id: u8) -> Result<&'static LevelDefinition, InvalidLevel> {
    LEVELS
        .iter()
        .find(|l| l.id == id)
        .ok_or(InvalidLevel(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_levels() {
        for id in 1..=4 {
            let l = level(id).unwrap();
            assert_eq!(l.id, id);
            assert_eq!(l.tile_count, l.grid_size * l.grid_size);
        }
    }

    #[test]
    fn test_lookup_unknown_level() {
        assert_eq!(level(0), Err(InvalidLevel(0)));
        assert_eq!(level(5), Err(InvalidLevel(5)));
    }

    #[test]
    fn test_only_omega_reshuffles() {
        for l in &LEVELS {
            match l.effect {
                MidRoundEffect::ReshufflePositions { every } => {
                    assert_eq!(l.id, 4);
                    assert_eq!(every, 6);
                }
                MidRoundEffect::None => assert_ne!(l.id, 4),
            }
        }
    }
}
