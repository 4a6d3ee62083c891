//! Performance ranks
//!
//! Awarded on completion from the finishing time. Thresholds are ordered
//! ascending; a time earns the first rank whose threshold it stays under.

/// A rank tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rank {
    /// Exclusive upper bound on finishing time (seconds)
    pub threshold: f64,
    pub name: &'static str,
    pub subtitle: &'static str,
    /// CSS class for the badge on the game-over screen
    pub css_class: &'static str,
}

/// Rank table, best first. The unbounded final entry guarantees a match.
pub static RANKS: [Rank; 5] = [
    Rank {
        threshold: 12.0,
        name: "GODMODE",
        subtitle: "Transcendent reflexes",
        css_class: "rank-godmode",
    },
    Rank {
        threshold: 15.0,
        name: "ELITE",
        subtitle: "Top tier operative",
        css_class: "rank-elite",
    },
    Rank {
        threshold: 18.0,
        name: "PRO",
        subtitle: "Sharp and efficient",
        css_class: "rank-pro",
    },
    Rank {
        threshold: 22.0,
        name: "ADVANCED",
        subtitle: "Solid performance",
        css_class: "rank-advanced",
    },
    Rank {
        threshold: f64::INFINITY,
        name: "BEGINNER",
        subtitle: "Keep training, agent",
        css_class: "rank-beginner",
    },
];

/// Rank for a finishing time
pub fn rank_for(time: f64) -> &'static Rank {
    RANKS
        .iter()
        .find(|r| time < r.threshold)
        .unwrap_or(&RANKS[RANKS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(rank_for(11.99).name, "GODMODE");
        assert_eq!(rank_for(12.0).name, "ELITE");
        assert_eq!(rank_for(14.99).name, "ELITE");
        assert_eq!(rank_for(17.5).name, "PRO");
        assert_eq!(rank_for(21.99).name, "ADVANCED");
        assert_eq!(rank_for(22.0).name, "BEGINNER");
        assert_eq!(rank_for(30.0).name, "BEGINNER");
    }

    #[test]
    fn test_every_time_gets_a_rank() {
        for t in [0.0, 100.0, 1e9] {
            let _ = rank_for(t);
        }
    }
}
