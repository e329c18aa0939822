//! Duel configuration.

use std::time::Duration;

/// Settings for one duel.
///
/// The defaults are the reference rules: 7 health, damage growing with
/// the round number up to a cap of 7, two opening cards, and a short
/// pause between rounds so clients can render the previous result.
#[derive(Debug, Clone)]
pub struct DuelConfig {
    /// Health each player starts a match with.
    pub starting_health: u32,

    /// Upper bound on per-round damage: damage = min(round, cap).
    pub damage_cap: u32,

    /// Cards dealt to each player at the start of every round.
    pub opening_hand: usize,

    /// Delay between a round resolving and the next round's deal.
    /// Purely cosmetic — correctness never depends on it.
    pub round_delay: Duration,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            starting_health: 7,
            damage_cap: 7,
            opening_hand: 2,
            round_delay: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DuelConfig::default();
        assert_eq!(config.starting_health, 7);
        assert_eq!(config.damage_cap, 7);
        assert_eq!(config.opening_hand, 2);
    }
}
