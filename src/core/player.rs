//! Player identity and team-relative filtering.
//!
//! The engine is strictly two-player: every tile belongs to either the
//! host or the guest. Team-relative vocabulary (`TeamFilter`) lets
//! declarative descriptors say "friendly" or "enemy" without naming a
//! concrete player.

use serde::{Deserialize, Serialize};

/// One of the two players.
///
/// Tile ownership, capture gating, and trigger filters are all expressed
/// relative to these two identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Host,
    Guest,
}

impl Player {
    /// Get the opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::Host => Player::Guest,
            Player::Guest => Player::Host,
        }
    }

    /// One-letter code used in stable key strings.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Player::Host => 'H',
            Player::Guest => 'G',
        }
    }

    /// Both players, host first.
    #[must_use]
    pub const fn both() -> [Player; 2] {
        [Player::Host, Player::Guest]
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Host => write!(f, "Host"),
            Player::Guest => write!(f, "Guest"),
        }
    }
}

/// Team selector relative to a perspective player.
///
/// Descriptors use this instead of concrete `Player` values so one tile
/// table serves both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamFilter {
    /// Owned by the perspective player.
    Friendly,
    /// Owned by the opponent.
    Enemy,
    /// Either owner.
    #[default]
    Any,
}

impl TeamFilter {
    /// Check whether a tile owner passes this filter from `perspective`.
    #[must_use]
    pub fn matches(self, perspective: Player, owner: Player) -> bool {
        match self {
            TeamFilter::Friendly => owner == perspective,
            TeamFilter::Enemy => owner == perspective.opponent(),
            TeamFilter::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Player::Host.opponent(), Player::Guest);
        assert_eq!(Player::Guest.opponent(), Player::Host);
        assert_eq!(Player::Host.opponent().opponent(), Player::Host);
    }

    #[test]
    fn test_codes_are_distinct() {
        assert_ne!(Player::Host.code(), Player::Guest.code());
    }

    #[test]
    fn test_team_filter() {
        assert!(TeamFilter::Friendly.matches(Player::Host, Player::Host));
        assert!(!TeamFilter::Friendly.matches(Player::Host, Player::Guest));
        assert!(TeamFilter::Enemy.matches(Player::Host, Player::Guest));
        assert!(!TeamFilter::Enemy.matches(Player::Guest, Player::Guest));
        assert!(TeamFilter::Any.matches(Player::Host, Player::Guest));
        assert!(TeamFilter::Any.matches(Player::Host, Player::Host));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Player::Host), "Host");
        assert_eq!(format!("{}", Player::Guest), "Guest");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Player::Guest).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Player::Guest);
    }
}
