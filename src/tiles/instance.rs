//! Tile instances - runtime tile state.
//!
//! A `Tile` is one concrete piece in one game. It is created once when
//! the piles are built and never destroyed: captures and pile returns
//! only change its location. Ongoing ability effects (protection,
//! immobilization, zone suppression) are flags here, recomputed by the
//! ability engine from its active ability set.

use serde::{Deserialize, Serialize};

use crate::board::PointIndex;
use crate::core::{Player, TileCode, TileId};

/// Where a tile currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileLocation {
    /// In its owner's reserve pile, not yet deployed (or returned).
    #[default]
    Pile,
    /// Seated on the board at the given primary point.
    Board(PointIndex),
    /// In the captured pile; recoverable by some abilities.
    Captured,
}

/// A tile instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique instance id, assigned monotonically.
    pub id: TileId,

    /// Tile type code into the game definition.
    pub code: TileCode,

    /// Owning player; never changes.
    pub owner: Player,

    /// Current location.
    pub location: TileLocation,

    /// Shielded from capture by an active protection ability.
    pub protected: bool,

    /// Mid-capture marker during one move's ability processing.
    pub being_captured: bool,

    /// Movement suppressed by an active immobilization ability.
    pub immobilized: bool,

    /// Territorial zone suppressed by cancellation this move.
    pub zone_suppressed: bool,
}

impl Tile {
    /// Create a tile in its owner's pile.
    #[must_use]
    pub fn new(id: TileId, code: TileCode, owner: Player) -> Self {
        Self {
            id,
            code,
            owner,
            location: TileLocation::Pile,
            protected: false,
            being_captured: false,
            immobilized: false,
            zone_suppressed: false,
        }
    }

    /// True when seated on the board.
    #[must_use]
    pub const fn is_on_board(&self) -> bool {
        matches!(self.location, TileLocation::Board(_))
    }

    /// Primary point when seated.
    #[must_use]
    pub const fn point(&self) -> Option<PointIndex> {
        match self.location {
            TileLocation::Board(idx) => Some(idx),
            _ => None,
        }
    }

    /// Clear every ongoing-effect flag (used when the tile leaves the
    /// board, and before flags are recomputed from active abilities).
    pub fn clear_ongoing_flags(&mut self) {
        self.protected = false;
        self.immobilized = false;
        self.zone_suppressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_starts_in_pile() {
        let tile = Tile::new(TileId::new(1), TileCode::new(2), Player::Host);
        assert_eq!(tile.location, TileLocation::Pile);
        assert!(!tile.is_on_board());
        assert_eq!(tile.point(), None);
        assert!(!tile.protected);
    }

    #[test]
    fn test_seated_tile() {
        let mut tile = Tile::new(TileId::new(1), TileCode::new(2), Player::Guest);
        tile.location = TileLocation::Board(PointIndex::new(40));
        assert!(tile.is_on_board());
        assert_eq!(tile.point(), Some(PointIndex::new(40)));
    }

    #[test]
    fn test_clear_ongoing_flags() {
        let mut tile = Tile::new(TileId::new(1), TileCode::new(2), Player::Host);
        tile.protected = true;
        tile.immobilized = true;
        tile.zone_suppressed = true;
        tile.being_captured = true;

        tile.clear_ongoing_flags();
        assert!(!tile.protected);
        assert!(!tile.immobilized);
        assert!(!tile.zone_suppressed);
        // being_captured is move bookkeeping, not an ongoing effect
        assert!(tile.being_captured);
    }
}
