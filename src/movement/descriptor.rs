//! Movement descriptors - the declarative movement vocabulary.
//!
//! A tile's `TileDefinition` lists one descriptor per movement shape it
//! can use. The resolver interprets descriptors against the live board;
//! nothing here touches state.

use serde::{Deserialize, Serialize};

use crate::board::PointType;
use crate::core::TileCode;
use crate::tiles::TileFilter;

/// The movement shapes the resolver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Orthogonal steps.
    Standard,
    /// Diagonal steps.
    Diagonal,
    /// Union of orthogonal and diagonal steps.
    OrthogonalAndDiagonal,
    /// Fixed offset jumps (knight-like), one offset per step.
    JumpShape,
    /// A fixed turn pattern resolved one full path at a time.
    TravelShape,
    /// Jump next to the nearest visible tile in each cardinal direction.
    JumpAlongLineOfSight,
    /// Teleport anywhere inside a friendly tile's territorial zone.
    WithinFriendlyTileZone,
    /// Teleport to any empty playable point.
    Anywhere,
    /// Orthogonal steps that strictly increase distance from a target tile.
    AwayFromTargetTileOrthogonal,
    /// Diagonal steps that strictly increase distance from a target tile.
    AwayFromTargetTileDiagonal,
    /// Checkers-style jump over a matching neighbor tile.
    JumpTargetTile,
    /// Chained checkers-style jumps over any surrounding tile.
    JumpSurroundingTiles,
}

/// Abilities attached to a movement itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementAbility {
    /// May pass through occupied points.
    JumpOver,
    /// Captures every tile along the path, not only the destination.
    ChargeCapture,
}

/// Declarative limits on where a movement may land.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementRestriction {
    /// May not land on points carrying any of these types.
    RestrictedPointTypes(Vec<PointType>),
    /// May not land inside an opposing tile's territorial zone.
    OpponentTileZone(TileCode),
}

/// What a movement may capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureType {
    /// Any capturable tile outside a temple.
    All,
    /// Explicit override: tiles seated on temple points too.
    TilesInsideTemple,
    /// Only tiles with one of these codes (temples still protect).
    Codes(Vec<TileCode>),
}

/// One step of a travel-shape pattern, relative to the previous heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelStep {
    Straight,
    Left,
    Right,
    /// Either left or right.
    Turn,
}

/// A single declarative movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDescriptor {
    pub movement_type: MovementType,

    /// Step budget. Ignored by shapes with an intrinsic length
    /// (`TravelShape`) or none (`Anywhere`, `WithinFriendlyTileZone`).
    pub distance: u8,

    /// For targeted shapes: which tiles count as the target.
    pub target_tiles: TileFilter,

    /// Fixed offsets for `JumpShape`.
    pub jump_offsets: Vec<(i8, i8)>,

    /// Turn pattern for `TravelShape`.
    pub travel_pattern: Vec<TravelStep>,

    pub restrictions: Vec<MovementRestriction>,

    pub abilities: Vec<MovementAbility>,

    /// Empty means the movement cannot capture at all.
    pub capture_types: Vec<CaptureType>,
}

impl MovementDescriptor {
    fn base(movement_type: MovementType, distance: u8) -> Self {
        Self {
            movement_type,
            distance,
            target_tiles: TileFilter::any(),
            jump_offsets: Vec::new(),
            travel_pattern: Vec::new(),
            restrictions: Vec::new(),
            abilities: Vec::new(),
            capture_types: Vec::new(),
        }
    }

    /// Orthogonal movement with a step budget.
    #[must_use]
    pub fn standard(distance: u8) -> Self {
        Self::base(MovementType::Standard, distance)
    }

    /// Diagonal movement with a step budget.
    #[must_use]
    pub fn diagonal(distance: u8) -> Self {
        Self::base(MovementType::Diagonal, distance)
    }

    /// Orthogonal-or-diagonal movement.
    #[must_use]
    pub fn orthogonal_and_diagonal(distance: u8) -> Self {
        Self::base(MovementType::OrthogonalAndDiagonal, distance)
    }

    /// Fixed-offset jumps; each jump costs one step.
    #[must_use]
    pub fn jump_shape(distance: u8, offsets: Vec<(i8, i8)>) -> Self {
        let mut desc = Self::base(MovementType::JumpShape, distance);
        desc.jump_offsets = offsets;
        desc
    }

    /// A turn pattern resolved one full path at a time.
    #[must_use]
    pub fn travel_shape(pattern: Vec<TravelStep>) -> Self {
        let mut desc = Self::base(MovementType::TravelShape, pattern.len() as u8);
        desc.travel_pattern = pattern;
        desc
    }

    /// Jump next to the nearest matching tile in each cardinal direction.
    #[must_use]
    pub fn jump_along_line_of_sight(target_tiles: TileFilter) -> Self {
        let mut desc = Self::base(MovementType::JumpAlongLineOfSight, 1);
        desc.target_tiles = target_tiles;
        desc
    }

    /// Teleport within a matching friendly tile's territorial zone.
    #[must_use]
    pub fn within_friendly_tile_zone(target_tiles: TileFilter) -> Self {
        let mut desc = Self::base(MovementType::WithinFriendlyTileZone, 0);
        desc.target_tiles = target_tiles;
        desc
    }

    /// Teleport to any empty playable point.
    #[must_use]
    pub fn anywhere() -> Self {
        Self::base(MovementType::Anywhere, 0)
    }

    /// Orthogonal flight from the nearest matching tile.
    #[must_use]
    pub fn away_from_target_orthogonal(target_tiles: TileFilter, distance: u8) -> Self {
        let mut desc = Self::base(MovementType::AwayFromTargetTileOrthogonal, distance);
        desc.target_tiles = target_tiles;
        desc
    }

    /// Diagonal flight from the nearest matching tile.
    #[must_use]
    pub fn away_from_target_diagonal(target_tiles: TileFilter, distance: u8) -> Self {
        let mut desc = Self::base(MovementType::AwayFromTargetTileDiagonal, distance);
        desc.target_tiles = target_tiles;
        desc
    }

    /// One checkers-style jump over a matching neighbor.
    #[must_use]
    pub fn jump_target_tile(target_tiles: TileFilter) -> Self {
        let mut desc = Self::base(MovementType::JumpTargetTile, 1);
        desc.target_tiles = target_tiles;
        desc
    }

    /// Chained checkers-style jumps over any surrounding tile.
    #[must_use]
    pub fn jump_surrounding_tiles(distance: u8) -> Self {
        Self::base(MovementType::JumpSurroundingTiles, distance)
    }

    /// Add a capture type (builder pattern).
    #[must_use]
    pub fn with_capture(mut self, capture: CaptureType) -> Self {
        self.capture_types.push(capture);
        self
    }

    /// Add a restriction (builder pattern).
    #[must_use]
    pub fn with_restriction(mut self, restriction: MovementRestriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Add a movement ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: MovementAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Movement-ability membership test.
    #[must_use]
    pub fn has_ability(&self, ability: MovementAbility) -> bool {
        self.abilities.contains(&ability)
    }

    /// True when the movement can capture anything at all.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        !self.capture_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_builder() {
        let desc = MovementDescriptor::standard(3).with_capture(CaptureType::All);
        assert_eq!(desc.movement_type, MovementType::Standard);
        assert_eq!(desc.distance, 3);
        assert!(desc.can_capture());
        assert!(!desc.has_ability(MovementAbility::JumpOver));
    }

    #[test]
    fn test_travel_shape_length() {
        let desc = MovementDescriptor::travel_shape(vec![
            TravelStep::Straight,
            TravelStep::Turn,
            TravelStep::Straight,
        ]);
        assert_eq!(desc.distance, 3);
        assert_eq!(desc.travel_pattern.len(), 3);
    }

    #[test]
    fn test_jump_shape_offsets() {
        let desc = MovementDescriptor::jump_shape(1, vec![(2, 1), (1, 2)]);
        assert_eq!(desc.jump_offsets.len(), 2);
    }

    #[test]
    fn test_charge_capture_flag() {
        let desc = MovementDescriptor::travel_shape(vec![TravelStep::Straight; 4])
            .with_ability(MovementAbility::ChargeCapture)
            .with_capture(CaptureType::All);
        assert!(desc.has_ability(MovementAbility::ChargeCapture));
    }

    #[test]
    fn test_serialization() {
        let desc = MovementDescriptor::jump_surrounding_tiles(2)
            .with_restriction(MovementRestriction::RestrictedPointTypes(vec![PointType::Red]));
        let json = serde_json::to_string(&desc).unwrap();
        let back: MovementDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
