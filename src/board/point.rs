//! Board points: type flags and occupancy.
//!
//! A point's *type set* mixes two kinds of flags: intrinsic layout typing
//! (Neutral, Temple, Red, White, NonPlayable) and transient display flags
//! set and cleared around a movement computation (PossibleMove, Marked).
//! Per-search scratch state (distance remaining, predecessors) does NOT
//! live here - see `movement::scratch`.

use serde::{Deserialize, Serialize};

use crate::core::{Coord, TileId};

/// One point type flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// Ordinary playable point.
    Neutral,
    /// Gate/temple point: deploy-restricted, protects its occupant.
    Temple,
    /// Red garden point.
    Red,
    /// White garden point.
    White,
    /// Not part of the playable board; skipped by every traversal.
    NonPlayable,
    /// Transient: flagged as a legal destination of the current search.
    PossibleMove,
    /// Transient: highlighted (e.g. a recorded point).
    Marked,
}

impl PointType {
    const fn bit(self) -> u8 {
        match self {
            PointType::Neutral => 1 << 0,
            PointType::Temple => 1 << 1,
            PointType::Red => 1 << 2,
            PointType::White => 1 << 3,
            PointType::NonPlayable => 1 << 4,
            PointType::PossibleMove => 1 << 5,
            PointType::Marked => 1 << 6,
        }
    }
}

/// A small set of `PointType` flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointTypeSet(u8);

impl PointTypeSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set containing one type.
    #[must_use]
    pub const fn of(point_type: PointType) -> Self {
        Self(point_type.bit())
    }

    /// Add a type (builder pattern).
    #[must_use]
    pub const fn with(self, point_type: PointType) -> Self {
        Self(self.0 | point_type.bit())
    }

    /// Insert a type in place.
    pub fn insert(&mut self, point_type: PointType) {
        self.0 |= point_type.bit();
    }

    /// Remove a type in place.
    pub fn remove(&mut self, point_type: PointType) {
        self.0 &= !point_type.bit();
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, point_type: PointType) -> bool {
        self.0 & point_type.bit() != 0
    }

    /// True when no flags are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Arena index of a board point.
///
/// Points live in a flat `Vec` owned by the board; everything else refers
/// to them by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointIndex(pub u16);

impl PointIndex {
    /// Create a point index.
    #[must_use]
    pub const fn new(idx: u16) -> Self {
        Self(idx)
    }

    /// As a `usize` for arena addressing.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PointIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({})", self.0)
    }
}

/// What sits on a point.
///
/// Multi-point ("gigantic") tiles occupy one primary cell plus satellite
/// cells; satellites hold the primary's index rather than a second copy of
/// the tile reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupancy {
    #[default]
    Empty,
    /// A tile is seated here (its primary cell).
    Occupied(TileId),
    /// Part of a gigantic tile whose primary cell is at the given index.
    Satellite(PointIndex),
}

impl Occupancy {
    /// True when nothing occupies the point.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Occupancy::Empty)
    }

    /// The tile seated directly on this point, if any.
    ///
    /// Satellites return `None`; resolve them through the board.
    #[must_use]
    pub const fn tile(self) -> Option<TileId> {
        match self {
            Occupancy::Occupied(id) => Some(id),
            _ => None,
        }
    }
}

/// One cell of the board arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPoint {
    pub coord: Coord,
    pub types: PointTypeSet,
    pub occupancy: Occupancy,
}

impl BoardPoint {
    /// Create a point with the given typing and nothing on it.
    #[must_use]
    pub const fn new(coord: Coord, types: PointTypeSet) -> Self {
        Self {
            coord,
            types,
            occupancy: Occupancy::Empty,
        }
    }

    /// True unless the point is typed `NonPlayable`.
    #[must_use]
    pub const fn is_playable(&self) -> bool {
        !self.types.contains(PointType::NonPlayable)
    }

    /// Flag membership test.
    #[must_use]
    pub const fn has_type(&self, point_type: PointType) -> bool {
        self.types.contains(point_type)
    }

    /// The tile seated on this point (primary cell only).
    #[must_use]
    pub const fn tile(&self) -> Option<TileId> {
        self.occupancy.tile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_set_insert_remove() {
        let mut set = PointTypeSet::of(PointType::Neutral);
        assert!(set.contains(PointType::Neutral));
        assert!(!set.contains(PointType::Temple));

        set.insert(PointType::PossibleMove);
        assert!(set.contains(PointType::PossibleMove));

        set.remove(PointType::PossibleMove);
        assert!(!set.contains(PointType::PossibleMove));
        assert!(set.contains(PointType::Neutral));
    }

    #[test]
    fn test_type_set_builder() {
        let set = PointTypeSet::empty()
            .with(PointType::Temple)
            .with(PointType::Red);
        assert!(set.contains(PointType::Temple));
        assert!(set.contains(PointType::Red));
        assert!(!set.contains(PointType::White));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut set = PointTypeSet::of(PointType::Marked);
        set.remove(PointType::PossibleMove);
        set.remove(PointType::PossibleMove);
        assert!(set.contains(PointType::Marked));
    }

    #[test]
    fn test_playability() {
        let playable = BoardPoint::new(Coord::new(0, 0), PointTypeSet::of(PointType::Neutral));
        assert!(playable.is_playable());

        let dead = BoardPoint::new(Coord::new(0, 0), PointTypeSet::of(PointType::NonPlayable));
        assert!(!dead.is_playable());
    }

    #[test]
    fn test_occupancy() {
        assert!(Occupancy::Empty.is_empty());
        assert_eq!(Occupancy::Occupied(TileId::new(3)).tile(), Some(TileId::new(3)));
        assert_eq!(Occupancy::Satellite(PointIndex::new(10)).tile(), None);
    }

    #[test]
    fn test_type_set_serialization() {
        let set = PointTypeSet::of(PointType::Temple).with(PointType::White);
        let json = serde_json::to_string(&set).unwrap();
        let back: PointTypeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
