//! Identifier newtypes and grid coordinates.
//!
//! ## TileCode vs TileId
//!
//! `TileCode` identifies a tile *type* ("White Lotus"), the key into the
//! declarative tile table. `TileId` identifies one concrete tile instance
//! in a game; ids are unique and monotonically assigned, and a tile keeps
//! its id for the whole game no matter how often it changes location.

use serde::{Deserialize, Serialize};

/// Unique identifier for a tile instance.
///
/// Assigned monotonically when the tile piles are built; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Tile type identifier - games define their own tile types.
///
/// The engine doesn't interpret these. Games define what codes exist and
/// attach meaning through `TileDefinition`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCode(pub u32);

impl TileCode {
    /// Create a new tile code.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw code value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TileCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code({})", self.0)
    }
}

/// A grid coordinate.
///
/// Rows and columns are 0-based from the top-left of the square bounding
/// the board. Whether a coordinate is playable is the board's concern;
/// `Coord` is just an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan_distance(self, other: Coord) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr + dc
    }

    /// Stable notation used inside key strings: `"row,col"`.
    #[must_use]
    pub fn notation(self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// Offset by a signed delta, returning `None` when leaving the
    /// `size`-by-`size` bounding square.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8, size: u8) -> Option<Coord> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            return None;
        }
        Some(Coord::new(row as u8, col as u8))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}
