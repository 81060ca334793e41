//! The board: a point arena plus geometry queries and tile seating.
//!
//! ## Arena layout
//!
//! Points are stored row-major in a flat `Vec`, addressed by `PointIndex`.
//! Every coordinate of the bounding square gets a point; coordinates
//! outside the playable diamond are typed `NonPlayable` and are skipped by
//! every geometry query - they are never returned as neighbors and never
//! participate in line-of-sight.
//!
//! ## Tile seating
//!
//! The board is the single owner ledger for tiles: a tile is on exactly
//! one primary point, in its owner's pile, or in the captured pile.
//! Transfers (`place_from_pile`, `relocate`, `capture_tile`, ...) are
//! atomic - there is no intermediate state observable from outside.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Coord, Player, TileCode, TileId};
use crate::tiles::{GameDefinition, Tile, TileAttribute, TileLocation};

use super::point::{BoardPoint, Occupancy, PointIndex, PointType, PointTypeSet};

/// A cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four cardinal directions.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row/column delta of one step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// 90 degrees counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// 90 degrees clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
}

const ORTHOGONAL_DELTAS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const DIAGONAL_DELTAS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// Per-game point typing, supplied at board construction.
///
/// The layout decides which coordinates are playable and which carry
/// Temple/Red/White typing. Games build their own; `diamond` gives the
/// standard clipped-corner shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    size: u8,
    types: Vec<PointTypeSet>,
}

impl BoardLayout {
    /// A diamond layout: the bounding square with its corners clipped.
    ///
    /// A coordinate is playable when `|r-mid| + |c-mid| <= mid + mid/2`.
    #[must_use]
    pub fn diamond(size: u8) -> Self {
        assert!(size >= 3, "board size must be at least 3");
        assert!(size % 2 == 1, "board size must be odd");
        let mid = (size / 2) as i32;
        let reach = mid + mid / 2;
        let mut types = Vec::with_capacity(size as usize * size as usize);
        for row in 0..size as i32 {
            for col in 0..size as i32 {
                let dist = (row - mid).abs() + (col - mid).abs();
                if dist <= reach {
                    types.push(PointTypeSet::of(PointType::Neutral));
                } else {
                    types.push(PointTypeSet::of(PointType::NonPlayable));
                }
            }
        }
        Self { size, types }
    }

    /// Add a type flag to one coordinate (builder pattern).
    ///
    /// Ignored for non-playable coordinates.
    #[must_use]
    pub fn with_point_type(mut self, coord: Coord, point_type: PointType) -> Self {
        let idx = coord.row as usize * self.size as usize + coord.col as usize;
        if idx < self.types.len() && !self.types[idx].contains(PointType::NonPlayable) {
            self.types[idx].insert(point_type);
        }
        self
    }

    /// Board side length.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }
}

/// The board: point arena, tile ledger, geometry.
#[derive(Clone, Debug)]
pub struct Board {
    size: u8,
    points: Vec<BoardPoint>,
    tiles: FxHashMap<TileId, Tile>,
    next_tile_id: u32,
}

impl Board {
    /// Build a board from a layout. No tiles exist yet.
    #[must_use]
    pub fn new(layout: &BoardLayout) -> Self {
        let size = layout.size;
        let mut points = Vec::with_capacity(size as usize * size as usize);
        for row in 0..size {
            for col in 0..size {
                let idx = row as usize * size as usize + col as usize;
                points.push(BoardPoint::new(Coord::new(row, col), layout.types[idx]));
            }
        }
        Self {
            size,
            points,
            tiles: FxHashMap::default(),
            next_tile_id: 1,
        }
    }

    /// Board side length.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of arena cells (playable or not).
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // === Addressing ===

    /// Arena index of a coordinate, `None` outside the bounding square.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<PointIndex> {
        if coord.row >= self.size || coord.col >= self.size {
            return None;
        }
        Some(PointIndex::new(
            coord.row as u16 * self.size as u16 + coord.col as u16,
        ))
    }

    /// Arena index of a *playable* coordinate.
    #[must_use]
    pub fn playable_index(&self, coord: Coord) -> Option<PointIndex> {
        let idx = self.index_of(coord)?;
        if self.point(idx).is_playable() {
            Some(idx)
        } else {
            None
        }
    }

    /// The point at an arena index.
    #[must_use]
    pub fn point(&self, idx: PointIndex) -> &BoardPoint {
        &self.points[idx.index()]
    }

    /// The playable point at a coordinate, if any.
    #[must_use]
    pub fn point_at(&self, row: u8, col: u8) -> Option<&BoardPoint> {
        self.playable_index(Coord::new(row, col)).map(|i| self.point(i))
    }

    fn neighbor(&self, idx: PointIndex, dr: i8, dc: i8) -> Option<PointIndex> {
        let coord = self.point(idx).coord.offset(dr, dc, self.size)?;
        self.playable_index(coord)
    }

    // === Geometry ===

    /// The up-to-4 orthogonal neighbors, non-playable points skipped.
    #[must_use]
    pub fn adjacent_points(&self, idx: PointIndex) -> SmallVec<[PointIndex; 4]> {
        ORTHOGONAL_DELTAS
            .iter()
            .filter_map(|&(dr, dc)| self.neighbor(idx, dr, dc))
            .collect()
    }

    /// The up-to-4 diagonal neighbors.
    #[must_use]
    pub fn diagonal_points(&self, idx: PointIndex) -> SmallVec<[PointIndex; 4]> {
        DIAGONAL_DELTAS
            .iter()
            .filter_map(|&(dr, dc)| self.neighbor(idx, dr, dc))
            .collect()
    }

    /// The full 8-neighborhood.
    #[must_use]
    pub fn surrounding_points(&self, idx: PointIndex) -> SmallVec<[PointIndex; 8]> {
        let mut out: SmallVec<[PointIndex; 8]> = self.adjacent_points(idx).into_iter().collect();
        out.extend(self.diagonal_points(idx));
        out
    }

    /// Empty points visible from `origin` within `max_distance` steps,
    /// scanning outward in the four cardinal directions until a tile or
    /// the board edge stops the scan.
    #[must_use]
    pub fn points_in_line_of_sight(&self, origin: PointIndex, max_distance: u32) -> Vec<PointIndex> {
        let mut out = Vec::new();
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            let mut current = origin;
            let mut travelled = 0;
            while travelled < max_distance {
                let Some(next) = self.neighbor(current, dr, dc) else {
                    break;
                };
                if !self.point(next).occupancy.is_empty() {
                    break;
                }
                out.push(next);
                current = next;
                travelled += 1;
            }
        }
        out
    }

    /// The nearest occupied point from `origin` in one direction, with its
    /// distance in steps. Satellite cells count as occupied.
    #[must_use]
    pub fn first_tile_in_direction(&self, origin: PointIndex, dir: Direction) -> Option<(PointIndex, u32)> {
        let (dr, dc) = dir.delta();
        let mut current = origin;
        let mut travelled = 0;
        loop {
            let next = self.neighbor(current, dr, dc)?;
            travelled += 1;
            if !self.point(next).occupancy.is_empty() {
                return Some((next, travelled));
            }
            current = next;
        }
    }

    /// Manhattan distance between two arena points.
    #[must_use]
    pub fn manhattan_distance(&self, a: PointIndex, b: PointIndex) -> u32 {
        self.point(a).coord.manhattan_distance(self.point(b).coord)
    }

    /// Zone containment: `target` lies within the territorial zone of the
    /// tile seated at `zone_owner_point`.
    ///
    /// Holds exactly when the seated tile declares a territorial zone, the
    /// Manhattan distance is within its size, and the zone is not
    /// currently suppressed by cancellation.
    #[must_use]
    pub fn zone_contains(
        &self,
        def: &GameDefinition,
        zone_owner_point: PointIndex,
        target: PointIndex,
    ) -> bool {
        let Some(tile_id) = self.point(zone_owner_point).tile() else {
            return false;
        };
        let Some(tile) = self.tiles.get(&tile_id) else {
            return false;
        };
        if tile.zone_suppressed {
            return false;
        }
        let Some(zone) = def.get(tile.code).and_then(|d| d.territorial_zone.as_ref()) else {
            return false;
        };
        self.manhattan_distance(zone_owner_point, target) <= zone.size as u32
    }

    /// Iterate all playable arena indices.
    pub fn playable_points(&self) -> impl Iterator<Item = PointIndex> + '_ {
        (0..self.points.len() as u16)
            .map(PointIndex::new)
            .filter(|&i| self.point(i).is_playable())
    }

    // === Transient flags ===

    /// Set a transient flag on one point.
    pub fn flag_point(&mut self, idx: PointIndex, point_type: PointType) {
        self.points[idx.index()].types.insert(point_type);
    }

    /// Clear a transient flag on one point.
    pub fn unflag_point(&mut self, idx: PointIndex, point_type: PointType) {
        self.points[idx.index()].types.remove(point_type);
    }

    /// Clear a transient flag everywhere.
    pub fn clear_flag_everywhere(&mut self, point_type: PointType) {
        for point in &mut self.points {
            point.types.remove(point_type);
        }
    }

    // === Tile ledger ===

    /// Create a tile in its owner's pile.
    pub fn create_tile(&mut self, code: TileCode, owner: Player) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id += 1;
        self.tiles.insert(id, Tile::new(id, code, owner));
        id
    }

    /// Look up a tile instance.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Look up a tile instance mutably.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// The tile occupying a point, resolving satellite cells to their
    /// primary tile.
    #[must_use]
    pub fn tile_at(&self, idx: PointIndex) -> Option<TileId> {
        match self.point(idx).occupancy {
            Occupancy::Empty => None,
            Occupancy::Occupied(id) => Some(id),
            Occupancy::Satellite(primary) => self.point(primary).tile(),
        }
    }

    /// All tiles currently seated, ordered by tile id for deterministic
    /// discovery.
    #[must_use]
    pub fn tiles_on_board(&self) -> Vec<(TileId, PointIndex)> {
        let mut out: Vec<(TileId, PointIndex)> = self
            .tiles
            .values()
            .filter_map(|t| match t.location {
                TileLocation::Board(idx) => Some((t.id, idx)),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Every tile instance id, sorted.
    #[must_use]
    pub fn all_tile_ids(&self) -> Vec<TileId> {
        let mut out: Vec<TileId> = self.tiles.keys().copied().collect();
        out.sort();
        out
    }

    /// All captured tiles, ordered by tile id.
    #[must_use]
    pub fn captured_tiles(&self) -> Vec<TileId> {
        let mut out: Vec<TileId> = self
            .tiles
            .values()
            .filter(|t| matches!(t.location, TileLocation::Captured))
            .map(|t| t.id)
            .collect();
        out.sort();
        out
    }

    /// A pile tile of the given code owned by `player`, lowest id first
    /// for determinism.
    #[must_use]
    pub fn pile_tile(&self, player: Player, code: TileCode) -> Option<TileId> {
        self.tiles
            .values()
            .filter(|t| {
                t.owner == player && t.code == code && matches!(t.location, TileLocation::Pile)
            })
            .map(|t| t.id)
            .min()
    }

    /// Whether `player`'s banner tile is currently deployed.
    #[must_use]
    pub fn banner_deployed(&self, def: &GameDefinition, player: Player) -> bool {
        self.tiles.values().any(|t| {
            t.owner == player
                && matches!(t.location, TileLocation::Board(_))
                && def
                    .get(t.code)
                    .is_some_and(|d| d.has_attribute(TileAttribute::Banner))
        })
    }

    // === Seating ===

    /// All cells a tile of this code would occupy when seated at
    /// `primary`: just the primary for ordinary tiles, a 2x2 block for
    /// gigantic ones. `None` if part of the footprint falls off the
    /// playable board.
    #[must_use]
    pub fn footprint(
        &self,
        def: &GameDefinition,
        code: TileCode,
        primary: PointIndex,
    ) -> Option<SmallVec<[PointIndex; 4]>> {
        let mut cells: SmallVec<[PointIndex; 4]> = SmallVec::new();
        cells.push(primary);
        let gigantic = def
            .get(code)
            .is_some_and(|d| d.has_attribute(TileAttribute::Gigantic));
        if gigantic {
            for (dr, dc) in [(1, 0), (0, 1), (1, 1)] {
                cells.push(self.neighbor(primary, dr, dc)?);
            }
        }
        Some(cells)
    }

    /// True when every footprint cell is empty (or occupied by the tile
    /// itself, for in-place checks while it is still seated).
    #[must_use]
    pub fn footprint_free(&self, cells: &[PointIndex], ignore: Option<TileId>) -> bool {
        cells.iter().all(|&c| match self.tile_at(c) {
            None => true,
            Some(id) => Some(id) == ignore,
        })
    }

    fn occupy(&mut self, tile_id: TileId, cells: &[PointIndex]) {
        let primary = cells[0];
        self.points[primary.index()].occupancy = Occupancy::Occupied(tile_id);
        for &cell in &cells[1..] {
            self.points[cell.index()].occupancy = Occupancy::Satellite(primary);
        }
        if let Some(tile) = self.tiles.get_mut(&tile_id) {
            tile.location = TileLocation::Board(primary);
        }
    }

    fn vacate(&mut self, tile_id: TileId) -> Option<PointIndex> {
        let primary = match self.tiles.get(&tile_id)?.location {
            TileLocation::Board(idx) => idx,
            _ => return None,
        };
        self.points[primary.index()].occupancy = Occupancy::Empty;
        for i in 0..self.points.len() {
            if self.points[i].occupancy == Occupancy::Satellite(primary) {
                self.points[i].occupancy = Occupancy::Empty;
            }
        }
        Some(primary)
    }

    /// Deploy a pile tile onto the board. Returns false (and changes
    /// nothing) if the tile is not in a pile or the footprint is blocked.
    pub fn place_from_pile(
        &mut self,
        def: &GameDefinition,
        tile_id: TileId,
        primary: PointIndex,
    ) -> bool {
        let Some(tile) = self.tiles.get(&tile_id) else {
            return false;
        };
        if !matches!(tile.location, TileLocation::Pile) {
            return false;
        }
        let code = tile.code;
        let Some(cells) = self.footprint(def, code, primary) else {
            return false;
        };
        if !self.footprint_free(&cells, None) {
            return false;
        }
        self.occupy(tile_id, &cells);
        true
    }

    /// Move a seated tile to a new primary point. The destination
    /// footprint must be free apart from the tile itself.
    pub fn relocate(&mut self, def: &GameDefinition, tile_id: TileId, primary: PointIndex) -> bool {
        let Some(tile) = self.tiles.get(&tile_id) else {
            return false;
        };
        if !matches!(tile.location, TileLocation::Board(_)) {
            return false;
        }
        let code = tile.code;
        let Some(cells) = self.footprint(def, code, primary) else {
            return false;
        };
        if !self.footprint_free(&cells, Some(tile_id)) {
            return false;
        }
        self.vacate(tile_id);
        self.occupy(tile_id, &cells);
        true
    }

    /// Capture a seated tile: off the board, into the captured pile.
    /// Ongoing-effect flags are cleared; the tile keeps its id and owner
    /// and stays recoverable.
    pub fn capture_tile(&mut self, tile_id: TileId) -> bool {
        if self.vacate(tile_id).is_none() {
            return false;
        }
        if let Some(tile) = self.tiles.get_mut(&tile_id) {
            tile.location = TileLocation::Captured;
            tile.clear_ongoing_flags();
        }
        true
    }

    /// Return a seated or captured tile to its owner's pile.
    pub fn return_to_pile(&mut self, tile_id: TileId) -> bool {
        let Some(tile) = self.tiles.get(&tile_id) else {
            return false;
        };
        match tile.location {
            TileLocation::Board(_) => {
                self.vacate(tile_id);
            }
            TileLocation::Captured => {}
            TileLocation::Pile => return false,
        }
        if let Some(tile) = self.tiles.get_mut(&tile_id) {
            tile.location = TileLocation::Pile;
            tile.clear_ongoing_flags();
        }
        true
    }

    /// Bring a captured tile back onto the board.
    pub fn restore_captured(
        &mut self,
        def: &GameDefinition,
        tile_id: TileId,
        primary: PointIndex,
    ) -> bool {
        let Some(tile) = self.tiles.get(&tile_id) else {
            return false;
        };
        if !matches!(tile.location, TileLocation::Captured) {
            return false;
        }
        let code = tile.code;
        let Some(cells) = self.footprint(def, code, primary) else {
            return false;
        };
        if !self.footprint_free(&cells, None) {
            return false;
        }
        self.occupy(tile_id, &cells);
        true
    }

    /// Total tiles ever created; with the ledger invariant this equals
    /// `on board + in piles + captured`.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileDefinition;

    fn empty_def() -> GameDefinition {
        GameDefinition::new(crate::rules::RuleOptions::default())
    }

    fn def_with(code: TileCode) -> GameDefinition {
        let mut def = empty_def();
        def.register(TileDefinition::new(code, "Test"));
        def
    }

    #[test]
    fn test_diamond_clips_corners() {
        let layout = BoardLayout::diamond(17);
        let board = Board::new(&layout);

        assert!(board.point_at(0, 0).is_none()); // corner clipped
        assert!(board.point_at(16, 16).is_none());
        assert!(board.point_at(8, 8).is_some()); // center
        assert!(board.point_at(0, 8).is_some()); // edge midpoint
    }

    #[test]
    fn test_adjacency_skips_nonplayable() {
        let layout = BoardLayout::diamond(17);
        let board = Board::new(&layout);

        // (0,8) is on the top edge of the diamond; its north neighbor is
        // off-board and (0,7)/(0,9) are playable under the clip rule.
        let idx = board.playable_index(Coord::new(0, 8)).unwrap();
        let adjacent = board.adjacent_points(idx);
        assert_eq!(adjacent.len(), 3);

        let center = board.playable_index(Coord::new(8, 8)).unwrap();
        assert_eq!(board.adjacent_points(center).len(), 4);
        assert_eq!(board.diagonal_points(center).len(), 4);
        assert_eq!(board.surrounding_points(center).len(), 8);
    }

    #[test]
    fn test_line_of_sight_blocked_by_tile() {
        let code = TileCode::new(1);
        let def = def_with(code);
        let layout = BoardLayout::diamond(17);
        let mut board = Board::new(&layout);

        let center = board.playable_index(Coord::new(8, 8)).unwrap();
        let blocker_point = board.playable_index(Coord::new(8, 11)).unwrap();
        let blocker = board.create_tile(code, Player::Guest);
        assert!(board.place_from_pile(&def, blocker, blocker_point));

        let visible = board.points_in_line_of_sight(center, 5);
        // East ray stops before the blocker: only (8,9) and (8,10).
        let east: Vec<_> = visible
            .iter()
            .filter(|&&p| board.point(p).coord.row == 8 && board.point(p).coord.col > 8)
            .collect();
        assert_eq!(east.len(), 2);

        let (found, dist) = board
            .first_tile_in_direction(center, Direction::East)
            .unwrap();
        assert_eq!(found, blocker_point);
        assert_eq!(dist, 3);
    }

    #[test]
    fn test_seating_ledger() {
        let code = TileCode::new(1);
        let def = def_with(code);
        let layout = BoardLayout::diamond(9);
        let mut board = Board::new(&layout);

        let tile = board.create_tile(code, Player::Host);
        assert_eq!(board.pile_tile(Player::Host, code), Some(tile));

        let a = board.playable_index(Coord::new(4, 4)).unwrap();
        let b = board.playable_index(Coord::new(4, 5)).unwrap();

        assert!(board.place_from_pile(&def, tile, a));
        assert_eq!(board.tile_at(a), Some(tile));
        assert_eq!(board.pile_tile(Player::Host, code), None);

        assert!(board.relocate(&def, tile, b));
        assert_eq!(board.tile_at(a), None);
        assert_eq!(board.tile_at(b), Some(tile));

        assert!(board.capture_tile(tile));
        assert_eq!(board.tile_at(b), None);
        assert_eq!(board.captured_tiles(), vec![tile]);

        assert!(board.restore_captured(&def, tile, a));
        assert_eq!(board.tile_at(a), Some(tile));
    }

    #[test]
    fn test_place_rejects_occupied() {
        let code = TileCode::new(1);
        let def = def_with(code);
        let layout = BoardLayout::diamond(9);
        let mut board = Board::new(&layout);

        let first = board.create_tile(code, Player::Host);
        let second = board.create_tile(code, Player::Guest);
        let a = board.playable_index(Coord::new(4, 4)).unwrap();

        assert!(board.place_from_pile(&def, first, a));
        assert!(!board.place_from_pile(&def, second, a));
        assert_eq!(board.tile_at(a), Some(first));
    }

    #[test]
    fn test_gigantic_footprint() {
        let code = TileCode::new(1);
        let mut def = empty_def();
        def.register(TileDefinition::new(code, "Big").with_attribute(TileAttribute::Gigantic));

        let layout = BoardLayout::diamond(9);
        let mut board = Board::new(&layout);
        let tile = board.create_tile(code, Player::Host);

        let a = board.playable_index(Coord::new(3, 3)).unwrap();
        assert!(board.place_from_pile(&def, tile, a));

        // All four cells resolve to the same tile.
        for (dr, dc) in [(0u8, 0u8), (1, 0), (0, 1), (1, 1)] {
            let idx = board.playable_index(Coord::new(3 + dr, 3 + dc)).unwrap();
            assert_eq!(board.tile_at(idx), Some(tile));
        }

        // Satellites are released on capture.
        assert!(board.capture_tile(tile));
        for (dr, dc) in [(0u8, 0u8), (1, 0), (0, 1), (1, 1)] {
            let idx = board.playable_index(Coord::new(3 + dr, 3 + dc)).unwrap();
            assert_eq!(board.tile_at(idx), None);
        }
    }

    #[test]
    fn test_transient_flags() {
        let layout = BoardLayout::diamond(9);
        let mut board = Board::new(&layout);
        let a = board.playable_index(Coord::new(4, 4)).unwrap();

        board.flag_point(a, PointType::PossibleMove);
        assert!(board.point(a).has_type(PointType::PossibleMove));

        board.clear_flag_everywhere(PointType::PossibleMove);
        assert!(!board.point(a).has_type(PointType::PossibleMove));
        assert!(board.point(a).has_type(PointType::Neutral));
    }
}
