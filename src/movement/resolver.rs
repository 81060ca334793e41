//! Movement resolution - expanding reachable points from the board.
//!
//! Resolution is a breadth-first frontier expansion driven by one
//! `MovementDescriptor` at a time. Each frontier point produces candidate
//! next points through a movement-type-specific step function; candidates
//! already reached with an equal-or-better remaining budget are pruned, so
//! every point is finalized with its maximal reachable budget and the
//! result is independent of traversal order.
//!
//! Passing *through* a point and landing *on* it are separate questions:
//! `can_move_through_point` decides whether a candidate seeds the next
//! frontier, `can_move_onto_point` whether it is a legal destination.
//!
//! `TravelShape` is the exception to breadth-first: its step legality
//! depends on the directional history of the specific path, so it is
//! resolved one full path at a time, depth-first.
//!
//! There is no error path here. An unreachable or illegal destination
//! simply never appears in the result.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::board::{Board, Direction, PointIndex, PointType};
use crate::tiles::{GameDefinition, Tile, TileAttribute};

use super::descriptor::{
    CaptureType, MovementAbility, MovementDescriptor, MovementRestriction, MovementType,
    TravelStep,
};
use super::scratch::MoveScratch;

const SURROUNDING_DELTAS: [(i8, i8); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
];

/// A modifier produced by an active movement-modifying ability, applied
/// before (or, for bonus movement, after) descriptor resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum MovementModifier {
    /// Add distance to matching movement types (all when `None`).
    Extend {
        movement_type: Option<MovementType>,
        amount: u8,
    },
    /// Substitute a whole descriptor for movements of one type.
    Substitute {
        from: MovementType,
        replacement: MovementDescriptor,
    },
    /// Re-run the resolver from every reached point with this movement.
    Bonus { movement: MovementDescriptor },
}

/// How one destination was reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachInfo {
    /// Concrete path, origin first, destination last.
    pub path: Vec<PointIndex>,
    /// The movement that reached it captures along the whole path.
    pub charge_capture: bool,
}

/// The full reachable set for one tile.
#[derive(Clone, Debug, Default)]
pub struct ResolvedMovement {
    destinations: FxHashMap<PointIndex, ReachInfo>,
}

impl ResolvedMovement {
    /// Whether a point is a legal destination.
    #[must_use]
    pub fn contains(&self, idx: PointIndex) -> bool {
        self.destinations.contains_key(&idx)
    }

    /// Reach info for a destination.
    #[must_use]
    pub fn get(&self, idx: PointIndex) -> Option<&ReachInfo> {
        self.destinations.get(&idx)
    }

    /// All destinations, sorted for deterministic iteration.
    #[must_use]
    pub fn points(&self) -> Vec<PointIndex> {
        let mut out: Vec<PointIndex> = self.destinations.keys().copied().collect();
        out.sort();
        out
    }

    /// Number of destinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// True when no destination is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Resolve every movement of a tile against the current board.
///
/// `modifiers` come from active movement-modifying abilities targeting
/// the tile. An off-board or immobilized tile has no moves.
#[must_use]
pub fn resolve_moves(
    board: &Board,
    def: &GameDefinition,
    mover_id: crate::core::TileId,
    modifiers: &[MovementModifier],
) -> ResolvedMovement {
    let mut result = ResolvedMovement::default();

    let Some(mover) = board.tile(mover_id) else {
        return result;
    };
    let Some(origin) = mover.point() else {
        return result;
    };
    if mover.immobilized {
        return result;
    }
    let Some(mover_def) = def.get(mover.code) else {
        tracing::debug!(code = %mover.code, "no definition for moving tile");
        return result;
    };

    let mut scratch = MoveScratch::new(board.point_count());

    for movement in &mover_def.movements {
        let movement = apply_modifiers(movement, modifiers);
        resolve_descriptor(
            board,
            def,
            mover,
            origin,
            &movement,
            &mut scratch,
            &[],
            &mut result.destinations,
        );
    }

    // Bonus movements re-run the resolver from every point already
    // reachable, carrying the base path as a prefix.
    for modifier in modifiers {
        if let MovementModifier::Bonus { movement } = modifier {
            let mut bonus: FxHashMap<PointIndex, ReachInfo> = FxHashMap::default();
            let mut starts: Vec<(PointIndex, Vec<PointIndex>)> = result
                .destinations
                .iter()
                .map(|(&p, info)| (p, info.path.clone()))
                .collect();
            starts.sort_by_key(|(p, _)| *p);
            for (start, prefix) in starts {
                resolve_descriptor(
                    board, def, mover, start, movement, &mut scratch, &prefix, &mut bonus,
                );
            }
            for (point, info) in bonus {
                result.destinations.entry(point).or_insert(info);
            }
        }
    }

    result
}

/// Produce the effective descriptor after extension/substitution
/// modifiers. The declarative table itself is never mutated.
fn apply_modifiers(
    movement: &MovementDescriptor,
    modifiers: &[MovementModifier],
) -> MovementDescriptor {
    let mut effective = movement.clone();
    for modifier in modifiers {
        match modifier {
            MovementModifier::Substitute { from, replacement } => {
                if effective.movement_type == *from {
                    effective = replacement.clone();
                }
            }
            MovementModifier::Extend {
                movement_type,
                amount,
            } => {
                if movement_type.is_none() || *movement_type == Some(effective.movement_type) {
                    effective.distance = effective.distance.saturating_add(*amount);
                }
            }
            MovementModifier::Bonus { .. } => {}
        }
    }
    effective
}

#[allow(clippy::too_many_arguments)]
fn resolve_descriptor(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
    scratch: &mut MoveScratch,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    match movement.movement_type {
        MovementType::TravelShape => {
            resolve_travel(board, def, mover, origin, movement, prefix, out);
        }
        MovementType::Anywhere => {
            for point in board.playable_points() {
                if point != origin && can_move_onto_point(board, def, movement, mover, point) {
                    insert_destination(out, prefix, origin, point, movement);
                }
            }
        }
        MovementType::WithinFriendlyTileZone => {
            resolve_zone_teleport(board, def, mover, origin, movement, prefix, out);
        }
        MovementType::JumpAlongLineOfSight => {
            resolve_line_of_sight_jump(board, def, mover, origin, movement, prefix, out);
        }
        _ => {
            resolve_frontier(board, def, mover, origin, movement, scratch, prefix, out);
        }
    }
}

fn insert_destination(
    out: &mut FxHashMap<PointIndex, ReachInfo>,
    prefix: &[PointIndex],
    origin: PointIndex,
    destination: PointIndex,
    movement: &MovementDescriptor,
) {
    out.entry(destination).or_insert_with(|| {
        let mut path = prefix.to_vec();
        if path.is_empty() {
            path.push(origin);
        }
        path.push(destination);
        ReachInfo {
            path,
            charge_capture: movement.has_ability(MovementAbility::ChargeCapture),
        }
    });
}

fn joined_path(prefix: &[PointIndex], mut tail: Vec<PointIndex>) -> Vec<PointIndex> {
    if prefix.is_empty() {
        return tail;
    }
    // The prefix already ends at the tail's first point.
    let mut path = prefix.to_vec();
    tail.remove(0);
    path.extend(tail);
    path
}

/// Breadth-first expansion for the step-based movement types.
#[allow(clippy::too_many_arguments)]
fn resolve_frontier(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
    scratch: &mut MoveScratch,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    // The reference tile for flight movements; without one there is no
    // movement at all.
    let away_reference = match movement.movement_type {
        MovementType::AwayFromTargetTileOrthogonal | MovementType::AwayFromTargetTileDiagonal => {
            match nearest_matching_tile(board, mover, origin, movement) {
                Some(point) => Some(point),
                None => return,
            }
        }
        _ => None,
    };

    scratch.clear();
    scratch.record(origin, movement.distance, None);

    let charge = movement.has_ability(MovementAbility::ChargeCapture);
    let mut frontier: VecDeque<(PointIndex, u8)> = VecDeque::new();
    frontier.push_back((origin, movement.distance));

    while let Some((at, remaining)) = frontier.pop_front() {
        if remaining == 0 {
            continue;
        }
        let next_remaining = remaining - 1;
        for candidate in step_candidates(board, mover, movement, at, away_reference) {
            if candidate == origin {
                continue;
            }
            if !scratch.record(candidate, next_remaining, Some(at)) {
                continue;
            }
            if can_move_through_point(board, def, movement, mover, candidate) {
                frontier.push_back((candidate, next_remaining));
            }
            if can_move_onto_point(board, def, movement, mover, candidate) {
                out.entry(candidate).or_insert_with(|| ReachInfo {
                    path: joined_path(prefix, scratch.path_to(candidate)),
                    charge_capture: charge,
                });
            }
        }
    }
}

/// Candidate next points from one frontier point.
fn step_candidates(
    board: &Board,
    mover: &Tile,
    movement: &MovementDescriptor,
    at: PointIndex,
    away_reference: Option<PointIndex>,
) -> SmallVec<[PointIndex; 8]> {
    match movement.movement_type {
        MovementType::Standard => board.adjacent_points(at).into_iter().collect(),
        MovementType::Diagonal => board.diagonal_points(at).into_iter().collect(),
        MovementType::OrthogonalAndDiagonal => board.surrounding_points(at),
        MovementType::JumpShape => {
            let size = board.size();
            movement
                .jump_offsets
                .iter()
                .filter_map(|&(dr, dc)| {
                    board
                        .point(at)
                        .coord
                        .offset(dr, dc, size)
                        .and_then(|c| board.playable_index(c))
                })
                .collect()
        }
        MovementType::JumpSurroundingTiles | MovementType::JumpTargetTile => {
            let size = board.size();
            let mut candidates = SmallVec::new();
            for (dr, dc) in SURROUNDING_DELTAS {
                let Some(over_coord) = board.point(at).coord.offset(dr, dc, size) else {
                    continue;
                };
                let Some(over) = board.playable_index(over_coord) else {
                    continue;
                };
                let Some(jumped_id) = board.tile_at(over) else {
                    continue;
                };
                if movement.movement_type == MovementType::JumpTargetTile {
                    let matches = board
                        .tile(jumped_id)
                        .is_some_and(|t| movement.target_tiles.matches(mover.owner, t));
                    if !matches {
                        continue;
                    }
                }
                let Some(landing_coord) = over_coord.offset(dr, dc, size) else {
                    continue;
                };
                if let Some(landing) = board.playable_index(landing_coord) {
                    candidates.push(landing);
                }
            }
            candidates
        }
        MovementType::AwayFromTargetTileOrthogonal | MovementType::AwayFromTargetTileDiagonal => {
            let Some(reference) = away_reference else {
                return SmallVec::new();
            };
            let from_distance = board.manhattan_distance(at, reference);
            let neighbors = if movement.movement_type == MovementType::AwayFromTargetTileOrthogonal
            {
                board.adjacent_points(at)
            } else {
                board.diagonal_points(at)
            };
            neighbors
                .into_iter()
                .filter(|&n| board.manhattan_distance(n, reference) > from_distance)
                .collect()
        }
        // Handled outside the frontier loop.
        MovementType::TravelShape
        | MovementType::Anywhere
        | MovementType::WithinFriendlyTileZone
        | MovementType::JumpAlongLineOfSight => SmallVec::new(),
    }
}

/// The nearest tile matching the movement's target filter, by Manhattan
/// distance then tile id. The mover itself never counts.
fn nearest_matching_tile(
    board: &Board,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
) -> Option<PointIndex> {
    board
        .tiles_on_board()
        .into_iter()
        .filter(|&(id, _)| id != mover.id)
        .filter(|&(id, _)| {
            board
                .tile(id)
                .is_some_and(|t| movement.target_tiles.matches(mover.owner, t))
        })
        .min_by_key(|&(id, point)| (board.manhattan_distance(origin, point), id))
        .map(|(_, point)| point)
}

/// Depth-first resolution of a travel shape: one full path at a time,
/// since each step's legality depends on the heading so far.
fn resolve_travel(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    if movement.travel_pattern.is_empty() {
        return;
    }
    let mut path = vec![origin];
    for initial in Direction::ALL {
        walk_travel(board, def, mover, movement, origin, initial, 0, &mut path, prefix, out);
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_travel(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    movement: &MovementDescriptor,
    at: PointIndex,
    heading: Direction,
    step: usize,
    path: &mut Vec<PointIndex>,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    let headings: SmallVec<[Direction; 2]> = match movement.travel_pattern[step] {
        TravelStep::Straight => SmallVec::from_slice(&[heading]),
        TravelStep::Left => SmallVec::from_slice(&[heading.left()]),
        TravelStep::Right => SmallVec::from_slice(&[heading.right()]),
        TravelStep::Turn => SmallVec::from_slice(&[heading.left(), heading.right()]),
    };

    for next_heading in headings {
        let (dr, dc) = next_heading.delta();
        let Some(coord) = board.point(at).coord.offset(dr, dc, board.size()) else {
            continue;
        };
        let Some(next) = board.playable_index(coord) else {
            continue;
        };
        if path.contains(&next) {
            continue;
        }
        let last = step + 1 == movement.travel_pattern.len();
        if last {
            if can_move_onto_point(board, def, movement, mover, next) {
                let mut full = path.clone();
                full.push(next);
                out.entry(next).or_insert_with(|| ReachInfo {
                    path: joined_path(prefix, full),
                    charge_capture: movement.has_ability(MovementAbility::ChargeCapture),
                });
            }
        } else if can_move_through_point(board, def, movement, mover, next) {
            path.push(next);
            walk_travel(
                board,
                def,
                mover,
                movement,
                next,
                next_heading,
                step + 1,
                path,
                prefix,
                out,
            );
            path.pop();
        }
    }
}

/// Teleport anywhere inside a matching friendly tile's territorial zone.
fn resolve_zone_teleport(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    for (anchor_id, anchor_point) in board.tiles_on_board() {
        let Some(anchor) = board.tile(anchor_id) else {
            continue;
        };
        if anchor.owner != mover.owner {
            continue;
        }
        if !movement.target_tiles.matches(mover.owner, anchor) {
            continue;
        }
        for point in board.playable_points() {
            if point == origin || !board.zone_contains(def, anchor_point, point) {
                continue;
            }
            if can_move_onto_point(board, def, movement, mover, point) {
                insert_destination(out, prefix, origin, point, movement);
            }
        }
    }
}

/// Jump next to the nearest visible matching tile in each direction.
fn resolve_line_of_sight_jump(
    board: &Board,
    def: &GameDefinition,
    mover: &Tile,
    origin: PointIndex,
    movement: &MovementDescriptor,
    prefix: &[PointIndex],
    out: &mut FxHashMap<PointIndex, ReachInfo>,
) {
    for dir in Direction::ALL {
        let Some((tile_point, _)) = board.first_tile_in_direction(origin, dir) else {
            continue;
        };
        let matches = board
            .tile_at(tile_point)
            .and_then(|id| board.tile(id))
            .is_some_and(|t| movement.target_tiles.matches(mover.owner, t));
        if !matches {
            continue;
        }
        for landing in board.adjacent_points(tile_point) {
            if landing == origin {
                continue;
            }
            if can_move_onto_point(board, def, movement, mover, landing) {
                insert_destination(out, prefix, origin, landing, movement);
            }
        }
    }
}

/// Whether a movement may pass through a point: empty, or occupied but the
/// movement jumps over tiles or charge-captures the occupant.
#[must_use]
pub fn can_move_through_point(
    board: &Board,
    def: &GameDefinition,
    movement: &MovementDescriptor,
    mover: &Tile,
    idx: PointIndex,
) -> bool {
    match board.tile_at(idx) {
        None => true,
        Some(occupant) => {
            if movement.has_ability(MovementAbility::JumpOver) {
                return true;
            }
            movement.has_ability(MovementAbility::ChargeCapture)
                && is_capturable(board, def, movement, mover, occupant, idx)
        }
    }
}

/// Whether a movement may land on a point: empty, or occupied by a
/// capturable tile under the current banner/temple/protection rules, and
/// not blocked by a declared restriction.
#[must_use]
pub fn can_move_onto_point(
    board: &Board,
    def: &GameDefinition,
    movement: &MovementDescriptor,
    mover: &Tile,
    idx: PointIndex,
) -> bool {
    let point = board.point(idx);
    for restriction in &movement.restrictions {
        match restriction {
            MovementRestriction::RestrictedPointTypes(types) => {
                if types.iter().any(|&t| point.has_type(t)) {
                    return false;
                }
            }
            MovementRestriction::OpponentTileZone(code) => {
                let blocked = board.tiles_on_board().into_iter().any(|(id, anchor)| {
                    board.tile(id).is_some_and(|t| {
                        t.owner == mover.owner.opponent()
                            && t.code == *code
                            && board.zone_contains(def, anchor, idx)
                    })
                });
                if blocked {
                    return false;
                }
            }
        }
    }

    match board.tile_at(idx) {
        None => true,
        Some(occupant) if occupant == mover.id => false,
        Some(occupant) => is_capturable(board, def, movement, mover, occupant, idx),
    }
}

/// Capture legality for one occupant under this movement.
fn is_capturable(
    board: &Board,
    def: &GameDefinition,
    movement: &MovementDescriptor,
    mover: &Tile,
    occupant_id: crate::core::TileId,
    at: PointIndex,
) -> bool {
    let Some(target) = board.tile(occupant_id) else {
        return false;
    };
    if target.owner == mover.owner {
        return false;
    }
    if target.protected || target.being_captured {
        return false;
    }
    if movement.capture_types.is_empty() {
        return false;
    }

    let options = def.options();

    let overrides_temple = movement
        .capture_types
        .iter()
        .any(|ct| matches!(ct, CaptureType::TilesInsideTemple));
    if options.temple_rules && board.point(at).has_type(PointType::Temple) && !overrides_temple {
        return false;
    }

    let named = movement.capture_types.iter().any(|ct| match ct {
        CaptureType::All | CaptureType::TilesInsideTemple => true,
        CaptureType::Codes(codes) => codes.contains(&target.code),
    });
    if !named {
        return false;
    }

    if options.banner_capture_system {
        let flower_or_banner = def.get(target.code).is_some_and(|d| {
            d.has_attribute(TileAttribute::Flower) || d.has_attribute(TileAttribute::Banner)
        });
        if flower_or_banner {
            if !board.banner_deployed(def, mover.owner) {
                return false;
            }
        } else if !(board.banner_deployed(def, crate::core::Player::Host)
            && board.banner_deployed(def, crate::core::Player::Guest))
        {
            return false;
        }
    }

    true
}

/// Flag every legal destination `PossibleMove` and return the resolution.
pub fn reveal_possible_moves(
    board: &mut Board,
    def: &GameDefinition,
    mover_id: crate::core::TileId,
    modifiers: &[MovementModifier],
) -> ResolvedMovement {
    let resolved = resolve_moves(board, def, mover_id, modifiers);
    for point in resolved.points() {
        board.flag_point(point, PointType::PossibleMove);
    }
    resolved
}

/// Clear every `PossibleMove` flag, restoring the pre-reveal type sets.
pub fn hide_possible_moves(board: &mut Board) {
    board.clear_flag_everywhere(PointType::PossibleMove);
}
