//! Trigger evaluation - one arm per trigger type.
//!
//! A trigger clause is evaluated against the concrete action of the
//! current move (`MoveContext`) and the live board. The match is
//! exhaustive: adding a `TriggerType` without an arm here is a compile
//! error. A clause either fails (`None`) or yields the concrete tiles
//! and points that satisfied it - those feed the `TriggerTargetTiles`
//! target type and the simultaneity rule.

use serde::{Deserialize, Serialize};

use crate::board::{Board, PointIndex, PointType};
use crate::core::{Player, TileId};
use crate::tiles::GameDefinition;

use super::descriptor::{TriggerDescriptor, TriggerType};
use super::instance::TriggerOutcome;

/// What kind of action the current move is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Deploy,
    Move,
}

/// The concrete action ability processing is reacting to.
///
/// `captured_tiles` grows as fixpoint passes capture more tiles; each
/// pass re-evaluates triggers against the updated list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveContext {
    pub kind: MoveKind,
    pub player: Player,
    /// The tile that deployed or moved.
    pub tile: TileId,
    pub start: Option<PointIndex>,
    pub end: PointIndex,
    /// The concrete path taken, origin first (empty for deploys).
    pub path: Vec<PointIndex>,
    /// Every tile captured so far this move, in capture order.
    pub captured_tiles: Vec<TileId>,
}

/// Evaluate one trigger clause for `source`.
///
/// Returns `None` when the clause does not hold.
#[must_use]
pub fn evaluate_trigger(
    board: &Board,
    def: &GameDefinition,
    context: &MoveContext,
    source: TileId,
    clause: &TriggerDescriptor,
) -> Option<TriggerOutcome> {
    let source_tile = board.tile(source)?;
    let perspective = source_tile.owner;
    let source_point = source_tile.point();

    match clause.trigger_type {
        TriggerType::WhenDeployed => {
            if context.kind == MoveKind::Deploy && context.tile == source {
                Some(TriggerOutcome::new(
                    clause.trigger_type,
                    vec![source],
                    vec![context.end],
                ))
            } else {
                None
            }
        }

        TriggerType::WhenLandsSurroundingTargetTile => {
            if context.tile != source {
                return None;
            }
            let end = source_point?;
            let matches =
                matching_tiles_at(board, perspective, clause, board.surrounding_points(end));
            outcome_if_any(clause.trigger_type, matches)
        }

        TriggerType::WhenLandsAdjacentToTargetTile => {
            if context.tile != source {
                return None;
            }
            let end = source_point?;
            let matches =
                matching_tiles_at(board, perspective, clause, board.adjacent_points(end));
            outcome_if_any(clause.trigger_type, matches)
        }

        TriggerType::WhenCapturingTargetTile => {
            if context.tile != source {
                return None;
            }
            let captured: Vec<TileId> = context
                .captured_tiles
                .iter()
                .copied()
                .filter(|&id| {
                    board
                        .tile(id)
                        .is_some_and(|t| clause.target_tiles.matches(perspective, t))
                })
                .collect();
            if captured.is_empty() {
                None
            } else {
                Some(TriggerOutcome::new(
                    clause.trigger_type,
                    captured,
                    vec![context.end],
                ))
            }
        }

        TriggerType::WhenCapturedByTargetTile => {
            if !context.captured_tiles.contains(&source) {
                return None;
            }
            let capturer_matches = board
                .tile(context.tile)
                .is_some_and(|t| clause.target_tiles.matches(perspective, t));
            if capturer_matches {
                Some(TriggerOutcome::new(
                    clause.trigger_type,
                    vec![context.tile],
                    vec![context.end],
                ))
            } else {
                None
            }
        }

        TriggerType::WhileInsideTemple => {
            let point = source_point?;
            if board.point(point).has_type(PointType::Temple) {
                Some(TriggerOutcome::new(
                    clause.trigger_type,
                    vec![source],
                    vec![point],
                ))
            } else {
                None
            }
        }

        TriggerType::WhileOutsideTemple => {
            let point = source_point?;
            if board.point(point).has_type(PointType::Temple) {
                None
            } else {
                Some(TriggerOutcome::new(
                    clause.trigger_type,
                    vec![source],
                    vec![point],
                ))
            }
        }

        TriggerType::WhileTargetTileIsOnBoard => {
            let matches: Vec<TileId> = board
                .tiles_on_board()
                .into_iter()
                .filter(|&(id, _)| id != source)
                .filter(|&(id, _)| {
                    board
                        .tile(id)
                        .is_some_and(|t| clause.target_tiles.matches(perspective, t))
                })
                .map(|(id, _)| id)
                .collect();
            outcome_if_any(clause.trigger_type, matches)
        }

        TriggerType::WhileInsideTargetTileZone => {
            let inside = source_point?;
            let owners: Vec<TileId> = board
                .tiles_on_board()
                .into_iter()
                .filter(|&(id, _)| id != source)
                .filter(|&(id, anchor)| {
                    board
                        .tile(id)
                        .is_some_and(|t| clause.target_tiles.matches(perspective, t))
                        && board.zone_contains(def, anchor, inside)
                })
                .map(|(id, _)| id)
                .collect();
            outcome_if_any(clause.trigger_type, owners)
        }

        TriggerType::WhileSurroundingTargetTile => {
            let point = source_point?;
            let matches =
                matching_tiles_at(board, perspective, clause, board.surrounding_points(point));
            outcome_if_any(clause.trigger_type, matches)
        }
    }
}

fn matching_tiles_at(
    board: &Board,
    perspective: Player,
    clause: &TriggerDescriptor,
    points: impl IntoIterator<Item = PointIndex>,
) -> Vec<TileId> {
    let mut out: Vec<TileId> = points
        .into_iter()
        .filter_map(|p| board.tile_at(p))
        .filter(|&id| {
            board
                .tile(id)
                .is_some_and(|t| clause.target_tiles.matches(perspective, t))
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

fn outcome_if_any(trigger_type: TriggerType, tiles: Vec<TileId>) -> Option<TriggerOutcome> {
    if tiles.is_empty() {
        None
    } else {
        Some(TriggerOutcome::new(trigger_type, tiles, vec![]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;
    use crate::core::{Coord, TileCode};
    use crate::rules::RuleOptions;
    use crate::tiles::{TileDefinition, TileFilter};

    const A: TileCode = TileCode::new(1);
    const B: TileCode = TileCode::new(2);

    fn setup() -> (Board, GameDefinition) {
        let mut def = GameDefinition::new(RuleOptions::default());
        def.register(TileDefinition::new(A, "A"));
        def.register(TileDefinition::new(B, "B"));
        let board = Board::new(&BoardLayout::diamond(17));
        (board, def)
    }

    fn seat(board: &mut Board, def: &GameDefinition, code: TileCode, owner: Player, at: Coord) -> TileId {
        let tile = board.create_tile(code, owner);
        let idx = board.playable_index(at).unwrap();
        assert!(board.place_from_pile(def, tile, idx));
        tile
    }

    fn deploy_context(board: &Board, tile: TileId, at: Coord) -> MoveContext {
        MoveContext {
            kind: MoveKind::Deploy,
            player: Player::Host,
            tile,
            start: None,
            end: board.playable_index(at).unwrap(),
            path: Vec::new(),
            captured_tiles: Vec::new(),
        }
    }

    #[test]
    fn test_when_deployed() {
        let (mut board, def) = setup();
        let tile = seat(&mut board, &def, A, Player::Host, Coord::new(8, 8));
        let context = deploy_context(&board, tile, Coord::new(8, 8));

        let clause = TriggerDescriptor::new(TriggerType::WhenDeployed);
        let outcome = evaluate_trigger(&board, &def, &context, tile, &clause).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![tile]);

        // Another tile's deployment does not fire this tile's trigger.
        let other = seat(&mut board, &def, B, Player::Host, Coord::new(8, 9));
        assert!(evaluate_trigger(&board, &def, &context, other, &clause).is_none());
    }

    #[test]
    fn test_lands_adjacent_and_surrounding() {
        let (mut board, def) = setup();
        let mover = seat(&mut board, &def, A, Player::Host, Coord::new(8, 8));
        let diagonal_enemy = seat(&mut board, &def, B, Player::Guest, Coord::new(7, 7));
        let context = deploy_context(&board, mover, Coord::new(8, 8));

        let surrounding = TriggerDescriptor::targeting(
            TriggerType::WhenLandsSurroundingTargetTile,
            TileFilter::enemy(),
        );
        let outcome = evaluate_trigger(&board, &def, &context, mover, &surrounding).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![diagonal_enemy]);

        // Diagonal neighbor is not orthogonally adjacent.
        let adjacent = TriggerDescriptor::targeting(
            TriggerType::WhenLandsAdjacentToTargetTile,
            TileFilter::enemy(),
        );
        assert!(evaluate_trigger(&board, &def, &context, mover, &adjacent).is_none());
    }

    #[test]
    fn test_capture_triggers() {
        let (mut board, def) = setup();
        let capturer = seat(&mut board, &def, A, Player::Host, Coord::new(8, 8));
        let victim = seat(&mut board, &def, B, Player::Guest, Coord::new(8, 9));
        board.capture_tile(victim);

        let mut context = deploy_context(&board, capturer, Coord::new(8, 8));
        context.kind = MoveKind::Move;
        context.captured_tiles = vec![victim];

        let capturing = TriggerDescriptor::targeting(
            TriggerType::WhenCapturingTargetTile,
            TileFilter::enemy(),
        );
        let outcome = evaluate_trigger(&board, &def, &context, capturer, &capturing).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![victim]);

        // The victim's own "when captured by" trigger sees the capturer.
        let captured_by = TriggerDescriptor::targeting(
            TriggerType::WhenCapturedByTargetTile,
            TileFilter::enemy(),
        );
        let outcome = evaluate_trigger(&board, &def, &context, victim, &captured_by).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![capturer]);
    }

    #[test]
    fn test_temple_triggers() {
        let (mut board, def) = setup();
        let temple_at = Coord::new(0, 8);
        let idx = board.playable_index(temple_at).unwrap();
        board.flag_point(idx, PointType::Temple);

        let inside = seat(&mut board, &def, A, Player::Host, temple_at);
        let outside = seat(&mut board, &def, B, Player::Host, Coord::new(8, 8));
        let context = deploy_context(&board, inside, temple_at);

        let in_clause = TriggerDescriptor::new(TriggerType::WhileInsideTemple);
        let out_clause = TriggerDescriptor::new(TriggerType::WhileOutsideTemple);

        assert!(evaluate_trigger(&board, &def, &context, inside, &in_clause).is_some());
        assert!(evaluate_trigger(&board, &def, &context, inside, &out_clause).is_none());
        assert!(evaluate_trigger(&board, &def, &context, outside, &in_clause).is_none());
        assert!(evaluate_trigger(&board, &def, &context, outside, &out_clause).is_some());
    }

    #[test]
    fn test_target_on_board() {
        let (mut board, def) = setup();
        let watcher = seat(&mut board, &def, A, Player::Host, Coord::new(8, 8));
        let context = deploy_context(&board, watcher, Coord::new(8, 8));

        let clause = TriggerDescriptor::targeting(
            TriggerType::WhileTargetTileIsOnBoard,
            TileFilter::enemy().with_code(B),
        );
        assert!(evaluate_trigger(&board, &def, &context, watcher, &clause).is_none());

        let enemy = seat(&mut board, &def, B, Player::Guest, Coord::new(2, 8));
        let outcome = evaluate_trigger(&board, &def, &context, watcher, &clause).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![enemy]);
    }

    #[test]
    fn test_inside_zone_trigger() {
        let (mut board, mut def) = setup();
        let zone_code = TileCode::new(3);
        def.register(
            TileDefinition::new(zone_code, "Anchor")
                .with_zone(crate::tiles::TerritorialZone::sized(4)),
        );

        let anchor = seat(&mut board, &def, zone_code, Player::Guest, Coord::new(8, 8));
        let visitor = seat(&mut board, &def, A, Player::Host, Coord::new(8, 10));
        let context = deploy_context(&board, visitor, Coord::new(8, 10));

        let clause = TriggerDescriptor::targeting(
            TriggerType::WhileInsideTargetTileZone,
            TileFilter::enemy(),
        );
        let outcome = evaluate_trigger(&board, &def, &context, visitor, &clause).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![anchor]);

        // Suppressing the zone kills the trigger.
        board.tile_mut(anchor).unwrap().zone_suppressed = true;
        assert!(evaluate_trigger(&board, &def, &context, visitor, &clause).is_none());
    }

    #[test]
    fn test_surrounding_trigger_is_stateful_not_move_bound() {
        let (mut board, def) = setup();
        let guard = seat(&mut board, &def, A, Player::Host, Coord::new(8, 8));
        let friend = seat(&mut board, &def, B, Player::Host, Coord::new(7, 8));

        // Even when a different tile moved, the While trigger holds.
        let context = deploy_context(&board, friend, Coord::new(7, 8));
        let clause = TriggerDescriptor::targeting(
            TriggerType::WhileSurroundingTargetTile,
            TileFilter::friendly().with_code(B),
        );
        let outcome = evaluate_trigger(&board, &def, &context, guard, &clause).unwrap();
        assert_eq!(outcome.triggering_tiles, vec![friend]);
    }
}
