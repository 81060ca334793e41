//! Ability activation - one arm per effect kind.
//!
//! Instant effects mutate the board once and report what they captured or
//! returned to piles. Ongoing effects do nothing here: their presence in
//! the manager's active set is the effect, realized as tile flags the
//! manager recomputes after every pass. Cancellation effects are resolved
//! by the manager itself, since they act on ability bookkeeping rather
//! than the board.

use rustc_hash::FxHashMap;

use crate::board::{Board, PointIndex, PointType};
use crate::core::{Coord, Diagnostic, DiagnosticKind, TileId};
use crate::tiles::GameDefinition;

use super::descriptor::{AbilityEffect, PromptKind};
use super::instance::Ability;
use super::prompt::{PromptAnswer, PromptOption, PromptRequest, PromptTargetData, SourceTileKey};

/// What one activation did.
#[derive(Clone, Debug, Default)]
pub struct ActivationOutcome {
    /// The board mutated; discovery must restart.
    pub board_changed: bool,
    /// Tiles this activation captured.
    pub captured: Vec<TileId>,
    /// Tiles this activation returned to piles.
    pub moved_to_piles: Vec<TileId>,
    /// A prompt this activation still needs.
    pub needs_prompt: Option<PromptRequest>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Activate one ability against the board.
pub fn activate(
    board: &mut Board,
    def: &GameDefinition,
    ability: &Ability,
    recorded_points: &mut FxHashMap<TileId, PointIndex>,
    prompt_data: &PromptTargetData,
) -> ActivationOutcome {
    let mut outcome = ActivationOutcome::default();

    match &ability.descriptor.effect {
        AbilityEffect::RecordTilePoint => {
            for &target in &ability.target_tiles {
                if let Some(point) = board.tile(target).and_then(|t| t.point()) {
                    recorded_points.insert(target, point);
                    board.flag_point(point, PointType::Marked);
                }
            }
        }

        AbilityEffect::MoveTileToRecordedPoint => {
            for &target in &ability.target_tiles {
                let Some(&destination) = recorded_points.get(&target) else {
                    outcome.diagnostics.push(Diagnostic::emit(
                        Some(ability.source),
                        DiagnosticKind::MissingRecordedPoint,
                        format!("no recorded point for {target}"),
                    ));
                    continue;
                };
                let moved = match board.tile(target).map(|t| t.location) {
                    Some(crate::tiles::TileLocation::Board(_)) => {
                        board.relocate(def, target, destination)
                    }
                    Some(crate::tiles::TileLocation::Captured) => {
                        board.restore_captured(def, target, destination)
                    }
                    _ => false,
                };
                if moved {
                    board.unflag_point(destination, PointType::Marked);
                    recorded_points.remove(&target);
                    outcome.board_changed = true;
                }
            }
        }

        AbilityEffect::MoveTargetTile { distance } => {
            move_target_tile(board, def, ability, *distance, prompt_data, &mut outcome);
        }

        AbilityEffect::CaptureTargetTiles => {
            for &target in &ability.target_tiles {
                let capturable = board
                    .tile(target)
                    .is_some_and(|t| t.is_on_board() && !t.protected && !t.being_captured);
                if capturable && board.capture_tile(target) {
                    outcome.captured.push(target);
                    outcome.board_changed = true;
                }
            }
        }

        AbilityEffect::MoveTargetTileToPile => {
            for &target in &ability.target_tiles {
                let on_board = board.tile(target).is_some_and(|t| t.is_on_board());
                if on_board && board.return_to_pile(target) {
                    outcome.moved_to_piles.push(target);
                    outcome.board_changed = true;
                }
            }
        }

        // Ongoing effects: realized as flags the manager recomputes from
        // its active set, and as movement modifiers read at resolve time.
        AbilityEffect::ProtectFromCapture
        | AbilityEffect::ImmobilizeTargetTiles
        | AbilityEffect::CancelAbilitiesTargetingTiles { .. }
        | AbilityEffect::ExtendMovement { .. }
        | AbilityEffect::ManipulateExistingMovement { .. }
        | AbilityEffect::GrantBonusMovement { .. } => {}

        // Resolved by the manager against its ability bookkeeping.
        AbilityEffect::CancelAbilities { .. } => {}
    }

    outcome
}

/// `MoveTargetTile`: relocate the first on-board target to a prompted
/// point within `distance`.
fn move_target_tile(
    board: &mut Board,
    def: &GameDefinition,
    ability: &Ability,
    distance: u8,
    prompt_data: &PromptTargetData,
    outcome: &mut ActivationOutcome,
) {
    let Some(&target) = ability
        .target_tiles
        .iter()
        .find(|&&id| board.tile(id).is_some_and(|t| t.is_on_board()))
    else {
        return;
    };
    let Some(origin) = board.tile(target).and_then(|t| t.point()) else {
        return;
    };

    let mut candidates: Vec<Coord> = board
        .playable_points()
        .filter(|&p| p != origin)
        .filter(|&p| board.manhattan_distance(origin, p) <= distance as u32)
        .filter(|&p| board.tile_at(p).is_none())
        .map(|p| board.point(p).coord)
        .collect();
    candidates.sort();
    if candidates.is_empty() {
        return;
    }

    let Some(requirement) = ability
        .descriptor
        .needed_prompts
        .iter()
        .find(|r| r.kind == PromptKind::MovePoint)
    else {
        outcome.diagnostics.push(Diagnostic::emit(
            Some(ability.source),
            DiagnosticKind::StalePromptAnswer,
            "MoveTargetTile without a declared MovePoint prompt",
        ));
        return;
    };
    let Some(key) = SourceTileKey::for_tile(board, ability.source) else {
        return;
    };

    let request = || PromptRequest {
        source: key.clone(),
        current_prompt_id: requirement.prompt_id.clone(),
        kind: requirement.kind,
        options: candidates.iter().map(|&c| PromptOption::Point(c)).collect(),
    };

    match prompt_data.answer_for(&key, &requirement.prompt_id) {
        Some(PromptAnswer::Point(coord)) if candidates.contains(&coord) => {
            if let Some(destination) = board.playable_index(coord) {
                if board.relocate(def, target, destination) {
                    outcome.board_changed = true;
                }
            }
        }
        Some(PromptAnswer::Decline) => {}
        Some(answer) => {
            outcome.diagnostics.push(Diagnostic::emit(
                Some(ability.source),
                DiagnosticKind::StalePromptAnswer,
                format!("answer {answer:?} matches no current candidate"),
            ));
            outcome.needs_prompt = Some(request());
        }
        None => {
            outcome.needs_prompt = Some(request());
        }
    }
}
