//! Target resolution - one arm per target type.
//!
//! An eligible ability resolves each declared target clause against the
//! board; the union of the clauses is its target set. An ability that
//! resolves zero targets is discarded by the manager.
//!
//! `ChosenCapturedTile` is the prompt-driven target: without a filed
//! answer the ability parks and resolution returns the outstanding
//! `PromptRequest` instead of targets.

use crate::board::{Board, PointIndex};
use crate::core::{Diagnostic, DiagnosticKind, TileId};
use crate::tiles::GameDefinition;

use super::descriptor::{PromptKind, TargetDescriptor, TargetType};
use super::instance::Ability;
use super::prompt::{PromptAnswer, PromptOption, PromptRequest, PromptTargetData, SourceTileKey};

/// Outcome of resolving an ability's target clauses.
#[derive(Clone, Debug)]
pub enum TargetResolution {
    /// Targets resolved; the ability may proceed to activation.
    Targets {
        tiles: Vec<TileId>,
        points: Vec<PointIndex>,
    },
    /// A prompt-driven clause is missing its answer.
    NeedsPrompt(PromptRequest),
    /// No clause produced a target.
    Empty,
}

/// Resolve every target clause of an ability.
pub fn resolve_targets(
    board: &Board,
    _def: &GameDefinition,
    ability: &Ability,
    prompt_data: &PromptTargetData,
    diagnostics: &mut Vec<Diagnostic>,
) -> TargetResolution {
    let Some(source) = board.tile(ability.source) else {
        return TargetResolution::Empty;
    };
    let perspective = source.owner;

    let mut tiles: Vec<TileId> = Vec::new();

    for clause in &ability.descriptor.target_types {
        match clause.target_type {
            TargetType::ThisTile => {
                if clause.filter.matches(perspective, source) {
                    tiles.push(ability.source);
                }
            }

            TargetType::TriggerTargetTiles => {
                for outcome in &ability.trigger_outcomes {
                    for &id in &outcome.triggering_tiles {
                        if board
                            .tile(id)
                            .is_some_and(|t| clause.filter.matches(perspective, t))
                        {
                            tiles.push(id);
                        }
                    }
                }
            }

            TargetType::SurroundingTiles | TargetType::AdjacentTiles => {
                let Some(point) = ability.source_point else {
                    continue;
                };
                let neighborhood = if clause.target_type == TargetType::SurroundingTiles {
                    board.surrounding_points(point)
                } else {
                    board.adjacent_points(point).into_iter().collect()
                };
                for neighbor in neighborhood {
                    if let Some(id) = board.tile_at(neighbor) {
                        if board
                            .tile(id)
                            .is_some_and(|t| clause.filter.matches(perspective, t))
                        {
                            tiles.push(id);
                        }
                    }
                }
            }

            TargetType::AllTiles => {
                for (id, _) in board.tiles_on_board() {
                    if board
                        .tile(id)
                        .is_some_and(|t| clause.filter.matches(perspective, t))
                    {
                        tiles.push(id);
                    }
                }
            }

            TargetType::ChosenCapturedTile => {
                match resolve_chosen_captured(board, ability, clause, prompt_data, diagnostics) {
                    ChosenOutcome::Chosen(id) => tiles.push(id),
                    ChosenOutcome::Declined | ChosenOutcome::NoCandidates => {}
                    ChosenOutcome::Outstanding(request) => {
                        return TargetResolution::NeedsPrompt(request);
                    }
                }
            }
        }
    }

    tiles.sort();
    tiles.dedup();

    if tiles.is_empty() {
        return TargetResolution::Empty;
    }

    let mut points: Vec<PointIndex> = tiles
        .iter()
        .filter_map(|&id| board.tile(id).and_then(|t| t.point()))
        .collect();
    points.sort();
    points.dedup();

    TargetResolution::Targets { tiles, points }
}

enum ChosenOutcome {
    Chosen(TileId),
    Declined,
    NoCandidates,
    Outstanding(PromptRequest),
}

fn resolve_chosen_captured(
    board: &Board,
    ability: &Ability,
    clause: &TargetDescriptor,
    prompt_data: &PromptTargetData,
    diagnostics: &mut Vec<Diagnostic>,
) -> ChosenOutcome {
    let Some(source) = board.tile(ability.source) else {
        return ChosenOutcome::NoCandidates;
    };
    let perspective = source.owner;

    let candidates: Vec<TileId> = board
        .captured_tiles()
        .into_iter()
        .filter(|&id| {
            board
                .tile(id)
                .is_some_and(|t| clause.filter.matches(perspective, t))
        })
        .collect();
    if candidates.is_empty() {
        return ChosenOutcome::NoCandidates;
    }

    let Some(requirement) = ability
        .descriptor
        .needed_prompts
        .iter()
        .find(|r| r.kind == PromptKind::CapturedTile)
    else {
        // A chosen-captured-tile clause with no declared prompt cannot be
        // answered; treat as no effect.
        diagnostics.push(Diagnostic::emit(
            Some(ability.source),
            DiagnosticKind::StalePromptAnswer,
            "ChosenCapturedTile target without a declared CapturedTile prompt",
        ));
        return ChosenOutcome::NoCandidates;
    };

    let Some(key) = SourceTileKey::for_tile(board, ability.source) else {
        return ChosenOutcome::NoCandidates;
    };

    match prompt_data.answer_for(&key, &requirement.prompt_id) {
        Some(PromptAnswer::Tile(id)) if candidates.contains(&id) => ChosenOutcome::Chosen(id),
        Some(PromptAnswer::Decline) => ChosenOutcome::Declined,
        Some(answer) => {
            diagnostics.push(Diagnostic::emit(
                Some(ability.source),
                DiagnosticKind::StalePromptAnswer,
                format!("answer {answer:?} matches no current candidate"),
            ));
            ChosenOutcome::Outstanding(PromptRequest {
                source: key,
                current_prompt_id: requirement.prompt_id.clone(),
                kind: requirement.kind,
                options: candidates.into_iter().map(PromptOption::Tile).collect(),
            })
        }
        None => ChosenOutcome::Outstanding(PromptRequest {
            source: key,
            current_prompt_id: requirement.prompt_id.clone(),
            kind: requirement.kind,
            options: candidates.into_iter().map(PromptOption::Tile).collect(),
        }),
    }
}
