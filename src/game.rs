//! Game orchestration: the public move/deploy surface.
//!
//! Control flow per call: legality (against the freshly resolved
//! possible-move set) -> lift -> capture resolution (destination and, for
//! charge captures, the whole path) -> seat -> ability processing to a
//! fixpoint -> `MoveResult`.
//!
//! One call runs to completion (or to the first outstanding prompt)
//! before returning; the caller serializes calls and owns turn order. The
//! core reports captures and never decides who won.

use crate::abilities::{AbilityManager, MoveContext, MoveKind, PromptTargetData};
use crate::board::{Board, BoardLayout, PointIndex, PointType};
use crate::core::{Coord, Player, TileCode, TileId};
use crate::movement::{self, ResolvedMovement};
use crate::rules::{MoveOutcome, MoveRequest, MoveResult, NoEffectReason};
use crate::tiles::{DeployType, GameDefinition, SetupError};

/// A move that paused on an outstanding prompt: its mutations are
/// committed, and a matching re-submission resumes ability processing
/// instead of moving again.
#[derive(Clone, Debug)]
struct PendingMove {
    player: Player,
    tile_code: TileCode,
    start: Option<Coord>,
    end: Coord,
    context: MoveContext,
    movement_captures: Vec<TileId>,
    /// Records already committed by earlier passes of this move.
    prior_records: crate::rules::TileRecords,
}

impl PendingMove {
    fn matches(&self, request: &MoveRequest) -> bool {
        self.player == request.player
            && self.tile_code == request.tile_code
            && self.start == request.start
            && self.end == request.end
    }
}

/// One game session: board, declarative definition, ability state.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    definition: GameDefinition,
    abilities: AbilityManager,
    pending: Option<PendingMove>,
}

impl Game {
    /// Build a session: validates the definition and fills both piles.
    pub fn new(layout: &BoardLayout, definition: GameDefinition) -> Result<Self, SetupError> {
        definition.validate()?;
        let mut board = Board::new(layout);
        for tile_def in definition.definitions() {
            for player in Player::both() {
                for _ in 0..tile_def.count {
                    board.create_tile(tile_def.code, player);
                }
            }
        }
        Ok(Self {
            board,
            definition,
            abilities: AbilityManager::new(),
            pending: None,
        })
    }

    /// Read access to the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The declarative definition this session interprets.
    #[must_use]
    pub fn definition(&self) -> &GameDefinition {
        &self.definition
    }

    /// The ability manager (active abilities, recorded points).
    #[must_use]
    pub fn abilities(&self) -> &AbilityManager {
        &self.abilities
    }

    /// Dispatch one request: deploy when `start` is absent, move
    /// otherwise.
    ///
    /// A request matching a move that paused on a prompt *resumes* it:
    /// the committed mutations stay and ability processing continues with
    /// the supplied answers.
    pub fn submit(&mut self, request: MoveRequest) -> MoveResult {
        if self.pending.as_ref().is_some_and(|p| p.matches(&request)) {
            return self.resume(&request.prompt_data);
        }
        self.pending = None;
        match request.start {
            None => self.deploy(
                request.player,
                request.tile_code,
                request.end,
                &request.prompt_data,
            ),
            Some(start) => self.move_tile(
                request.player,
                request.tile_code,
                start,
                request.end,
                &request.prompt_data,
            ),
        }
    }

    /// Continue ability processing of the paused move.
    fn resume(&mut self, prompt_data: &PromptTargetData) -> MoveResult {
        let Some(mut pending) = self.pending.take() else {
            return MoveResult::no_effect(NoEffectReason::StartPointMismatch);
        };
        let mut flags = self.abilities.process_abilities(
            &mut self.board,
            &self.definition,
            &mut pending.context,
            prompt_data,
        );

        // Fold this continuation's records onto what the earlier passes
        // already committed.
        let mut records = pending.prior_records.clone();
        records
            .captured_tiles
            .extend(flags.tile_records.captured_tiles.iter().copied());
        records
            .tiles_moved_to_piles
            .extend(flags.tile_records.tiles_moved_to_piles.iter().copied());
        flags.tile_records = records;
        pending.prior_records = flags.tile_records.clone();

        let result = MoveResult {
            outcome: MoveOutcome::Completed,
            moved_tile: Some(pending.context.tile),
            start: pending.start,
            end: Some(pending.end),
            captured_tiles: pending.movement_captures.clone(),
            flags,
        };
        if result.flags.needed_prompt.is_some() {
            self.pending = Some(pending);
        }
        result
    }

    // === Deploy ===

    /// Every point where `player` may currently deploy a tile of `code`.
    #[must_use]
    pub fn legal_deploy_points(&self, player: Player, code: TileCode) -> Vec<Coord> {
        let Some(tile_def) = self.definition.get(code) else {
            return Vec::new();
        };
        self.board
            .playable_points()
            .filter(|&idx| self.deploy_point_allowed(player, &tile_def.deploy_types, idx))
            .filter(|&idx| {
                self.board
                    .footprint(&self.definition, code, idx)
                    .is_some_and(|cells| self.board.footprint_free(&cells, None))
            })
            .map(|idx| self.board.point(idx).coord)
            .collect()
    }

    fn deploy_point_allowed(
        &self,
        player: Player,
        deploy_types: &[DeployType],
        idx: PointIndex,
    ) -> bool {
        deploy_types.iter().any(|deploy| match deploy {
            DeployType::Anywhere => true,
            DeployType::TemplesOnly => self.board.point(idx).has_type(PointType::Temple),
            DeployType::AdjacentToTemple => self
                .board
                .adjacent_points(idx)
                .iter()
                .any(|&n| self.board.point(n).has_type(PointType::Temple)),
            DeployType::WithinTileZone(code) => {
                self.board.tiles_on_board().into_iter().any(|(id, anchor)| {
                    self.board
                        .tile(id)
                        .is_some_and(|t| t.owner == player && t.code == *code)
                        && self.board.zone_contains(&self.definition, anchor, idx)
                })
            }
        })
    }

    /// Deploy a pile tile of `code` to `end`.
    pub fn deploy(
        &mut self,
        player: Player,
        code: TileCode,
        end: Coord,
        prompt_data: &PromptTargetData,
    ) -> MoveResult {
        if self.definition.get(code).is_none() {
            return MoveResult::no_effect(NoEffectReason::UnknownTileCode);
        }
        let Some(end_idx) = self.board.playable_index(end) else {
            return MoveResult::no_effect(NoEffectReason::PointNotPlayable);
        };
        let Some(tile) = self.board.pile_tile(player, code) else {
            return MoveResult::no_effect(NoEffectReason::TileNotAvailable);
        };
        let deploy_types = self
            .definition
            .get(code)
            .map(|d| d.deploy_types.clone())
            .unwrap_or_default();
        if !self.deploy_point_allowed(player, &deploy_types, end_idx) {
            return MoveResult::no_effect(NoEffectReason::IllegalDestination);
        }
        if !self.board.place_from_pile(&self.definition, tile, end_idx) {
            return MoveResult::no_effect(NoEffectReason::IllegalDestination);
        }

        let mut context = MoveContext {
            kind: MoveKind::Deploy,
            player,
            tile,
            start: None,
            end: end_idx,
            path: Vec::new(),
            captured_tiles: Vec::new(),
        };
        let flags =
            self.abilities
                .process_abilities(&mut self.board, &self.definition, &mut context, prompt_data);

        if flags.needed_prompt.is_some() {
            self.pending = Some(PendingMove {
                player,
                tile_code: code,
                start: None,
                end,
                context,
                movement_captures: Vec::new(),
                prior_records: flags.tile_records.clone(),
            });
        }

        MoveResult {
            outcome: MoveOutcome::Completed,
            moved_tile: Some(tile),
            start: None,
            end: Some(end),
            captured_tiles: Vec::new(),
            flags,
        }
    }

    // === Move ===

    /// The resolved movement of the tile seated at `start`, with active
    /// movement modifiers applied.
    #[must_use]
    pub fn resolved_moves_at(&self, start: Coord) -> ResolvedMovement {
        let Some(start_idx) = self.board.playable_index(start) else {
            return ResolvedMovement::default();
        };
        let Some(tile) = self.board.tile_at(start_idx) else {
            return ResolvedMovement::default();
        };
        let modifiers = self.abilities.movement_modifiers_for(tile);
        movement::resolve_moves(&self.board, &self.definition, tile, &modifiers)
    }

    /// Flag the tile's possible moves on the board and return them.
    pub fn reveal_possible_moves(&mut self, start: Coord) -> Vec<Coord> {
        let resolved = self.resolved_moves_at(start);
        let mut out = Vec::new();
        for point in resolved.points() {
            self.board.flag_point(point, PointType::PossibleMove);
            out.push(self.board.point(point).coord);
        }
        out
    }

    /// Clear every possible-move flag.
    pub fn hide_possible_moves(&mut self) {
        movement::hide_possible_moves(&mut self.board);
    }

    /// Move the tile of `code` seated at `start` to `end`.
    pub fn move_tile(
        &mut self,
        player: Player,
        code: TileCode,
        start: Coord,
        end: Coord,
        prompt_data: &PromptTargetData,
    ) -> MoveResult {
        let (Some(start_idx), Some(end_idx)) = (
            self.board.playable_index(start),
            self.board.playable_index(end),
        ) else {
            return MoveResult::no_effect(NoEffectReason::PointNotPlayable);
        };
        let Some(tile) = self.board.tile_at(start_idx) else {
            return MoveResult::no_effect(NoEffectReason::StartPointMismatch);
        };
        let matches = self
            .board
            .tile(tile)
            .is_some_and(|t| t.owner == player && t.code == code);
        if !matches {
            return MoveResult::no_effect(NoEffectReason::StartPointMismatch);
        }

        let modifiers = self.abilities.movement_modifiers_for(tile);
        let resolved = movement::resolve_moves(&self.board, &self.definition, tile, &modifiers);
        let Some(reach) = resolved.get(end_idx).cloned() else {
            return MoveResult::no_effect(NoEffectReason::IllegalDestination);
        };

        // Capture resolution: the destination occupant, plus - for charge
        // captures - every tile along the computed path.
        let mut captured: Vec<TileId> = Vec::new();
        if reach.charge_capture {
            for &point in &reach.path[1..] {
                if let Some(occupant) = self.board.tile_at(point) {
                    if occupant != tile && self.board.capture_tile(occupant) {
                        captured.push(occupant);
                    }
                }
            }
        } else if let Some(occupant) = self.board.tile_at(end_idx) {
            if occupant != tile && self.board.capture_tile(occupant) {
                captured.push(occupant);
            }
        }

        if !self.board.relocate(&self.definition, tile, end_idx) {
            // The destination was legal a moment ago; a blocked footprint
            // here means a gigantic overlap the resolver cannot express.
            return MoveResult::no_effect(NoEffectReason::IllegalDestination);
        }

        let mut context = MoveContext {
            kind: MoveKind::Move,
            player,
            tile,
            start: Some(start_idx),
            end: end_idx,
            path: reach.path.clone(),
            captured_tiles: captured.clone(),
        };
        let mut flags =
            self.abilities
                .process_abilities(&mut self.board, &self.definition, &mut context, prompt_data);

        // The records tally covers the whole move: movement captures
        // first, then everything the ability passes added.
        let mut all_captured = captured.clone();
        all_captured.extend(flags.tile_records.captured_tiles.iter().copied());
        flags.tile_records.captured_tiles = all_captured;

        if flags.needed_prompt.is_some() {
            self.pending = Some(PendingMove {
                player,
                tile_code: code,
                start: Some(start),
                end,
                context,
                movement_captures: captured.clone(),
                prior_records: flags.tile_records.clone(),
            });
        }

        MoveResult {
            outcome: MoveOutcome::Completed,
            moved_tile: Some(tile),
            start: Some(start),
            end: Some(end),
            captured_tiles: captured,
            flags,
        }
    }
}
