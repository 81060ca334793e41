//! The move surface: rule options, requests, and results.
//!
//! A move or deploy call takes a `MoveRequest` and returns a `MoveResult`.
//! Illegal requests are not errors: the result reports `NoEffect` with a
//! reason and the board is untouched, since legality was already published
//! to the caller through the possible-move set.

use serde::{Deserialize, Serialize};

use crate::abilities::{PromptRequest, PromptTargetData};
use crate::core::{Coord, Diagnostic, Player, TileCode, TileId};

/// Game-wide rule switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOptions {
    /// Gate captures behind banner deployment: flower/banner targets need
    /// the capturing player's banner deployed, anything else needs both.
    pub banner_capture_system: bool,
    /// Temple points protect their occupants from capture unless a
    /// capture type explicitly overrides.
    pub temple_rules: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            banner_capture_system: true,
            temple_rules: true,
        }
    }
}

/// The input tuple of one move or deploy call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub player: Player,
    pub tile_code: TileCode,
    /// `None` deploys from the pile; `Some` moves a seated tile.
    pub start: Option<Coord>,
    pub end: Coord,
    pub prompt_data: PromptTargetData,
}

impl MoveRequest {
    /// A deploy request.
    #[must_use]
    pub fn deploy(player: Player, tile_code: TileCode, end: Coord) -> Self {
        Self {
            player,
            tile_code,
            start: None,
            end,
            prompt_data: PromptTargetData::new(),
        }
    }

    /// A move request.
    #[must_use]
    pub fn move_tile(player: Player, tile_code: TileCode, start: Coord, end: Coord) -> Self {
        Self {
            player,
            tile_code,
            start: Some(start),
            end,
            prompt_data: PromptTargetData::new(),
        }
    }

    /// Attach prompt answers (builder pattern).
    #[must_use]
    pub fn with_prompt_data(mut self, prompt_data: PromptTargetData) -> Self {
        self.prompt_data = prompt_data;
        self
    }
}

/// Why a request had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoEffectReason {
    /// The requested destination is not in the current possible-move set.
    IllegalDestination,
    /// No matching tile in the pile (deploy) or at the start point (move).
    TileNotAvailable,
    /// The start point does not hold a matching tile of the player's.
    StartPointMismatch,
    /// A named coordinate is off the playable board.
    PointNotPlayable,
    /// The requested tile code is not in the game definition.
    UnknownTileCode,
}

/// Whether the request changed anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Completed,
    NoEffect(NoEffectReason),
}

/// Tiles removed from the board over one full move, through fixpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecords {
    /// Everything captured: by the movement itself and by abilities.
    pub captured_tiles: Vec<TileId>,
    /// Everything abilities returned to piles.
    pub tiles_moved_to_piles: Vec<TileId>,
}

/// What ability processing did.
#[derive(Clone, Debug, Default)]
pub struct ActivationFlags {
    pub abilities_activated: bool,
    pub board_has_changed: bool,
    pub tile_records: TileRecords,
    /// The single outstanding prompt, if processing paused on one.
    pub needed_prompt: Option<PromptRequest>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The output of one move or deploy call.
#[derive(Clone, Debug, Default)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub moved_tile: Option<TileId>,
    pub start: Option<Coord>,
    pub end: Option<Coord>,
    /// Tiles the movement itself captured (destination and charge path).
    pub captured_tiles: Vec<TileId>,
    pub flags: ActivationFlags,
}

impl Default for MoveOutcome {
    fn default() -> Self {
        MoveOutcome::Completed
    }
}

impl MoveResult {
    /// A no-op result for an illegal request.
    #[must_use]
    pub fn no_effect(reason: NoEffectReason) -> Self {
        Self {
            outcome: MoveOutcome::NoEffect(reason),
            ..Self::default()
        }
    }

    /// True when the move completed (possibly awaiting a prompt).
    #[must_use]
    pub fn completed(&self) -> bool {
        self.outcome == MoveOutcome::Completed
    }

    /// The outstanding prompt, if any.
    #[must_use]
    pub fn needed_prompt(&self) -> Option<&PromptRequest> {
        self.flags.needed_prompt.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_options_default_on() {
        let options = RuleOptions::default();
        assert!(options.banner_capture_system);
        assert!(options.temple_rules);
    }

    #[test]
    fn test_request_builders() {
        let deploy = MoveRequest::deploy(Player::Host, TileCode::new(1), Coord::new(0, 8));
        assert!(deploy.start.is_none());

        let mv = MoveRequest::move_tile(
            Player::Guest,
            TileCode::new(2),
            Coord::new(8, 8),
            Coord::new(8, 10),
        );
        assert_eq!(mv.start, Some(Coord::new(8, 8)));
        assert_eq!(mv.end, Coord::new(8, 10));
    }

    #[test]
    fn test_no_effect_result() {
        let result = MoveResult::no_effect(NoEffectReason::IllegalDestination);
        assert!(!result.completed());
        assert!(result.captured_tiles.is_empty());
        assert!(result.needed_prompt().is_none());
    }
}
