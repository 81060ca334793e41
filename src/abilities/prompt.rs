//! The prompt-for-target protocol.
//!
//! An ability that needs a player choice does not complete the move:
//! processing pauses and the move result carries a `PromptRequest`
//! naming the asking tile, the prompt id, and the candidate options.
//! The caller re-submits the same move with the answer filed under the
//! source tile's stable key, and processing runs again - deterministic
//! replay up to the prompt, then past it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Coord, Player, TileCode, TileId};

use super::descriptor::PromptKind;

/// Composite identity of the tile asking a prompt, stable across replays
/// of the same move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceTileKey {
    pub owner: Player,
    pub tile_code: TileCode,
    /// The tile's point notation at discovery time, `"-"` off board.
    pub point_notation: String,
    pub tile_id: TileId,
}

impl SourceTileKey {
    /// Build the key for a tile as currently placed.
    #[must_use]
    pub fn for_tile(board: &Board, tile_id: TileId) -> Option<Self> {
        let tile = board.tile(tile_id)?;
        let point_notation = match tile.point() {
            Some(idx) => board.point(idx).coord.notation(),
            None => "-".to_string(),
        };
        Some(Self {
            owner: tile.owner,
            tile_code: tile.code,
            point_notation,
            tile_id,
        })
    }

    /// Serialize to the stable string used for map keying.
    #[must_use]
    pub fn key_string(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.owner.code(),
            self.tile_code.raw(),
            self.point_notation,
            self.tile_id.raw()
        )
    }
}

impl std::fmt::Display for SourceTileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_string())
    }
}

/// A player's answer to one prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptAnswer {
    /// A chosen tile (e.g. from the captured pile).
    Tile(TileId),
    /// A chosen board point.
    Point(Coord),
    /// Explicitly decline the optional choice.
    Decline,
}

/// One candidate the caller may answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptOption {
    Tile(TileId),
    Point(Coord),
}

/// The outstanding prompt returned instead of further activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Who is asking.
    pub source: SourceTileKey,
    /// Which declared prompt is outstanding.
    pub current_prompt_id: String,
    pub kind: PromptKind,
    /// Valid answers as of this pass.
    pub options: Vec<PromptOption>,
}

/// Answers supplied with a move call, keyed by source tile key string
/// then prompt id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptTargetData {
    answers: FxHashMap<String, FxHashMap<String, PromptAnswer>>,
}

impl PromptTargetData {
    /// No answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File an answer under a key string and prompt id.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        prompt_id: impl Into<String>,
        answer: PromptAnswer,
    ) {
        self.answers
            .entry(key.into())
            .or_default()
            .insert(prompt_id.into(), answer);
    }

    /// File an answer (builder pattern).
    #[must_use]
    pub fn with_answer(
        mut self,
        key: impl Into<String>,
        prompt_id: impl Into<String>,
        answer: PromptAnswer,
    ) -> Self {
        self.insert(key, prompt_id, answer);
        self
    }

    /// Look up the answer for a source tile's prompt.
    #[must_use]
    pub fn answer_for(&self, key: &SourceTileKey, prompt_id: &str) -> Option<PromptAnswer> {
        self.answers
            .get(&key.key_string())
            .and_then(|by_id| by_id.get(prompt_id))
            .copied()
    }

    /// True when no answers were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;
    use crate::rules::RuleOptions;
    use crate::tiles::{GameDefinition, TileDefinition};

    #[test]
    fn test_key_string_is_stable() {
        let key = SourceTileKey {
            owner: Player::Guest,
            tile_code: TileCode::new(3),
            point_notation: "8,4".to_string(),
            tile_id: TileId::new(17),
        };
        assert_eq!(key.key_string(), "G:3:8,4:17");
        assert_eq!(format!("{}", key), "G:3:8,4:17");
    }

    #[test]
    fn test_key_for_seated_tile() {
        let code = TileCode::new(1);
        let mut def = GameDefinition::new(RuleOptions::default());
        def.register(TileDefinition::new(code, "Test"));

        let mut board = Board::new(&BoardLayout::diamond(9));
        let tile = board.create_tile(code, Player::Host);
        let idx = board.playable_index(Coord::new(4, 4)).unwrap();
        assert!(board.place_from_pile(&def, tile, idx));

        let key = SourceTileKey::for_tile(&board, tile).unwrap();
        assert_eq!(key.point_notation, "4,4");
        assert_eq!(key.owner, Player::Host);
    }

    #[test]
    fn test_answers_roundtrip() {
        let key = SourceTileKey {
            owner: Player::Host,
            tile_code: TileCode::new(2),
            point_notation: "1,2".to_string(),
            tile_id: TileId::new(5),
        };

        let data = PromptTargetData::new().with_answer(
            key.key_string(),
            "chooseCapturedTile",
            PromptAnswer::Tile(TileId::new(9)),
        );

        assert_eq!(
            data.answer_for(&key, "chooseCapturedTile"),
            Some(PromptAnswer::Tile(TileId::new(9)))
        );
        assert_eq!(data.answer_for(&key, "otherPrompt"), None);
    }

    #[test]
    fn test_missing_key_is_none() {
        let data = PromptTargetData::new();
        let key = SourceTileKey {
            owner: Player::Host,
            tile_code: TileCode::new(2),
            point_notation: "-".to_string(),
            tile_id: TileId::new(5),
        };
        assert!(data.is_empty());
        assert_eq!(data.answer_for(&key, "x"), None);
    }
}
