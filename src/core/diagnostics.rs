//! Structured soft-failure diagnostics.
//!
//! Nothing in the play path raises an error: a misconfigured descriptor, a
//! stale prompt answer, or a runaway reprocessing loop all degrade into
//! "no effect". Diagnostics record *why* nothing happened so callers and
//! tests can tell a malformed configuration apart from a condition that
//! was simply false.

use serde::{Deserialize, Serialize};

use super::ids::TileId;

/// Why a soft failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A descriptor references a tile code absent from the game definition.
    UnknownTileCode,
    /// `MoveTileToRecordedPoint` ran without a recorded point for its target.
    MissingRecordedPoint,
    /// A prompt answer no longer matches any valid candidate.
    StalePromptAnswer,
    /// Ability reprocessing hit the iteration cap and stopped best-effort.
    FixpointCapReached,
}

/// A single soft-failure record.
///
/// Carried on the move result; also emitted through `tracing` at the
/// point of failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Tile whose configuration or activation produced the record, if any.
    pub source: Option<TileId>,
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    /// Create and log a diagnostic.
    pub fn emit(source: Option<TileId>, kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::warn!(?source, ?kind, %detail, "soft failure");
        Self { source, kind, detail }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.source {
            Some(tile) => write!(f, "{:?} ({}): {}", self.kind, tile, self.detail),
            None => write!(f, "{:?}: {}", self.kind, self.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_carries_fields() {
        let d = Diagnostic::emit(Some(TileId::new(3)), DiagnosticKind::MissingRecordedPoint, "no point recorded");
        assert_eq!(d.source, Some(TileId::new(3)));
        assert_eq!(d.kind, DiagnosticKind::MissingRecordedPoint);
        assert!(d.detail.contains("recorded"));
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::emit(None, DiagnosticKind::FixpointCapReached, "stopped after 64 passes");
        let text = format!("{}", d);
        assert!(text.contains("FixpointCapReached"));
        assert!(text.contains("64"));
    }
}
