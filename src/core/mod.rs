//! Core engine types: players, identifiers, coordinates, diagnostics.
//!
//! These are the game-agnostic building blocks shared by the board model,
//! the movement resolver, and the ability engine.

pub mod diagnostics;
pub mod ids;
pub mod player;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use ids::{Coord, TileCode, TileId};
pub use player::{Player, TeamFilter};
