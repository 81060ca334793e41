//! # paisho-engine
//!
//! A declarative tile movement and ability resolution engine for Pai Sho
//! style abstract board games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic Core**: No hardcoded tiles, layouts, or ability
//!    wiring. Games supply a declarative `GameDefinition` (tile table +
//!    rule options) and a `BoardLayout` at startup.
//!
//! 2. **Closed Vocabularies**: Movement types, triggers, targets, and
//!    ability effects are closed enums dispatched through exhaustive
//!    matches - an unhandled case is a compile error, not a runtime
//!    surprise.
//!
//! 3. **Fails Soft**: Nothing in the play path raises an error. Illegal
//!    requests return a no-effect result; misconfigured abilities degrade
//!    into no-ops carrying structured diagnostics.
//!
//! ## Architecture
//!
//! - **Board model**: a point arena with geometry queries; per-search
//!   scratch state lives outside the domain entities.
//!
//! - **Movement resolver**: pure breadth-first frontier expansion driven
//!   by `MovementDescriptor`s, with budget-based pruning; travel shapes
//!   resolve depth-first because their legality is path-dependent.
//!
//! - **Ability engine**: trigger/target/ability brains coordinated by a
//!   manager that discovers, orders, activates, cancels, preserves, and
//!   reprocesses to a fixpoint, pausing on prompts for player choices.
//!
//! ## Modules
//!
//! - `core`: players, identifiers, coordinates, diagnostics
//! - `board`: point arena, geometry, tile seating
//! - `tiles`: declarative definitions and the per-game table
//! - `movement`: movement descriptors and the resolver
//! - `abilities`: the trigger/target/ability engine
//! - `rules`: rule options and the move request/result surface
//! - `game`: the public move/deploy orchestration
//! - `games`: reference game definitions

pub mod abilities;
pub mod board;
pub mod core;
pub mod game;
pub mod games;
pub mod movement;
pub mod rules;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{Coord, Diagnostic, DiagnosticKind, Player, TeamFilter, TileCode, TileId};

pub use crate::board::{
    Board, BoardLayout, BoardPoint, Direction, Occupancy, PointIndex, PointType, PointTypeSet,
};

pub use crate::tiles::{
    DeployType, GameDefinition, SetupError, TerritorialZone, Tile, TileAttribute, TileDefinition,
    TileFilter, TileLocation,
};

pub use crate::movement::{
    CaptureType, MovementAbility, MovementDescriptor, MovementModifier, MovementRestriction,
    MovementType, ResolvedMovement, TravelStep,
};

pub use crate::abilities::{
    Ability, AbilityCategory, AbilityDescriptor, AbilityEffect, AbilityKind, AbilityManager,
    ActivationRequirement, MoveContext, MoveKind, PromptAnswer, PromptKind, PromptOption,
    PromptRequest, PromptTargetData, SourceTileKey, TargetDescriptor, TargetType,
    TriggerDescriptor, TriggerOutcome, TriggerType,
};

pub use crate::rules::{
    ActivationFlags, MoveOutcome, MoveRequest, MoveResult, NoEffectReason, RuleOptions,
    TileRecords,
};

pub use crate::game::Game;
