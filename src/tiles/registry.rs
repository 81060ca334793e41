//! The game definition: the declarative tile table plus rule options.
//!
//! A `GameDefinition` is built once per game session and passed explicitly
//! into the board and the ability engine - there is no module-level tile
//! metadata. Cross-references between definitions (deploy zones, filters
//! naming other tile codes) are validated up front so a misconfigured
//! table fails at construction, not mid-move.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abilities::{AbilityDescriptor, AbilityEffect, AbilityKind};
use crate::core::TileCode;
use crate::movement::MovementDescriptor;
use crate::rules::RuleOptions;

use super::definition::{DeployType, TileDefinition};

/// Errors building or validating a game definition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("tile code {referenced} referenced by {by} is not registered")]
    UnknownTileCode { referenced: TileCode, by: TileCode },

    #[error("tile code {0} registered twice")]
    DuplicateTileCode(TileCode),

    #[error("game definition has no tiles")]
    EmptyDefinition,
}

/// The per-game declarative configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameDefinition {
    tiles: FxHashMap<TileCode, TileDefinition>,
    options: RuleOptions,
    ability_order: Vec<AbilityKind>,
    #[serde(skip)]
    duplicate_codes: Vec<TileCode>,
}

impl GameDefinition {
    /// Create an empty definition with the given rule options.
    #[must_use]
    pub fn new(options: RuleOptions) -> Self {
        Self {
            tiles: FxHashMap::default(),
            options,
            ability_order: Vec::new(),
            duplicate_codes: Vec::new(),
        }
    }

    /// Register a tile definition. Later registrations of the same code
    /// are rejected by `validate`.
    pub fn register(&mut self, definition: TileDefinition) {
        if self.tiles.contains_key(&definition.code) {
            self.duplicate_codes.push(definition.code);
            return;
        }
        self.tiles.insert(definition.code, definition);
    }

    /// Set the canonical activation order for non-prioritized abilities
    /// (builder pattern). Kinds not listed activate last, in discovery
    /// order.
    #[must_use]
    pub fn with_ability_order(mut self, order: Vec<AbilityKind>) -> Self {
        self.ability_order = order;
        self
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, code: TileCode) -> Option<&TileDefinition> {
        self.tiles.get(&code)
    }

    /// Rule options.
    #[must_use]
    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Canonical ability activation order.
    #[must_use]
    pub fn ability_order(&self) -> &[AbilityKind] {
        &self.ability_order
    }

    /// All registered definitions, ordered by code.
    #[must_use]
    pub fn definitions(&self) -> Vec<&TileDefinition> {
        let mut out: Vec<&TileDefinition> = self.tiles.values().collect();
        out.sort_by_key(|d| d.code);
        out
    }

    /// Check internal cross-references.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.tiles.is_empty() {
            return Err(SetupError::EmptyDefinition);
        }
        if let Some(&code) = self.duplicate_codes.first() {
            return Err(SetupError::DuplicateTileCode(code));
        }
        for def in self.tiles.values() {
            for referenced in referenced_codes(def) {
                if !self.tiles.contains_key(&referenced) {
                    return Err(SetupError::UnknownTileCode {
                        referenced,
                        by: def.code,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Every tile code a definition mentions outside its own identity.
fn referenced_codes(def: &TileDefinition) -> Vec<TileCode> {
    let mut out = Vec::new();
    for deploy in &def.deploy_types {
        if let DeployType::WithinTileZone(code) = deploy {
            out.push(*code);
        }
    }
    for movement in &def.movements {
        collect_movement_codes(movement, &mut out);
    }
    for ability in &def.abilities {
        collect_ability_codes(ability, &mut out);
    }
    if let Some(zone) = &def.territorial_zone {
        for ability in &zone.abilities {
            collect_ability_codes(ability, &mut out);
        }
    }
    out
}

fn collect_movement_codes(movement: &MovementDescriptor, out: &mut Vec<TileCode>) {
    out.extend(movement.target_tiles.codes.iter().copied());
    for restriction in &movement.restrictions {
        if let crate::movement::MovementRestriction::OpponentTileZone(code) = restriction {
            out.push(*code);
        }
    }
    for capture in &movement.capture_types {
        if let crate::movement::CaptureType::Codes(codes) = capture {
            out.extend(codes.iter().copied());
        }
    }
}

fn collect_ability_codes(ability: &AbilityDescriptor, out: &mut Vec<TileCode>) {
    for trigger in &ability.triggers {
        out.extend(trigger.target_tiles.codes.iter().copied());
    }
    for target in &ability.target_types {
        out.extend(target.filter.codes.iter().copied());
    }
    match &ability.effect {
        AbilityEffect::ManipulateExistingMovement { replacement, .. } => {
            collect_movement_codes(replacement, out);
        }
        AbilityEffect::GrantBonusMovement { movement } => {
            collect_movement_codes(movement, out);
        }
        _ => {}
    }
}
