//! Ability descriptors - the declarative ability vocabulary.
//!
//! An ability is three closed enums wired together: *triggers* decide when
//! it is eligible, *target types* decide what it acts on, and the *effect*
//! decides what it does. Each enum is dispatched through an exhaustive
//! match, so an unhandled trigger or effect is a compile error, not a
//! runtime surprise.

use serde::{Deserialize, Serialize};

use crate::movement::{MovementDescriptor, MovementType};
use crate::tiles::TileFilter;

/// When an ability becomes eligible.
///
/// `When*` triggers fire off the concrete action of the current move;
/// `While*` triggers hold as long as a board condition does, carrying
/// ongoing effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    /// The source tile was deployed this move.
    WhenDeployed,
    /// The source tile landed with a matching tile in its 8-neighborhood.
    WhenLandsSurroundingTargetTile,
    /// The source tile landed orthogonally adjacent to a matching tile.
    WhenLandsAdjacentToTargetTile,
    /// The source tile captured a matching tile this move.
    WhenCapturingTargetTile,
    /// The source tile was captured this move by a matching tile.
    WhenCapturedByTargetTile,
    /// The source tile sits on a temple point.
    WhileInsideTemple,
    /// The source tile is on the board but not on a temple point.
    WhileOutsideTemple,
    /// A matching tile is anywhere on the board.
    WhileTargetTileIsOnBoard,
    /// The source tile sits inside a matching tile's territorial zone.
    WhileInsideTargetTileZone,
    /// A matching tile is in the source tile's 8-neighborhood.
    WhileSurroundingTargetTile,
}

/// One trigger clause: a trigger type plus its target filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDescriptor {
    pub trigger_type: TriggerType,
    /// Which tiles count for the trigger's "target tile" slot.
    pub target_tiles: TileFilter,
}

impl TriggerDescriptor {
    /// A trigger clause with no tile filter.
    #[must_use]
    pub fn new(trigger_type: TriggerType) -> Self {
        Self {
            trigger_type,
            target_tiles: TileFilter::any(),
        }
    }

    /// A trigger clause filtered to matching tiles.
    #[must_use]
    pub fn targeting(trigger_type: TriggerType, target_tiles: TileFilter) -> Self {
        Self {
            trigger_type,
            target_tiles,
        }
    }
}

/// How an eligible ability resolves its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    /// The concrete tiles that satisfied the trigger clauses.
    TriggerTargetTiles,
    /// Matching tiles in the source tile's 8-neighborhood.
    SurroundingTiles,
    /// Matching tiles orthogonally adjacent to the source tile.
    AdjacentTiles,
    /// All matching tiles on the board.
    AllTiles,
    /// The source tile itself.
    ThisTile,
    /// A captured tile chosen through a prompt.
    ChosenCapturedTile,
}

/// One target clause: a target type plus a filter over candidates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub target_type: TargetType,
    pub filter: TileFilter,
}

impl TargetDescriptor {
    /// A target clause with no tile filter.
    #[must_use]
    pub fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            filter: TileFilter::any(),
        }
    }

    /// A target clause restricted to matching tiles.
    #[must_use]
    pub fn filtered(target_type: TargetType, filter: TileFilter) -> Self {
        Self {
            target_type,
            filter,
        }
    }
}

/// Cancellation matches abilities by category, not exact kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityCategory {
    Protection,
    Cancellation,
    Relocation,
    Capture,
    Recording,
    MovementModifier,
}

/// What an ability does, with its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Remember each target tile's current point for later relocation.
    RecordTilePoint,
    /// Move each target tile (board or captured) to its recorded point.
    MoveTileToRecordedPoint,
    /// Deactivate matching-category abilities sourced from the target
    /// tiles, and keep them ineligible for the rest of this move.
    CancelAbilities { categories: Vec<AbilityCategory> },
    /// Keep matching-category abilities from ever targeting the target
    /// tiles, checked at discovery time.
    CancelAbilitiesTargetingTiles { categories: Vec<AbilityCategory> },
    /// Shield the target tiles from capture while active.
    ProtectFromCapture,
    /// Move one target tile to a prompted point within `distance`.
    MoveTargetTile { distance: u8 },
    /// Capture the target tiles outright.
    CaptureTargetTiles,
    /// Return the target tiles to their owners' piles.
    MoveTargetTileToPile,
    /// Suppress the target tiles' movement while active.
    ImmobilizeTargetTiles,
    /// Extend the target tiles' matching movements while active.
    ExtendMovement {
        movement_type: Option<MovementType>,
        amount: u8,
    },
    /// Replace the target tiles' movements of one type while active.
    ManipulateExistingMovement {
        from: MovementType,
        replacement: Box<MovementDescriptor>,
    },
    /// Grant the target tiles an extra movement from every reachable
    /// point while active.
    GrantBonusMovement { movement: Box<MovementDescriptor> },
}

/// Fieldless mirror of `AbilityEffect`, used for canonical ordering and
/// cancellation category matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    RecordTilePoint,
    MoveTileToRecordedPoint,
    CancelAbilities,
    CancelAbilitiesTargetingTiles,
    ProtectFromCapture,
    MoveTargetTile,
    CaptureTargetTiles,
    MoveTargetTileToPile,
    ImmobilizeTargetTiles,
    ExtendMovement,
    ManipulateExistingMovement,
    GrantBonusMovement,
}

impl AbilityKind {
    /// The cancellation category this kind belongs to.
    #[must_use]
    pub const fn category(self) -> AbilityCategory {
        match self {
            AbilityKind::RecordTilePoint => AbilityCategory::Recording,
            AbilityKind::MoveTileToRecordedPoint
            | AbilityKind::MoveTargetTile
            | AbilityKind::MoveTargetTileToPile => AbilityCategory::Relocation,
            AbilityKind::CancelAbilities | AbilityKind::CancelAbilitiesTargetingTiles => {
                AbilityCategory::Cancellation
            }
            AbilityKind::ProtectFromCapture => AbilityCategory::Protection,
            AbilityKind::CaptureTargetTiles => AbilityCategory::Capture,
            AbilityKind::ImmobilizeTargetTiles
            | AbilityKind::ExtendMovement
            | AbilityKind::ManipulateExistingMovement
            | AbilityKind::GrantBonusMovement => AbilityCategory::MovementModifier,
        }
    }

    /// Ongoing kinds persist across passes while their triggers hold;
    /// instant kinds mutate the board once.
    #[must_use]
    pub const fn is_ongoing(self) -> bool {
        matches!(
            self,
            AbilityKind::ProtectFromCapture
                | AbilityKind::ImmobilizeTargetTiles
                | AbilityKind::CancelAbilitiesTargetingTiles
                | AbilityKind::ExtendMovement
                | AbilityKind::ManipulateExistingMovement
                | AbilityKind::GrantBonusMovement
        )
    }
}

impl AbilityEffect {
    /// The fieldless kind of this effect.
    #[must_use]
    pub const fn kind(&self) -> AbilityKind {
        match self {
            AbilityEffect::RecordTilePoint => AbilityKind::RecordTilePoint,
            AbilityEffect::MoveTileToRecordedPoint => AbilityKind::MoveTileToRecordedPoint,
            AbilityEffect::CancelAbilities { .. } => AbilityKind::CancelAbilities,
            AbilityEffect::CancelAbilitiesTargetingTiles { .. } => {
                AbilityKind::CancelAbilitiesTargetingTiles
            }
            AbilityEffect::ProtectFromCapture => AbilityKind::ProtectFromCapture,
            AbilityEffect::MoveTargetTile { .. } => AbilityKind::MoveTargetTile,
            AbilityEffect::CaptureTargetTiles => AbilityKind::CaptureTargetTiles,
            AbilityEffect::MoveTargetTileToPile => AbilityKind::MoveTargetTileToPile,
            AbilityEffect::ImmobilizeTargetTiles => AbilityKind::ImmobilizeTargetTiles,
            AbilityEffect::ExtendMovement { .. } => AbilityKind::ExtendMovement,
            AbilityEffect::ManipulateExistingMovement { .. } => {
                AbilityKind::ManipulateExistingMovement
            }
            AbilityEffect::GrantBonusMovement { .. } => AbilityKind::GrantBonusMovement,
        }
    }
}

/// Extra conditions checked after target resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationRequirement {
    /// No resolved target tile may sit on a temple point.
    TargetTilesNotInTemple,
}

/// What kind of choice a prompt asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    /// Choose a tile from the captured pile.
    CapturedTile,
    /// Choose a destination point.
    MovePoint,
}

/// A declared need for external input before activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequirement {
    pub prompt_id: String,
    pub kind: PromptKind,
}

/// A complete declarative ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub effect: AbilityEffect,

    /// All clauses must hold for the ability to be eligible.
    pub triggers: Vec<TriggerDescriptor>,

    /// Union of the resolved target clauses; an ability resolving zero
    /// targets is discarded.
    pub target_types: Vec<TargetDescriptor>,

    /// Explicit priority; prioritized abilities activate before the
    /// canonical order, highest group first.
    pub priority: Option<u8>,

    pub activation_requirements: Vec<ActivationRequirement>,

    /// Prompts that must be answered before activation.
    pub needed_prompts: Vec<PromptRequirement>,
}

impl AbilityDescriptor {
    /// An ability with an effect and nothing else yet.
    #[must_use]
    pub fn new(effect: AbilityEffect) -> Self {
        Self {
            effect,
            triggers: Vec::new(),
            target_types: Vec::new(),
            priority: None,
            activation_requirements: Vec::new(),
            needed_prompts: Vec::new(),
        }
    }

    /// Add a trigger clause (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerDescriptor) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Add a target clause (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: TargetDescriptor) -> Self {
        self.target_types.push(target);
        self
    }

    /// Set an explicit priority (builder pattern).
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Add an activation requirement (builder pattern).
    #[must_use]
    pub fn requiring(mut self, requirement: ActivationRequirement) -> Self {
        self.activation_requirements.push(requirement);
        self
    }

    /// Declare a needed prompt (builder pattern).
    #[must_use]
    pub fn with_prompt(mut self, prompt_id: impl Into<String>, kind: PromptKind) -> Self {
        self.needed_prompts.push(PromptRequirement {
            prompt_id: prompt_id.into(),
            kind,
        });
        self
    }

    /// The fieldless kind of the effect.
    #[must_use]
    pub const fn kind(&self) -> AbilityKind {
        self.effect.kind()
    }
}
