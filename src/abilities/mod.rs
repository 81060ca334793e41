//! The ability engine: trigger, target, and ability brains plus the
//! manager that coordinates them.

pub mod activation;
pub mod descriptor;
pub mod instance;
pub mod manager;
pub mod prompt;
pub mod targets;
pub mod triggers;

pub use descriptor::{
    AbilityCategory, AbilityDescriptor, AbilityEffect, AbilityKind, ActivationRequirement,
    PromptKind, PromptRequirement, TargetDescriptor, TargetType, TriggerDescriptor, TriggerType,
};
pub use instance::{Ability, TriggerOutcome};
pub use manager::{AbilityManager, MAX_PASSES};
pub use prompt::{
    PromptAnswer, PromptOption, PromptRequest, PromptTargetData, SourceTileKey,
};
pub use triggers::{MoveContext, MoveKind};
