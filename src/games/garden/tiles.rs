//! The garden tile table.
//!
//! A compact declarative table that exercises every movement type,
//! trigger, target, and ability kind the engine understands. It is the
//! fixture for the integration suites and the worked example of the
//! declarative surface; win conditions live outside the engine.

use crate::abilities::{
    AbilityCategory, AbilityDescriptor, AbilityEffect, AbilityKind, ActivationRequirement,
    PromptKind, TargetDescriptor, TargetType, TriggerDescriptor, TriggerType,
};
use crate::core::TileCode;
use crate::movement::{CaptureType, MovementAbility, MovementDescriptor, MovementRestriction, TravelStep};
use crate::board::PointType;
use crate::rules::RuleOptions;
use crate::tiles::{
    DeployType, GameDefinition, TerritorialZone, TileAttribute, TileDefinition, TileFilter,
};

pub const LOTUS: TileCode = TileCode::new(1);
pub const ROSE: TileCode = TileCode::new(2);
pub const JADE: TileCode = TileCode::new(3);
pub const DRAGON: TileCode = TileCode::new(4);
pub const WHEEL: TileCode = TileCode::new(5);
pub const BADGERMOLE: TileCode = TileCode::new(6);
pub const ORCHID: TileCode = TileCode::new(7);
pub const GINSENG: TileCode = TileCode::new(8);
pub const KOI: TileCode = TileCode::new(9);
pub const PHOENIX: TileCode = TileCode::new(10);
pub const TURTLE: TileCode = TileCode::new(11);

fn flowers() -> TileFilter {
    TileFilter::friendly().with_code(ROSE).with_code(JADE)
}

fn lotus() -> TileDefinition {
    // The banner. Recovers one chosen captured tile to its recorded
    // point while sheltered in a temple.
    let recover = AbilityDescriptor::new(AbilityEffect::MoveTileToRecordedPoint)
        .with_trigger(TriggerDescriptor::new(TriggerType::WhileInsideTemple))
        .with_target(TargetDescriptor::filtered(
            TargetType::ChosenCapturedTile,
            TileFilter::friendly(),
        ))
        .with_prompt("chooseCapturedTile", PromptKind::CapturedTile)
        .with_priority(1);

    // The lotus garden quickens friendly flowers everywhere on the board.
    let quicken = AbilityDescriptor::new(AbilityEffect::ExtendMovement {
        movement_type: None,
        amount: 1,
    })
    .with_trigger(TriggerDescriptor::targeting(
        TriggerType::WhileTargetTileIsOnBoard,
        flowers(),
    ))
    .with_target(TargetDescriptor::filtered(
        TargetType::TriggerTargetTiles,
        TileFilter::friendly(),
    ));

    TileDefinition::new(LOTUS, "White Lotus")
        .with_attribute(TileAttribute::Banner)
        .with_attribute(TileAttribute::Flower)
        .with_deploy(DeployType::TemplesOnly)
        .with_movement(MovementDescriptor::standard(1))
        .with_ability(recover)
        .with_zone(TerritorialZone::sized(6).with_ability(quicken))
}

fn rose() -> TileDefinition {
    TileDefinition::new(ROSE, "Rose")
        .with_count(3)
        .with_attribute(TileAttribute::Flower)
        .with_deploy(DeployType::Anywhere)
        .with_movement(
            MovementDescriptor::standard(3)
                .with_capture(CaptureType::All)
                .with_restriction(MovementRestriction::RestrictedPointTypes(vec![
                    PointType::White,
                ])),
        )
}

fn jade() -> TileDefinition {
    // Shields surrounded roses from capture abilities.
    let shield = AbilityDescriptor::new(AbilityEffect::CancelAbilitiesTargetingTiles {
        categories: vec![AbilityCategory::Capture],
    })
    .with_trigger(TriggerDescriptor::targeting(
        TriggerType::WhileSurroundingTargetTile,
        TileFilter::friendly().with_code(ROSE),
    ))
    .with_target(TargetDescriptor::filtered(
        TargetType::TriggerTargetTiles,
        TileFilter::friendly(),
    ));

    TileDefinition::new(JADE, "White Jade")
        .with_count(3)
        .with_attribute(TileAttribute::Flower)
        .with_deploy(DeployType::Anywhere)
        .with_movement(
            MovementDescriptor::diagonal(2)
                .with_restriction(MovementRestriction::RestrictedPointTypes(vec![
                    PointType::Red,
                ])),
        )
        .with_ability(shield)
}

fn dragon() -> TileDefinition {
    let knight_offsets = vec![
        (2, 1),
        (2, -1),
        (-2, 1),
        (-2, -1),
        (1, 2),
        (1, -2),
        (-1, 2),
        (-1, -2),
    ];
    TileDefinition::new(DRAGON, "Dragon")
        .with_deploy(DeployType::AdjacentToTemple)
        .with_movement(
            MovementDescriptor::jump_shape(1, knight_offsets).with_capture(CaptureType::All),
        )
        .with_movement(MovementDescriptor::jump_surrounding_tiles(2))
}

fn wheel() -> TileDefinition {
    TileDefinition::new(WHEEL, "Wheel")
        .with_count(2)
        .with_deploy(DeployType::Anywhere)
        .with_movement(
            MovementDescriptor::travel_shape(vec![TravelStep::Straight; 4])
                .with_ability(MovementAbility::ChargeCapture)
                .with_capture(CaptureType::All),
        )
}

fn badgermole() -> TileDefinition {
    let aura = AbilityDescriptor::new(AbilityEffect::ProtectFromCapture)
        .with_trigger(TriggerDescriptor::targeting(
            TriggerType::WhileSurroundingTargetTile,
            flowers(),
        ))
        .with_target(TargetDescriptor::filtered(
            TargetType::TriggerTargetTiles,
            TileFilter::friendly(),
        ));

    TileDefinition::new(BADGERMOLE, "Badgermole")
        .with_deploy(DeployType::Anywhere)
        .with_movement(MovementDescriptor::orthogonal_and_diagonal(2))
        .with_ability(aura)
}

fn orchid() -> TileDefinition {
    // Nullifies the enemy badgermole's protection auras.
    let nullify = AbilityDescriptor::new(AbilityEffect::CancelAbilities {
        categories: vec![AbilityCategory::Protection],
    })
    .with_trigger(TriggerDescriptor::targeting(
        TriggerType::WhileTargetTileIsOnBoard,
        TileFilter::enemy().with_code(BADGERMOLE),
    ))
    .with_target(TargetDescriptor::filtered(
        TargetType::TriggerTargetTiles,
        TileFilter::enemy(),
    ));

    TileDefinition::new(ORCHID, "Orchid")
        .with_deploy(DeployType::WithinTileZone(LOTUS))
        .with_movement(MovementDescriptor::standard(2))
        .with_ability(nullify)
}

fn ginseng() -> TileDefinition {
    // Pulls an adjacent enemy tile to a chosen nearby point.
    let pull = AbilityDescriptor::new(AbilityEffect::MoveTargetTile { distance: 2 })
        .with_trigger(TriggerDescriptor::targeting(
            TriggerType::WhenLandsAdjacentToTargetTile,
            TileFilter::enemy(),
        ))
        .with_target(TargetDescriptor::filtered(
            TargetType::TriggerTargetTiles,
            TileFilter::enemy(),
        ))
        .with_prompt("chooseMovePoint", PromptKind::MovePoint)
        .requiring(ActivationRequirement::TargetTilesNotInTemple);

    TileDefinition::new(GINSENG, "Ginseng")
        .with_deploy(DeployType::Anywhere)
        .with_movement(MovementDescriptor::standard(2))
        .with_ability(pull)
}

fn koi() -> TileDefinition {
    // Remembers its deployment point so the lotus can bring it home.
    let remember = AbilityDescriptor::new(AbilityEffect::RecordTilePoint)
        .with_trigger(TriggerDescriptor::new(TriggerType::WhenDeployed))
        .with_target(TargetDescriptor::new(TargetType::ThisTile));

    TileDefinition::new(KOI, "Koi")
        .with_count(2)
        .with_deploy(DeployType::Anywhere)
        .with_movement(MovementDescriptor::standard(2))
        .with_movement(MovementDescriptor::away_from_target_orthogonal(
            TileFilter::enemy().with_code(DRAGON),
            3,
        ))
        .with_ability(remember)
}

fn phoenix() -> TileDefinition {
    // Burns an enemy rose it lands next to, unless the rose shelters in
    // a temple.
    let burn = AbilityDescriptor::new(AbilityEffect::CaptureTargetTiles)
        .with_trigger(TriggerDescriptor::targeting(
            TriggerType::WhenLandsSurroundingTargetTile,
            TileFilter::enemy().with_code(ROSE),
        ))
        .with_target(TargetDescriptor::filtered(
            TargetType::TriggerTargetTiles,
            TileFilter::enemy(),
        ))
        .requiring(ActivationRequirement::TargetTilesNotInTemple);

    TileDefinition::new(PHOENIX, "Phoenix")
        .with_deploy(DeployType::AdjacentToTemple)
        .with_movement(MovementDescriptor::jump_along_line_of_sight(TileFilter::any()))
        .with_ability(burn)
}

fn turtle() -> TileDefinition {
    TileDefinition::new(TURTLE, "Turtle")
        .with_attribute(TileAttribute::Gigantic)
        .with_deploy(DeployType::Anywhere)
        .with_movement(MovementDescriptor::standard(1))
}

/// Build the garden game definition.
#[must_use]
pub fn garden_definition(options: RuleOptions) -> GameDefinition {
    let mut def = GameDefinition::new(options).with_ability_order(vec![
        AbilityKind::RecordTilePoint,
        AbilityKind::MoveTileToRecordedPoint,
        AbilityKind::CancelAbilities,
        AbilityKind::CancelAbilitiesTargetingTiles,
        AbilityKind::ProtectFromCapture,
        AbilityKind::MoveTargetTile,
    ]);
    def.register(lotus());
    def.register(rose());
    def.register(jade());
    def.register(dragon());
    def.register(wheel());
    def.register(badgermole());
    def.register(orchid());
    def.register(ginseng());
    def.register(koi());
    def.register(phoenix());
    def.register(turtle());
    def
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_validates() {
        let def = garden_definition(RuleOptions::default());
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_every_code_registered() {
        let def = garden_definition(RuleOptions::default());
        for code in [
            LOTUS, ROSE, JADE, DRAGON, WHEEL, BADGERMOLE, ORCHID, GINSENG, KOI, PHOENIX, TURTLE,
        ] {
            assert!(def.get(code).is_some(), "missing {code}");
        }
    }

    #[test]
    fn test_canonical_order_starts_with_recording() {
        let def = garden_definition(RuleOptions::default());
        assert_eq!(def.ability_order()[0], AbilityKind::RecordTilePoint);
        assert_eq!(def.ability_order()[1], AbilityKind::MoveTileToRecordedPoint);
    }
}
