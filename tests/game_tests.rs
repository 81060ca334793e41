//! Full-game surface tests: deploy categories, temple rules, the banner
//! capture system, and multi-point tile occupancy.

use paisho_engine::core::{Coord, Player, TileCode};
use paisho_engine::games::garden::{
    garden_definition, garden_layout, DRAGON, JADE, LOTUS, ORCHID, ROSE, TURTLE,
};
use paisho_engine::movement::{CaptureType, MovementDescriptor};
use paisho_engine::rules::{MoveOutcome, MoveRequest, NoEffectReason, RuleOptions};
use paisho_engine::tiles::{DeployType, GameDefinition, TileDefinition};
use paisho_engine::{BoardLayout, Game, PointType};

const RAIDER: TileCode = TileCode::new(31);
const TEMPLEBREAKER: TileCode = TileCode::new(32);
const DEFENDER: TileCode = TileCode::new(33);

fn temple_rules_only() -> RuleOptions {
    RuleOptions {
        banner_capture_system: false,
        temple_rules: true,
    }
}

fn temple_game() -> Game {
    let layout = BoardLayout::diamond(17).with_point_type(Coord::new(8, 10), PointType::Temple);
    let mut def = GameDefinition::new(temple_rules_only());
    def.register(
        TileDefinition::new(RAIDER, "Raider")
            .with_movement(MovementDescriptor::standard(3).with_capture(CaptureType::All))
            .with_deploy(DeployType::Anywhere),
    );
    def.register(
        TileDefinition::new(TEMPLEBREAKER, "Templebreaker")
            .with_movement(
                MovementDescriptor::standard(3)
                    .with_capture(CaptureType::All)
                    .with_capture(CaptureType::TilesInsideTemple),
            )
            .with_deploy(DeployType::Anywhere),
    );
    def.register(
        TileDefinition::new(DEFENDER, "Defender")
            .with_movement(MovementDescriptor::standard(1))
            .with_deploy(DeployType::Anywhere),
    );
    Game::new(&layout, def).unwrap()
}

/// Scenario: a temple point protects its occupant unless the movement's
/// capture types explicitly override.
#[test]
fn test_temple_protects_unless_overridden() {
    let mut game = temple_game();
    game.submit(MoveRequest::deploy(Player::Guest, DEFENDER, Coord::new(8, 10)));
    game.submit(MoveRequest::deploy(Player::Host, RAIDER, Coord::new(8, 8)));
    game.submit(MoveRequest::deploy(Player::Host, TEMPLEBREAKER, Coord::new(10, 10)));

    // The plain raider cannot land on the occupied temple.
    let refused = game.submit(MoveRequest::move_tile(
        Player::Host,
        RAIDER,
        Coord::new(8, 8),
        Coord::new(8, 10),
    ));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );

    // The templebreaker's capture types name temple occupants explicitly.
    let allowed = game.submit(MoveRequest::move_tile(
        Player::Host,
        TEMPLEBREAKER,
        Coord::new(10, 10),
        Coord::new(8, 10),
    ));
    assert!(allowed.completed());
    assert_eq!(allowed.captured_tiles.len(), 1);
}

/// Banner capture system: flower targets need the capturer's banner
/// deployed; non-flower targets need both banners.
#[test]
fn test_banner_capture_gates() {
    let options = RuleOptions {
        banner_capture_system: true,
        temple_rules: true,
    };
    let mut game = Game::new(&garden_layout(), garden_definition(options)).unwrap();

    // Host rose hunts the guest jade (a flower).
    game.submit(MoveRequest::deploy(Player::Host, ROSE, Coord::new(8, 8)));
    game.submit(MoveRequest::deploy(Player::Guest, JADE, Coord::new(8, 11)));

    let refused = game.submit(MoveRequest::move_tile(
        Player::Host,
        ROSE,
        Coord::new(8, 8),
        Coord::new(8, 11),
    ));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );

    // Host banner deployed: flower capture unlocks.
    game.submit(MoveRequest::deploy(Player::Host, LOTUS, Coord::new(0, 8)));
    let flower_capture = game.submit(MoveRequest::move_tile(
        Player::Host,
        ROSE,
        Coord::new(8, 8),
        Coord::new(8, 11),
    ));
    assert!(flower_capture.completed());
    assert_eq!(flower_capture.captured_tiles.len(), 1);

    // A non-flower target still needs both banners.
    game.submit(MoveRequest::deploy(Player::Guest, DRAGON, Coord::new(15, 8)));
    game.submit(MoveRequest::deploy(Player::Host, ROSE, Coord::new(12, 8)));
    let refused = game.submit(MoveRequest::move_tile(
        Player::Host,
        ROSE,
        Coord::new(12, 8),
        Coord::new(15, 8),
    ));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );

    game.submit(MoveRequest::deploy(Player::Guest, LOTUS, Coord::new(16, 8)));
    let allowed = game.submit(MoveRequest::move_tile(
        Player::Host,
        ROSE,
        Coord::new(12, 8),
        Coord::new(15, 8),
    ));
    assert!(allowed.completed());
    assert_eq!(allowed.captured_tiles.len(), 1);
}

#[test]
fn test_deploy_categories() {
    let mut game = Game::new(
        &garden_layout(),
        garden_definition(RuleOptions::default()),
    )
    .unwrap();

    // Temples only: the lotus must start on a gate.
    let refused = game.submit(MoveRequest::deploy(Player::Host, LOTUS, Coord::new(8, 8)));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );
    assert!(game
        .submit(MoveRequest::deploy(Player::Host, LOTUS, Coord::new(0, 8)))
        .completed());

    // Adjacent to temple: the dragon perches next to a gate.
    let refused = game.submit(MoveRequest::deploy(Player::Host, DRAGON, Coord::new(8, 8)));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );
    assert!(game
        .submit(MoveRequest::deploy(Player::Host, DRAGON, Coord::new(1, 8)))
        .completed());

    // Within a named tile's zone: the orchid needs the lotus garden
    // (host lotus at (0,8), zone size 6).
    let refused = game.submit(MoveRequest::deploy(Player::Host, ORCHID, Coord::new(12, 8)));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );
    assert!(game
        .submit(MoveRequest::deploy(Player::Host, ORCHID, Coord::new(4, 8)))
        .completed());
}

#[test]
fn test_legal_deploy_points_match_submission() {
    let mut game = Game::new(
        &garden_layout(),
        garden_definition(RuleOptions::default()),
    )
    .unwrap();

    let points = game.legal_deploy_points(Player::Host, LOTUS);
    // Exactly the four temples.
    assert_eq!(points.len(), 4);
    for coord in points {
        let mut probe = game.clone();
        assert!(probe
            .submit(MoveRequest::deploy(Player::Host, LOTUS, coord))
            .completed());
    }

    // Occupying a temple removes it from the set.
    game.submit(MoveRequest::deploy(Player::Host, LOTUS, Coord::new(0, 8)));
    let remaining = game.legal_deploy_points(Player::Guest, LOTUS);
    assert_eq!(remaining.len(), 3);
}

#[test]
fn test_gigantic_turtle_occupies_a_block() {
    let mut game = Game::new(
        &garden_layout(),
        garden_definition(RuleOptions::default()),
    )
    .unwrap();

    let turtle = game
        .submit(MoveRequest::deploy(Player::Host, TURTLE, Coord::new(3, 8)))
        .moved_tile
        .unwrap();
    for (dr, dc) in [(0u8, 0u8), (1, 0), (0, 1), (1, 1)] {
        let idx = game
            .board()
            .playable_index(Coord::new(3 + dr, 8 + dc))
            .unwrap();
        assert_eq!(game.board().tile_at(idx), Some(turtle));
    }

    // No other tile may deploy into the block.
    let refused = game.submit(MoveRequest::deploy(Player::Guest, ROSE, Coord::new(4, 9)));
    assert_eq!(
        refused.outcome,
        MoveOutcome::NoEffect(NoEffectReason::IllegalDestination)
    );

    // A one-step slide shifts the whole block.
    let moved = game.submit(MoveRequest::move_tile(
        Player::Host,
        TURTLE,
        Coord::new(3, 8),
        Coord::new(2, 8),
    ));
    assert!(moved.completed());
    let freed = game.board().playable_index(Coord::new(4, 8)).unwrap();
    assert_eq!(game.board().tile_at(freed), None);
    let head = game.board().playable_index(Coord::new(2, 8)).unwrap();
    assert_eq!(game.board().tile_at(head), Some(turtle));
}

#[test]
fn test_tiles_are_never_destroyed() {
    let mut game = temple_game();
    let total = game.board().tile_count();

    game.submit(MoveRequest::deploy(Player::Guest, DEFENDER, Coord::new(8, 8)));
    game.submit(MoveRequest::deploy(Player::Host, RAIDER, Coord::new(8, 6)));
    game.submit(MoveRequest::move_tile(
        Player::Host,
        RAIDER,
        Coord::new(8, 6),
        Coord::new(8, 8),
    ));

    let on_board = game.board().tiles_on_board().len();
    let captured = game.board().captured_tiles().len();
    assert_eq!(game.board().tile_count(), total);
    assert_eq!(captured, 1);
    // Everything else is still in the piles.
    assert_eq!(on_board + captured, 2);
}
