//! End-to-end behavior of the simulation engine through its public API

use cell_arena::config::{Difficulty, DifficultyLevel};
use cell_arena::game::archetype::Archetype;
use cell_arena::game::constants::collision::EAT_RATIO;
use cell_arena::game::constants::{mass_to_radius, player as player_consts, respawn};
use cell_arena::game::input::InputCommand;
use cell_arena::game::session::{Session, SessionPhase};
use cell_arena::game::state::{Body, CellList, FruitKind, PlayerCell, World};
use cell_arena::game::summary::EndReason;
use cell_arena::game::systems::interaction::{self, InteractionEvent};
use cell_arena::game::systems::player;
use cell_arena::util::vec2::Vec2;

const EPSILON: f32 = 1e-3;
const FRAME_MS: u64 = 16;

fn create_test_world(seed: u64) -> World {
    World::empty(Difficulty::default(), Some(seed))
}

fn set_player_mass(world: &mut World, mass: f32) {
    world.player.cells_mut()[0].body.set_mass(mass);
}

fn stack_cells(world: &mut World, at: Vec2) {
    let mut cells: CellList = world.player.cell_list();
    for cell in cells.iter_mut() {
        cell.body.position = at;
    }
    world.player.set_cells(cells);
}

fn assert_world_invariants(world: &World) {
    for enemy in &world.enemies {
        assert_eq!(enemy.radius(), mass_to_radius(enemy.mass()));
        assert!(
            world.arena.contains(enemy.position(), enemy.radius()),
            "enemy {} outside arena at {:?}",
            enemy.id,
            enemy.position()
        );
    }
    for cell in world.player.cells() {
        assert_eq!(cell.radius(), mass_to_radius(cell.mass()));
        assert!(world.arena.contains(cell.body.position, cell.radius()));
        assert!(cell.mass() > 0.0);
    }
    assert!(world.player.cell_count() >= 1);
    assert!(world.player.cell_count() <= player_consts::MAX_CELLS);
}

#[test]
fn player_eats_food_in_reach() {
    let mut world = create_test_world(1);
    let center = world.player.centroid();
    let reach = mass_to_radius(12.0) + 10.0;
    world.add_food(center + Vec2::new(0.0, reach - 1.0), FruitKind::Strawberry);

    interaction::resolve(&mut world);

    assert!((world.player.total_mass() - (12.0 + 0.25 * 10.0)).abs() < EPSILON);
    assert!(world.food.is_empty());
}

#[test]
fn raging_player_triples_food_gain() {
    let mut world = create_test_world(1);
    world.player.rage_mode = true;
    world.player.rage_end = 10_000;
    let center = world.player.centroid();
    world.add_food(center, FruitKind::Apple);

    interaction::resolve(&mut world);

    assert!((world.player.total_mass() - (12.0 + 0.25 * 10.0 * 3.0)).abs() < EPSILON);
}

#[test]
fn split_halves_and_locks_merge() {
    let mut world = create_test_world(2);
    set_player_mass(&mut world, 40.0);
    world.move_target = Some(world.player.centroid() + Vec2::new(100.0, 0.0));

    assert!(player::split(&mut world));
    let cells = world.player.cells();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].mass(), 20.0);
    assert_eq!(cells[1].mass(), 20.0);
    assert_eq!(world.player.total_mass(), 40.0);
    for cell in cells {
        assert!(world.arena.contains(cell.body.position, cell.radius()));
    }
    assert_eq!(world.player.merge_lock_until, 10_000);

    // Second split before the lock runs out
    world.clock = 1_000;
    assert!(player::split(&mut world));
    assert_eq!(world.player.cell_count(), 4);
    assert!(world.player.merge_lock_until > 20_000);

    // Forced adjacent within the absorption grace period: nothing merges
    world.clock = 2_500;
    let center = world.player.centroid();
    stack_cells(&mut world, center);
    let report = player::merge(&mut world);
    assert_eq!(report.merged, 0);
    assert_eq!(report.absorbed, 0);
    assert_eq!(world.player.cell_count(), 4);

    // Once the lock has elapsed the stacked cells recombine into one body
    world.clock = world.player.merge_lock_until;
    stack_cells(&mut world, center);
    player::merge(&mut world);
    assert!(!world.player.is_split());
    assert!((world.player.total_mass() - 40.0).abs() < EPSILON);
}

#[test]
fn unsplit_player_eaten_ends_session() {
    let mut session = Session::new(Difficulty::default(), Some(3));
    session.world_mut().enemies.clear();
    set_player_mass(session.world_mut(), 40.0);
    let center = session.world().player.centroid();
    session.world_mut().add_enemy(Archetype::Tank, center, 50.0);
    session.start();

    let summary = session.tick(FRAME_MS).expect("player eliminated");
    assert_eq!(summary.reason, EndReason::Eliminated);
    assert!((summary.final_mass - 40.0).abs() < EPSILON);
    assert_eq!(session.phase(), SessionPhase::Ended);

    // Frozen afterwards
    let tick = session.world().tick;
    assert!(session.tick(FRAME_MS).is_none());
    assert_eq!(session.world().tick, tick);
}

#[test]
fn larger_enemy_eats_smaller_enemy() {
    let mut world = create_test_world(4);
    let at = Vec2::new(600.0, 600.0);
    let big = world.add_enemy(Archetype::Basic, at, 30.0);
    let small = world.add_enemy(Archetype::Cautious, at + Vec2::new(3.0, 0.0), 20.0);
    {
        let victim = world.get_enemy_mut(small).expect("enemy");
        victim.fear_level = 4.0;
        victim.target = Some(Vec2::new(1.0, 1.0));
    }

    let events = interaction::resolve(&mut world);
    assert!(events.iter().any(|e| matches!(e, InteractionEvent::EnemyAteEnemy { .. })));

    let predator = world.get_enemy(big).expect("predator");
    assert!((predator.mass() - 48.0).abs() < EPSILON);

    let respawned = world.get_enemy(small).expect("slot reused");
    assert!(respawned.mass() >= respawn::MASS_MIN && respawned.mass() < respawn::MASS_MAX);
    assert_eq!(respawned.fear_level, 0.0);
    assert_eq!(respawned.target, None);
    assert_eq!(respawned.radius(), mass_to_radius(respawned.mass()));
    assert_eq!(world.enemies.len(), 2);
}

#[test]
fn eat_ratio_is_strict_for_player() {
    let mut world = create_test_world(5);
    set_player_mass(&mut world, 20.0 * EAT_RATIO);
    let center = world.player.centroid();
    world.add_enemy(Archetype::Basic, center, 20.0);

    let events = interaction::resolve(&mut world);
    assert!(events.is_empty());
    assert_eq!(world.enemies[0].mass(), 20.0);

    set_player_mass(&mut world, 20.0 * EAT_RATIO + 0.01);
    let events = interaction::resolve(&mut world);
    assert!(matches!(
        events.first(),
        Some(InteractionEvent::PlayerAteEnemy { .. })
    ));
}

#[test]
fn splits_conserve_mass() {
    for (seed, mass) in [(6_u64, 20.0_f32), (7, 37.5), (8, 123.4), (9, 640.0)] {
        let mut world = create_test_world(seed);
        set_player_mass(&mut world, mass);
        world.move_target = Some(Vec2::new(100.0, 100.0));
        while player::split(&mut world) {
            assert!((world.player.total_mass() - mass).abs() < EPSILON * mass.max(1.0));
            assert!(world.player.cell_count() <= player_consts::MAX_CELLS);
        }
        assert!((world.player.total_mass() - mass).abs() < EPSILON * mass.max(1.0));
    }
}

#[test]
fn small_cell_absorbed_after_grace() {
    let mut world = create_test_world(10);
    let cells: CellList = [
        PlayerCell::new(Body::new(Vec2::new(300.0, 300.0), 10.0), 0),
        PlayerCell::new(Body::new(Vec2::new(2000.0, 1500.0), 50.0), 0),
    ]
    .into_iter()
    .collect();
    world.player.set_cells(cells);
    world.player.merge_lock_until = 60_000;

    world.clock = player_consts::ABSORB_GRACE_MS;
    assert_eq!(player::merge(&mut world).absorbed, 0);

    world.clock = player_consts::ABSORB_GRACE_MS + 1;
    assert_eq!(player::merge(&mut world).absorbed, 1);
    assert!(!world.player.is_split());
    assert_eq!(world.player.total_mass(), 60.0);
}

#[test]
fn long_session_keeps_invariants() {
    let difficulty = Difficulty::preset(DifficultyLevel::Hard);
    let mut session = Session::new(difficulty.clone(), Some(11));
    session.start();
    let enemy_count = session.world().enemies.len();
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(2400.0, 0.0),
        Vec2::new(2400.0, 1800.0),
        Vec2::new(0.0, 1800.0),
    ];

    for step in 0..3_000_usize {
        if step % 200 == 0 {
            let corner = corners[(step / 200) % corners.len()];
            session
                .submit(InputCommand::MoveTarget(Some(corner)))
                .expect("buffer has room");
        }
        if step % 500 == 250 {
            session.submit(InputCommand::Split).expect("buffer has room");
            session.submit(InputCommand::Eject).expect("buffer has room");
        }

        if session.tick(FRAME_MS).is_some() {
            session.reset(difficulty.clone());
            session.start();
        }
        assert_world_invariants(session.world());
        assert_eq!(session.world().enemies.len(), enemy_count);
    }
}

#[test]
fn snapshot_reflects_session() {
    let mut session = Session::new(Difficulty::preset(DifficultyLevel::Easy), Some(12));
    session.start();
    session.tick(FRAME_MS);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Running);
    assert_eq!(snapshot.enemies.len(), session.world().enemies.len());
    assert_eq!(snapshot.tick, 1);

    let bytes = snapshot.encode().expect("encode");
    assert!(!bytes.is_empty());
}
