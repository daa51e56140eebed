use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::game::archetype::Archetype;
use crate::game::constants::{food, rage, respawn};
use crate::game::state::{Arena, Behavior, Enemy, EntityId, FruitKind, World};
use crate::util::vec2::Vec2;

/// Fill an empty world according to its difficulty
pub fn populate(world: &mut World) {
    let difficulty = world.difficulty.clone();
    for _ in 0..difficulty.food_count {
        spawn_food(world);
    }
    for _ in 0..difficulty.enemy_count {
        spawn_enemy(world);
    }
    for _ in 0..difficulty.initial_power_ups {
        spawn_power_up(world);
    }
    debug!(
        "Populated world: {} enemies, {} food, {} power-ups",
        world.enemies.len(),
        world.food.len(),
        world.power_ups.len()
    );
}

pub fn spawn_food(world: &mut World) -> EntityId {
    let position = world.arena.random_point(&mut world.rng, food::RADIUS);
    let kind = FruitKind::random(&mut world.rng);
    world.add_food(position, kind)
}

pub fn spawn_power_up(world: &mut World) -> EntityId {
    let position = world.arena.random_point(&mut world.rng, rage::POWER_UP_RADIUS);
    let pulse = world.rng.gen_range(0.0..TAU);
    world.add_power_up(position, pulse)
}

/// Spawn an enemy of random archetype with mass from its archetype range
pub fn spawn_enemy(world: &mut World) -> EntityId {
    let archetype = Archetype::random(&mut world.rng);
    let mass = archetype.random_spawn_mass(&mut world.rng);
    let radius = crate::game::constants::mass_to_radius(mass);
    let position = world.arena.random_point(&mut world.rng, radius);
    let id = world.add_enemy(archetype, position, mass);
    let anim_phase = world.rng.gen_range(0.0..TAU);
    if let Some(enemy) = world.enemies.last_mut() {
        enemy.anim_phase = anim_phase;
    }
    id
}

/// Respawn an eaten enemy in its slot: identity is kept, everything else
/// is re-rolled and the AI state is cleared
pub fn respawn_enemy(enemy: &mut Enemy, arena: &Arena, rng: &mut StdRng) {
    enemy.archetype = Archetype::random(rng);
    enemy.color = enemy.archetype.random_color(rng);
    enemy.body.set_mass(rng.gen_range(respawn::MASS_MIN..respawn::MASS_MAX));
    enemy.body.position = arena.random_point(rng, enemy.radius());
    enemy.body.velocity = Vec2::ZERO;
    enemy.behavior = Behavior::Wander;
    enemy.target = None;
    enemy.fear_level = 0.0;
    enemy.last_think = None;
    enemy.anim_phase = rng.gen_range(0.0..TAU);
}
