//! Consumption rules between every pair of interacting entities
//!
//! Runs once per tick after all movement. Enemies are processed in index
//! order: each one eats food and pellets, then fights every later enemy,
//! then meets the player's cells. The player's own food and pellet pass
//! runs last.

use crate::game::constants::collision::{DEATH_RATIO, EAT_RATIO};
use crate::game::constants::{gain, rage};
use crate::game::state::{CellRemoval, EntityId, Hsl, World};
use crate::game::systems::physics::{burst, scattered_bursts};
use crate::game::systems::spawn::respawn_enemy;

/// Outcome of one consumption, consumed by the session for statistics
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    EnemyAteEnemy {
        predator: EntityId,
        prey: EntityId,
        gained: f32,
    },
    PlayerAteEnemy {
        enemy: EntityId,
        gained: f32,
    },
    CellEaten {
        enemy: EntityId,
        cell_mass: f32,
    },
    /// The last cell was eaten; the session is over
    PlayerEliminated {
        enemy: EntityId,
    },
    PlayerAteFood {
        gained: f32,
    },
    PlayerAtePellet {
        gained: f32,
    },
}

/// Strict eat rule: equal masses never consume each other
#[inline]
pub fn can_eat(predator_mass: f32, prey_mass: f32) -> bool {
    predator_mass > prey_mass * EAT_RATIO
}

#[inline]
pub fn can_kill_cell(enemy_mass: f32, cell_mass: f32) -> bool {
    enemy_mass > cell_mass * DEATH_RATIO
}

/// Resolve every interaction for this tick. Stops early once the player is
/// eliminated.
pub fn resolve(world: &mut World) -> Vec<InteractionEvent> {
    let mut events = Vec::new();

    for i in 0..world.enemies.len() {
        enemy_feed(world, i);
        enemy_fights(world, i, &mut events);
        if player_meets_enemy(world, i, &mut events) {
            return events;
        }
    }

    player_feed(world, &mut events);
    events
}

fn enemy_feed(world: &mut World, i: usize) {
    let World {
        enemies,
        food,
        pellets,
        ..
    } = world;
    let enemy = &mut enemies[i];

    food.retain(|item| {
        if !enemy.body.touches(item.position, item.radius()) {
            return true;
        }
        enemy
            .body
            .add_mass(item.radius() * gain::ENEMY_FOOD_PER_RADIUS);
        false
    });

    pellets.retain(|pellet| {
        if !enemy.body.touches(pellet.position, pellet.radius()) {
            return true;
        }
        enemy.body.add_mass(pellet.mass * gain::ENEMY_PELLET);
        false
    });
}

fn enemy_fights(world: &mut World, i: usize, events: &mut Vec<InteractionEvent>) {
    let World {
        enemies,
        particles,
        rng,
        arena,
        clock,
        ..
    } = world;
    let now = *clock;

    for j in (i + 1)..enemies.len() {
        let (head, tail) = enemies.split_at_mut(j);
        let a = &mut head[i];
        let b = &mut tail[0];
        if !a.body.touches(b.position(), b.radius()) {
            continue;
        }

        let (predator, prey) = if can_eat(a.mass(), b.mass()) {
            (a, b)
        } else if can_eat(b.mass(), a.mass()) {
            (b, a)
        } else {
            continue;
        };

        let gained = prey.mass() * gain::ENEMY_ENEMY;
        predator.body.add_mass(gained);
        burst(particles, rng, now, prey.position(), prey.color);
        events.push(InteractionEvent::EnemyAteEnemy {
            predator: predator.id,
            prey: prey.id,
            gained,
        });
        respawn_enemy(prey, arena, rng);
    }
}

/// Returns true when the player was eliminated
fn player_meets_enemy(world: &mut World, i: usize, events: &mut Vec<InteractionEvent>) -> bool {
    let now = world.clock;
    let raging = world.player.rage_mode;
    let mut c = 0;

    // The cell list can shrink mid-loop, so the cell is re-fetched by index
    // every iteration and a removal does not advance the index.
    while c < world.player.cell_count() {
        let (cell_position, cell_radius, cell_mass) = {
            let cell = &world.player.cells()[c];
            (cell.body.position, cell.radius(), cell.mass())
        };
        let enemy = &world.enemies[i];
        if !enemy.body.touches(cell_position, cell_radius) {
            c += 1;
            continue;
        }

        if can_eat(cell_mass, enemy.mass()) {
            let multiplier = if raging { gain::PLAYER_RAGE_ENEMY } else { 1.0 };
            let gained = enemy.mass() * gain::PLAYER_ENEMY * multiplier;
            let (id, at) = (enemy.id, enemy.position());
            world.player.apply_mass_gain(gained);

            let World {
                enemies,
                particles,
                rng,
                arena,
                ..
            } = world;
            burst(particles, rng, now, at, Hsl::RED);
            if raging {
                scattered_bursts(
                    particles,
                    rng,
                    now,
                    at,
                    Hsl::RAGE,
                    rage::FEAST_BURSTS,
                    rage::FEAST_SCATTER,
                );
            }
            respawn_enemy(&mut enemies[i], arena, rng);
            events.push(InteractionEvent::PlayerAteEnemy { enemy: id, gained });
            // The slot now holds a fresh enemy elsewhere
            return false;
        } else if can_kill_cell(enemy.mass(), cell_mass) {
            let id = enemy.id;
            world.enemies[i]
                .body
                .add_mass(cell_mass * gain::ENEMY_CELL);
            burst(
                &mut world.particles,
                &mut world.rng,
                now,
                cell_position,
                Hsl::RED,
            );
            events.push(InteractionEvent::CellEaten {
                enemy: id,
                cell_mass,
            });
            if world.player.remove_cell(c) == CellRemoval::Eliminated {
                events.push(InteractionEvent::PlayerEliminated { enemy: id });
                return true;
            }
        } else {
            c += 1;
        }
    }
    false
}

fn player_feed(world: &mut World, events: &mut Vec<InteractionEvent>) {
    let World {
        player,
        food,
        pellets,
        particles,
        rng,
        clock,
        score,
        ..
    } = world;
    let now = *clock;
    let raging = player.rage_mode;
    let multiplier = if raging { gain::PLAYER_RAGE_ITEM } else { 1.0 };

    food.retain(|item| {
        let Some(cell) = player
            .cells_mut()
            .iter_mut()
            .find(|cell| cell.body.touches(item.position, item.radius()))
        else {
            return true;
        };
        let gained = item.radius() * gain::PLAYER_FOOD_PER_RADIUS * multiplier;
        cell.body.add_mass(gained);
        *score += 1;
        burst(particles, rng, now, item.position, Hsl::GREEN);
        if raging {
            burst(particles, rng, now, cell.body.position, Hsl::RAGE);
        }
        events.push(InteractionEvent::PlayerAteFood { gained });
        false
    });

    pellets.retain(|pellet| {
        let Some(cell) = player
            .cells_mut()
            .iter_mut()
            .find(|cell| cell.body.touches(pellet.position, pellet.radius()))
        else {
            return true;
        };
        let gained = pellet.mass * gain::PLAYER_PELLET * multiplier;
        cell.body.add_mass(gained);
        *score += 1;
        burst(particles, rng, now, pellet.position, Hsl::GOLD);
        if raging {
            burst(particles, rng, now, cell.body.position, Hsl::RAGE);
        }
        events.push(InteractionEvent::PlayerAtePellet { gained });
        false
    });
}
