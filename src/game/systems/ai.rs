use rayon::prelude::*;

use crate::game::constants::ai::*;
use crate::game::state::{Behavior, Enemy, Food, World};
use crate::util::vec2::Vec2;

/// What the decision engine needs to know about the player
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub centroid: Vec2,
    pub average_velocity: Vec2,
    pub total_mass: f32,
    pub rage_mode: bool,
}

impl PlayerView {
    pub fn of(world: &World) -> Self {
        Self {
            centroid: world.player.centroid(),
            average_velocity: world.player.average_velocity(),
            total_mass: world.player.total_mass(),
            rage_mode: world.player.rage_mode,
        }
    }
}

/// Result of one think-tick for one enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub behavior: Behavior,
    pub target: Option<Vec2>,
    pub fear_level: f32,
}

impl Decision {
    fn apply(self, enemy: &mut Enemy, now: u64) {
        enemy.behavior = self.behavior;
        enemy.target = self.target;
        enemy.fear_level = self.fear_level;
        enemy.last_think = Some(now);
    }
}

/// Whether the enemy may re-evaluate at `now`
#[inline]
pub fn should_think(enemy: &Enemy, now: u64) -> bool {
    enemy
        .last_think
        .map_or(true, |last| now.saturating_sub(last) >= THINK_INTERVAL_MS)
}

/// Run the decision engine for every enemy.
///
/// Decisions are computed in parallel against the start-of-pass state and
/// applied sequentially, so the result does not depend on scheduling.
pub fn update(world: &mut World) {
    let now = world.clock;
    let player = PlayerView::of(world);

    let decisions: Vec<Option<Decision>> = world
        .enemies
        .par_iter()
        .enumerate()
        .map(|(index, enemy)| {
            if should_think(enemy, now) {
                Some(decide(enemy, index, &world.enemies, &world.food, &player))
            } else {
                None
            }
        })
        .collect();

    for (enemy, decision) in world.enemies.iter_mut().zip(decisions) {
        if let Some(decision) = decision {
            decision.apply(enemy, now);
        }
    }
}

/// Decide behavior and target for one enemy
pub fn decide(
    enemy: &Enemy,
    index: usize,
    enemies: &[Enemy],
    food: &[Food],
    player: &PlayerView,
) -> Decision {
    let profile = enemy.archetype.profile();
    let fear_level = (enemy.fear_level - FEAR_DECAY).max(0.0);

    // Opportunistic predation overrides everything player-related
    if let Some(victim) = find_prey(enemy, index, enemies) {
        let lead = victim.body.velocity * (PREDATION_LEAD * profile.prediction * PREDICTION_FRAMES);
        return Decision {
            behavior: Behavior::HuntEnemy,
            target: Some(victim.position() + lead),
            fear_level,
        };
    }

    let distance = enemy.position().distance_to(player.centroid);
    let predicted = predict_player(profile.prediction, distance, player);

    if distance < ENGAGE_RADIUS {
        if player.rage_mode {
            return Decision {
                behavior: Behavior::Flee,
                target: Some(predicted),
                fear_level: RAGE_FEAR,
            };
        }
        if enemy.mass() > player.total_mass * CHASE_RATIO {
            return Decision {
                behavior: Behavior::Chase,
                target: Some(predicted),
                fear_level,
            };
        }
        if player.total_mass > enemy.mass() * FLEE_RATIO {
            return Decision {
                behavior: Behavior::Flee,
                target: Some(predicted),
                fear_level: FLEE_FEAR,
            };
        }
    }

    forage(enemy, food, fear_level)
}

/// Player position extrapolated along its average velocity. Confidence
/// grows with distance up to a cap.
pub fn predict_player(prediction: f32, distance: f32, player: &PlayerView) -> Vec2 {
    let horizon =
        prediction * (distance / PREDICTION_DISTANCE_SCALE).min(PREDICTION_DISTANCE_CAP);
    player.centroid + player.average_velocity * (horizon * PREDICTION_FRAMES)
}

/// Nearest enemy within predation range that this one outmasses
fn find_prey<'a>(enemy: &Enemy, index: usize, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    enemies
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != index && enemy.mass() > other.mass() * PREDATION_RATIO)
        .map(|(_, other)| (other, enemy.position().distance_to(other.position())))
        .filter(|(_, d)| *d < PREDATION_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(other, _)| other)
}

/// Target the nearest food in range, or wander
fn forage(enemy: &Enemy, food: &[Food], fear_level: f32) -> Decision {
    let nearest = food
        .iter()
        .map(|f| (f, enemy.position().distance_to(f.position)))
        .filter(|(_, d)| *d < FORAGE_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    match nearest {
        Some((f, _)) => Decision {
            behavior: Behavior::HuntFood,
            target: Some(f.position),
            fear_level,
        },
        None => Decision {
            behavior: Behavior::Wander,
            target: None,
            fear_level,
        },
    }
}
