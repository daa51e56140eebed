use rand::rngs::StdRng;
use rand::Rng;

use crate::game::constants::motion::*;
use crate::game::state::{Arena, Behavior, Enemy, World};
use crate::game::systems::physics;
use crate::util::vec2::Vec2;

/// Speed cap for an enemy given its archetype, size and behavior
pub fn enemy_speed(enemy: &Enemy, difficulty_multiplier: f32) -> f32 {
    let profile = enemy.archetype.profile();
    let size_scaled = profile.base_speed * (SIZE_SCALE / (enemy.radius() + SIZE_OFFSET));
    let archetype = enemy.archetype.speed_multiplier(enemy.behavior);
    let behavior = match enemy.behavior {
        Behavior::HuntEnemy if enemy.target.is_some() => HUNT_ENEMY_SPEED,
        Behavior::Chase if enemy.target.is_some() => CHASE_SPEED,
        Behavior::Flee if enemy.target.is_some() => {
            FLEE_SPEED + enemy.fear_level * FLEE_SPEED_PER_FEAR
        }
        Behavior::Wander => WANDER_SPEED,
        _ => 1.0,
    };
    size_scaled * archetype * behavior * difficulty_multiplier
}

/// Point the enemy steers toward this tick. Wander jitter is re-sampled on
/// every call.
pub fn steering_target(enemy: &Enemy, arena: &Arena, rng: &mut StdRng) -> Vec2 {
    let position = enemy.position();
    let mut target = match (enemy.behavior, enemy.target) {
        (Behavior::Flee, Some(threat)) => {
            position + (position - threat).normalize_lenient() * FLEE_DISTANCE
        }
        (Behavior::HuntEnemy | Behavior::Chase | Behavior::HuntFood, Some(target)) => target,
        (Behavior::Wander, _) => {
            let half = WANDER_JITTER / 2.0;
            position + Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
        }
        _ => position,
    };

    // Walls override the affected axis
    let margin = enemy.radius() + WALL_MARGIN;
    if position.x < margin {
        target.x = position.x + WALL_PUSH;
    }
    if position.x > arena.width - margin {
        target.x = position.x - WALL_PUSH;
    }
    if position.y < margin {
        target.y = position.y + WALL_PUSH;
    }
    if position.y > arena.height - margin {
        target.y = position.y - WALL_PUSH;
    }
    target
}

/// Damped acceleration toward `target`, capped at `speed`
pub fn steer(enemy: &mut Enemy, target: Vec2, speed: f32) {
    let body = &mut enemy.body;
    let direction = (target - body.position).normalize_lenient();
    body.velocity = body.velocity * VELOCITY_RETAIN + direction * (speed * STEER_GAIN);
    body.velocity = body.velocity.clamp_length(speed);
}

/// Steer, integrate and clamp every enemy
pub fn update(world: &mut World) {
    let arena = world.arena;
    let multiplier = world.difficulty.enemy_speed_multiplier;
    for enemy in world.enemies.iter_mut() {
        let target = steering_target(enemy, &arena, &mut world.rng);
        let speed = enemy_speed(enemy, multiplier);
        steer(enemy, target, speed);
        physics::integrate(&mut enemy.body, &arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::game::archetype::Archetype;
    use crate::game::constants::mass_to_radius;
    use crate::game::state::Hsl;
    use rand::SeedableRng;

    const EPSILON: f32 = 1e-4;

    fn enemy(archetype: Archetype, position: Vec2, mass: f32) -> Enemy {
        Enemy::new(1, archetype, position, mass, Hsl::RED)
    }

    fn size_scaled(archetype: Archetype, mass: f32) -> f32 {
        archetype.profile().base_speed * 30.0 / (mass_to_radius(mass) + 10.0)
    }

    #[test]
    fn test_enemy_speed_behavior_multipliers() {
        let mut e = enemy(Archetype::Basic, Vec2::new(500.0, 500.0), 25.0);
        let base = size_scaled(Archetype::Basic, 25.0);

        e.behavior = Behavior::Wander;
        assert!((enemy_speed(&e, 1.0) - base * 0.8).abs() < EPSILON);

        e.target = Some(Vec2::ZERO);
        e.behavior = Behavior::HuntEnemy;
        assert!((enemy_speed(&e, 1.0) - base * 1.5).abs() < EPSILON);
        e.behavior = Behavior::Chase;
        assert!((enemy_speed(&e, 1.0) - base * 1.3).abs() < EPSILON);
        e.behavior = Behavior::Flee;
        e.fear_level = 3.0;
        assert!((enemy_speed(&e, 1.0) - base * 1.7).abs() < EPSILON);
        e.behavior = Behavior::HuntFood;
        assert!((enemy_speed(&e, 1.0) - base).abs() < EPSILON);
    }

    #[test]
    fn test_cautious_flees_faster() {
        let mut e = enemy(Archetype::Cautious, Vec2::new(500.0, 500.0), 25.0);
        e.target = Some(Vec2::ZERO);
        e.behavior = Behavior::Flee;
        let base = size_scaled(Archetype::Cautious, 25.0);
        assert!((enemy_speed(&e, 1.0) - base * 1.6 * 1.4).abs() < EPSILON);
    }

    #[test]
    fn test_difficulty_multiplier_scales_speed() {
        let e = enemy(Archetype::Speedy, Vec2::new(500.0, 500.0), 20.0);
        assert!((enemy_speed(&e, 1.4) - enemy_speed(&e, 1.0) * 1.4).abs() < EPSILON);
    }

    #[test]
    fn test_flee_steers_away() {
        let arena = Arena::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = enemy(Archetype::Basic, Vec2::new(1000.0, 900.0), 30.0);
        e.behavior = Behavior::Flee;
        e.target = Some(Vec2::new(900.0, 900.0));
        let target = steering_target(&e, &arena, &mut rng);
        assert!(target.approx_eq(Vec2::new(1120.0, 900.0), EPSILON));
    }

    #[test]
    fn test_flee_from_own_position_is_finite() {
        let arena = Arena::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut e = enemy(Archetype::Basic, Vec2::new(1000.0, 900.0), 30.0);
        e.behavior = Behavior::Flee;
        e.target = Some(e.position());
        let target = steering_target(&e, &arena, &mut rng);
        assert!(target.is_finite());
        steer(&mut e, target, 1.0);
        assert!(e.body.velocity.is_finite());
    }

    #[test]
    fn test_wander_jitter_bounded() {
        let arena = Arena::default();
        let mut rng = StdRng::seed_from_u64(2);
        let e = enemy(Archetype::Basic, Vec2::new(1000.0, 900.0), 30.0);
        for _ in 0..50 {
            let target = steering_target(&e, &arena, &mut rng);
            assert!((target.x - 1000.0).abs() <= WANDER_JITTER / 2.0);
            assert!((target.y - 900.0).abs() <= WANDER_JITTER / 2.0);
        }
    }

    #[test]
    fn test_wall_avoidance_overrides_axis() {
        let arena = Arena::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut e = enemy(Archetype::Basic, Vec2::new(30.0, 900.0), 30.0);
        e.behavior = Behavior::Chase;
        e.target = Some(Vec2::new(0.0, 1000.0));
        let target = steering_target(&e, &arena, &mut rng);
        assert_eq!(target.x, 30.0 + WALL_PUSH);
        assert_eq!(target.y, 1000.0);
    }

    #[test]
    fn test_steer_is_damped_and_capped() {
        let mut e = enemy(Archetype::Basic, Vec2::new(500.0, 500.0), 30.0);
        steer(&mut e, Vec2::new(600.0, 500.0), 2.0);
        assert!(e.body.velocity.approx_eq(Vec2::new(0.5, 0.0), EPSILON));

        e.body.velocity = Vec2::new(10.0, 0.0);
        steer(&mut e, Vec2::new(600.0, 500.0), 2.0);
        assert!((e.body.velocity.length() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_update_keeps_enemies_in_arena() {
        let mut world = World::empty(Difficulty::default(), Some(8));
        world.add_enemy(Archetype::Speedy, Vec2::new(15.0, 15.0), 10.0);
        world.add_enemy(Archetype::Tank, Vec2::new(2380.0, 1780.0), 100.0);
        world.enemies[1].body.clamp_to(&world.arena.clone());
        for _ in 0..200 {
            update(&mut world);
            for e in &world.enemies {
                assert!(world.arena.contains(e.position(), e.radius()));
            }
        }
    }
}
