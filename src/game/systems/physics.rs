use rand::rngs::StdRng;
use rand::Rng;

use crate::game::constants::{eject, particles};
use crate::game::state::{Arena, Body, Hsl, Particle, World};
use crate::util::vec2::Vec2;

/// Integrate a body one tick and clamp it into the arena
#[inline]
pub fn integrate(body: &mut Body, arena: &Arena) {
    body.position += body.velocity;
    body.clamp_to(arena);
}

/// Clamp every enemy and player cell back inside the arena. Bodies that
/// grew while eating can overlap a wall until this runs.
pub fn confine(world: &mut World) {
    let arena = world.arena;
    for enemy in world.enemies.iter_mut() {
        enemy.body.clamp_to(&arena);
    }
    for cell in world.player.cells_mut() {
        cell.body.clamp_to(&arena);
    }
}

/// Move pellets, apply damping and drop those that expired or left the arena
pub fn update_pellets(world: &mut World) {
    let now = world.clock;
    let arena = world.arena;
    world.pellets.retain_mut(|pellet| {
        pellet.position += pellet.velocity;
        pellet.velocity *= eject::DAMPING;
        !pellet.is_expired(now) && arena.contains(pellet.position, pellet.radius())
    });
}

/// Move, damp and shrink particles; drop expired ones
pub fn update_particles(world: &mut World) {
    let now = world.clock;
    world.particles.retain_mut(|p| {
        p.position += p.velocity;
        p.velocity *= particles::DAMPING;
        p.size *= particles::SHRINK;
        now <= p.expires_at
    });
}

/// Emit one burst of cosmetic particles around `at`
pub fn burst(out: &mut Vec<Particle>, rng: &mut StdRng, now: u64, at: Vec2, color: Hsl) {
    let half_spread = particles::SPREAD / 2.0;
    let half_speed = particles::SPEED / 2.0;
    for _ in 0..particles::PER_BURST {
        out.push(Particle {
            position: at + Vec2::new(
                rng.gen_range(-half_spread..half_spread),
                rng.gen_range(-half_spread..half_spread),
            ),
            velocity: Vec2::new(
                rng.gen_range(-half_speed..half_speed),
                rng.gen_range(-half_speed..half_speed),
            ),
            color,
            expires_at: now + particles::LIFETIME_MS,
            size: rng.gen_range(particles::SIZE_MIN..particles::SIZE_MAX),
        });
    }
}

/// `count` bursts scattered uniformly in a square of side `scatter`
pub fn scattered_bursts(
    out: &mut Vec<Particle>,
    rng: &mut StdRng,
    now: u64,
    at: Vec2,
    color: Hsl,
    count: usize,
    scatter: f32,
) {
    let half = scatter / 2.0;
    for _ in 0..count {
        let offset = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        burst(out, rng, now, at + offset, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::SeedableRng;

    fn create_test_world() -> World {
        World::empty(Difficulty::default(), Some(42))
    }

    #[test]
    fn test_integrate_clamps() {
        let arena = Arena::default();
        let mut body = Body::new(Vec2::new(15.0, 15.0), 20.0).with_velocity(Vec2::new(-50.0, 0.0));
        integrate(&mut body, &arena);
        assert!(arena.contains(body.position, body.radius()));
        assert_eq!(body.position.x, body.radius());
    }

    #[test]
    fn test_confine_after_growth() {
        let mut world = create_test_world();
        world.add_enemy(crate::game::archetype::Archetype::Basic, Vec2::new(20.0, 900.0), 20.0);
        world.enemies[0].body.clamp_to(&Arena::default());
        world.enemies[0].body.add_mass(200.0);
        assert!(!world.arena.contains(world.enemies[0].position(), world.enemies[0].radius()));

        confine(&mut world);
        let enemy = &world.enemies[0];
        assert!(world.arena.contains(enemy.position(), enemy.radius()));
    }

    #[test]
    fn test_pellet_damping() {
        let mut world = create_test_world();
        world.add_pellet(Vec2::new(500.0, 500.0), Vec2::new(8.0, 0.0), 2.0);
        update_pellets(&mut world);
        let pellet = &world.pellets[0];
        assert!((pellet.position.x - 508.0).abs() < 1e-4);
        assert!((pellet.velocity.x - 8.0 * eject::DAMPING).abs() < 1e-4);
    }

    #[test]
    fn test_pellet_expires() {
        let mut world = create_test_world();
        world.add_pellet(Vec2::new(500.0, 500.0), Vec2::ZERO, 2.0);
        world.clock = eject::LIFETIME_MS;
        update_pellets(&mut world);
        assert_eq!(world.pellets.len(), 1);
        world.clock += 1;
        update_pellets(&mut world);
        assert!(world.pellets.is_empty());
    }

    #[test]
    fn test_pellet_leaving_arena_removed() {
        let mut world = create_test_world();
        world.add_pellet(Vec2::new(6.0, 500.0), Vec2::new(-8.0, 0.0), 2.0);
        update_pellets(&mut world);
        assert!(world.pellets.is_empty());
    }

    #[test]
    fn test_burst_and_decay() {
        let mut world = create_test_world();
        let mut rng = StdRng::seed_from_u64(5);
        let at = Vec2::new(300.0, 300.0);
        burst(&mut world.particles, &mut rng, 0, at, Hsl::GOLD);
        assert_eq!(world.particles.len(), particles::PER_BURST);
        for p in &world.particles {
            assert!((p.position.x - at.x).abs() <= particles::SPREAD / 2.0);
            assert!(p.size >= particles::SIZE_MIN && p.size < particles::SIZE_MAX);
        }

        let sizes: Vec<f32> = world.particles.iter().map(|p| p.size).collect();
        update_particles(&mut world);
        for (p, before) in world.particles.iter().zip(sizes) {
            assert!(p.size < before);
        }

        world.clock = particles::LIFETIME_MS + 1;
        update_particles(&mut world);
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_scattered_bursts_count() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(9);
        scattered_bursts(&mut out, &mut rng, 0, Vec2::new(100.0, 100.0), Hsl::RAGE, 8, 30.0);
        assert_eq!(out.len(), 8 * particles::PER_BURST);
    }
}
