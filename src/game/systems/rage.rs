use tracing::debug;

use crate::game::constants::rage::*;
use crate::game::state::{Hsl, World};
use crate::game::systems::physics::{burst, scattered_bursts};

/// Collect touched power-ups and expire rage. Returns how many power-ups
/// were picked up this tick; the caller schedules their respawn.
pub fn update(world: &mut World) -> usize {
    let now = world.clock;
    let mut collected = 0;

    let World {
        player,
        power_ups,
        particles,
        rng,
        ..
    } = world;

    power_ups.retain(|power_up| {
        let touched = player
            .cells()
            .iter()
            .any(|cell| cell.body.touches(power_up.position, power_up.radius()));
        if !touched {
            return true;
        }
        player.rage_mode = true;
        player.rage_end = now + DURATION_MS;
        burst(particles, rng, now, power_up.position, Hsl::RAGE);
        scattered_bursts(
            particles,
            rng,
            now,
            power_up.position,
            Hsl::RAGE,
            PICKUP_EXTRA_BURSTS,
            PICKUP_SCATTER,
        );
        collected += 1;
        debug!("Rage power-up {} collected, rage until {}", power_up.id, player.rage_end);
        false
    });

    if player.rage_mode && now > player.rage_end {
        player.rage_mode = false;
        debug!("Rage expired at {}", now);
    }

    collected
}
