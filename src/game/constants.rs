/// Arena dimensions
pub mod arena {
    pub const WIDTH: f32 = 2400.0;
    pub const HEIGHT: f32 = 1800.0;
}

/// Mass-related constants
pub mod mass {
    /// Starting mass for the player
    pub const INITIAL: f32 = 12.0;
    /// Floor applied before taking the square root in `mass_to_radius`
    pub const EPSILON: f32 = 0.0001;
    /// radius = sqrt(mass) * RADIUS_SCALE + RADIUS_BASE
    pub const RADIUS_SCALE: f32 = 2.0;
    pub const RADIUS_BASE: f32 = 5.0;
}

/// Locomotion speed derived from radius
pub mod speed {
    pub const NUMERATOR: f32 = 12.0;
    pub const RADIUS_OFFSET: f32 = 30.0;
}

/// Eat/death ratios. All comparisons are strict.
pub mod collision {
    /// A body must outmass its prey by this factor to eat it
    pub const EAT_RATIO: f32 = 1.15;
    /// An enemy must outmass a player cell by this factor to eat it
    pub const DEATH_RATIO: f32 = 1.10;
}

/// Mass gained per consumption
pub mod gain {
    pub const PLAYER_FOOD_PER_RADIUS: f32 = 0.25;
    pub const PLAYER_PELLET: f32 = 0.8;
    /// Rage multiplier for food and pellets
    pub const PLAYER_RAGE_ITEM: f32 = 3.0;
    pub const PLAYER_ENEMY: f32 = 0.9;
    /// Rage multiplier when the player eats an enemy
    pub const PLAYER_RAGE_ENEMY: f32 = 2.0;
    pub const ENEMY_FOOD_PER_RADIUS: f32 = 0.3;
    pub const ENEMY_PELLET: f32 = 0.9;
    pub const ENEMY_ENEMY: f32 = 0.9;
    pub const ENEMY_CELL: f32 = 0.8;
}

/// AI decision engine
pub mod ai {
    /// Minimum simulated time between two decisions of the same enemy
    pub const THINK_INTERVAL_MS: u64 = 150;
    /// Fear lost per decision
    pub const FEAR_DECAY: f32 = 0.5;
    pub const PREDATION_RADIUS: f32 = 250.0;
    pub const PREDATION_RATIO: f32 = 1.3;
    /// Lead applied to a hunted enemy's velocity (before the archetype factor)
    pub const PREDATION_LEAD: f32 = 0.8;
    pub const ENGAGE_RADIUS: f32 = 300.0;
    pub const CHASE_RATIO: f32 = 1.2;
    pub const FLEE_RATIO: f32 = 1.5;
    pub const FORAGE_RADIUS: f32 = 200.0;
    pub const RAGE_FEAR: f32 = 5.0;
    pub const FLEE_FEAR: f32 = 3.0;
    /// Velocities are per tick; predictions look this many ticks ahead
    pub const PREDICTION_FRAMES: f32 = 60.0;
    /// Distance at which prediction reaches full confidence
    pub const PREDICTION_DISTANCE_SCALE: f32 = 100.0;
    pub const PREDICTION_DISTANCE_CAP: f32 = 2.0;
}

/// AI motion controller
pub mod motion {
    pub const VELOCITY_RETAIN: f32 = 0.75;
    pub const STEER_GAIN: f32 = 0.25;
    /// speed = base * SIZE_SCALE / (radius + SIZE_OFFSET)
    pub const SIZE_SCALE: f32 = 30.0;
    pub const SIZE_OFFSET: f32 = 10.0;
    pub const FLEE_DISTANCE: f32 = 120.0;
    /// Full width of the wander jitter box
    pub const WANDER_JITTER: f32 = 80.0;
    pub const WALL_MARGIN: f32 = 50.0;
    pub const WALL_PUSH: f32 = 120.0;

    pub const HUNT_ENEMY_SPEED: f32 = 1.5;
    pub const CHASE_SPEED: f32 = 1.3;
    pub const FLEE_SPEED: f32 = 1.4;
    pub const FLEE_SPEED_PER_FEAR: f32 = 0.1;
    pub const WANDER_SPEED: f32 = 0.8;
}

/// Player cell manager
pub mod player {
    pub const VELOCITY_RETAIN: f32 = 0.85;
    pub const STEER_GAIN: f32 = 0.6;
    pub const BOOST_PER_CELL: f32 = 0.15;
    pub const MAX_BOOST: f32 = 2.0;

    /// Upper bound on simultaneous player cells
    pub const MAX_CELLS: usize = 8;
    pub const SPLIT_MIN_MASS: f32 = 20.0;
    pub const FIRST_SPLIT_OFFSET: f32 = 30.0;
    pub const FIRST_SPLIT_SPEED: f32 = 4.0;
    /// Later splits are offset by the cell radius plus this gap
    pub const SPLIT_GAP: f32 = 15.0;
    pub const SPLIT_SPEED: f32 = 5.0;

    pub const MERGE_LOCK_MS: u64 = 10_000;
    pub const MERGE_LOCK_PER_MASS_MS: f32 = 20.0;
    pub const MERGE_LOCK_CAP_FACTOR: u64 = 3;
    /// Two cells merge once closer than this fraction of their summed radii
    pub const MERGE_DISTANCE_FACTOR: f32 = 0.8;

    /// Cells below this mass get absorbed after the grace period
    pub const VIABLE_MASS: f32 = 15.0;
    pub const ABSORB_GRACE_MS: u64 = 2_000;

    pub const SEPARATION_SLACK: f32 = 0.5;
    pub const SEPARATION_DAMPING: f32 = 0.7;
}

/// Mass ejection
pub mod eject {
    pub const MIN_TOTAL_MASS: f32 = 15.0;
    pub const MIN_CELL_MASS: f32 = 15.0;
    pub const AMOUNT: f32 = 2.0;
    pub const SPEED: f32 = 8.0;
    pub const PELLET_RADIUS: f32 = 4.0;
    /// Distance past the cell edge at which the pellet appears
    pub const SPAWN_GAP: f32 = 5.0;
    pub const LIFETIME_MS: u64 = 5_000;
    pub const DAMPING: f32 = 0.98;
}

pub mod food {
    pub const RADIUS: f32 = 10.0;
}

/// Enemy respawn-in-place
pub mod respawn {
    pub const MASS_MIN: f32 = 20.0;
    pub const MASS_MAX: f32 = 40.0;
}

/// Rage power-up
pub mod rage {
    pub const DURATION_MS: u64 = 10_000;
    pub const POWER_UP_RADIUS: f32 = 15.0;
    /// Extra bursts scattered around a collected power-up
    pub const PICKUP_EXTRA_BURSTS: usize = 8;
    pub const PICKUP_SCATTER: f32 = 30.0;
    /// Extra bursts when the player eats an enemy while raging
    pub const FEAST_BURSTS: usize = 5;
    pub const FEAST_SCATTER: f32 = 20.0;
}

/// Cosmetic particles
pub mod particles {
    pub const PER_BURST: usize = 6;
    /// Full width of the spawn box and velocity box
    pub const SPREAD: f32 = 10.0;
    pub const SPEED: f32 = 4.0;
    pub const LIFETIME_MS: u64 = 800;
    pub const DAMPING: f32 = 0.95;
    pub const SIZE_MIN: f32 = 1.0;
    pub const SIZE_MAX: f32 = 4.0;
    pub const SHRINK: f32 = 0.96;
}

pub mod camera {
    pub const ZOOM_REFERENCE_MASS: f32 = 10.0;
    pub const ZOOM_MASS_RANGE: f32 = 350.0;
    pub const MIN_ZOOM: f32 = 0.45;
    pub const MAX_ZOOM: f32 = 1.2;
    pub const ZOOM_LERP: f32 = 0.03;
    pub const POSITION_LERP: f32 = 0.08;
}

pub mod input {
    /// Two taps closer than this become a split
    pub const DOUBLE_TAP_MS: u64 = 250;
    pub const BUFFER_CAPACITY: usize = 256;
}

/// Calculate radius from mass
#[inline]
pub fn mass_to_radius(mass: f32) -> f32 {
    mass.max(mass::EPSILON).sqrt() * mass::RADIUS_SCALE + mass::RADIUS_BASE
}

/// Base locomotion speed for a body of the given radius
#[inline]
pub fn speed_from_radius(radius: f32) -> f32 {
    speed::NUMERATOR / (radius + speed::RADIUS_OFFSET).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_to_radius() {
        // sqrt(100) * 2 + 5 = 25
        assert!((mass_to_radius(100.0) - 25.0).abs() < 0.001);
        assert!((mass_to_radius(12.0) - (12.0f32.sqrt() * 2.0 + 5.0)).abs() < 0.001);
    }

    #[test]
    fn test_mass_to_radius_floor() {
        for m in [0.0, -5.0, f32::MIN] {
            let r = mass_to_radius(m);
            assert!(r >= mass::RADIUS_BASE);
            assert!(r.is_finite());
        }
    }

    #[test]
    fn test_mass_to_radius_monotonic() {
        let masses = [1.0, 10.0, 20.0, 50.0, 100.0, 500.0];
        for pair in masses.windows(2) {
            assert!(mass_to_radius(pair[0]) < mass_to_radius(pair[1]));
        }
    }

    #[test]
    fn test_speed_from_radius_decreasing() {
        let radii = [5.0, 10.0, 25.0, 60.0, 200.0];
        for pair in radii.windows(2) {
            assert!(
                speed_from_radius(pair[0]) > speed_from_radius(pair[1]),
                "speed should drop from r={} to r={}",
                pair[0],
                pair[1]
            );
        }
        // 12 / sqrt(70 + 30) = 1.2
        assert!((speed_from_radius(70.0) - 1.2).abs() < 0.001);
    }

    #[test]
    fn test_ratio_ordering() {
        assert!(collision::EAT_RATIO > collision::DEATH_RATIO);
        assert!(collision::DEATH_RATIO > 1.0);
        assert!(ai::PREDATION_RATIO > collision::EAT_RATIO);
    }

    #[test]
    fn test_split_thresholds() {
        // Halves of a minimum split fall under the viable mass
        assert!(player::SPLIT_MIN_MASS / 2.0 < player::VIABLE_MASS);
        assert!(player::SPLIT_MIN_MASS > player::VIABLE_MASS);
        assert!(player::MAX_CELLS >= 2);
    }

    #[test]
    fn test_respawn_range() {
        assert!(respawn::MASS_MIN < respawn::MASS_MAX);
    }
}
