//! Enemy archetypes
//!
//! Every archetype-dependent number the decision engine and the motion
//! controller use lives in one `ArchetypeProfile` row.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::state::{Behavior, Hsl};

/// Fixed enemy sub-species, chosen at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Basic,
    Aggressive,
    Cautious,
    Speedy,
    Tank,
    Hunter,
}

/// Per-archetype tuning row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    /// Speed before size scaling
    pub base_speed: f32,
    /// Spawn mass range, upper bound exclusive
    pub spawn_mass: (f32, f32),
    /// Hue range in degrees, upper bound exclusive
    pub hue: (f32, f32),
    pub saturation: f32,
    pub lightness: f32,
    /// Multiplier applied to the size-scaled speed in every behavior
    pub speed_factor: f32,
    /// Replaces `speed_factor` while fleeing
    pub flee_speed_factor: f32,
    /// How far ahead this archetype extrapolates a moving target
    pub prediction: f32,
}

const BASIC: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.30,
    spawn_mass: (20.0, 70.0),
    hue: (200.0, 260.0),
    saturation: 60.0,
    lightness: 50.0,
    speed_factor: 1.0,
    flee_speed_factor: 1.0,
    prediction: 1.0,
};

const AGGRESSIVE: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.40,
    spawn_mass: (30.0, 70.0),
    hue: (0.0, 30.0),
    saturation: 70.0,
    lightness: 50.0,
    speed_factor: 1.3,
    flee_speed_factor: 1.3,
    prediction: 1.2,
};

const CAUTIOUS: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.25,
    spawn_mass: (15.0, 40.0),
    hue: (180.0, 220.0),
    saturation: 55.0,
    lightness: 60.0,
    speed_factor: 1.0,
    flee_speed_factor: 1.6,
    prediction: 0.8,
};

const SPEEDY: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.60,
    spawn_mass: (10.0, 30.0),
    hue: (60.0, 100.0),
    saturation: 65.0,
    lightness: 55.0,
    speed_factor: 1.8,
    flee_speed_factor: 1.8,
    prediction: 0.7,
};

const TANK: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.15,
    spawn_mass: (50.0, 110.0),
    hue: (280.0, 320.0),
    saturation: 50.0,
    lightness: 45.0,
    speed_factor: 0.7,
    flee_speed_factor: 0.7,
    prediction: 1.0,
};

const HUNTER: ArchetypeProfile = ArchetypeProfile {
    base_speed: 0.35,
    spawn_mass: (25.0, 60.0),
    hue: (120.0, 160.0),
    saturation: 70.0,
    lightness: 45.0,
    speed_factor: 1.2,
    flee_speed_factor: 1.2,
    prediction: 1.5,
};

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Basic,
        Archetype::Aggressive,
        Archetype::Cautious,
        Archetype::Speedy,
        Archetype::Tank,
        Archetype::Hunter,
    ];

    pub fn profile(self) -> &'static ArchetypeProfile {
        match self {
            Archetype::Basic => &BASIC,
            Archetype::Aggressive => &AGGRESSIVE,
            Archetype::Cautious => &CAUTIOUS,
            Archetype::Speedy => &SPEEDY,
            Archetype::Tank => &TANK,
            Archetype::Hunter => &HUNTER,
        }
    }

    /// Uniformly pick an archetype
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Archetype speed multiplier for the given behavior
    pub fn speed_multiplier(self, behavior: Behavior) -> f32 {
        let profile = self.profile();
        if behavior == Behavior::Flee {
            profile.flee_speed_factor
        } else {
            profile.speed_factor
        }
    }

    pub fn random_spawn_mass<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        let (min, max) = self.profile().spawn_mass;
        rng.gen_range(min..max)
    }

    pub fn random_color<R: Rng + ?Sized>(self, rng: &mut R) -> Hsl {
        let profile = self.profile();
        let (min, max) = profile.hue;
        Hsl::new(rng.gen_range(min..max), profile.saturation, profile.lightness)
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Basic => "basic",
            Archetype::Aggressive => "aggressive",
            Archetype::Cautious => "cautious",
            Archetype::Speedy => "speedy",
            Archetype::Tank => "tank",
            Archetype::Hunter => "hunter",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cautious_only_speeds_up_when_fleeing() {
        assert_eq!(Archetype::Cautious.speed_multiplier(Behavior::Wander), 1.0);
        assert_eq!(Archetype::Cautious.speed_multiplier(Behavior::Chase), 1.0);
        assert_eq!(Archetype::Cautious.speed_multiplier(Behavior::Flee), 1.6);
    }

    #[test]
    fn test_speed_multiplier_known_values() {
        let cases = [
            (Archetype::Basic, 1.0),
            (Archetype::Aggressive, 1.3),
            (Archetype::Speedy, 1.8),
            (Archetype::Tank, 0.7),
            (Archetype::Hunter, 1.2),
        ];
        for (archetype, expected) in cases {
            for behavior in [Behavior::Wander, Behavior::Flee, Behavior::HuntEnemy] {
                assert_eq!(
                    archetype.speed_multiplier(behavior),
                    expected,
                    "{} while {:?}",
                    archetype,
                    behavior
                );
            }
        }
    }

    #[test]
    fn test_prediction_ordering() {
        let hunter = Archetype::Hunter.profile().prediction;
        for archetype in Archetype::ALL {
            assert!(archetype.profile().prediction <= hunter);
        }
        assert!(Archetype::Speedy.profile().prediction < Archetype::Cautious.profile().prediction);
    }

    #[test]
    fn test_spawn_mass_within_profile() {
        let mut rng = StdRng::seed_from_u64(7);
        for archetype in Archetype::ALL {
            let (min, max) = archetype.profile().spawn_mass;
            for _ in 0..50 {
                let m = archetype.random_spawn_mass(&mut rng);
                assert!(m >= min && m < max, "{} spawned with {}", archetype, m);
            }
        }
    }

    #[test]
    fn test_color_within_hue_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for archetype in Archetype::ALL {
            let (min, max) = archetype.profile().hue;
            let color = archetype.random_color(&mut rng);
            assert!(color.hue >= min && color.hue < max);
            assert_eq!(color.saturation, archetype.profile().saturation);
        }
    }

    #[test]
    fn test_random_covers_all() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(Archetype::random(&mut rng));
        }
        assert_eq!(seen.len(), Archetype::ALL.len());
    }
}
