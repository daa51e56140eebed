use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown difficulty '{0}' (expected easy, normal, hard or insane)")]
    UnknownDifficulty(String),
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl DifficultyLevel {
    pub fn name(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Normal => "normal",
            DifficultyLevel::Hard => "hard",
            DifficultyLevel::Insane => "insane",
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "normal" => Ok(DifficultyLevel::Normal),
            "hard" => Ok(DifficultyLevel::Hard),
            "insane" => Ok(DifficultyLevel::Insane),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Difficulty descriptor, consumed only when a session is reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: DifficultyLevel,
    /// Number of enemies (constant for the whole session)
    pub enemy_count: usize,
    /// Food items spawned at reset
    pub food_count: usize,
    /// Rage power-ups spawned at reset
    pub initial_power_ups: usize,
    /// Scales every enemy's speed cap
    pub enemy_speed_multiplier: f32,
    /// Delay range (ms) before a collected power-up respawns
    pub power_up_respawn_delay_ms: (u64, u64),
}

impl Difficulty {
    pub fn preset(level: DifficultyLevel) -> Self {
        let (enemy_count, food_count, initial_power_ups, enemy_speed_multiplier, delay) =
            match level {
                DifficultyLevel::Easy => (12, 400, 6, 0.7, (2_500, 5_000)),
                DifficultyLevel::Normal => (25, 320, 5, 1.0, (3_000, 8_000)),
                DifficultyLevel::Hard => (32, 250, 4, 1.2, (5_000, 10_000)),
                DifficultyLevel::Insane => (45, 200, 3, 1.4, (7_000, 12_000)),
            };
        Self {
            level,
            enemy_count,
            food_count,
            initial_power_ups,
            enemy_speed_multiplier,
            power_up_respawn_delay_ms: delay,
        }
    }

    /// Resolve a preset by name, falling back to `normal` for unknown names
    pub fn from_name(name: &str) -> Self {
        match name.parse::<DifficultyLevel>() {
            Ok(level) => Self::preset(level),
            Err(e) => {
                tracing::warn!("{}, using normal", e);
                Self::default()
            }
        }
    }

    /// Validate a (possibly hand-built) descriptor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy_count == 0 {
            return Err(ConfigError::InvalidDifficulty(
                "enemy_count must be at least 1".to_string(),
            ));
        }
        if self.food_count == 0 {
            return Err(ConfigError::InvalidDifficulty(
                "food_count must be at least 1".to_string(),
            ));
        }
        if !(self.enemy_speed_multiplier > 0.0 && self.enemy_speed_multiplier.is_finite()) {
            return Err(ConfigError::InvalidDifficulty(format!(
                "enemy_speed_multiplier must be positive, got {}",
                self.enemy_speed_multiplier
            )));
        }
        let (min, max) = self.power_up_respawn_delay_ms;
        if min > max {
            return Err(ConfigError::InvalidDifficulty(format!(
                "power-up respawn delay range is inverted ({}..{})",
                min, max
            )));
        }
        Ok(())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::preset(DifficultyLevel::Normal)
    }
}

/// Simulation configuration for the headless runner
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub difficulty: Difficulty,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Tick length in milliseconds
    pub frame_ms: u64,
    /// Runner stops the session after this many simulated seconds
    pub duration_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            seed: None,
            frame_ms: 16,
            duration_secs: 120,
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("DIFFICULTY") {
            config.difficulty = Difficulty::from_name(&name);
        }

        if let Ok(seed) = std::env::var("SIM_SEED") {
            match parse_env::<u64>("SIM_SEED", &seed) {
                Ok(parsed) => config.seed = Some(parsed),
                Err(e) => tracing::warn!("{}, seeding from entropy", e),
            }
        }

        if let Ok(frame) = std::env::var("FRAME_MS") {
            match parse_env::<u64>("FRAME_MS", &frame) {
                Ok(parsed) if (1..=1000).contains(&parsed) => config.frame_ms = parsed,
                Ok(_) => tracing::warn!("FRAME_MS must be 1-1000, using default"),
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Ok(duration) = std::env::var("SIM_DURATION_SECS") {
            match parse_env::<u64>("SIM_DURATION_SECS", &duration) {
                Ok(parsed) if parsed > 0 => config.duration_secs = parsed,
                Ok(_) => tracing::warn!("SIM_DURATION_SECS must be > 0, using default"),
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;
        if self.frame_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "FRAME_MS",
                value: "0".to_string(),
            });
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SIM_DURATION_SECS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Number of ticks the runner drives before ending the session
    pub fn max_ticks(&self) -> u64 {
        (self.duration_secs * 1000).div_ceil(self.frame_ms.max(1))
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
