//! End-of-session summary
//!
//! Computed once when a session ends and reported to the caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::state::World;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The player's last cell was eaten
    Eliminated,
    /// Stopped from outside (duration cap, shutdown, explicit end)
    Ended,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Eliminated => write!(f, "eliminated"),
            EndReason::Ended => write!(f, "ended"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub reason: EndReason,
    pub score: u32,
    /// Total player mass when the session ended
    pub final_mass: f32,
    pub peak_mass: f32,
    pub enemies_eaten: u32,
    pub food_eaten: u32,
    pub pellets_eaten: u32,
    pub cells_lost: u32,
    pub power_ups_collected: u32,
    pub ticks: u64,
    pub duration_ms: u64,
}

/// Build the summary from the world as it stands
pub fn summarize(world: &World, session_id: Uuid, reason: EndReason) -> SessionSummary {
    let final_mass = world.player.total_mass();
    SessionSummary {
        session_id,
        reason,
        score: world.score,
        final_mass,
        peak_mass: world.stats.peak_mass.max(final_mass),
        enemies_eaten: world.stats.enemies_eaten,
        food_eaten: world.stats.food_eaten,
        pellets_eaten: world.stats.pellets_eaten,
        cells_lost: world.stats.cells_lost,
        power_ups_collected: world.stats.power_ups_collected,
        ticks: world.tick,
        duration_ms: world.clock,
    }
}
