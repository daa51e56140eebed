//! Read-only frame view for renderers
//!
//! A `Snapshot` owns copies of everything a renderer draws, so it can be
//! handed to another thread or encoded with bincode.

use serde::{Deserialize, Serialize};

use crate::game::archetype::Archetype;
use crate::game::session::SessionPhase;
use crate::game::state::{Arena, Behavior, Camera, EntityId, FruitKind, Hsl, World};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub clock: u64,
    pub phase: SessionPhase,
    pub arena: Arena,
    pub food: Vec<FoodView>,
    pub pellets: Vec<PelletView>,
    pub particles: Vec<ParticleView>,
    pub power_ups: Vec<PowerUpView>,
    pub enemies: Vec<EnemyView>,
    pub cells: Vec<CellView>,
    pub split: bool,
    pub camera: Camera,
    pub score: u32,
    pub total_mass: f32,
    pub rage_remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodView {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
    pub kind: FruitKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PelletView {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec2,
    pub color: Hsl,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
    pub pulse: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub archetype: Archetype,
    pub behavior: Behavior,
    pub color: Hsl,
    pub anim_phase: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Snapshot {
    pub fn capture(world: &World, phase: SessionPhase) -> Self {
        Self {
            tick: world.tick,
            clock: world.clock,
            phase,
            arena: world.arena,
            food: world
                .food
                .iter()
                .map(|f| FoodView {
                    id: f.id,
                    position: f.position,
                    radius: f.radius(),
                    kind: f.kind,
                })
                .collect(),
            pellets: world
                .pellets
                .iter()
                .map(|p| PelletView {
                    id: p.id,
                    position: p.position,
                    radius: p.radius(),
                })
                .collect(),
            particles: world
                .particles
                .iter()
                .map(|p| ParticleView {
                    position: p.position,
                    color: p.color,
                    size: p.size,
                })
                .collect(),
            power_ups: world
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    id: p.id,
                    position: p.position,
                    radius: p.radius(),
                    pulse: p.pulse,
                })
                .collect(),
            enemies: world
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    position: e.position(),
                    radius: e.radius(),
                    mass: e.mass(),
                    archetype: e.archetype,
                    behavior: e.behavior,
                    color: e.color,
                    anim_phase: e.anim_phase,
                })
                .collect(),
            cells: world
                .player
                .cells()
                .iter()
                .map(|c| CellView {
                    position: c.body.position,
                    radius: c.radius(),
                    mass: c.mass(),
                })
                .collect(),
            split: world.player.is_split(),
            camera: world.camera,
            score: world.score,
            total_mass: world.player.total_mass(),
            rage_remaining_ms: world.player.rage_remaining(world.clock),
        }
    }

    /// Encode with bincode (legacy config, fixed-size integers)
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serde::encode_to_vec(self, bincode::config::legacy())
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, SnapshotError> {
        bincode::serde::decode_from_slice(data, bincode::config::legacy())
            .map(|(snapshot, _)| snapshot)
            .map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot encode error: {0}")]
    Encode(String),
    #[error("Snapshot decode error: {0}")]
    Decode(String),
}
