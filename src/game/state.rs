//! Simulation state definitions
//!
//! Contains every entity (player cells, enemies, food, pellets, particles,
//! power-ups) and the `World` aggregate that owns them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::Difficulty;
use crate::game::archetype::Archetype;
use crate::game::constants::{arena, eject, food, mass, player, rage};
use crate::game::constants::{mass_to_radius, speed_from_radius};
use crate::util::vec2::Vec2;

/// Entity identifier for non-player entities
pub type EntityId = u64;

/// Storage for a split player's cells
pub type CellList = SmallVec<[PlayerCell; player::MAX_CELLS]>;

/// HSL color used for enemies and particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Degrees
    pub hue: f32,
    /// Percent
    pub saturation: f32,
    /// Percent
    pub lightness: f32,
}

impl Hsl {
    pub const GOLD: Hsl = Hsl::new(51.0, 100.0, 50.0);
    pub const GREEN: Hsl = Hsl::new(152.0, 100.0, 50.0);
    pub const RED: Hsl = Hsl::new(0.0, 100.0, 63.0);
    pub const RAGE: Hsl = Hsl::new(334.0, 100.0, 50.0);

    pub const fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({:.0},{:.0}%,{:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Rectangular arena bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: arena::WIDTH,
            height: arena::HEIGHT,
        }
    }
}

impl Arena {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a center so the whole circle stays inside the arena
    pub fn clamp(&self, position: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(position.x, radius, self.width),
            clamp_axis(position.y, radius, self.height),
        )
    }

    /// True when `radius <= x <= width - radius` (same for y)
    pub fn contains(&self, position: Vec2, radius: f32) -> bool {
        position.x >= radius
            && position.x <= self.width - radius
            && position.y >= radius
            && position.y <= self.height - radius
    }

    /// Uniform point whose circle of `radius` fits in the arena
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R, radius: f32) -> Vec2 {
        Vec2::new(
            random_axis(rng, radius, self.width),
            random_axis(rng, radius, self.height),
        )
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if radius * 2.0 >= extent {
        return extent / 2.0;
    }
    value.clamp(radius, extent - radius)
}

fn random_axis<R: Rng + ?Sized>(rng: &mut R, radius: f32, extent: f32) -> f32 {
    if radius * 2.0 >= extent {
        return extent / 2.0;
    }
    rng.gen_range(radius..=extent - radius)
}

/// A moving circle whose radius is derived from its mass.
///
/// Mass is only reachable through setters, so `radius == mass_to_radius(mass)`
/// holds after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    mass: f32,
    radius: f32,
}

impl Body {
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            radius: mass_to_radius(mass),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.radius = mass_to_radius(mass);
    }

    pub fn add_mass(&mut self, delta: f32) {
        self.set_mass(self.mass + delta);
    }

    /// Base locomotion speed at the current radius
    pub fn base_speed(&self) -> f32 {
        speed_from_radius(self.radius)
    }

    /// Circle-circle proximity test used by every consumption rule
    #[inline]
    pub fn touches(&self, position: Vec2, radius: f32) -> bool {
        self.position.distance_to(position) < self.radius + radius
    }

    pub fn clamp_to(&mut self, arena: &Arena) {
        self.position = arena.clamp(self.position, self.radius);
    }
}

/// Fruit kinds (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Banana,
    Grape,
    Strawberry,
    Orange,
}

impl FruitKind {
    pub const ALL: [FruitKind; 5] = [
        FruitKind::Apple,
        FruitKind::Banana,
        FruitKind::Grape,
        FruitKind::Strawberry,
        FruitKind::Orange,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Static food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: EntityId,
    pub position: Vec2,
    pub kind: FruitKind,
}

impl Food {
    pub fn new(id: EntityId, position: Vec2, kind: FruitKind) -> Self {
        Self { id, position, kind }
    }

    pub fn radius(&self) -> f32 {
        food::RADIUS
    }
}

/// Ejected mass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pellet {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    /// Clock time at which the pellet disappears
    pub expires_at: u64,
}

impl Pellet {
    pub fn radius(&self) -> f32 {
        eject::PELLET_RADIUS
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// Cosmetic decay effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Hsl,
    pub expires_at: u64,
    pub size: f32,
}

/// Rage bonus lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub position: Vec2,
    /// Pulse animation phase (radians)
    pub pulse: f32,
}

impl PowerUp {
    pub fn radius(&self) -> f32 {
        rage::POWER_UP_RADIUS
    }
}

/// AI state machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Wander,
    HuntFood,
    Chase,
    Flee,
    HuntEnemy,
}

/// AI-driven opponent. Eaten enemies are respawned in place, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    pub archetype: Archetype,
    pub color: Hsl,
    pub behavior: Behavior,
    /// Current steering target (or fear source while fleeing)
    pub target: Option<Vec2>,
    pub fear_level: f32,
    /// Clock time of the last decision; `None` forces a decision next tick
    pub last_think: Option<u64>,
    /// Rendering only
    pub anim_phase: f32,
}

impl Enemy {
    pub fn new(id: EntityId, archetype: Archetype, position: Vec2, mass: f32, color: Hsl) -> Self {
        Self {
            id,
            body: Body::new(position, mass),
            archetype,
            color,
            behavior: Behavior::Wander,
            target: None,
            fear_level: 0.0,
            last_think: None,
            anim_phase: 0.0,
        }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.body.mass()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius()
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }
}

/// One physical body of the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCell {
    pub body: Body,
    /// Clock time at which this cell was created by a split
    pub split_time: u64,
}

impl PlayerCell {
    pub fn new(body: Body, split_time: u64) -> Self {
        Self { body, split_time }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.body.mass()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius()
    }
}

/// The player is either one body or a non-empty list of at most
/// `MAX_CELLS` cells. A list of one collapses back to `Single`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Cells {
    Single(PlayerCell),
    Split(CellList),
}

/// Result of removing an eaten cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRemoval {
    /// The cell is gone and at least one cell remains
    Removed,
    /// It was the last cell; it stays in place so the final mass can be read
    Eliminated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    cells: Cells,
    pub rage_mode: bool,
    /// Clock time at which rage ends
    pub rage_end: u64,
    /// Clock time before which bulk merging is suppressed
    pub merge_lock_until: u64,
}

impl Player {
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            cells: Cells::Single(PlayerCell::new(Body::new(position, mass), 0)),
            rage_mode: false,
            rage_end: 0,
            merge_lock_until: 0,
        }
    }

    /// All active cells, whatever the representation
    pub fn cells(&self) -> &[PlayerCell] {
        match &self.cells {
            Cells::Single(cell) => std::slice::from_ref(cell),
            Cells::Split(cells) => cells.as_slice(),
        }
    }

    pub fn cells_mut(&mut self) -> &mut [PlayerCell] {
        match &mut self.cells {
            Cells::Single(cell) => std::slice::from_mut(cell),
            Cells::Split(cells) => cells.as_mut_slice(),
        }
    }

    pub fn representation(&self) -> &Cells {
        &self.cells
    }

    pub fn is_split(&self) -> bool {
        matches!(self.cells, Cells::Split(_))
    }

    pub fn cell_count(&self) -> usize {
        self.cells().len()
    }

    /// Replace the cell collection. One cell collapses to `Single`; an empty
    /// list is ignored.
    pub fn set_cells(&mut self, mut cells: CellList) {
        debug_assert!(!cells.is_empty(), "player must keep at least one cell");
        debug_assert!(cells.len() <= player::MAX_CELLS);
        self.cells = match cells.len() {
            0 => return,
            1 => match cells.pop() {
                Some(cell) => Cells::Single(cell),
                None => return,
            },
            _ => Cells::Split(cells),
        };
    }

    /// Copy of the current cells, for rebuild-style operations
    pub fn cell_list(&self) -> CellList {
        self.cells().iter().cloned().collect()
    }

    /// Remove an eaten cell. The last cell is never removed.
    pub fn remove_cell(&mut self, index: usize) -> CellRemoval {
        let Cells::Split(cells) = &mut self.cells else {
            return CellRemoval::Eliminated;
        };
        if cells.len() <= 1 {
            return CellRemoval::Eliminated;
        }
        if index < cells.len() {
            cells.remove(index);
        }
        if cells.len() == 1 {
            if let Some(last) = cells.pop() {
                self.cells = Cells::Single(last);
            }
        }
        CellRemoval::Removed
    }

    pub fn total_mass(&self) -> f32 {
        self.cells().iter().map(|c| c.mass()).sum()
    }

    /// Mass-weighted center of all cells
    pub fn centroid(&self) -> Vec2 {
        let total = self.total_mass();
        let total = if total > 0.0 { total } else { 1.0 };
        let weighted = self
            .cells()
            .iter()
            .fold(Vec2::ZERO, |acc, c| acc + c.body.position * c.mass());
        weighted / total
    }

    pub fn average_velocity(&self) -> Vec2 {
        let cells = self.cells();
        let sum = cells.iter().fold(Vec2::ZERO, |acc, c| acc + c.body.velocity);
        sum / cells.len().max(1) as f32
    }

    /// Distribute a gain across all cells in proportion to their share of
    /// the total mass
    pub fn apply_mass_gain(&mut self, gain: f32) {
        let total = self.total_mass();
        let total = if total > 0.0 { total } else { 1.0 };
        for cell in self.cells_mut() {
            let share = cell.mass() / total;
            cell.body.add_mass(gain * share);
        }
    }

    /// Remaining rage time in milliseconds
    pub fn rage_remaining(&self, now: u64) -> u64 {
        if self.rage_mode {
            self.rage_end.saturating_sub(now)
        } else {
            0
        }
    }
}

/// Camera following the player (display concern only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
}

/// Per-session counters feeding the summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub enemies_eaten: u32,
    pub food_eaten: u32,
    pub pellets_eaten: u32,
    pub cells_lost: u32,
    pub power_ups_collected: u32,
    pub peak_mass: f32,
}

/// The whole simulation. Every collection is owned here; collaborators
/// only read it or write `move_target`.
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    /// Logical clock in milliseconds
    pub clock: u64,
    pub tick: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub food: Vec<Food>,
    pub pellets: Vec<Pellet>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub camera: Camera,
    pub score: u32,
    /// External steering target; `None` holds the centroid
    pub move_target: Option<Vec2>,
    pub stats: SessionStats,
    pub rng: StdRng,
    pub difficulty: Difficulty,
    next_entity_id: EntityId,
}

impl World {
    /// A world with a fresh player at the arena center and no other
    /// entities
    pub fn empty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let arena = Arena::default();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let center = arena.center();
        Self {
            arena,
            clock: 0,
            tick: 0,
            player: Player::new(center, mass::INITIAL),
            enemies: Vec::new(),
            food: Vec::new(),
            pellets: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            camera: Camera {
                position: center,
                zoom: 1.0,
            },
            score: 0,
            move_target: None,
            stats: SessionStats {
                peak_mass: mass::INITIAL,
                ..Default::default()
            },
            rng,
            difficulty,
            next_entity_id: 1,
        }
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Steering target for the player: the external target, or the
    /// centroid (hold position)
    pub fn player_target(&self) -> Vec2 {
        self.move_target.unwrap_or_else(|| self.player.centroid())
    }

    pub fn add_food(&mut self, position: Vec2, kind: FruitKind) -> EntityId {
        let id = self.next_entity_id();
        self.food.push(Food::new(id, position, kind));
        id
    }

    pub fn add_pellet(&mut self, position: Vec2, velocity: Vec2, mass: f32) -> EntityId {
        let id = self.next_entity_id();
        self.pellets.push(Pellet {
            id,
            position,
            velocity,
            mass,
            expires_at: self.clock + eject::LIFETIME_MS,
        });
        id
    }

    pub fn add_power_up(&mut self, position: Vec2, pulse: f32) -> EntityId {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp { id, position, pulse });
        id
    }

    /// Insert an enemy with an explicit archetype, position and mass
    pub fn add_enemy(&mut self, archetype: Archetype, position: Vec2, mass: f32) -> EntityId {
        let id = self.next_entity_id();
        let color = archetype.random_color(&mut self.rng);
        self.enemies.push(Enemy::new(id, archetype, position, mass, color));
        id
    }

    pub fn get_enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }
}
