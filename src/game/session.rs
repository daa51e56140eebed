//! Session lifecycle and the per-tick pipeline
//!
//! A `Session` owns the world, the input buffer and the scheduled-event
//! queue. Each `tick` runs the systems in a fixed order:
//! input → scheduled events → player movement → de-overlap → merge →
//! rage/pellets/particles → enemy AI → enemy motion → interactions →
//! confinement → camera.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::config::Difficulty;
use crate::game::constants::input::BUFFER_CAPACITY;
use crate::game::input::{InputBuffer, InputBufferError, InputCommand, InputSender};
use crate::game::schedule::{ScheduledEvent, Scheduler};
use crate::game::snapshot::Snapshot;
use crate::game::state::World;
use crate::game::summary::{summarize, EndReason, SessionSummary};
use crate::game::systems::interaction::{self, InteractionEvent};
use crate::game::systems::{ai, camera, motion, physics, player, rage, spawn};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Built but not started
    #[default]
    Idle,
    Running,
    /// Frozen; the summary is available
    Ended,
}

pub struct Session {
    id: Uuid,
    world: World,
    scheduler: Scheduler,
    /// Bumped on every reset; scheduled events from older generations are
    /// dropped when they come due
    generation: u64,
    phase: SessionPhase,
    input: InputBuffer,
    seed: Option<u64>,
    summary: Option<SessionSummary>,
}

impl Session {
    /// A populated session in the `Idle` phase
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            world: World::empty(difficulty.clone(), seed),
            scheduler: Scheduler::new(),
            generation: 0,
            phase: SessionPhase::Idle,
            input: InputBuffer::new(BUFFER_CAPACITY),
            seed,
            summary: None,
        };
        session.reset(difficulty);
        session
    }

    /// Rebuild every collection and the player. Pending scheduled events
    /// stay queued but belong to a stale generation.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.generation += 1;
        self.id = Uuid::new_v4();
        self.world = World::empty(difficulty, self.seed);
        spawn::populate(&mut self.world);
        self.phase = SessionPhase::Idle;
        self.summary = None;
        self.input.drain();
        info!(
            "Session {} reset ({} difficulty, generation {})",
            self.id, self.world.difficulty.level, self.generation
        );
    }

    pub fn start(&mut self) {
        if self.phase != SessionPhase::Idle {
            debug!("Ignoring start in phase {:?}", self.phase);
            return;
        }
        self.phase = SessionPhase::Running;
        info!("Session {} started", self.id);
    }

    /// Freeze the session and report. Ending twice returns the first summary.
    pub fn end(&mut self, reason: EndReason) -> SessionSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }
        self.phase = SessionPhase::Ended;
        let summary = summarize(&self.world, self.id, reason);
        info!(
            "Session {} {}: score {}, final mass {:.1}, {} ticks",
            self.id, reason, summary.score, summary.final_mass, summary.ticks
        );
        self.summary = Some(summary.clone());
        summary
    }

    /// Advance the simulation by `dt_ms`. Returns the summary on the tick
    /// the player is eliminated. Outside `Running` this does nothing.
    pub fn tick(&mut self, dt_ms: u64) -> Option<SessionSummary> {
        if self.phase != SessionPhase::Running {
            return None;
        }

        self.world.clock += dt_ms;
        self.world.tick += 1;

        for command in self.input.drain() {
            self.apply(command);
        }
        self.run_scheduled();

        player::move_cells(&mut self.world);
        player::separate(&mut self.world);
        player::merge(&mut self.world);

        let collected = rage::update(&mut self.world);
        for _ in 0..collected {
            self.schedule_power_up();
        }
        self.world.stats.power_ups_collected += collected as u32;
        physics::update_pellets(&mut self.world);
        physics::update_particles(&mut self.world);

        ai::update(&mut self.world);
        motion::update(&mut self.world);

        let events = interaction::resolve(&mut self.world);
        if self.record(&events) {
            return Some(self.end(EndReason::Eliminated));
        }

        physics::confine(&mut self.world);
        camera::update(&mut self.world);

        let mass = self.world.player.total_mass();
        if mass > self.world.stats.peak_mass {
            self.world.stats.peak_mass = mass;
        }
        trace!(
            "Tick {} at {}ms: mass {:.1}, {} cells, {} events",
            self.world.tick,
            self.world.clock,
            mass,
            self.world.player.cell_count(),
            events.len()
        );
        None
    }

    fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::MoveTarget(target) => self.world.move_target = target,
            InputCommand::Split => {
                player::split(&mut self.world);
            }
            InputCommand::Eject => {
                player::eject(&mut self.world);
            }
        }
    }

    fn run_scheduled(&mut self) {
        for scheduled in self.scheduler.drain_due(self.world.clock) {
            if scheduled.generation != self.generation {
                debug!(
                    "Dropping stale {:?} from generation {} (current {})",
                    scheduled.event, scheduled.generation, self.generation
                );
                continue;
            }
            match scheduled.event {
                ScheduledEvent::SpawnPowerUp => {
                    let id = spawn::spawn_power_up(&mut self.world);
                    debug!("Power-up {} respawned at {}ms", id, self.world.clock);
                }
            }
        }
    }

    fn schedule_power_up(&mut self) {
        let (min, max) = self.world.difficulty.power_up_respawn_delay_ms;
        let delay = if max > min {
            self.world.rng.gen_range(min..=max)
        } else {
            min
        };
        let due_at = self.world.clock + delay;
        self.scheduler
            .schedule(due_at, self.generation, ScheduledEvent::SpawnPowerUp);
        debug!("Power-up respawn scheduled for {}ms", due_at);
    }

    /// Fold interaction events into the session statistics. Returns true
    /// when the player was eliminated.
    fn record(&mut self, events: &[InteractionEvent]) -> bool {
        let stats = &mut self.world.stats;
        let mut eliminated = false;
        for event in events {
            match event {
                InteractionEvent::PlayerAteEnemy { .. } => stats.enemies_eaten += 1,
                InteractionEvent::PlayerAteFood { .. } => stats.food_eaten += 1,
                InteractionEvent::PlayerAtePellet { .. } => stats.pellets_eaten += 1,
                InteractionEvent::CellEaten { .. } => stats.cells_lost += 1,
                InteractionEvent::PlayerEliminated { enemy } => {
                    debug!("Player eliminated by enemy {}", enemy);
                    eliminated = true;
                }
                InteractionEvent::EnemyAteEnemy { predator, prey, .. } => {
                    trace!("Enemy {} ate enemy {}", predator, prey);
                }
            }
        }
        eliminated
    }

    /// Queue a command for the next tick
    pub fn submit(&self, command: InputCommand) -> Result<(), InputBufferError> {
        self.input.try_submit(command)
    }

    /// Handle for input producers on other tasks
    pub fn input_sender(&self) -> InputSender {
        self.input.sender()
    }

    pub fn set_move_target(&mut self, target: Option<Vec2>) {
        self.world.move_target = target;
    }

    /// Split immediately. Ignored once the session has ended.
    pub fn split(&mut self) -> bool {
        self.phase != SessionPhase::Ended && player::split(&mut self.world)
    }

    /// Eject immediately; returns the number of pellets launched
    pub fn eject(&mut self) -> usize {
        if self.phase == SessionPhase::Ended {
            return 0;
        }
        player::eject(&mut self.world)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world, self.phase)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }
}
