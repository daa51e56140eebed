use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cell_arena::config::SimConfig;
use cell_arena::game::constants::collision::DEATH_RATIO;
use cell_arena::game::input::{InputCommand, TapDetector};
use cell_arena::game::session::Session;
use cell_arena::game::snapshot::Snapshot;
use cell_arena::game::summary::EndReason;
use cell_arena::util::vec2::Vec2;

/// Distance at which the autopilot reacts to a dangerous enemy
const THREAT_RADIUS: f32 = 250.0;
/// How far ahead the autopilot aims when running away
const ESCAPE_DISTANCE: f32 = 200.0;
/// Total mass above which the autopilot splits
const SPLIT_MASS: f32 = 80.0;
const SPLIT_COOLDOWN_MS: u64 = 5_000;

/// Stand-in for a human: chases food, runs from bigger enemies and
/// double-taps to split when large
#[derive(Default)]
struct Autopilot {
    taps: TapDetector,
    last_split: Option<u64>,
}

impl Autopilot {
    fn commands(&mut self, snapshot: &Snapshot) -> Vec<InputCommand> {
        let mut commands = Vec::new();
        let Some(largest) = snapshot
            .cells
            .iter()
            .map(|c| c.mass)
            .max_by(|a, b| a.total_cmp(b))
        else {
            return commands;
        };
        let total = snapshot.total_mass.max(f32::EPSILON);
        let centroid = snapshot
            .cells
            .iter()
            .fold(Vec2::ZERO, |acc, c| acc + c.position * c.mass)
            / total;

        let threat = snapshot
            .enemies
            .iter()
            .filter(|e| e.mass > largest * DEATH_RATIO)
            .map(|e| (e.position, centroid.distance_to(e.position)))
            .filter(|(_, d)| *d < THREAT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let target = match threat {
            Some((position, _)) => {
                centroid + (centroid - position).normalize_lenient() * ESCAPE_DISTANCE
            }
            None => snapshot
                .food
                .iter()
                .min_by(|a, b| {
                    centroid
                        .distance_sq_to(a.position)
                        .total_cmp(&centroid.distance_sq_to(b.position))
                })
                .map(|f| f.position)
                .unwrap_or_else(|| Vec2::new(snapshot.arena.width / 2.0, snapshot.arena.height / 2.0)),
        };
        commands.push(InputCommand::MoveTarget(Some(target)));

        let cooled_down = self
            .last_split
            .map_or(true, |at| snapshot.clock.saturating_sub(at) >= SPLIT_COOLDOWN_MS);
        if threat.is_none() && snapshot.total_mass >= SPLIT_MASS && cooled_down {
            self.taps.tap(snapshot.clock);
            if let Some(split) = self.taps.tap(snapshot.clock + 100) {
                self.last_split = Some(snapshot.clock);
                commands.push(split);
            }
        }
        commands
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Cell Arena v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: {} difficulty, {}ms frames, {}s cap, seed {:?}",
        config.difficulty.level, config.frame_ms, config.duration_secs, config.seed
    );

    let mut session = Session::new(config.difficulty.clone(), config.seed);
    let sender = session.input_sender();
    let mut autopilot = Autopilot::default();
    session.start();

    let mut ticker = interval(Duration::from_millis(config.frame_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let max_ticks = config.max_ticks();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };
    tokio::pin!(shutdown);

    let summary = loop {
        tokio::select! {
            _ = ticker.tick() => {
                for command in autopilot.commands(&session.snapshot()) {
                    if let Err(e) = sender.try_send(command) {
                        warn!("Dropping autopilot input: {}", e);
                    }
                }
                if let Some(summary) = session.tick(config.frame_ms) {
                    break summary;
                }

                let world = session.world();
                if world.tick >= max_ticks {
                    break session.end(EndReason::Ended);
                }
                if world.clock % 30_000 < config.frame_ms {
                    info!(
                        "Sim: {}s, tick {}, mass {:.1}, {} cells, score {}",
                        world.clock / 1000,
                        world.tick,
                        world.player.total_mass(),
                        world.player.cell_count(),
                        world.score
                    );
                }
            }
            _ = &mut shutdown => {
                break session.end(EndReason::Ended);
            }
        }
    };

    info!("Summary: {}", serde_json::to_string(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_arena::config::Difficulty;

    fn create_test_session() -> Session {
        let mut session = Session::new(Difficulty::default(), Some(17));
        session.world_mut().enemies.clear();
        session
    }

    #[test]
    fn test_autopilot_seeks_food() {
        let session = create_test_session();
        let snapshot = session.snapshot();
        let commands = Autopilot::default().commands(&snapshot);
        let nearest = snapshot
            .food
            .iter()
            .map(|f| f.position)
            .min_by(|a, b| {
                let c = snapshot.cells[0].position;
                c.distance_sq_to(*a).total_cmp(&c.distance_sq_to(*b))
            });
        assert_eq!(commands, vec![InputCommand::MoveTarget(nearest)]);
    }

    #[test]
    fn test_autopilot_flees_larger_enemy() {
        let mut session = create_test_session();
        let center = session.world().player.centroid();
        session.world_mut().add_enemy(
            cell_arena::game::archetype::Archetype::Tank,
            center + Vec2::new(100.0, 0.0),
            80.0,
        );
        let commands = Autopilot::default().commands(&session.snapshot());
        match commands.first() {
            Some(InputCommand::MoveTarget(Some(target))) => assert!(target.x < center.x),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_autopilot_double_taps_when_large() {
        let mut session = create_test_session();
        session.world_mut().player.cells_mut()[0].body.set_mass(100.0);
        let mut autopilot = Autopilot::default();
        let commands = autopilot.commands(&session.snapshot());
        assert!(commands.contains(&InputCommand::Split));
        // Cooldown holds off the next split
        let commands = autopilot.commands(&session.snapshot());
        assert!(!commands.contains(&InputCommand::Split));
    }
}
