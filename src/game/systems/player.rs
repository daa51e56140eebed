//! Player cell manager
//!
//! Steering of every player cell, split, eject, de-overlap and merge.

use tracing::debug;

use crate::game::constants::{eject, player};
use crate::game::state::{Arena, Body, CellList, PlayerCell, World};
use crate::game::systems::physics;
use crate::util::vec2::Vec2;

/// Collective speed bonus for a player made of `cells` cells
#[inline]
pub fn speed_boost(cells: usize, split: bool) -> f32 {
    if !split {
        return 1.0;
    }
    (1.0 + cells.saturating_sub(1) as f32 * player::BOOST_PER_CELL).min(player::MAX_BOOST)
}

/// Steer every cell toward the move target (or hold the centroid)
pub fn move_cells(world: &mut World) {
    let target = world.player_target();
    let arena = world.arena;
    let boost = speed_boost(world.player.cell_count(), world.player.is_split());

    for cell in world.player.cells_mut() {
        let body = &mut cell.body;
        let direction = (target - body.position).normalize_lenient();
        body.velocity = body.velocity * player::VELOCITY_RETAIN
            + direction * (player::STEER_GAIN * boost);
        body.velocity = body.velocity.clamp_length(body.base_speed() * boost);
        physics::integrate(body, &arena);
    }
}

/// Split the player. Returns false when the preconditions are not met.
pub fn split(world: &mut World) -> bool {
    let target = world.player_target();
    let now = world.clock;
    let arena = world.arena;
    let before = world.player.total_mass();

    if world.player.is_split() {
        let count = world.player.cell_count();
        if count >= player::MAX_CELLS {
            return false;
        }

        let mut free = player::MAX_CELLS - count;
        let mut cells = CellList::new();
        for cell in world.player.cells() {
            if free > 0 && cell.mass() >= player::SPLIT_MIN_MASS {
                let offset = cell.radius() + player::SPLIT_GAP;
                let [a, b] = divide(cell, target, offset, player::SPLIT_SPEED, now, &arena);
                cells.push(a);
                cells.push(b);
                free -= 1;
            } else {
                cells.push(cell.clone());
            }
        }
        if cells.len() == count {
            return false;
        }

        let average = before / cells.len() as f32;
        world.player.merge_lock_until = now + merge_lock_ms(average, cells.len());
        world.player.set_cells(cells);
    } else {
        let cell = &world.player.cells()[0];
        if cell.mass() < player::SPLIT_MIN_MASS {
            return false;
        }
        let pair = divide(
            cell,
            target,
            player::FIRST_SPLIT_OFFSET,
            player::FIRST_SPLIT_SPEED,
            now,
            &arena,
        );
        world.player.set_cells(pair.into_iter().collect());
        world.player.merge_lock_until = now + player::MERGE_LOCK_MS;
    }

    debug!(
        "Player split into {} cells (mass {:.1}), merge locked until {}",
        world.player.cell_count(),
        world.player.total_mass(),
        world.player.merge_lock_until
    );
    true
}

/// Merge lock after a subsequent split: longer for bigger and more
/// numerous cells, capped at a multiple of the base lock
pub fn merge_lock_ms(average_mass: f32, cells: usize) -> u64 {
    let per_cell = player::MERGE_LOCK_MS as f32 + average_mass * player::MERGE_LOCK_PER_MASS_MS;
    let lock = per_cell * (cells as f32 / 2.0).max(1.0);
    let cap = player::MERGE_LOCK_MS * player::MERGE_LOCK_CAP_FACTOR;
    (lock as u64).min(cap)
}

/// Halve a cell along the axis toward `target`. Both halves stay inside
/// the arena even when the parent sits against a wall.
fn divide(
    cell: &PlayerCell,
    target: Vec2,
    offset: f32,
    speed: f32,
    now: u64,
    arena: &Arena,
) -> [PlayerCell; 2] {
    let axis = Vec2::from_angle((target - cell.body.position).angle());
    let half = cell.mass() / 2.0;
    let make = |sign: f32| {
        let mut body = Body::new(cell.body.position + axis * (offset * sign), half)
            .with_velocity(axis * (speed * sign));
        body.clamp_to(arena);
        PlayerCell::new(body, now)
    };
    [make(1.0), make(-1.0)]
}

/// Launch a pellet from every eligible cell toward the move target.
/// Returns the number of pellets created.
pub fn eject(world: &mut World) -> usize {
    if world.player.total_mass() < eject::MIN_TOTAL_MASS {
        return 0;
    }
    let target = world.player_target();

    let mut launches = Vec::new();
    for cell in world.player.cells_mut() {
        if cell.mass() < eject::MIN_CELL_MASS {
            continue;
        }
        let axis = Vec2::from_angle((target - cell.body.position).angle());
        let position = cell.body.position + axis * (cell.radius() + eject::SPAWN_GAP);
        launches.push((position, axis * eject::SPEED));
        cell.body.add_mass(-eject::AMOUNT);
    }

    for &(position, velocity) in &launches {
        world.add_pellet(position, velocity, eject::AMOUNT);
    }
    if !launches.is_empty() {
        debug!("Player ejected {} pellets", launches.len());
    }
    launches.len()
}

/// Push overlapping cells apart and keep them inside the arena
pub fn separate(world: &mut World) {
    if !world.player.is_split() {
        return;
    }
    let arena = world.arena;
    let cells = world.player.cells_mut();

    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            let (head, tail) = cells.split_at_mut(j);
            let a = &mut head[i].body;
            let b = &mut tail[0].body;

            let delta = b.position - a.position;
            let distance = delta.length();
            let min_distance = a.radius() + b.radius();
            if distance >= min_distance {
                continue;
            }

            // Coincident cells separate along +x
            let normal = if distance > 0.0 {
                delta / distance
            } else {
                Vec2::RIGHT
            };
            let push = normal * ((min_distance - distance + player::SEPARATION_SLACK) * 0.5);
            a.position -= push;
            b.position += push;
            a.velocity *= player::SEPARATION_DAMPING;
            b.velocity *= player::SEPARATION_DAMPING;
        }
    }

    for cell in cells.iter_mut() {
        cell.body.clamp_to(&arena);
    }
}

/// What `merge` did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Pairs recombined after the merge lock expired
    pub merged: usize,
    /// Small cells absorbed into their nearest neighbour
    pub absorbed: usize,
}

/// Lock-gated bulk merge followed by small-cell absorption
pub fn merge(world: &mut World) -> MergeReport {
    let mut report = MergeReport::default();
    if !world.player.is_split() {
        return report;
    }
    let now = world.clock;
    let mut cells = world.player.cell_list();

    if now >= world.player.merge_lock_until {
        while let Some((i, j)) = find_merge_pair(&cells) {
            let b = cells.remove(j);
            let a = cells.remove(i);
            cells.push(combine(&a, &b));
            report.merged += 1;
        }
    }

    let mut i = 0;
    while cells.len() > 1 && i < cells.len() {
        let cell = &cells[i];
        let expired = now.saturating_sub(cell.split_time) > player::ABSORB_GRACE_MS;
        if cell.mass() < player::VIABLE_MASS && expired {
            if let Some(nearest) = nearest_other(&cells, i) {
                let small = cells.remove(i);
                let target = if nearest > i { nearest - 1 } else { nearest };
                absorb(&mut cells[target], &small);
                report.absorbed += 1;
                continue;
            }
        }
        i += 1;
    }

    if report.merged > 0 || report.absorbed > 0 {
        world.player.set_cells(cells);
        debug!(
            "Player cells recombined: {} merged, {} absorbed, {} remaining",
            report.merged,
            report.absorbed,
            world.player.cell_count()
        );
    }
    report
}

fn find_merge_pair(cells: &CellList) -> Option<(usize, usize)> {
    if cells.len() < 2 {
        return None;
    }
    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            let (a, b) = (&cells[i].body, &cells[j].body);
            let reach = (a.radius() + b.radius()) * player::MERGE_DISTANCE_FACTOR;
            if a.position.distance_to(b.position) < reach {
                return Some((i, j));
            }
        }
    }
    None
}

fn combine(a: &PlayerCell, b: &PlayerCell) -> PlayerCell {
    let total = a.mass() + b.mass();
    let position = (a.body.position * a.mass() + b.body.position * b.mass()) / total;
    let velocity = (a.body.velocity + b.body.velocity) / 2.0;
    PlayerCell::new(
        Body::new(position, total).with_velocity(velocity),
        a.split_time.max(b.split_time),
    )
}

/// Fold `small` into `into`, keeping `into`'s velocity and split time
fn absorb(into: &mut PlayerCell, small: &PlayerCell) {
    let total = into.mass() + small.mass();
    into.body.position =
        (small.body.position * small.mass() + into.body.position * into.mass()) / total;
    into.body.set_mass(total);
}

fn nearest_other(cells: &CellList, index: usize) -> Option<usize> {
    let origin = cells[index].body.position;
    cells
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(j, c)| (j, origin.distance_sq_to(c.body.position)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(j, _)| j)
}
