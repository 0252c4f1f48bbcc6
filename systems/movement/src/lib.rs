#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that plans boss and enemy steps.
//!
//! Each tick the system proposes at most one step for the boss followed by at
//! most one step per living enemy. The boss chases the player along the axis
//! with the larger remaining distance; enemies perform an undirected random
//! walk. The world re-validates every proposed step, so the system never
//! mutates state directly.

use dungeon_delve_core::{
    BossSnapshot, CellCoord, Command, EnemyView, Event, GridView, PlayerSnapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that reacts to tick events and emits step commands.
#[derive(Clone, Debug)]
pub struct Movement {
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a movement system drawing enemy wander steps from the seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes tick events and immutable views to emit step commands.
    ///
    /// Units that attacked on the previous tick sit out the movement phase;
    /// their wander draw is skipped entirely so the random stream stays
    /// aligned with the original cadence.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        boss: Option<&BossSnapshot>,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TickStarted { .. }))
        {
            return;
        }

        if let Some(boss) = boss {
            if !boss.attacking_prev {
                if let Some(to) = chase_step(player.cell, boss.cell, grid) {
                    out.push(Command::StepBoss { to });
                }
            }
        }

        for enemy in enemies.iter() {
            if enemy.attacking_prev {
                continue;
            }
            let dx = self.rng.gen_range(-1..=1);
            let dy = self.rng.gen_range(-1..=1);
            let Some(to) = enemy.cell.offset(dx, dy) else {
                continue;
            };
            if grid.is_floor(to) {
                out.push(Command::StepEnemy {
                    enemy: enemy.id,
                    to,
                });
            }
        }
    }
}

/// Plans the boss's single chase step toward the player.
///
/// The candidate starts as the diagonal unit step toward the player and
/// collapses onto the axis with the larger remaining distance when that
/// single-axis step is open, then onto the other axis; only when both
/// single-axis steps are blocked does the diagonal candidate survive. The
/// final candidate is returned only if it lands on open floor.
fn chase_step(player: CellCoord, boss: CellCoord, grid: GridView<'_>) -> Option<CellCoord> {
    let distance_x = i64::from(player.column()) - i64::from(boss.column());
    let distance_y = i64::from(player.row()) - i64::from(boss.row());
    let dx = distance_x.signum() as i32;
    let dy = distance_y.signum() as i32;
    if dx == 0 && dy == 0 {
        return None;
    }

    let open = |step_x: i32, step_y: i32| {
        boss.offset(step_x, step_y)
            .filter(|cell| grid.is_floor(*cell))
    };

    let (mut wanted_x, mut wanted_y) = (dx, dy);
    if distance_x.abs() > distance_y.abs() {
        if open(dx, 0).is_some() {
            wanted_y = 0;
        } else if open(0, dy).is_some() {
            wanted_x = 0;
        }
    } else if open(0, dy).is_some() {
        wanted_x = 0;
    } else if open(dx, 0).is_some() {
        wanted_y = 0;
    }

    open(wanted_x, wanted_y)
}
