#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that plans proximity strikes for the combat phase.
//!
//! Strikes resolve in a fixed order within a tick: every enemy adjacent to
//! the player attacks unconditionally, then the boss if adjacent, then the
//! player if an attack was queued since the last combat phase. Two units are
//! adjacent when their Chebyshev distance is at most one, so diagonals count.

use dungeon_delve_core::{BossSnapshot, Combatant, Command, EnemyView, PlayerSnapshot};

/// Combat system that queues strike commands for the world to resolve.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::Strike` entries for every attack due this tick.
    pub fn handle(
        &mut self,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        boss: Option<&BossSnapshot>,
        attack_queued: bool,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        for enemy in enemies.iter() {
            if enemy.cell.is_near(player.cell) {
                self.scratch.push(Command::Strike {
                    attacker: Combatant::Enemy(enemy.id),
                });
            }
        }

        if let Some(boss) = boss {
            if boss.cell.is_near(player.cell) {
                self.scratch.push(Command::Strike {
                    attacker: Combatant::Boss,
                });
            }
        }

        if attack_queued {
            self.scratch.push(Command::Strike {
                attacker: Combatant::Player,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_delve_core::{CellCoord, EnemyId, EnemySnapshot, Health, Strength};

    fn player_at(cell: CellCoord) -> PlayerSnapshot {
        PlayerSnapshot {
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            strength: Strength::NONE,
            strength_prev: Strength::NONE,
            attacking: false,
            attacking_prev: false,
            moved: false,
        }
    }

    fn enemy_at(id: u32, cell: CellCoord) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            attacking: false,
            attacking_prev: false,
        }
    }

    fn boss_at(cell: CellCoord) -> BossSnapshot {
        BossSnapshot {
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            attacking: false,
            attacking_prev: false,
        }
    }

    #[test]
    fn diagonal_neighbors_strike_but_two_cell_gaps_never_do() {
        let mut combat = Combat::new();
        let player = player_at(CellCoord::new(3, 3));
        let enemies = EnemyView::from_snapshots(vec![
            enemy_at(0, CellCoord::new(4, 4)),
            enemy_at(1, CellCoord::new(5, 3)),
        ]);
        let mut out = Vec::new();

        combat.handle(&player, &enemies, None, false, &mut out);

        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: Combatant::Enemy(EnemyId::new(0)),
            }],
        );
    }

    #[test]
    fn strikes_resolve_enemies_then_boss_then_player() {
        let mut combat = Combat::new();
        let player = player_at(CellCoord::new(2, 2));
        let enemies = EnemyView::from_snapshots(vec![
            enemy_at(4, CellCoord::new(1, 2)),
            enemy_at(2, CellCoord::new(3, 1)),
        ]);
        let boss = boss_at(CellCoord::new(2, 3));
        let mut out = Vec::new();

        combat.handle(&player, &enemies, Some(&boss), true, &mut out);

        assert_eq!(
            out,
            vec![
                Command::Strike {
                    attacker: Combatant::Enemy(EnemyId::new(2)),
                },
                Command::Strike {
                    attacker: Combatant::Enemy(EnemyId::new(4)),
                },
                Command::Strike {
                    attacker: Combatant::Boss,
                },
                Command::Strike {
                    attacker: Combatant::Player,
                },
            ],
        );
    }

    #[test]
    fn queued_attack_is_planned_even_with_nothing_in_reach() {
        let mut combat = Combat::new();
        let player = player_at(CellCoord::new(0, 0));
        let enemies = EnemyView::from_snapshots(Vec::new());
        let boss = boss_at(CellCoord::new(9, 9));
        let mut out = Vec::new();

        combat.handle(&player, &enemies, Some(&boss), true, &mut out);

        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: Combatant::Player,
            }],
        );
    }

    #[test]
    fn distant_units_plan_nothing() {
        let mut combat = Combat::new();
        let player = player_at(CellCoord::new(0, 0));
        let enemies = EnemyView::from_snapshots(vec![enemy_at(0, CellCoord::new(2, 0))]);
        let mut out = Vec::new();

        combat.handle(&player, &enemies, None, false, &mut out);

        assert!(out.is_empty());
    }
}
