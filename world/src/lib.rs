#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dungeon Delve.
//!
//! The world owns the cell grid, the player, the enemy roster, and the boss
//! slot. Every mutation arrives as a [`Command`] through [`apply`], is
//! validated against the current state, and either takes effect (broadcasting
//! [`Event`] values) or is silently ignored. Invalid requests never corrupt
//! state; the grid and the units are kept in sync write-through on every
//! accepted move, spawn, and despawn.

mod grid;
mod units;

use dungeon_delve_core::{
    config::Config, Armor, Blueprint, CellCoord, CellKind, Combatant, Command, Direction, EnemyId,
    Event, GameStatus, Rules, WELCOME_BANNER,
};

use crate::{
    grid::{Grid, ShadowGrid},
    units::{BossState, EnemyState, PlayerState},
};

/// Represents the authoritative Dungeon Delve world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    status: GameStatus,
    grid: Grid,
    shadow: ShadowGrid,
    rules: Rules,
    player: Option<PlayerState>,
    enemies: Vec<EnemyState>,
    next_enemy_id: u32,
    boss: Option<BossState>,
    attack_queued: bool,
    tick_index: u64,
}

impl World {
    /// Creates an empty world awaiting a [`Command::LoadDungeon`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            status: GameStatus::Active,
            grid: Grid::empty(),
            shadow: ShadowGrid::empty(),
            rules: Rules::from(&Config::default()),
            player: None,
            enemies: Vec::new(),
            next_enemy_id: 0,
            boss: None,
            attack_queued: false,
            tick_index: 0,
        }
    }

    fn is_loaded(&self) -> bool {
        self.player.is_some()
    }

    fn load_dungeon(&mut self, blueprint: Blueprint, rules: Rules, out_events: &mut Vec<Event>) {
        let Blueprint {
            columns,
            rows,
            cells,
            player,
            enemies,
            boss,
            swords,
            potions,
        } = blueprint;

        let Some(mut grid) = Grid::from_cells(columns, rows, cells) else {
            return;
        };
        if grid.kind(player) != Some(CellKind::Floor) {
            return;
        }

        grid.set(player, CellKind::Player);
        self.player = Some(PlayerState::spawned_at(player));

        self.enemies.clear();
        self.next_enemy_id = 0;
        for cell in enemies {
            if grid.kind(cell) != Some(CellKind::Floor) {
                continue;
            }
            let id = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id += 1;
            grid.set(cell, CellKind::Enemy);
            self.enemies.push(EnemyState::spawned_at(id, cell));
        }

        self.boss = boss.and_then(|cell| {
            if grid.kind(cell) == Some(CellKind::Floor) {
                grid.set(cell, CellKind::Boss);
                Some(BossState::spawned_at(cell))
            } else {
                None
            }
        });

        for cell in swords {
            if grid.kind(cell) == Some(CellKind::Floor) {
                grid.set(cell, CellKind::Sword);
            }
        }
        for cell in potions {
            if grid.kind(cell) == Some(CellKind::Floor) {
                grid.set(cell, CellKind::Potion);
            }
        }

        self.grid = grid;
        self.shadow.reset(columns, rows);
        self.rules = rules;
        self.status = GameStatus::Active;
        self.attack_queued = false;
        self.tick_index = 0;

        out_events.push(Event::DungeonLoaded { columns, rows });
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.status != GameStatus::Active {
            return;
        }
        let rules = self.rules;
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if player.moved {
            return;
        }
        let Some(target) = player.cell.step(direction) else {
            return;
        };
        let Some(kind) = self.grid.kind(target) else {
            return;
        };
        if !kind.is_walkable() {
            return;
        }

        match kind {
            CellKind::Sword => {
                player.strength.gain(rules.sword_buff);
                out_events.push(Event::SwordCollected { cell: target });
            }
            CellKind::Potion => {
                player.health.restore(rules.potion_heal);
                out_events.push(Event::PotionCollected { cell: target });
            }
            _ => {}
        }

        let from = player.cell;
        self.grid.set(from, CellKind::Floor);
        self.grid.set(target, CellKind::Player);
        player.cell = target;
        player.moved = true;
        out_events.push(Event::PlayerMoved { from, to: target });
    }

    fn step_enemy(&mut self, enemy: EnemyId, to: CellCoord, out_events: &mut Vec<Event>) {
        if self.status != GameStatus::Active {
            return;
        }
        if self.grid.kind(to) != Some(CellKind::Floor) {
            return;
        }
        let Some(state) = self.enemies.iter_mut().find(|state| state.id == enemy) else {
            return;
        };
        if state.cell.chebyshev_distance(to) != 1 {
            return;
        }

        let from = state.cell;
        self.grid.set(from, CellKind::Floor);
        self.grid.set(to, CellKind::Enemy);
        state.cell = to;
        out_events.push(Event::EnemyMoved { enemy, from, to });
    }

    fn step_boss(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        if self.status != GameStatus::Active {
            return;
        }
        if self.grid.kind(to) != Some(CellKind::Floor) {
            return;
        }
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if boss.cell.chebyshev_distance(to) != 1 {
            return;
        }

        let from = boss.cell;
        self.grid.set(from, CellKind::Floor);
        self.grid.set(to, CellKind::Boss);
        boss.cell = to;
        out_events.push(Event::BossMoved { from, to });
    }

    fn strike(&mut self, attacker: Combatant, out_events: &mut Vec<Event>) {
        if self.status != GameStatus::Active {
            return;
        }
        match attacker {
            Combatant::Enemy(enemy) => self.enemy_strike(enemy, out_events),
            Combatant::Boss => self.boss_strike(out_events),
            Combatant::Player => self.player_strike(out_events),
        }
    }

    fn enemy_strike(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let Some(state) = self.enemies.iter_mut().find(|state| state.id == enemy) else {
            return;
        };
        if !state.cell.is_near(player.cell) {
            return;
        }

        state.attacking = true;
        let damage = self.rules.enemy_damage;
        player.health.absorb(damage, Armor::NONE);
        out_events.push(Event::PlayerStruck {
            attacker: Combatant::Enemy(enemy),
            damage,
            remaining: player.health,
        });
    }

    fn boss_strike(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if !boss.cell.is_near(player.cell) {
            return;
        }

        boss.attacking = true;
        let damage = self.rules.boss_damage;
        player.health.absorb(damage, Armor::NONE);
        out_events.push(Event::PlayerStruck {
            attacker: Combatant::Boss,
            damage,
            remaining: player.health,
        });
    }

    fn player_strike(&mut self, out_events: &mut Vec<Event>) {
        if !self.attack_queued {
            return;
        }
        self.attack_queued = false;

        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.attacking = true;
        let player_cell = player.cell;
        let raw = self.rules.player_damage * player.strength.multiplier();

        for state in self.enemies.iter_mut() {
            if !state.cell.is_near(player_cell) {
                continue;
            }
            state.health.absorb(raw, Armor::NONE);
            out_events.push(Event::EnemyStruck {
                enemy: state.id,
                damage: raw,
                remaining: state.health,
            });
        }

        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].health.is_depleted() {
                let slain = self.enemies.remove(index);
                self.grid.set(slain.cell, CellKind::Floor);
                out_events.push(Event::EnemySlain {
                    enemy: slain.id,
                    cell: slain.cell,
                });
            } else {
                index += 1;
            }
        }

        if let Some(boss) = self.boss.as_mut() {
            if boss.cell.is_near(player_cell) {
                let armor = self.rules.boss_armor;
                boss.health.absorb(raw, armor);
                out_events.push(Event::BossStruck {
                    damage: raw / armor.get(),
                    remaining: boss.health,
                });
                if boss.health.is_depleted() {
                    let cell = boss.cell;
                    self.grid.set(cell, CellKind::Sword);
                    self.boss = None;
                    out_events.push(Event::BossSlain { cell });
                }
            }
        }
    }

    fn commit_tick(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        if self.status == GameStatus::Active {
            if player.health.is_depleted() {
                self.grid.set(player.cell, CellKind::Sword);
                self.status = GameStatus::Lost;
                out_events.push(Event::StatusChanged {
                    status: GameStatus::Lost,
                });
            } else if self.enemies.is_empty() && self.boss.is_none() {
                self.status = GameStatus::Won;
                out_events.push(Event::StatusChanged {
                    status: GameStatus::Won,
                });
            }
        }

        self.shadow.commit(&self.grid);
        player.commit();
        for enemy in self.enemies.iter_mut() {
            enemy.commit();
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.commit();
        }
        out_events.push(Event::TickCommitted {
            tick: self.tick_index,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadDungeon { blueprint, rules } => {
            world.load_dungeon(blueprint, rules, out_events);
        }
        Command::Tick => {
            if world.status != GameStatus::Active || !world.is_loaded() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TickStarted {
                tick: world.tick_index,
            });
        }
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::QueuePlayerAttack => {
            if world.status == GameStatus::Active && world.is_loaded() {
                world.attack_queued = true;
            }
        }
        Command::StepEnemy { enemy, to } => world.step_enemy(enemy, to, out_events),
        Command::StepBoss { to } => world.step_boss(to, out_events),
        Command::Strike { attacker } => world.strike(attacker, out_events),
        Command::CommitTick => world.commit_tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_delve_core::{
        BossSnapshot, CellCoord, CellKind, EnemyView, GridView, PlayerSnapshot,
    };

    use super::{GameStatus, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current lifecycle status of the run.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Index of the most recently opened tick.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the current cell grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        let (columns, rows) = world.grid.dimensions();
        GridView::new(world.grid.cells(), columns, rows)
    }

    /// Marker committed for the cell at the end of the previous tick.
    ///
    /// Returns `None` for cells never committed, so a fresh dungeon reports
    /// every cell as changed on its first frame.
    #[must_use]
    pub fn committed_kind(world: &World, cell: CellCoord) -> Option<CellKind> {
        world.shadow.kind(cell)
    }

    /// Captures the player's state, absent before a dungeon loads.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(super::PlayerState::snapshot)
    }

    /// Captures a read-only view of the living enemy roster.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(super::EnemyState::snapshot)
                .collect(),
        )
    }

    /// Captures the boss's state while it remains alive.
    #[must_use]
    pub fn boss(world: &World) -> Option<BossSnapshot> {
        world.boss.as_ref().map(super::BossState::snapshot)
    }

    /// Reports whether a player attack is latched for the next combat phase.
    #[must_use]
    pub fn attack_queued(world: &World) -> bool {
        world.attack_queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_delve_core::config::Config;
    use dungeon_delve_core::{Blueprint, Health, Strength};

    fn open_blueprint(columns: u32, rows: u32, player: CellCoord) -> Blueprint {
        let capacity = columns as usize * rows as usize;
        Blueprint {
            columns,
            rows,
            cells: vec![CellKind::Floor; capacity],
            player,
            enemies: Vec::new(),
            boss: None,
            swords: Vec::new(),
            potions: Vec::new(),
        }
    }

    fn load(world: &mut World, blueprint: Blueprint) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::LoadDungeon {
                blueprint,
                rules: Rules::from(&Config::default()),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn load_stamps_markers_and_reports_dimensions() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(6, 5, CellCoord::new(1, 1));
        blueprint.enemies.push(CellCoord::new(4, 4));
        blueprint.boss = Some(CellCoord::new(5, 0));
        blueprint.swords.push(CellCoord::new(0, 4));
        blueprint.potions.push(CellCoord::new(3, 2));

        let events = load(&mut world, blueprint);

        assert_eq!(
            events,
            vec![Event::DungeonLoaded {
                columns: 6,
                rows: 5
            }]
        );
        let grid = query::grid_view(&world);
        assert_eq!(grid.kind(CellCoord::new(1, 1)), Some(CellKind::Player));
        assert_eq!(grid.kind(CellCoord::new(4, 4)), Some(CellKind::Enemy));
        assert_eq!(grid.kind(CellCoord::new(5, 0)), Some(CellKind::Boss));
        assert_eq!(grid.kind(CellCoord::new(0, 4)), Some(CellKind::Sword));
        assert_eq!(grid.kind(CellCoord::new(3, 2)), Some(CellKind::Potion));
        assert_eq!(query::enemy_view(&world).len(), 1);
        assert!(query::boss(&world).is_some());
    }

    #[test]
    fn player_move_collects_pickups_and_latches() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(4, 4, CellCoord::new(1, 1));
        blueprint.swords.push(CellCoord::new(2, 1));
        let _ = load(&mut world, blueprint);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );

        let player = query::player(&world).expect("player loaded");
        assert_eq!(player.cell, CellCoord::new(2, 1));
        assert_eq!(player.strength, Strength::new(50.0));
        assert!(player.moved);
        assert!(events.contains(&Event::SwordCollected {
            cell: CellCoord::new(2, 1)
        }));
        let grid = query::grid_view(&world);
        assert_eq!(grid.kind(CellCoord::new(1, 1)), Some(CellKind::Floor));
        assert_eq!(grid.kind(CellCoord::new(2, 1)), Some(CellKind::Player));

        // A second move in the same tick is silently dropped.
        events.clear();
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(
            query::player(&world).expect("player").cell,
            CellCoord::new(2, 1)
        );
    }

    #[test]
    fn potion_restores_health_up_to_cap() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(4, 4, CellCoord::new(1, 1));
        blueprint.potions.push(CellCoord::new(1, 2));
        let _ = load(&mut world, blueprint);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::South,
            },
            &mut events,
        );

        let player = query::player(&world).expect("player");
        assert_eq!(player.health, Health::FULL);
        assert!(events.contains(&Event::PotionCollected {
            cell: CellCoord::new(1, 2)
        }));
    }

    #[test]
    fn enemy_steps_reject_non_adjacent_and_occupied_targets() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(5, 5, CellCoord::new(0, 0));
        blueprint.enemies.push(CellCoord::new(3, 3));
        blueprint.swords.push(CellCoord::new(3, 4));
        let _ = load(&mut world, blueprint);
        let enemy = query::enemy_view(&world).into_vec()[0].id;

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(3, 1),
            },
            &mut events,
        );
        assert!(events.is_empty(), "two-cell jump must be rejected");

        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(3, 4),
            },
            &mut events,
        );
        assert!(events.is_empty(), "pickups block enemy movement");

        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(2, 2),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EnemyMoved {
                enemy,
                from: CellCoord::new(3, 3),
                to: CellCoord::new(2, 2),
            }]
        );
    }

    #[test]
    fn queued_player_strike_hits_every_near_target_once() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(5, 5, CellCoord::new(2, 2));
        blueprint.enemies.push(CellCoord::new(1, 1));
        blueprint.enemies.push(CellCoord::new(3, 2));
        blueprint.enemies.push(CellCoord::new(0, 0));
        blueprint.boss = Some(CellCoord::new(2, 3));
        let _ = load(&mut world, blueprint);

        let mut events = Vec::new();
        apply(&mut world, Command::QueuePlayerAttack, &mut events);
        apply(
            &mut world,
            Command::Strike {
                attacker: Combatant::Player,
            },
            &mut events,
        );

        let struck: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyStruck { .. }))
            .collect();
        assert_eq!(struck.len(), 2, "only near enemies are hit");
        let boss = query::boss(&world).expect("boss alive");
        assert_eq!(boss.health, Health::new(90.0));
        assert!(query::player(&world).expect("player").attacking);

        // The latch was consumed; a second strike without queueing is a no-op.
        events.clear();
        apply(
            &mut world,
            Command::Strike {
                attacker: Combatant::Player,
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn slain_enemies_leave_floor_and_boss_drops_a_sword() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(5, 5, CellCoord::new(2, 2));
        blueprint.enemies.push(CellCoord::new(1, 2));
        blueprint.boss = Some(CellCoord::new(3, 2));
        let _ = load(&mut world, blueprint);

        let mut events = Vec::new();
        // Four full-strength strikes fell a 100-health enemy (25 per hit) and
        // leave the boss at 60 (10 per hit through 2.5 armor).
        for _ in 0..4 {
            apply(&mut world, Command::QueuePlayerAttack, &mut events);
            apply(
                &mut world,
                Command::Strike {
                    attacker: Combatant::Player,
                },
                &mut events,
            );
        }

        assert!(query::enemy_view(&world).is_empty());
        let grid = query::grid_view(&world);
        assert_eq!(grid.kind(CellCoord::new(1, 2)), Some(CellKind::Floor));
        assert_eq!(
            query::boss(&world).expect("boss alive").health,
            Health::new(60.0)
        );

        // Six more strikes finish the boss; its cell becomes a sword drop.
        for _ in 0..6 {
            apply(&mut world, Command::QueuePlayerAttack, &mut events);
            apply(
                &mut world,
                Command::Strike {
                    attacker: Combatant::Player,
                },
                &mut events,
            );
        }
        assert!(query::boss(&world).is_none());
        assert_eq!(
            query::grid_view(&world).kind(CellCoord::new(3, 2)),
            Some(CellKind::Sword)
        );
        assert!(events.contains(&Event::BossSlain {
            cell: CellCoord::new(3, 2)
        }));
    }

    #[test]
    fn commit_evaluates_loss_before_win_and_resets_flags() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(4, 4, CellCoord::new(1, 1));
        blueprint.enemies.push(CellCoord::new(2, 1));
        let _ = load(&mut world, blueprint);
        let enemy = query::enemy_view(&world).into_vec()[0].id;

        // Twenty enemy strikes drain the player's 100 health.
        let mut events = Vec::new();
        for _ in 0..20 {
            apply(
                &mut world,
                Command::Strike {
                    attacker: Combatant::Enemy(enemy),
                },
                &mut events,
            );
        }
        assert!(query::player(&world).expect("player").health.is_depleted());

        events.clear();
        apply(&mut world, Command::CommitTick, &mut events);

        assert_eq!(query::status(&world), GameStatus::Lost);
        assert!(events.contains(&Event::StatusChanged {
            status: GameStatus::Lost
        }));
        assert_eq!(
            query::grid_view(&world).kind(CellCoord::new(1, 1)),
            Some(CellKind::Sword),
            "corpse marker replaces the player cell"
        );
        let player = query::player(&world).expect("player");
        assert!(!player.attacking);
        assert!(!player.moved);

        // Terminal status freezes further mutation.
        events.clear();
        apply(&mut world, Command::Tick, &mut events);
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn commit_reports_win_when_no_hostiles_remain() {
        let mut world = World::new();
        let blueprint = open_blueprint(3, 3, CellCoord::new(1, 1));
        let _ = load(&mut world, blueprint);

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::CommitTick, &mut events);

        assert_eq!(query::status(&world), GameStatus::Won);
        assert!(events.contains(&Event::StatusChanged {
            status: GameStatus::Won
        }));
    }

    #[test]
    fn commit_snapshots_previous_state_for_diffing() {
        let mut world = World::new();
        let blueprint = open_blueprint(3, 3, CellCoord::new(0, 0));
        let _ = load(&mut world, blueprint);

        assert_eq!(query::committed_kind(&world, CellCoord::new(0, 0)), None);

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::CommitTick, &mut events);

        assert_eq!(
            query::committed_kind(&world, CellCoord::new(0, 0)),
            Some(CellKind::Player)
        );
        assert_eq!(
            query::committed_kind(&world, CellCoord::new(1, 1)),
            Some(CellKind::Floor)
        );
    }

    #[test]
    fn enemy_strike_requires_adjacency() {
        let mut world = World::new();
        let mut blueprint = open_blueprint(6, 6, CellCoord::new(0, 0));
        blueprint.enemies.push(CellCoord::new(4, 0));
        let _ = load(&mut world, blueprint);
        let enemy = query::enemy_view(&world).into_vec()[0].id;

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Strike {
                attacker: Combatant::Enemy(enemy),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::player(&world).expect("player").health, Health::FULL);
    }
}
