#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine facade that drives a dungeon run tick by tick.
//!
//! The [`Game`] owns the authoritative world plus the movement and combat
//! systems and pumps them in a fixed order: open the tick, apply the planned
//! boss and enemy steps, apply the planned strikes, then commit the tick.
//! One [`Game::tick`] call is one atomic state transition; the hosting
//! adapter schedules calls at its own cadence and stops scheduling once the
//! status turns terminal. Player input arrives between ticks through
//! [`Game::move_player`] and [`Game::queue_attack`].

use dungeon_delve_core::{
    config::Config, Blueprint, Command, Direction, Event, GameStatus, Rules,
};
use dungeon_delve_system_combat::Combat;
use dungeon_delve_system_generation::{GenerationError, Generator};
use dungeon_delve_system_movement::Movement;
use dungeon_delve_world::{self as world, query, World};

/// Salt mixed into the run seed so enemy wander draws come from a different
/// stream than level generation.
const WANDER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A complete dungeon run: world state plus the systems that drive it.
#[derive(Debug)]
pub struct Game {
    world: World,
    movement: Movement,
    combat: Combat,
    events: Vec<Event>,
}

impl Game {
    /// Generates a dungeon from the configuration and seed and loads it.
    ///
    /// Fails before play starts when the configuration cannot place the
    /// player or the boss.
    pub fn new(config: &Config, seed: u64) -> Result<Self, GenerationError> {
        let blueprint = Generator::new(seed).generate(config)?;
        Ok(Self::from_blueprint(blueprint, Rules::from(config), seed))
    }

    /// Loads a prepared blueprint, bypassing generation.
    ///
    /// Intended for scripted layouts and tests; the seed feeds the enemy
    /// wander stream only.
    #[must_use]
    pub fn from_blueprint(blueprint: Blueprint, rules: Rules, seed: u64) -> Self {
        let mut game = Self {
            world: World::new(),
            movement: Movement::new(seed ^ WANDER_SEED_SALT),
            combat: Combat::new(),
            events: Vec::new(),
        };
        world::apply(
            &mut game.world,
            Command::LoadDungeon { blueprint, rules },
            &mut game.events,
        );
        game
    }

    /// Advances the simulation by one atomic tick.
    ///
    /// Returns the events recorded during the tick; a terminal run returns
    /// an empty slice without touching any state.
    pub fn tick(&mut self) -> &[Event] {
        self.events.clear();
        if query::status(&self.world).is_terminal() {
            return &self.events;
        }

        world::apply(&mut self.world, Command::Tick, &mut self.events);

        let mut commands = Vec::new();
        if let Some(player) = query::player(&self.world) {
            let enemies = query::enemy_view(&self.world);
            let boss = query::boss(&self.world);
            self.movement.handle(
                &self.events,
                &player,
                &enemies,
                boss.as_ref(),
                query::grid_view(&self.world),
                &mut commands,
            );
        }
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        if let Some(player) = query::player(&self.world) {
            let enemies = query::enemy_view(&self.world);
            let boss = query::boss(&self.world);
            self.combat.handle(
                &player,
                &enemies,
                boss.as_ref(),
                query::attack_queued(&self.world),
                &mut commands,
            );
        }
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        world::apply(&mut self.world, Command::CommitTick, &mut self.events);
        &self.events
    }

    /// Requests a single player step; consumed immediately, at most one
    /// accepted step per tick. Invalid requests are silently dropped.
    pub fn move_player(&mut self, direction: Direction) {
        world::apply(
            &mut self.world,
            Command::MovePlayer { direction },
            &mut self.events,
        );
    }

    /// Latches a player attack for the next combat phase.
    pub fn queue_attack(&mut self) {
        world::apply(&mut self.world, Command::QueuePlayerAttack, &mut self.events);
    }

    /// Current lifecycle status of the run.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Read-only access to the world for snapshot queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events recorded since the current tick opened, including any input
    /// accepted after the previous commit.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
