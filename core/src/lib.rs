#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeon Delve engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod config;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dungeon Delve.";

/// Lifecycle of a single dungeon run.
///
/// The status transitions one way out of [`GameStatus::Active`]; once a
/// terminal status is reached the simulation stops advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The run is in progress and ticks mutate the world.
    Active,
    /// Every enemy and the boss have been defeated.
    Won,
    /// The player's health reached zero.
    Lost,
}

impl GameStatus {
    /// Reports whether the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Marker stored in a single grid cell.
///
/// At most one marker occupies a cell at a time; the grid is the single
/// source of truth for traversability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid rock; blocks everyone.
    Wall,
    /// Carved, unoccupied space.
    Floor,
    /// The cell currently occupied by the player.
    Player,
    /// A cell occupied by a hostile unit.
    Enemy,
    /// The cell occupied by the boss.
    Boss,
    /// A sword pickup granting a strength buff.
    Sword,
    /// A potion pickup restoring health.
    Potion,
}

impl CellKind {
    /// Reports whether the player may step onto a cell of this kind.
    ///
    /// Pickups are walkable and collected on entry; every unit marker and
    /// wall blocks entry.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Sword | Self::Potion)
    }

    /// Reports whether the cell holds a living unit marker.
    #[must_use]
    pub const fn holds_unit(self) -> bool {
        matches!(self, Self::Player | Self::Enemy | Self::Boss)
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Signed column/row offset of a single step in this direction.
    #[must_use]
    pub const fn offsets(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to an enemy by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies a signed offset, returning `None` when either axis would
    /// leave the non-negative coordinate space.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Single step in the provided direction, if it stays in coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offsets();
        self.offset(dx, dy)
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    ///
    /// Two cells at distance 1 form a 3×3 neighborhood including diagonals.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        let columns = self.column.abs_diff(other.column);
        let rows = self.row.abs_diff(other.row);
        columns.max(rows)
    }

    /// Reports whether another cell lies within the 3×3 neighborhood.
    #[must_use]
    pub fn is_near(self, other: CellCoord) -> bool {
        self.chebyshev_distance(other) <= 1
    }
}

/// Unit health clamped to the `[0, 100]` range.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Health(f32);

impl Health {
    /// Upper bound enforced on every health value.
    pub const MAX: f32 = 100.0;

    /// Full health, the spawn value for every unit.
    pub const FULL: Health = Health(Self::MAX);

    /// Creates a health value clamped into the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, Self::MAX))
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Absorbs incoming damage through the provided armor divisor,
    /// flooring the result at zero.
    pub fn absorb(&mut self, damage: f32, armor: Armor) {
        let applied = damage / armor.get();
        self.0 = (self.0 - applied).max(0.0);
    }

    /// Restores health, capped at [`Health::MAX`].
    pub fn restore(&mut self, amount: f32) {
        self.0 = (self.0 + amount).min(Self::MAX);
    }

    /// Reports whether the unit is out of health.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.0 <= 0.0
    }
}

/// Percentage damage bonus carried by the player, clamped to `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strength(f32);

impl Strength {
    /// Upper bound enforced on the bonus.
    pub const MAX: f32 = 100.0;

    /// No bonus, the spawn value for the player.
    pub const NONE: Strength = Strength(0.0);

    /// Creates a strength value clamped into the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, Self::MAX))
    }

    /// Retrieves the numeric bonus percentage.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Adds to the bonus, capped at [`Strength::MAX`].
    pub fn gain(&mut self, amount: f32) {
        self.0 = (self.0 + amount).min(Self::MAX);
    }

    /// Multiplier applied to the carrier's base damage.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        1.0 + self.0 / 100.0
    }
}

/// Damage-reduction divisor applied when a unit absorbs a hit.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Armor(f32);

impl Armor {
    /// Neutral armor that passes damage through unchanged.
    pub const NONE: Armor = Armor(1.0);

    /// Creates an armor divisor, clamping values below one up to one.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.max(1.0))
    }

    /// Retrieves the numeric divisor.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

/// Identifies the unit initiating a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combatant {
    /// The player-controlled unit.
    Player,
    /// A hostile unit identified by its roster id.
    Enemy(EnemyId),
    /// The boss unit.
    Boss,
}

/// Combat tuning applied by the world when resolving strikes and pickups.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Base damage dealt by the player per struck target.
    pub player_damage: f32,
    /// Damage dealt by each enemy strike.
    pub enemy_damage: f32,
    /// Damage dealt by each boss strike.
    pub boss_damage: f32,
    /// Armor divisor protecting the boss.
    pub boss_armor: Armor,
    /// Strength added when the player collects a sword.
    pub sword_buff: f32,
    /// Health restored when the player collects a potion.
    pub potion_heal: f32,
}

impl From<&config::Config> for Rules {
    fn from(config: &config::Config) -> Self {
        Self {
            player_damage: config.player.damage,
            enemy_damage: config.enemies.damage,
            boss_damage: config.boss.damage,
            boss_armor: Armor::new(config.boss.armor),
            sword_buff: config.swords.buff,
            potion_heal: config.potions.health,
        }
    }
}

/// Generated level layout consumed by the world at load time.
///
/// `cells` contains only [`CellKind::Wall`] and [`CellKind::Floor`]; unit
/// and pickup markers are stamped onto the grid by the world from the
/// placement lists so that units remain the authoritative owners of their
/// positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Number of columns in the generated grid.
    pub columns: u32,
    /// Number of rows in the generated grid.
    pub rows: u32,
    /// Carved cell matrix in row-major order.
    pub cells: Vec<CellKind>,
    /// Spawn cell selected for the player.
    pub player: CellCoord,
    /// Spawn cells selected for enemies, possibly fewer than requested.
    pub enemies: Vec<CellCoord>,
    /// Spawn cell selected for the boss, absent in degenerate layouts.
    pub boss: Option<CellCoord>,
    /// Cells holding sword pickups.
    pub swords: Vec<CellCoord>,
    /// Cells holding potion pickups.
    pub potions: Vec<CellCoord>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world content with a freshly generated dungeon.
    LoadDungeon {
        /// Generated layout and placement sites.
        blueprint: Blueprint,
        /// Combat tuning for the run.
        rules: Rules,
    },
    /// Opens a new simulation tick.
    Tick,
    /// Requests that the player advance one step in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Latches a player attack to be resolved during the next combat phase.
    QueuePlayerAttack,
    /// Requests that an enemy advance to an adjacent cell.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Candidate destination cell.
        to: CellCoord,
    },
    /// Requests that the boss advance to an adjacent cell.
    StepBoss {
        /// Candidate destination cell.
        to: CellCoord,
    },
    /// Resolves one unit's attack against everything in reach.
    Strike {
        /// Unit initiating the attack.
        attacker: Combatant,
    },
    /// Closes the current tick: evaluates win/loss and commits the
    /// previous-tick snapshot used for render diffing.
    CommitTick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a dungeon was loaded into the world.
    DungeonLoaded {
        /// Number of columns in the loaded grid.
        columns: u32,
        /// Number of rows in the loaded grid.
        rows: u32,
    },
    /// Indicates that a new tick opened.
    TickStarted {
        /// Index of the tick that just opened.
        tick: u64,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Confirms that the player collected a sword pickup.
    SwordCollected {
        /// Cell that held the sword.
        cell: CellCoord,
    },
    /// Confirms that the player collected a potion pickup.
    PotionCollected {
        /// Cell that held the potion.
        cell: CellCoord,
    },
    /// Reports damage applied to the player.
    PlayerStruck {
        /// Unit that initiated the strike.
        attacker: Combatant,
        /// Damage applied after armor.
        damage: f32,
        /// Player health remaining after the strike.
        remaining: Health,
    },
    /// Reports damage applied to an enemy.
    EnemyStruck {
        /// Identifier of the struck enemy.
        enemy: EnemyId,
        /// Damage applied after armor.
        damage: f32,
        /// Enemy health remaining after the strike.
        remaining: Health,
    },
    /// Reports damage applied to the boss.
    BossStruck {
        /// Damage applied after armor.
        damage: f32,
        /// Boss health remaining after the strike.
        remaining: Health,
    },
    /// Confirms that an enemy was removed from the roster.
    EnemySlain {
        /// Identifier of the slain enemy.
        enemy: EnemyId,
        /// Cell the enemy occupied, reset to floor.
        cell: CellCoord,
    },
    /// Confirms that the boss fell, leaving a sword drop.
    BossSlain {
        /// Cell the boss occupied, now holding a sword.
        cell: CellCoord,
    },
    /// Confirms that an enemy moved between two cells.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after the move.
        to: CellCoord,
    },
    /// Confirms that the boss moved between two cells.
    BossMoved {
        /// Cell the boss occupied before moving.
        from: CellCoord,
        /// Cell the boss occupies after the move.
        to: CellCoord,
    },
    /// Announces a one-way transition out of the active status.
    StatusChanged {
        /// Status the run transitioned into.
        status: GameStatus,
    },
    /// Indicates that the tick closed and the diff snapshot committed.
    TickCommitted {
        /// Index of the tick that just closed.
        tick: u64,
    },
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: CellCoord,
    /// Current health.
    pub health: Health,
    /// Health committed at the end of the previous tick.
    pub health_prev: Health,
    /// Current strength bonus.
    pub strength: Strength,
    /// Strength committed at the end of the previous tick.
    pub strength_prev: Strength,
    /// Whether the player struck during the current tick.
    pub attacking: bool,
    /// Whether the player struck during the previous tick.
    pub attacking_prev: bool,
    /// Whether a move was already accepted this tick.
    pub moved: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Current health.
    pub health: Health,
    /// Health committed at the end of the previous tick.
    pub health_prev: Health,
    /// Whether the enemy struck during the current tick.
    pub attacking: bool,
    /// Whether the enemy struck during the previous tick.
    pub attacking_prev: bool,
}

/// Immutable representation of the boss's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Grid cell currently occupied by the boss.
    pub cell: CellCoord,
    /// Current health.
    pub health: Health,
    /// Health committed at the end of the previous tick.
    pub health_prev: Health,
    /// Whether the boss struck during the current tick.
    pub attacking: bool,
    /// Whether the boss struck during the previous tick.
    pub attacking_prev: bool,
}

/// Read-only snapshot describing the enemy roster.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of living enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only view into a dense cell-kind grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellKind],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellKind], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the marker stored in the provided cell, if it is in bounds.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).and_then(|index| self.cells.get(index)).copied()
    }

    /// Reports whether the cell is in bounds and carved floor.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        self.kind(cell) == Some(CellKind::Floor)
    }

    /// Reports whether the player may enter the cell.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.kind(cell).is_some_and(CellKind::is_walkable)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellKind> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
