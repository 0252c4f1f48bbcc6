//! Configuration surface recognized by the engine and its adapters.
//!
//! Defaults reproduce the reference tuning of the original experience; every
//! field can be overridden from a TOML document by the hosting adapter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete set of tuning knobs accepted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between externally scheduled ticks.
    pub tick_interval_ms: u64,
    /// Grid dimensions and generation parameters.
    pub field: FieldConfig,
    /// Sword pickup tuning.
    pub swords: SwordConfig,
    /// Potion pickup tuning.
    pub potions: PotionConfig,
    /// Enemy roster tuning.
    pub enemies: EnemyConfig,
    /// Boss tuning.
    pub boss: BossConfig,
    /// Player tuning.
    pub player: PlayerConfig,
}

impl Config {
    /// Cadence at which the hosting adapter should schedule ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            field: FieldConfig::default(),
            swords: SwordConfig::default(),
            potions: PotionConfig::default(),
            enemies: EnemyConfig::default(),
            boss: BossConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

/// Grid dimensions plus corridor and room generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of tile columns laid out in the grid.
    pub columns: u32,
    /// Number of tile rows laid out in the grid.
    pub rows: u32,
    /// Number of corridors drawn per axis.
    pub corridors: CountRange,
    /// Room count and size parameters.
    pub rooms: RoomConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 24,
            corridors: CountRange { min: 3, max: 5 },
            rooms: RoomConfig::default(),
        }
    }
}

/// Inclusive integer range used for generation draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Inclusive lower bound of the draw.
    pub min: u32,
    /// Inclusive upper bound of the draw.
    pub max: u32,
}

/// Room count target and per-room size bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Inclusive lower bound on the number of rooms requested.
    pub min: u32,
    /// Inclusive upper bound on the number of rooms requested.
    pub max: u32,
    /// Inclusive bounds on each room edge length.
    pub size: CountRange,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min: 5,
            max: 10,
            size: CountRange { min: 3, max: 8 },
        }
    }
}

/// Sword pickup tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwordConfig {
    /// Strength percentage granted per collected sword.
    pub buff: f32,
    /// Number of swords placed during generation.
    pub count: u32,
}

impl Default for SwordConfig {
    fn default() -> Self {
        Self {
            buff: 50.0,
            count: 2,
        }
    }
}

/// Potion pickup tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotionConfig {
    /// Health restored per collected potion.
    pub health: f32,
    /// Number of potions placed during generation.
    pub count: u32,
}

impl Default for PotionConfig {
    fn default() -> Self {
        Self {
            health: 100.0,
            count: 10,
        }
    }
}

/// Enemy roster tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Number of enemies placed during generation.
    pub count: u32,
    /// Minimum Chebyshev distance from the player at spawn time.
    pub starting_distance: u32,
    /// Damage dealt by each enemy strike.
    pub damage: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: 10,
            starting_distance: 2,
            damage: 5.0,
        }
    }
}

/// Boss tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Damage dealt by each boss strike.
    pub damage: f32,
    /// Minimum Chebyshev distance from the player at spawn time.
    pub starting_distance: u32,
    /// Armor divisor protecting the boss.
    pub armor: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            damage: 10.0,
            starting_distance: 10,
            armor: 2.5,
        }
    }
}

/// Player tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base damage dealt by the player per struck target.
    pub damage: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { damage: 25.0 }
    }
}
