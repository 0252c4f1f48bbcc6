#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dungeon Delve adapters.
//!
//! The simulation exposes a pull-based snapshot: [`compose_frame`] captures
//! every cell's marker plus enough unit state to draw it, and flags each tile
//! whose appearance changed since the previous committed tick. Backends are
//! expected to redraw dirty tiles only, so a quiet tick costs nothing.

use anyhow::Result as AnyResult;
use dungeon_delve_core::{CellCoord, CellKind, EnemySnapshot, GameStatus};
use dungeon_delve_world::{query, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Fill color suggested for a cell marker.
#[must_use]
pub const fn palette(kind: CellKind) -> Color {
    match kind {
        CellKind::Wall => Color::from_rgb_u8(0x3a, 0x34, 0x2e),
        CellKind::Floor => Color::from_rgb_u8(0x1b, 0x18, 0x16),
        CellKind::Player => Color::from_rgb_u8(0x4f, 0xc3, 0x5a),
        CellKind::Enemy => Color::from_rgb_u8(0xc8, 0x2a, 0x36),
        CellKind::Boss => Color::from_rgb_u8(0x8e, 0x2a, 0xc8),
        CellKind::Sword => Color::from_rgb_u8(0xd8, 0xd8, 0xe4),
        CellKind::Potion => Color::from_rgb_u8(0xff, 0xc1, 0x07),
    }
}

/// Unit state attached to an occupied tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitOverlay {
    /// Remaining health expressed as a percentage.
    pub health_percent: f32,
    /// Strength bonus percentage, present for the player only.
    pub strength_percent: Option<f32>,
    /// Whether the unit struck during the presented tick.
    pub attacking: bool,
}

/// Presentation state of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Coordinate of the tile within the grid.
    pub cell: CellCoord,
    /// Marker currently stored in the cell.
    pub kind: CellKind,
    /// Whether the tile must be redrawn this frame.
    pub dirty: bool,
    /// Unit state for occupied tiles.
    pub unit: Option<UnitOverlay>,
}

/// Complete frame captured from the world for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Number of tile columns in the frame.
    pub columns: u32,
    /// Number of tile rows in the frame.
    pub rows: u32,
    /// Lifecycle status at capture time.
    pub status: GameStatus,
    /// Per-tile presentation state in row-major order.
    pub tiles: Vec<TilePresentation>,
}

impl Frame {
    /// Presentation state of the tile at the provided coordinate.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&TilePresentation> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.tiles.get(index)
    }

    /// Reports whether any tile needs redrawing.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.tiles.iter().any(|tile| tile.dirty)
    }
}

/// Captures the current world state as a presentation frame.
///
/// A tile is dirty when its marker differs from the previously committed
/// tick, or when it holds a unit whose health, strength, or attacking state
/// changed across the tick boundary. Cells that were never committed (a
/// freshly loaded dungeon) are all dirty, forcing one full redraw.
#[must_use]
pub fn compose_frame(world: &World) -> Frame {
    let grid = query::grid_view(world);
    let (columns, rows) = grid.dimensions();
    let player = query::player(world);
    let enemies = query::enemy_view(world).into_vec();
    let boss = query::boss(world);

    let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let kind = grid.kind(cell).unwrap_or(CellKind::Wall);
            let mut dirty = query::committed_kind(world, cell) != Some(kind);
            let mut unit = None;

            match kind {
                CellKind::Player => {
                    if let Some(player) = player.as_ref() {
                        dirty |= player.health != player.health_prev
                            || player.strength != player.strength_prev
                            || player.attacking
                            || player.attacking_prev;
                        unit = Some(UnitOverlay {
                            health_percent: player.health.get(),
                            strength_percent: Some(player.strength.get()),
                            attacking: player.attacking,
                        });
                    }
                }
                CellKind::Enemy => {
                    if let Some(enemy) = enemy_at(&enemies, cell) {
                        dirty |= enemy.health != enemy.health_prev
                            || enemy.attacking
                            || enemy.attacking_prev;
                        unit = Some(UnitOverlay {
                            health_percent: enemy.health.get(),
                            strength_percent: None,
                            attacking: enemy.attacking,
                        });
                    }
                }
                CellKind::Boss => {
                    if let Some(boss) = boss.as_ref() {
                        dirty |= boss.health != boss.health_prev
                            || boss.attacking
                            || boss.attacking_prev;
                        unit = Some(UnitOverlay {
                            health_percent: boss.health.get(),
                            strength_percent: None,
                            attacking: boss.attacking,
                        });
                    }
                }
                _ => {}
            }

            tiles.push(TilePresentation {
                cell,
                kind,
                dirty,
                unit,
            });
        }
    }

    Frame {
        columns,
        rows,
        status: query::status(world),
        tiles,
    }
}

fn enemy_at(enemies: &[EnemySnapshot], cell: CellCoord) -> Option<&EnemySnapshot> {
    enemies.iter().find(|enemy| enemy.cell == cell)
}

/// Rendering backend capable of presenting Dungeon Delve frames.
pub trait RenderingBackend {
    /// Presents a single captured frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}
