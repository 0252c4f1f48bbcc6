#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic level generator producing dungeon blueprints.
//!
//! The generator carves full-row and full-column corridors with a spacing
//! constraint, places non-overlapping rooms validated against the corridors,
//! and finally selects spawn sites for the player, pickups, enemies, and the
//! boss. Every draw comes from a seeded stream, so the same seed and
//! configuration always produce the same [`Blueprint`].

use dungeon_delve_core::{
    config::{Config, CountRange},
    Blueprint, CellCoord, CellKind,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Shared retry budget applied to room placement and each spawn batch.
const PLACEMENT_ATTEMPTS: u32 = 1000;

/// Fatal generation failures caused by degenerate configurations.
///
/// Shortfalls in corridors, rooms, pickups, or enemies are accepted outcomes;
/// only the player and boss placements must succeed for the dungeon to be
/// playable, so their exhaustion is surfaced before play starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The configured grid has no cells to carve.
    #[error("the configured grid has no cells ({columns}x{rows})")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// No floor cell accepted the player within the retry budget.
    #[error("no floor cell accepted the player after {attempts} attempts")]
    PlayerPlacement {
        /// Number of placement attempts consumed.
        attempts: u32,
    },
    /// No floor cell far enough from the player accepted the boss.
    #[error(
        "no floor cell beyond distance {min_distance} accepted the boss \
         after {attempts} attempts"
    )]
    BossPlacement {
        /// Number of placement attempts consumed.
        attempts: u32,
        /// Configured minimum Chebyshev distance from the player.
        min_distance: u32,
    },
}

/// Seeded dungeon generator.
#[derive(Clone, Debug)]
pub struct Generator {
    rng: ChaCha8Rng,
}

impl Generator {
    /// Creates a generator drawing from the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generates a complete dungeon blueprint for the provided configuration.
    pub fn generate(&mut self, config: &Config) -> Result<Blueprint, GenerationError> {
        let columns = config.field.columns;
        let rows = config.field.rows;
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let Ok(capacity) = usize::try_from(capacity_u64) else {
            return Err(GenerationError::EmptyGrid { columns, rows });
        };
        if capacity == 0 {
            return Err(GenerationError::EmptyGrid { columns, rows });
        }

        let mut cells = vec![CellKind::Wall; capacity];

        let horizontal = draw_count(&mut self.rng, config.field.corridors);
        let vertical = draw_count(&mut self.rng, config.field.corridors);
        let corridor_rows = select_corridor_indices(&mut self.rng, horizontal, rows);
        let corridor_columns = select_corridor_indices(&mut self.rng, vertical, columns);
        carve_corridors(&mut cells, columns, rows, &corridor_rows, &corridor_columns);

        let rooms = place_rooms(
            &mut self.rng,
            columns,
            rows,
            &corridor_rows,
            &corridor_columns,
            config.field.rooms.size,
            CountRange {
                min: config.field.rooms.min,
                max: config.field.rooms.max,
            },
        );
        for room in &rooms {
            carve_room(&mut cells, columns, room);
        }

        // Spawn sites collide against a stamped copy so the emitted cell
        // matrix stays pure wall/floor.
        let mut stamped = cells.clone();

        let player = place_player(&mut self.rng, &mut stamped, columns, rows)?;
        let swords = place_pickups(
            &mut self.rng,
            &mut stamped,
            columns,
            rows,
            CellKind::Sword,
            config.swords.count,
        );
        let potions = place_pickups(
            &mut self.rng,
            &mut stamped,
            columns,
            rows,
            CellKind::Potion,
            config.potions.count,
        );
        let enemies = place_enemies(
            &mut self.rng,
            &mut stamped,
            columns,
            rows,
            player,
            config.enemies.count,
            config.enemies.starting_distance,
        );
        let boss = place_boss(
            &mut self.rng,
            &mut stamped,
            columns,
            rows,
            player,
            config.boss.starting_distance,
        )?;

        Ok(Blueprint {
            columns,
            rows,
            cells,
            player,
            enemies,
            boss: Some(boss),
            swords,
            potions,
        })
    }
}

/// Axis-aligned room rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Room {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn draw_count(rng: &mut ChaCha8Rng, range: CountRange) -> u32 {
    if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    }
}

/// Selects up to `count` indices in `[0, limit)` such that no two selected
/// indices are adjacent.
///
/// Rejection-samples over the full range; accepting an index retires it and
/// both neighbors. Selection stops early once no index remains available, so
/// the result may fall short of `count`.
fn select_corridor_indices(rng: &mut ChaCha8Rng, count: u32, limit: u32) -> Vec<u32> {
    let mut chosen = Vec::new();
    if limit == 0 || count == 0 {
        return chosen;
    }

    let mut available = vec![true; limit as usize];
    let mut remaining = limit;

    while (chosen.len() as u32) < count && remaining > 0 {
        let index = rng.gen_range(0..limit);
        if !available[index as usize] {
            continue;
        }
        chosen.push(index);
        let low = index.saturating_sub(1);
        let high = (index + 1).min(limit - 1);
        for neighbor in low..=high {
            if available[neighbor as usize] {
                available[neighbor as usize] = false;
                remaining -= 1;
            }
        }
    }

    chosen
}

fn cell_index(columns: u32, column: u32, row: u32) -> usize {
    row as usize * columns as usize + column as usize
}

fn carve_corridors(
    cells: &mut [CellKind],
    columns: u32,
    rows: u32,
    corridor_rows: &[u32],
    corridor_columns: &[u32],
) {
    for &row in corridor_rows {
        for column in 0..columns {
            cells[cell_index(columns, column, row)] = CellKind::Floor;
        }
    }
    for &column in corridor_columns {
        for row in 0..rows {
            cells[cell_index(columns, column, row)] = CellKind::Floor;
        }
    }
}

/// Places up to the requested number of rooms within a shared attempt budget.
///
/// A candidate is accepted only when its rectangle plus a one-cell margin
/// (clipped to bounds) is free of previously reserved cells and the rectangle
/// intersects at least one corridor row or column. Failed attempts consume
/// the shared budget, so a crowded grid simply yields fewer rooms.
fn place_rooms(
    rng: &mut ChaCha8Rng,
    columns: u32,
    rows: u32,
    corridor_rows: &[u32],
    corridor_columns: &[u32],
    size: CountRange,
    count: CountRange,
) -> Vec<Room> {
    let target = draw_count(rng, count);
    let mut reserved = vec![false; columns as usize * rows as usize];
    let mut rooms: Vec<Room> = Vec::new();

    let mut attempts = 0;
    while attempts < PLACEMENT_ATTEMPTS && (rooms.len() as u32) < target {
        attempts += 1;

        let width = draw_count(rng, size);
        let height = draw_count(rng, size);
        if width == 0 || height == 0 || width > columns || height > rows {
            continue;
        }
        let x = rng.gen_range(0..=columns - width);
        let y = rng.gen_range(0..=rows - height);
        let room = Room {
            x,
            y,
            width,
            height,
        };

        if !intersects_corridor(&room, corridor_rows, corridor_columns) {
            continue;
        }
        if !margin_is_free(&room, &reserved, columns, rows) {
            continue;
        }

        reserve_with_margin(&room, &mut reserved, columns, rows);
        rooms.push(room);
    }

    rooms
}

fn intersects_corridor(room: &Room, corridor_rows: &[u32], corridor_columns: &[u32]) -> bool {
    corridor_columns
        .iter()
        .any(|&column| column >= room.x && column < room.x + room.width)
        || corridor_rows
            .iter()
            .any(|&row| row >= room.y && row < room.y + room.height)
}

fn margin_cells(room: &Room, columns: u32, rows: u32) -> impl Iterator<Item = usize> {
    let x_low = room.x.saturating_sub(1);
    let y_low = room.y.saturating_sub(1);
    let x_high = (room.x + room.width).min(columns - 1);
    let y_high = (room.y + room.height).min(rows - 1);
    (y_low..=y_high)
        .flat_map(move |row| (x_low..=x_high).map(move |column| cell_index(columns, column, row)))
}

fn margin_is_free(room: &Room, reserved: &[bool], columns: u32, rows: u32) -> bool {
    margin_cells(room, columns, rows).all(|index| !reserved[index])
}

fn reserve_with_margin(room: &Room, reserved: &mut [bool], columns: u32, rows: u32) {
    for index in margin_cells(room, columns, rows) {
        reserved[index] = true;
    }
}

fn carve_room(cells: &mut [CellKind], columns: u32, room: &Room) {
    for row in room.y..room.y + room.height {
        for column in room.x..room.x + room.width {
            cells[cell_index(columns, column, row)] = CellKind::Floor;
        }
    }
}

fn draw_cell(rng: &mut ChaCha8Rng, columns: u32, rows: u32) -> CellCoord {
    let column = rng.gen_range(0..columns);
    let row = rng.gen_range(0..rows);
    CellCoord::new(column, row)
}

fn is_floor(stamped: &[CellKind], columns: u32, cell: CellCoord) -> bool {
    stamped[cell_index(columns, cell.column(), cell.row())] == CellKind::Floor
}

fn stamp(stamped: &mut [CellKind], columns: u32, cell: CellCoord, kind: CellKind) {
    stamped[cell_index(columns, cell.column(), cell.row())] = kind;
}

fn place_player(
    rng: &mut ChaCha8Rng,
    stamped: &mut [CellKind],
    columns: u32,
    rows: u32,
) -> Result<CellCoord, GenerationError> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = draw_cell(rng, columns, rows);
        if is_floor(stamped, columns, cell) {
            stamp(stamped, columns, cell, CellKind::Player);
            return Ok(cell);
        }
    }
    Err(GenerationError::PlayerPlacement {
        attempts: PLACEMENT_ATTEMPTS,
    })
}

fn place_pickups(
    rng: &mut ChaCha8Rng,
    stamped: &mut [CellKind],
    columns: u32,
    rows: u32,
    kind: CellKind,
    count: u32,
) -> Vec<CellCoord> {
    let mut placed = Vec::new();
    let mut attempts = 0;
    while attempts < PLACEMENT_ATTEMPTS && (placed.len() as u32) < count {
        attempts += 1;
        let cell = draw_cell(rng, columns, rows);
        if is_floor(stamped, columns, cell) {
            stamp(stamped, columns, cell, kind);
            placed.push(cell);
        }
    }
    placed
}

fn place_enemies(
    rng: &mut ChaCha8Rng,
    stamped: &mut [CellKind],
    columns: u32,
    rows: u32,
    player: CellCoord,
    count: u32,
    min_distance: u32,
) -> Vec<CellCoord> {
    let mut placed = Vec::new();
    let mut attempts = 0;
    while attempts < PLACEMENT_ATTEMPTS && (placed.len() as u32) < count {
        attempts += 1;
        let cell = draw_cell(rng, columns, rows);
        if is_floor(stamped, columns, cell) && cell.chebyshev_distance(player) > min_distance {
            stamp(stamped, columns, cell, CellKind::Enemy);
            placed.push(cell);
        }
    }
    placed
}

fn place_boss(
    rng: &mut ChaCha8Rng,
    stamped: &mut [CellKind],
    columns: u32,
    rows: u32,
    player: CellCoord,
    min_distance: u32,
) -> Result<CellCoord, GenerationError> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = draw_cell(rng, columns, rows);
        if is_floor(stamped, columns, cell) && cell.chebyshev_distance(player) > min_distance {
            stamp(stamped, columns, cell, CellKind::Boss);
            return Ok(cell);
        }
    }
    Err(GenerationError::BossPlacement {
        attempts: PLACEMENT_ATTEMPTS,
        min_distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_indices_are_never_adjacent() {
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut indices = select_corridor_indices(&mut rng, 5, 24);
            indices.sort_unstable();
            for pair in indices.windows(2) {
                assert!(
                    pair[1] - pair[0] >= 2,
                    "seed {seed} produced adjacent corridors {indices:?}"
                );
            }
            assert!(indices.len() <= 5);
        }
    }

    #[test]
    fn corridor_selection_stops_when_no_index_remains() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // Three indices over a span of five exhaust availability after two
        // picks at the edges, so a shortfall is possible but never an error.
        let indices = select_corridor_indices(&mut rng, 3, 5);
        assert!(!indices.is_empty());
        assert!(indices.len() <= 3);
    }

    #[test]
    fn corridor_selection_handles_empty_axis() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(select_corridor_indices(&mut rng, 4, 0).is_empty());
        assert!(select_corridor_indices(&mut rng, 0, 10).is_empty());
    }

    #[test]
    fn rooms_respect_margins_and_corridors() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let corridor_rows = select_corridor_indices(&mut rng, 4, 24);
            let corridor_columns = select_corridor_indices(&mut rng, 4, 40);
            let rooms = place_rooms(
                &mut rng,
                40,
                24,
                &corridor_rows,
                &corridor_columns,
                CountRange { min: 3, max: 8 },
                CountRange { min: 5, max: 10 },
            );

            assert!(rooms.len() <= 10);
            for room in &rooms {
                assert!(
                    intersects_corridor(room, &corridor_rows, &corridor_columns),
                    "seed {seed}: room {room:?} touches no corridor"
                );
            }
            for (first_index, first) in rooms.iter().enumerate() {
                for second in rooms.iter().skip(first_index + 1) {
                    assert!(
                        margins_disjoint(first, second),
                        "seed {seed}: rooms {first:?} and {second:?} touch"
                    );
                }
            }
        }
    }

    fn margins_disjoint(first: &Room, second: &Room) -> bool {
        let first_x = first.x.saturating_sub(1)..=first.x + first.width;
        let first_y = first.y.saturating_sub(1)..=first.y + first.height;
        let second_x = second.x.saturating_sub(1)..=second.x + second.width;
        let second_y = second.y.saturating_sub(1)..=second.y + second.height;
        let x_overlap = first_x.start() <= second_x.end() && second_x.start() <= first_x.end();
        let y_overlap = first_y.start() <= second_y.end() && second_y.start() <= first_y.end();
        !(x_overlap && y_overlap)
    }

    #[test]
    fn room_placement_accepts_shortfall_on_tiny_grids() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rooms = place_rooms(
            &mut rng,
            4,
            4,
            &[0],
            &[0],
            CountRange { min: 3, max: 3 },
            CountRange { min: 10, max: 10 },
        );
        assert!(rooms.len() < 10);
    }

    #[test]
    fn draw_count_collapses_degenerate_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(draw_count(&mut rng, CountRange { min: 4, max: 4 }), 4);
        assert_eq!(draw_count(&mut rng, CountRange { min: 6, max: 2 }), 6);
    }
}
