//! Dense cell storage owned by the world.

use dungeon_delve_core::{CellCoord, CellKind};

/// Row-major cell-kind matrix acting as the occupancy index for the dungeon.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    pub(crate) fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    pub(crate) fn from_cells(columns: u32, rows: u32, cells: Vec<CellKind>) -> Option<Self> {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).ok()?;
        if cells.len() != capacity {
            return None;
        }
        Some(Self {
            columns,
            rows,
            cells,
        })
    }

    pub(crate) fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    pub(crate) fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = kind;
        }
    }

    pub(crate) fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
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

/// Previous-tick copy of the grid committed at each tick boundary.
///
/// Cells start out unset so the very first committed frame marks every cell
/// as changed; the shadow is consulted exclusively for render diffing.
#[derive(Clone, Debug)]
pub(crate) struct ShadowGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<CellKind>>,
}

impl ShadowGrid {
    pub(crate) fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self, columns: u32, rows: u32) {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        self.columns = columns;
        self.rows = rows;
        self.cells.clear();
        self.cells.resize(capacity, None);
    }

    pub(crate) fn commit(&mut self, grid: &Grid) {
        let (columns, rows) = grid.dimensions();
        if (self.columns, self.rows) != (columns, rows) {
            self.reset(columns, rows);
        }
        for (slot, kind) in self.cells.iter_mut().zip(grid.cells().iter()) {
            *slot = Some(*kind);
        }
    }

    pub(crate) fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column).copied().flatten()
    }
}
