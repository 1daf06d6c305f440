//! Snapshot module - owned copies of session state for rendering and serialization

use serde::Serialize;

use crate::grid::Grid;
use crate::tile::TileId;
use crate::types::{SessionPhase, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub kind: TileKind,
    pub power: bool,
}

/// Column-major copy of the matrix; `cells[col][row]`, row 0 at the bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BoardSnapshot {
    pub columns: usize,
    pub rows: usize,
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

impl BoardSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut out = Self::default();
        out.write_from(grid);
        out
    }

    /// Overwrite in place, reusing the column buffers.
    pub fn write_from(&mut self, grid: &Grid) {
        let (columns, rows) = grid.dimensions();
        self.columns = columns;
        self.rows = rows;
        self.cells.resize_with(columns, Vec::new);
        for (col, cells) in self.cells.iter_mut().enumerate() {
            cells.clear();
            cells.extend((0..rows).map(|row| {
                grid.cell_at(col, row).map(|t| TileSnapshot {
                    id: t.id(),
                    kind: t.kind(),
                    power: t.is_power(),
                })
            }));
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<TileSnapshot> {
        self.cells.get(col)?.get(row).copied().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: BoardSnapshot,
    pub phase: SessionPhase,
    pub score: u32,
    pub win_score: u32,
    pub turns_remaining: u32,
    pub turn_budget: u32,
    pub shuffles_remaining: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub pending_power: Option<(usize, usize)>,
    pub no_moves_check: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: BoardSnapshot::default(),
            phase: SessionPhase::Init,
            score: 0,
            win_score: 0,
            turns_remaining: 0,
            turn_budget: 0,
            shuffles_remaining: 0,
            episode_id: 0,
            seed: 0,
            pending_power: None,
            no_moves_check: false,
        }
    }
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.is_playing()
    }
}
