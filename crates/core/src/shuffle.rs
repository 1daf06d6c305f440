//! Shuffler - permutes tile kinds over the occupied slots
//!
//! Columns are permuted with a reverse Fisher-Yates pass; each column picked for a slot has
//! its rows permuted by a nested pass before it is swapped in. Every slot then receives a
//! replacement tile carrying the kind (and power flag) that landed there, so presenters see a
//! clean destroy/place pair per slot and no stale position survives the shuffle.

use crate::grid::Grid;
use crate::presenter::Presenter;
use crate::rng::SimpleRng;

/// Shuffle a full grid in place. Returns `false` (and does nothing) on a partial grid.
pub fn shuffle_grid(grid: &mut Grid, rng: &mut SimpleRng, presenter: &mut dyn Presenter) -> bool {
    if grid.is_empty() || !grid.is_full() {
        return false;
    }

    let columns = grid.columns_mut();
    for i in (0..columns.len()).rev() {
        let picked = rng.index_through(i);
        rng.shuffle(&mut columns[picked]);
        columns.swap(i, picked);
    }

    let (cols, rows) = grid.dimensions();
    for col in 0..cols {
        for row in 0..rows {
            let Some(landed) = grid.cell_at(col, row) else {
                continue;
            };
            let (kind, power) = (landed.kind(), landed.is_power());
            if let Some((old, tile)) = grid.replace_tile(col, row, kind, power) {
                presenter.destroy_tile(old);
                presenter.place_tile(tile, col, row);
                if power {
                    presenter.mark_power(tile, col, row);
                }
            }
        }
    }

    log::debug!("shuffled {}x{} grid", cols, rows);
    true
}
