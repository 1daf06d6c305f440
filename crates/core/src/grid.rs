//! Grid module - owns the tile matrix
//!
//! The matrix is column-major: `matrix[col][row]`, with row 0 at the bottom of a column.
//! Columns may be shorter than `rows` between a removal and the following refill; removal
//! only compacts within a column and refill only appends on top, so tiles never move across
//! columns here.
//!
//! All mutation goes through methods on [`Grid`] so the shape invariants hold at every
//! observable point.

use std::collections::HashSet;

use crate::presenter::Presenter;
use crate::rng::KindSource;
use crate::tile::{Tile, TileId};
use crate::types::TileKind;

#[derive(Debug, Clone)]
pub struct Grid {
    columns: usize,
    rows: usize,
    matrix: Vec<Vec<Tile>>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            matrix: vec![Vec::new(); columns],
            next_id: 0,
        }
    }

    /// Build a grid from a preset kind layout, `kinds[col][row]` with row 0 at the bottom.
    ///
    /// Columns beyond `kinds.len()` start empty; entries beyond `rows` are ignored.
    pub fn from_kinds(columns: usize, rows: usize, kinds: &[Vec<TileKind>]) -> Self {
        let mut grid = Self::new(columns, rows);
        grid.load_kinds(kinds, &mut crate::presenter::NullPresenter);
        grid
    }

    /// Replace the whole board with a preset layout (same truncation rules as
    /// [`Grid::from_kinds`]). Old tiles are destroyed, new ones placed; ids keep counting up.
    pub fn load_kinds(&mut self, kinds: &[Vec<TileKind>], presenter: &mut dyn Presenter) {
        self.clear(presenter);
        for (col, column) in kinds.iter().take(self.columns).enumerate() {
            for &kind in column.iter().take(self.rows) {
                let tile = self.create_tile(kind);
                let row = self.matrix[col].len();
                presenter.place_tile(&tile, col, row);
                self.matrix[col].push(tile);
            }
        }
    }

    /// Get `(columns, rows)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile at `(col, row)`, or `None` outside the grid or above a short column
    pub fn cell_at(&self, col: usize, row: usize) -> Option<&Tile> {
        self.matrix.get(col)?.get(row)
    }

    /// Signed variant of [`Grid::cell_at`] for neighbour probes that step off the edge
    pub fn cell_at_signed(&self, col: isize, row: isize) -> Option<&Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cell_at(col as usize, row as usize)
    }

    pub(crate) fn cell_at_mut(&mut self, col: usize, row: usize) -> Option<&mut Tile> {
        self.matrix.get_mut(col)?.get_mut(row)
    }

    /// Number of tiles currently stacked in `col` (0 outside the grid)
    pub fn column_len(&self, col: usize) -> usize {
        self.matrix.get(col).map_or(0, Vec::len)
    }

    /// Ids of every tile in `col`, bottom to top
    pub fn column_ids(&self, col: usize) -> Vec<TileId> {
        self.matrix
            .get(col)
            .map(|column| column.iter().map(Tile::id).collect())
            .unwrap_or_default()
    }

    /// Find a tile by identity.
    ///
    /// Linear in grid size. `None` means the id is stale (the tile already left the grid).
    pub fn locate(&self, id: TileId) -> Option<(usize, usize)> {
        self.matrix.iter().enumerate().find_map(|(col, column)| {
            column
                .iter()
                .position(|tile| tile.id() == id)
                .map(|row| (col, row))
        })
    }

    /// Every column has exactly `rows` tiles
    pub fn is_full(&self) -> bool {
        self.matrix.iter().all(|column| column.len() == self.rows)
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.iter().all(Vec::is_empty)
    }

    pub fn tile_count(&self) -> usize {
        self.matrix.iter().map(Vec::len).sum()
    }

    /// Iterate `(col, row, tile)` column by column, bottom to top
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> + '_ {
        self.matrix.iter().enumerate().flat_map(|(col, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(row, tile)| (col, row, tile))
        })
    }

    /// Multiset of kinds on the board, indexed by [`TileKind::index`]
    pub fn kind_counts(&self) -> [usize; 5] {
        let mut counts = [0usize; 5];
        for (_, _, tile) in self.iter() {
            counts[tile.kind().index()] += 1;
        }
        counts
    }

    /// True if any tile still carries a scan mark
    pub fn any_visited(&self) -> bool {
        self.iter().any(|(_, _, tile)| tile.visited())
    }

    /// Remove a group of tiles.
    ///
    /// Each present tile is destroyed through the presenter, then every column is compacted.
    /// Ids that are not on the grid are skipped. Returns the number of tiles removed.
    pub fn remove_group(&mut self, group: &[TileId], presenter: &mut dyn Presenter) -> usize {
        let doomed: HashSet<TileId> = group.iter().copied().collect();
        let mut present = HashSet::with_capacity(doomed.len());

        for column in &mut self.matrix {
            column.retain(|tile| {
                if doomed.contains(&tile.id()) {
                    present.insert(tile.id());
                    false
                } else {
                    true
                }
            });
        }

        let removed = present.len();
        // Release in group order so presenters see discovery order.
        for &id in group {
            if present.remove(&id) {
                presenter.destroy_tile(id);
            }
        }
        removed
    }

    /// Number of power tiles on the board
    pub fn power_count(&self) -> usize {
        self.iter().filter(|(_, _, tile)| tile.is_power()).count()
    }

    /// Top every short column back up to `rows` with freshly drawn tiles.
    ///
    /// Existing tiles keep their slots. `place_tile` is called once per new tile with its
    /// final position. Returns the number of tiles created.
    pub fn refill(&mut self, kinds: &mut KindSource, presenter: &mut dyn Presenter) -> usize {
        let mut placed = 0;
        for col in 0..self.columns {
            while self.matrix[col].len() < self.rows {
                let tile = self.create_tile(kinds.draw());
                let row = self.matrix[col].len();
                presenter.place_tile(&tile, col, row);
                self.matrix[col].push(tile);
                placed += 1;
            }
        }
        placed
    }

    /// Destroy every tile and leave all columns empty
    pub fn clear(&mut self, presenter: &mut dyn Presenter) {
        for column in &mut self.matrix {
            for tile in column.drain(..) {
                presenter.destroy_tile(tile.id());
            }
        }
    }

    /// Turn the tile at `(col, row)` into a power tile
    pub(crate) fn set_power(&mut self, col: usize, row: usize) -> Option<&Tile> {
        let tile = self.cell_at_mut(col, row)?;
        tile.set_power(true);
        Some(&*tile)
    }

    /// Mutable access to the raw columns for whole-grid permutations
    pub(crate) fn columns_mut(&mut self) -> &mut [Vec<Tile>] {
        &mut self.matrix
    }

    /// Swap the tile at `(col, row)` for a new identity carrying `kind` and `power`.
    ///
    /// Returns the old id and the replacement; `None` if the slot is empty.
    pub(crate) fn replace_tile(
        &mut self,
        col: usize,
        row: usize,
        kind: TileKind,
        power: bool,
    ) -> Option<(TileId, &Tile)> {
        self.cell_at(col, row)?;
        let mut tile = self.create_tile(kind);
        tile.set_power(power);
        let slot = &mut self.matrix[col][row];
        let old = std::mem::replace(slot, tile);
        Some((old.id(), &*slot))
    }

    fn create_tile(&mut self, kind: TileKind) -> Tile {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Tile::new(id, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{NullPresenter, PresenterCall, RecordingPresenter};
    use TileKind::*;

    fn sample() -> Grid {
        Grid::from_kinds(
            3,
            3,
            &[
                vec![Green, Green, Blue],
                vec![Red, Green, Blue],
                vec![Yellow, Yellow, Yellow],
            ],
        )
    }

    #[test]
    fn test_cell_at_bounds() {
        let grid = sample();
        assert_eq!(grid.cell_at(0, 0).map(Tile::kind), Some(Green));
        assert_eq!(grid.cell_at(2, 2).map(Tile::kind), Some(Yellow));
        assert!(grid.cell_at(3, 0).is_none());
        assert!(grid.cell_at(0, 3).is_none());
        assert!(grid.cell_at_signed(-1, 0).is_none());
        assert!(grid.cell_at_signed(0, -1).is_none());
    }

    #[test]
    fn test_ids_are_unique_and_locatable() {
        let grid = sample();
        let mut ids: Vec<_> = grid.iter().map(|(_, _, t)| t.id()).collect();
        for (col, row, tile) in grid.iter() {
            assert_eq!(grid.locate(tile.id()), Some((col, row)));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 9);
        assert_eq!(grid.locate(TileId(999)), None);
    }

    #[test]
    fn test_remove_group_compacts_columns() {
        let mut grid = sample();
        let bottom = grid.cell_at(0, 0).unwrap().id();
        let top = grid.cell_at(0, 2).unwrap().id();
        let mut presenter = RecordingPresenter::new();

        let removed = grid.remove_group(&[bottom], &mut presenter);
        assert_eq!(removed, 1);
        assert_eq!(grid.column_len(0), 2);
        assert_eq!(grid.column_len(1), 3);
        // The blue tile fell one slot
        assert_eq!(grid.locate(top), Some((0, 1)));
        assert_eq!(presenter.calls, vec![PresenterCall::Destroy { id: bottom }]);
    }

    #[test]
    fn test_remove_group_skips_stale_ids() {
        let mut grid = sample();
        let removed = grid.remove_group(&[TileId(500)], &mut NullPresenter);
        assert_eq!(removed, 0);
        assert!(grid.is_full());
    }

    #[test]
    fn test_refill_only_appends() {
        let mut grid = sample();
        let column = grid.column_ids(2);
        grid.remove_group(&column, &mut NullPresenter);
        let survivors = grid.column_ids(1);
        let mut kinds = KindSource::new(5, 5);
        let mut presenter = RecordingPresenter::new();

        assert_eq!(grid.refill(&mut kinds, &mut presenter), 3);
        assert!(grid.is_full());
        assert_eq!(grid.column_ids(1), survivors);
        let rows: Vec<_> = presenter
            .calls
            .iter()
            .map(|c| match c {
                PresenterCall::Place { col, row, .. } => (*col, *row),
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(rows, vec![(2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut grid = sample();
        let mut presenter = RecordingPresenter::new();
        grid.clear(&mut presenter);
        assert!(grid.is_empty());
        assert_eq!(presenter.destroyed(), 9);
        assert_eq!(grid.dimensions(), (3, 3));
    }

    #[test]
    fn test_replace_tile_issues_new_identity() {
        let mut grid = sample();
        let old = grid.cell_at(1, 1).unwrap().id();
        let (prev, tile) = grid.replace_tile(1, 1, Red, true).unwrap();
        assert_eq!(prev, old);
        assert_ne!(tile.id(), old);
        assert!(tile.is_power());
        assert_eq!(grid.locate(old), None);
        assert!(grid.replace_tile(1, 5, Red, false).is_none());
    }

    #[test]
    fn test_kind_counts() {
        let counts = sample().kind_counts();
        assert_eq!(counts[Green.index()], 3);
        assert_eq!(counts[Blue.index()], 2);
        assert_eq!(counts[Yellow.index()], 3);
        assert_eq!(counts[Red.index()], 1);
        assert_eq!(counts[Purple.index()], 0);
    }

    #[test]
    fn test_from_kinds_truncates_tall_columns() {
        let grid = Grid::from_kinds(1, 2, &[vec![Red, Red, Red]]);
        assert_eq!(grid.column_len(0), 2);
    }
}
