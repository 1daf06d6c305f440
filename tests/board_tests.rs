//! Board tests - grid, scanner and shuffler through the facade crate

use tile_blast::core::{
    group_size_at, has_move, reset_visited, scan_group, shuffle_grid, Grid, KindSource,
    NullPresenter, RecordingPresenter, SimpleRng, TileId,
};
use tile_blast::types::TileKind::{self, *};

fn column_lengths(grid: &Grid) -> Vec<usize> {
    (0..grid.columns()).map(|c| grid.column_len(c)).collect()
}

fn kinds_of(grid: &Grid) -> Vec<Vec<TileKind>> {
    (0..grid.columns())
        .map(|c| {
            (0..grid.column_len(c))
                .filter_map(|r| grid.cell_at(c, r).map(|t| t.kind()))
                .collect()
        })
        .collect()
}

#[test]
fn test_out_of_range_lookups_are_absent() {
    let grid = Grid::from_kinds(2, 2, &[vec![Red, Red], vec![Blue]]);
    assert!(grid.cell_at(2, 0).is_none());
    assert!(grid.cell_at(0, 2).is_none());
    assert!(grid.cell_at(1, 1).is_none());
    assert!(grid.cell_at_signed(-1, 0).is_none());
    assert!(grid.cell_at_signed(0, -1).is_none());
}

#[test]
fn test_removal_compacts_each_column_by_its_losses() {
    let mut grid = Grid::from_kinds(
        3,
        4,
        &[
            vec![Red, Blue, Red, Green],
            vec![Red, Red, Yellow, Red],
            vec![Blue, Blue, Blue, Blue],
        ],
    );
    let before = column_lengths(&grid);
    let group = scan_group(&mut grid, 0, 0);
    let positions = group.positions();

    let removed = grid.remove_group(&group.ids(), &mut NullPresenter);

    assert_eq!(removed, 3);
    for col in 0..3 {
        let lost = positions.iter().filter(|&&(c, _)| c == col).count();
        assert_eq!(grid.column_len(col), before[col].saturating_sub(lost));
    }
    // Survivors slid down in their own column and kept their order.
    assert_eq!(kinds_of(&grid)[0], vec![Blue, Red, Green]);
    assert_eq!(kinds_of(&grid)[1], vec![Yellow, Red]);
    assert!(!grid.any_visited());
}

#[test]
fn test_refill_only_appends() {
    let mut grid = Grid::from_kinds(2, 3, &[vec![Green], vec![]]);
    let kept = grid.cell_at(0, 0).unwrap().id();
    let mut kinds = KindSource::new(99, 3);
    let mut presenter = RecordingPresenter::new();

    let placed = grid.refill(&mut kinds, &mut presenter);

    assert_eq!(placed, 5);
    assert_eq!(presenter.placed(), 5);
    assert_eq!(column_lengths(&grid), vec![3, 3]);
    assert_eq!(grid.locate(kept), Some((0, 0)));
    // Three kinds in play: only the catalog prefix is drawn.
    for (_, _, tile) in grid.iter() {
        assert!(tile.kind().index() < 3 || tile.id() == kept);
    }
}

#[test]
fn test_stale_ids_fail_to_locate() {
    let mut grid = Grid::from_kinds(1, 2, &[vec![Red, Red]]);
    let id = grid.cell_at(0, 1).unwrap().id();
    grid.remove_group(&[id], &mut NullPresenter);
    assert_eq!(grid.locate(id), None);
    assert_eq!(grid.remove_group(&[id], &mut NullPresenter), 0);
    assert_eq!(grid.locate(TileId(12_345)), None);
}

#[test]
fn test_clear_destroys_every_tile() {
    let mut grid = Grid::from_kinds(2, 2, &[vec![Red, Blue], vec![Green, Yellow]]);
    let mut presenter = RecordingPresenter::new();
    grid.clear(&mut presenter);
    assert!(grid.is_empty());
    assert_eq!(presenter.destroyed(), 4);
}

#[test]
fn test_scanner_single_column_example() {
    let mut grid = Grid::from_kinds(1, 4, &[vec![Purple, Purple, Yellow, Purple]]);
    let group = scan_group(&mut grid, 0, 0);
    assert_eq!(group.positions(), vec![(0, 0), (0, 1)]);
}

#[test]
fn test_rejected_scan_leaves_no_marks() {
    let mut grid = Grid::from_kinds(
        3,
        3,
        &[
            vec![Red, Blue, Red],
            vec![Blue, Red, Blue],
            vec![Red, Blue, Red],
        ],
    );
    for col in 0..3 {
        for row in 0..3 {
            let group = scan_group(&mut grid, col, row);
            assert_eq!(group.len(), 1);
            reset_visited(&mut grid, &group);
            assert!(!grid.any_visited());
        }
    }
    assert!(!has_move(&mut grid, 2));
}

#[test]
fn test_group_wraps_around_a_hole() {
    // A ring of greens around a blue centre is one group of eight.
    let mut grid = Grid::from_kinds(
        3,
        3,
        &[
            vec![Green, Green, Green],
            vec![Green, Blue, Green],
            vec![Green, Green, Green],
        ],
    );
    assert_eq!(group_size_at(&mut grid, 2, 2), 8);
    assert_eq!(group_size_at(&mut grid, 1, 1), 1);
}

#[test]
fn test_shuffle_preserves_kinds_and_shape() {
    let mut grid = Grid::from_kinds(
        4,
        3,
        &[
            vec![Red, Red, Blue],
            vec![Green, Yellow, Purple],
            vec![Red, Blue, Blue],
            vec![Green, Green, Green],
        ],
    );
    let counts = grid.kind_counts();
    let mut rng = SimpleRng::new(2024);
    for _ in 0..50 {
        assert!(shuffle_grid(&mut grid, &mut rng, &mut NullPresenter));
        assert_eq!(grid.kind_counts(), counts);
        assert!(grid.is_full());
    }
}
