//! Connectivity scanner - flood fill over 4-connected same-kind tiles
//!
//! The fill is depth-first with an explicit stack. Neighbours are pushed in reverse probe
//! order (below, above, left, right) so the discovery order is exactly what the recursive
//! formulation produces, without recursion depth tied to grid size.
//!
//! Scanning marks tiles `visited`. A caller that accepts a group removes the tiles (and the
//! marks with them); a caller that rejects it must hand the group to [`reset_visited`]
//! before the next scan, otherwise the marked tiles become unreachable.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::tile::TileId;
use crate::types::TileKind;

/// Tiles discovered by one scan, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: Vec<(TileId, usize, usize)>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> Vec<TileId> {
        self.members.iter().map(|&(id, _, _)| id).collect()
    }

    /// `(col, row)` of each member at scan time
    pub fn positions(&self) -> Vec<(usize, usize)> {
        self.members.iter().map(|&(_, c, r)| (c, r)).collect()
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        self.members.iter().any(|&(_, c, r)| c == col && r == row)
    }
}

/// Collect the maximal same-kind group containing `(col, row)`.
///
/// An empty slot yields an empty group. A power tile never matches by kind, so a scan
/// started on one returns just that tile.
pub fn scan_group(grid: &mut Grid, col: usize, row: usize) -> Group {
    let mut group = Group::default();
    let Some(start) = grid.cell_at(col, row) else {
        return group;
    };
    let kind = start.kind();
    let start_is_power = start.is_power();

    let mut stack = vec![(col, row)];
    while let Some((c, r)) = stack.pop() {
        let Some(tile) = grid.cell_at_mut(c, r) else {
            continue;
        };
        if tile.visited {
            continue;
        }
        tile.visited = true;
        group.members.push((tile.id(), c, r));

        if start_is_power {
            break;
        }

        let neighbours = matching_neighbours(grid, c, r, kind);
        stack.extend(neighbours.into_iter().rev());
    }
    group
}

/// Neighbours of `(col, row)` that exist, are unvisited and match `kind`, in probe order.
fn matching_neighbours(
    grid: &Grid,
    col: usize,
    row: usize,
    kind: TileKind,
) -> ArrayVec<(usize, usize), 4> {
    let (c, r) = (col as isize, row as isize);
    let probes = [(c, r - 1), (c, r + 1), (c - 1, r), (c + 1, r)];

    let mut out = ArrayVec::new();
    for (pc, pr) in probes {
        if let Some(tile) = grid.cell_at_signed(pc, pr) {
            if tile.matches(kind) && !tile.visited() {
                out.push((pc as usize, pr as usize));
            }
        }
    }
    out
}

/// Clear the scan marks left by a rejected group.
pub fn reset_visited(grid: &mut Grid, group: &Group) {
    for &(id, col, row) in &group.members {
        let in_place = grid.cell_at(col, row).is_some_and(|t| t.id() == id);
        // The grid changed since the scan; fall back to an identity lookup.
        let slot = if in_place {
            Some((col, row))
        } else {
            grid.locate(id)
        };
        if let Some(tile) = slot.and_then(|(c, r)| grid.cell_at_mut(c, r)) {
            tile.visited = false;
        }
    }
}

/// Size of the group at `(col, row)` without leaving any marks behind
pub fn group_size_at(grid: &mut Grid, col: usize, row: usize) -> usize {
    let group = scan_group(grid, col, row);
    reset_visited(grid, &group);
    group.len()
}

/// Whether any selection on the grid would resolve with `min_group` tiles.
///
/// Power tiles count as available moves since their activation skips the threshold.
pub fn has_move(grid: &mut Grid, min_group: usize) -> bool {
    if grid.power_count() > 0 {
        return true;
    }
    for (col, row) in occupied_slots(grid) {
        if group_size_at(grid, col, row) >= min_group {
            return true;
        }
    }
    false
}

/// Slot of the largest normal group on the grid and its size (first found wins ties)
pub fn largest_group(grid: &mut Grid) -> Option<(usize, usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    for (col, row) in occupied_slots(grid) {
        if grid.cell_at(col, row).is_some_and(|t| t.is_power()) {
            continue;
        }
        let size = group_size_at(grid, col, row);
        if best.map_or(true, |(_, _, s)| size > s) {
            best = Some((col, row, size));
        }
    }
    best
}

fn occupied_slots(grid: &Grid) -> Vec<(usize, usize)> {
    grid.iter().map(|(col, row, _)| (col, row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind::*;

    fn grid(kinds: &[Vec<TileKind>]) -> Grid {
        let rows = kinds.iter().map(Vec::len).max().unwrap_or(0);
        Grid::from_kinds(kinds.len(), rows, kinds)
    }

    #[test]
    fn test_single_column_stops_at_other_kind() {
        let mut g = grid(&[vec![Green, Green, Blue, Green]]);
        let group = scan_group(&mut g, 0, 0);
        assert_eq!(group.positions(), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_no_diagonals() {
        let mut g = grid(&[vec![Red, Blue], vec![Blue, Red]]);
        assert_eq!(scan_group(&mut g, 0, 0).len(), 1);
    }

    #[test]
    fn test_discovery_order_matches_recursive_probe_order() {
        // col0: G G
        // col1: G G
        let mut g = grid(&[vec![Green, Green], vec![Green, Green]]);
        let group = scan_group(&mut g, 0, 1);
        // below first, then right of (0,0), then above (1,1)
        assert_eq!(group.positions(), vec![(0, 1), (0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_scan_marks_then_reset_clears() {
        let mut g = grid(&[vec![Green, Green, Green], vec![Blue, Green, Red]]);
        let group = scan_group(&mut g, 1, 1);
        assert_eq!(group.len(), 4);
        assert!(g.any_visited());
        reset_visited(&mut g, &group);
        assert!(!g.any_visited());
    }

    #[test]
    fn test_short_neighbour_column_is_absent() {
        let mut g = Grid::from_kinds(2, 3, &[vec![Red, Red, Red], vec![Red]]);
        let group = scan_group(&mut g, 0, 2);
        assert_eq!(group.len(), 4);
        assert!(group.contains(1, 0));
    }

    #[test]
    fn test_empty_slot_yields_empty_group() {
        let mut g = Grid::from_kinds(2, 3, &[vec![Red], vec![]]);
        assert!(scan_group(&mut g, 1, 0).is_empty());
        assert!(scan_group(&mut g, 9, 9).is_empty());
    }

    #[test]
    fn test_power_tile_is_isolated() {
        let mut g = grid(&[vec![Green, Green, Green]]);
        g.set_power(0, 1);
        assert_eq!(scan_group(&mut g, 0, 0).len(), 1);
        assert!(!g.cell_at(0, 1).unwrap().visited());
        let mut g2 = g.clone();
        let from_power = scan_group(&mut g2, 0, 1);
        assert_eq!(from_power.positions(), vec![(0, 1)]);
    }

    #[test]
    fn test_has_move_and_largest_group() {
        let mut g = grid(&[vec![Red, Blue], vec![Blue, Red]]);
        assert!(!has_move(&mut g, 2));
        assert!(has_move(&mut g, 1));
        assert!(!g.any_visited());

        let mut g = grid(&[vec![Red, Red], vec![Blue, Red]]);
        assert_eq!(largest_group(&mut g), Some((0, 0, 3)));
        assert!(!g.any_visited());
    }

    #[test]
    fn test_power_tile_counts_as_move() {
        let mut g = grid(&[vec![Red, Blue], vec![Blue, Red]]);
        g.set_power(1, 1);
        assert!(has_move(&mut g, 2));
    }
}
