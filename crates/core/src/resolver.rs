//! Turn resolver - turns one selection into scan, removal and refill
//!
//! Phases: `Idle -> Scanning -> {Rejected | Accepted} -> Idle`. The whole pass runs to
//! completion inside [`TurnResolver::resolve`], so the matrix a following selection reads is
//! always the settled one.
//!
//! Accepted groups at or above the power threshold leave a marker at the selected slot. The
//! marker is consumed by the refill of the same pass: whatever tile occupies that slot after
//! refill becomes a power tile. When that tile already is a power tile no second one is
//! awarded. Activating a power tile removes its whole column, skipping both the scan and the
//! threshold, and never awards another power tile.

use crate::grid::Grid;
use crate::presenter::Presenter;
use crate::rng::KindSource;
use crate::scanner::{reset_visited, scan_group};
use crate::tile::TileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverPhase {
    Idle,
    Scanning,
    Rejected,
    Accepted,
}

/// Outcome of one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Stale tile or a pass already in flight
    Ignored,
    /// Group below the blast threshold; nothing changed
    Rejected { size: usize },
    /// Tiles were removed and the grid refilled
    Cleared {
        size: usize,
        /// Slot converted into a power tile by this pass
        power_tile: Option<(usize, usize)>,
        /// The selection was a power tile and its column was cleared
        column_clear: bool,
    },
}

impl Resolution {
    /// Number of tiles removed, if any
    pub fn removed(&self) -> Option<usize> {
        match self {
            Resolution::Cleared { size, .. } => Some(*size),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnResolver {
    phase: ResolverPhase,
    min_blast: usize,
    min_power: usize,
    pending_power: Option<(usize, usize)>,
}

impl TurnResolver {
    pub fn new(min_blast: usize, min_power: usize) -> Self {
        Self {
            phase: ResolverPhase::Idle,
            min_blast: min_blast.max(1),
            min_power,
            pending_power: None,
        }
    }

    pub fn phase(&self) -> ResolverPhase {
        self.phase
    }

    pub fn min_blast(&self) -> usize {
        self.min_blast
    }

    /// Marker waiting for the next refill
    pub fn pending_power(&self) -> Option<(usize, usize)> {
        self.pending_power
    }

    /// Drop any pending marker (session reset)
    pub fn reset(&mut self) {
        self.phase = ResolverPhase::Idle;
        self.pending_power = None;
    }

    fn transition(&mut self, next: ResolverPhase) {
        log::trace!("resolver {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Resolve a primary selection of tile `id`.
    pub fn resolve(
        &mut self,
        grid: &mut Grid,
        id: TileId,
        kinds: &mut KindSource,
        presenter: &mut dyn Presenter,
    ) -> Resolution {
        if self.phase != ResolverPhase::Idle {
            return Resolution::Ignored;
        }
        let Some((col, row)) = grid.locate(id) else {
            log::debug!("selection of stale tile {:?} ignored", id);
            return Resolution::Ignored;
        };

        if grid.cell_at(col, row).is_some_and(|t| t.is_power()) {
            let column = grid.column_ids(col);
            log::debug!("power tile at ({}, {}) clears {} tiles", col, row, column.len());
            self.transition(ResolverPhase::Accepted);
            let size = self.accept(grid, &column, kinds, presenter);
            self.transition(ResolverPhase::Idle);
            return Resolution::Cleared {
                size,
                power_tile: None,
                column_clear: true,
            };
        }

        self.transition(ResolverPhase::Scanning);
        let group = scan_group(grid, col, row);

        if group.len() < self.min_blast {
            self.transition(ResolverPhase::Rejected);
            reset_visited(grid, &group);
            self.transition(ResolverPhase::Idle);
            return Resolution::Rejected { size: group.len() };
        }

        self.transition(ResolverPhase::Accepted);
        if group.len() >= self.min_power {
            self.pending_power = Some((col, row));
        }
        let size = self.accept(grid, &group.ids(), kinds, presenter);
        let power_tile = self.apply_pending_power(grid, presenter);
        self.transition(ResolverPhase::Idle);

        Resolution::Cleared {
            size,
            power_tile,
            column_clear: false,
        }
    }

    fn accept(
        &mut self,
        grid: &mut Grid,
        group: &[TileId],
        kinds: &mut KindSource,
        presenter: &mut dyn Presenter,
    ) -> usize {
        let removed = grid.remove_group(group, presenter);
        grid.refill(kinds, presenter);
        removed
    }

    fn apply_pending_power(
        &mut self,
        grid: &mut Grid,
        presenter: &mut dyn Presenter,
    ) -> Option<(usize, usize)> {
        let (col, row) = self.pending_power.take()?;
        if grid.cell_at(col, row)?.is_power() {
            log::debug!("({}, {}) already holds a power tile", col, row);
            return None;
        }
        let tile = grid.set_power(col, row)?;
        presenter.mark_power(tile, col, row);
        log::debug!("power tile created at ({}, {})", col, row);
        Some((col, row))
    }
}
