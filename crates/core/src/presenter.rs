//! Outbound surface toward the presentation layer.
//!
//! The engine decides when tiles are created and destroyed; a presenter only mirrors those
//! decisions (attach a visual, release it, decorate a power tile, react to events). Calls are
//! fire-and-forget: the matrix is already updated when they happen.

use crate::tile::{Tile, TileId};
use crate::types::CoreEvent;

pub trait Presenter {
    /// A new tile occupies `(col, row)`.
    fn place_tile(&mut self, tile: &Tile, col: usize, row: usize);

    /// The tile left the grid; its visual can be released.
    fn destroy_tile(&mut self, id: TileId);

    /// The tile at `(col, row)` became a power tile.
    fn mark_power(&mut self, tile: &Tile, col: usize, row: usize) {
        let _ = (tile, col, row);
    }

    fn emit(&mut self, event: CoreEvent) {
        let _ = event;
    }
}

/// Presenter that ignores every call (headless play, benches)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn place_tile(&mut self, _tile: &Tile, _col: usize, _row: usize) {}

    fn destroy_tile(&mut self, _id: TileId) {}
}

/// One recorded presenter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterCall {
    Place { id: TileId, col: usize, row: usize },
    Destroy { id: TileId },
    Power { id: TileId, col: usize, row: usize },
    Emit(CoreEvent),
}

/// Presenter that records every call in order
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placed(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PresenterCall::Place { .. }))
            .count()
    }

    pub fn destroyed(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PresenterCall::Destroy { .. }))
            .count()
    }

    pub fn events(&self) -> Vec<CoreEvent> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresenterCall::Emit(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn place_tile(&mut self, tile: &Tile, col: usize, row: usize) {
        self.calls.push(PresenterCall::Place {
            id: tile.id(),
            col,
            row,
        });
    }

    fn destroy_tile(&mut self, id: TileId) {
        self.calls.push(PresenterCall::Destroy { id });
    }

    fn mark_power(&mut self, tile: &Tile, col: usize, row: usize) {
        self.calls.push(PresenterCall::Power {
            id: tile.id(),
            col,
            row,
        });
    }

    fn emit(&mut self, event: CoreEvent) {
        self.calls.push(PresenterCall::Emit(event));
    }
}
