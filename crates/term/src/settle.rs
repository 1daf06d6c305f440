//! Visual pacing for board changes.
//!
//! The core mutates the matrix atomically; this presenter only remembers when each tile
//! appeared so the view can hold it back for [`PLACE_DELAY_MS`] and then draw it dimmed
//! until [`SETTLE_MS`] has passed. It also keeps the last core event for the status line.

use std::collections::HashMap;

use crate::core::{Presenter, Tile, TileId};
use crate::types::{CoreEvent, PLACE_DELAY_MS, SETTLE_MS};

/// How a tile should be drawn right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStage {
    /// Not drawn yet (the slot looks empty)
    Pending,
    /// Drawn dimmed
    Settling,
    Settled,
}

#[derive(Debug, Default)]
pub struct SettleTracker {
    /// Age in ms of every tile placed recently
    fresh: HashMap<TileId, u32>,
    last_event: Option<CoreEvent>,
}

impl SettleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every fresh tile by `elapsed_ms`; settled tiles are forgotten.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.fresh.retain(|_, age| {
            *age = age.saturating_add(elapsed_ms);
            *age < PLACE_DELAY_MS + SETTLE_MS
        });
    }

    pub fn stage(&self, id: TileId) -> TileStage {
        match self.fresh.get(&id) {
            Some(&age) if age < PLACE_DELAY_MS => TileStage::Pending,
            Some(_) => TileStage::Settling,
            None => TileStage::Settled,
        }
    }

    /// Whether anything is still animating (the loop can sleep longer when not)
    pub fn is_busy(&self) -> bool {
        !self.fresh.is_empty()
    }

    /// Take and clear the last core event.
    pub fn take_last_event(&mut self) -> Option<CoreEvent> {
        self.last_event.take()
    }
}

impl Presenter for SettleTracker {
    fn place_tile(&mut self, tile: &Tile, _col: usize, _row: usize) {
        self.fresh.insert(tile.id(), 0);
    }

    fn destroy_tile(&mut self, id: TileId) {
        self.fresh.remove(&id);
    }

    fn emit(&mut self, event: CoreEvent) {
        self.last_event = Some(event);
    }
}
