//! Tile identity and per-tile flags

use serde::{Deserialize, Serialize};

use crate::types::TileKind;

/// Stable tile identity, shared with the presentation layer as its handle.
///
/// Ids are never reused within one grid, so a stale id simply fails to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A tile on the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    kind: TileKind,
    power: bool,
    /// Set while a connectivity scan holds this tile
    pub(crate) visited: bool,
}

impl Tile {
    pub(crate) fn new(id: TileId, kind: TileKind) -> Self {
        Self {
            id,
            kind,
            power: false,
            visited: false,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Power tiles clear their column on activation and never join a normal group.
    pub fn is_power(&self) -> bool {
        self.power
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub(crate) fn set_power(&mut self, power: bool) {
        self.power = power;
    }

    /// Whether this tile joins a group started from a tile of `kind`.
    pub fn matches(&self, kind: TileKind) -> bool {
        !self.power && self.kind == kind
    }
}
