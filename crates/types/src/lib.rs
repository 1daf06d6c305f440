//! Core types module - shared data structures and constants
//!
//! This module defines the plain data shared by the engine, the terminal front-end and the
//! headless simulator. Nothing here owns game state.
//!
//! # Default field
//!
//! The default field is the classic 440x440 play area split into 50px tiles, which yields an
//! 8x8 grid (the remaining 40px are absorbed by the centering offset).
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FIELD_WIDTH` | 440 | Field width in presentation units |
//! | `DEFAULT_FIELD_HEIGHT` | 440 | Field height in presentation units |
//! | `DEFAULT_TILE_SIZE` | 50 | Tile edge in presentation units |
//! | `DEFAULT_MIN_BLAST` | 2 | Smallest group that can be removed |
//! | `DEFAULT_MIN_POWER` | 4 | Smallest group that awards a power tile |
//! | `DEFAULT_TURNS` | 10 | Turn budget |
//! | `DEFAULT_WIN_SCORE` | 50 | Score needed to win |
//! | `DEFAULT_SHUFFLES` | 3 | Shuffle budget |
//!
//! # Examples
//!
//! ```
//! use tile_blast_types::{SessionPhase, TileKind};
//!
//! assert_eq!(TileKind::Red.as_str(), "red");
//! assert_eq!(TileKind::Purple.letter(), 'P');
//! assert!(!SessionPhase::Init.is_playing());
//! ```

use serde::{Deserialize, Serialize};

/// Default field width in presentation units
pub const DEFAULT_FIELD_WIDTH: u32 = 440;

/// Default field height in presentation units
pub const DEFAULT_FIELD_HEIGHT: u32 = 440;

/// Default tile edge in presentation units
pub const DEFAULT_TILE_SIZE: u32 = 50;

/// Default number of tile kinds in play
pub const DEFAULT_KIND_COUNT: u8 = 5;

/// Smallest group that can be blasted
pub const DEFAULT_MIN_BLAST: u32 = 2;

/// Smallest blasted group that awards a power tile
pub const DEFAULT_MIN_POWER: u32 = 4;

/// Turn budget per session
pub const DEFAULT_TURNS: u32 = 10;

/// Score needed to win
pub const DEFAULT_WIN_SCORE: u32 = 50;

/// Shuffle budget per session
pub const DEFAULT_SHUFFLES: u32 = 3;

/// Delay before refilled tiles are attached by the presentation layer (ms)
pub const PLACE_DELAY_MS: u32 = 100;

/// Blast animation window before destroyed tiles disappear (ms)
pub const SETTLE_MS: u32 = 200;

/// The closed set of tile colors
///
/// Matching is by value equality; the first `kind_count` variants (in declaration order)
/// are in play for a given configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Green,
    Blue,
    Yellow,
    Purple,
    Red,
}

impl TileKind {
    /// Every kind, in catalog order
    pub const ALL: [TileKind; 5] = [
        TileKind::Green,
        TileKind::Blue,
        TileKind::Yellow,
        TileKind::Purple,
        TileKind::Red,
    ];

    /// Catalog index of this kind
    pub fn index(self) -> usize {
        match self {
            TileKind::Green => 0,
            TileKind::Blue => 1,
            TileKind::Yellow => 2,
            TileKind::Purple => 3,
            TileKind::Red => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Green => "green",
            TileKind::Blue => "blue",
            TileKind::Yellow => "yellow",
            TileKind::Purple => "purple",
            TileKind::Red => "red",
        }
    }

    /// Single-letter tag used by text layouts and the terminal view
    pub fn letter(&self) -> char {
        match self {
            TileKind::Green => 'G',
            TileKind::Blue => 'B',
            TileKind::Yellow => 'Y',
            TileKind::Purple => 'P',
            TileKind::Red => 'R',
        }
    }
}

/// Actions a front-end can feed into a session
///
/// Cursor actions are consumed by the front-end itself; `Select` and `Shuffle` reach the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Primary click on the tile under the cursor
    Select,
    /// Secondary action: shuffle the board
    Shuffle,
    /// Leave the start menu
    Start,
    /// Restart from a fresh board
    Restart,
}

/// Events emitted by the board engine and consumed by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreEvent {
    /// A group (or a power column) was removed; payload is the number of tiles
    TurnEnd(u32),
    /// The no-moves check found no removable group anywhere
    NoMovesLeft,
}

impl CoreEvent {
    /// Event name as seen by presentation collaborators
    pub fn name(&self) -> &'static str {
        match self {
            CoreEvent::TurnEnd(_) => "TurnEnd",
            CoreEvent::NoMovesLeft => "NoMovesLeft",
        }
    }
}

/// Why a session finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Win,
    TurnsExhausted,
    NoMovesLeft,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Win => "win",
            FinishReason::TurnsExhausted => "turns_exhausted",
            FinishReason::NoMovesLeft => "no_moves_left",
        }
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "reason")]
pub enum SessionPhase {
    Init,
    Playing,
    Finished(FinishReason),
}

impl SessionPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::Playing)
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        match self {
            SessionPhase::Finished(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_field_defaults() {
        assert_eq!(DEFAULT_FIELD_WIDTH / DEFAULT_TILE_SIZE, 8);
        assert_eq!(DEFAULT_FIELD_HEIGHT / DEFAULT_TILE_SIZE, 8);
        assert_eq!(DEFAULT_KIND_COUNT as usize, TileKind::ALL.len());
        assert!(DEFAULT_MIN_POWER >= DEFAULT_MIN_BLAST);
        assert_eq!(PLACE_DELAY_MS, 100);
        assert_eq!(SETTLE_MS, 200);
    }

    #[test]
    fn kind_index_and_names_cover_catalog() {
        for (i, kind) in TileKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(
                kind.as_str().chars().next(),
                Some(kind.letter().to_ascii_lowercase())
            );
        }
    }

    #[test]
    fn event_names_match_presentation_surface() {
        assert_eq!(CoreEvent::TurnEnd(3).name(), "TurnEnd");
        assert_eq!(CoreEvent::NoMovesLeft.name(), "NoMovesLeft");
    }

    #[test]
    fn phase_helpers() {
        assert!(SessionPhase::Playing.is_playing());
        assert!(!SessionPhase::Init.is_playing());
        assert_eq!(
            SessionPhase::Finished(FinishReason::Win).finish_reason(),
            Some(FinishReason::Win)
        );
        assert_eq!(SessionPhase::Playing.finish_reason(), None);
    }
}
