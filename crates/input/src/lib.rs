//! Terminal input for the tile board.
//!
//! Maps `crossterm` key and mouse events into [`crate::types::GameAction`]s and keeps the
//! keyboard cursor that stands in for a pointer on terminals without mouse reporting.
//! Nothing here knows about the grid contents; board coordinates come from the caller.

pub mod cursor;
pub mod map;

pub use tile_blast_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, handle_mouse_event, should_quit, PointerAction};
