//! Terminal presentation for the tile board.
//!
//! Renders session snapshots into a small framebuffer and flushes it to the terminal with
//! diffed writes. The core is driven through its `Presenter` trait; [`SettleTracker`] is the
//! terminal's implementation and only paces visuals.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod settle;

pub use tile_blast_core as core;
pub use tile_blast_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{overlay_text, GameView, ViewState, Viewport};
pub use renderer::{changed_spans, encode_full, encode_spans, TerminalRenderer};
pub use settle::{SettleTracker, TileStage};
