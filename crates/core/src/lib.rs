//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens on the board lives here. The crate has no
//! dependency on a terminal or any other I/O; presentation collaborators are driven through
//! the [`Presenter`] trait and read state back through [`GameSnapshot`].
//!
//! # Module Structure
//!
//! - [`grid`]: column-major tile matrix, identity lookup, removal and refill
//! - [`scanner`]: iterative flood fill over 4-connected same-kind tiles
//! - [`resolver`]: selection -> scan -> threshold -> removal -> refill, power tiles
//! - [`shuffle`]: nested Fisher-Yates re-tagging of a full grid
//! - [`engine`]: the grid-facing control surface and its event queue
//! - [`session`]: turns, score, shuffle budget and win/loss detection
//! - [`config`]: layered configuration and its validation errors
//! - [`rng`]: seeded LCG and the tile kind source
//!
//! # Game Rules
//!
//! - A selection removes the connected same-kind group when it has at least
//!   `min_blast_group` tiles; smaller groups are rejected without touching the board.
//! - Removed tiles compact their columns downward; refill tops every column back up.
//! - A group of `min_power_group` or more leaves a power tile at the selected slot.
//!   Selecting a power tile clears its whole column.
//! - Every removal consumes one turn and scores one point per tile.
//! - Once the shuffle budget is spent, a board with no removable group ends the game.
//!
//! # Example
//!
//! ```
//! use tile_blast_core::{GameConfig, NullPresenter, Session};
//! use tile_blast_types::SessionPhase;
//!
//! let mut session = Session::new(GameConfig::default()).unwrap();
//! session.start(&mut NullPresenter);
//! assert_eq!(session.phase(), SessionPhase::Playing);
//! assert!(session.grid().is_full());
//!
//! session.select_at(0, 0, &mut NullPresenter);
//! assert!(session.turns_remaining() <= 10);
//! ```

pub mod config;
pub mod engine;
pub mod grid;
pub mod presenter;
pub mod resolver;
pub mod rng;
pub mod scanner;
pub mod session;
pub mod shuffle;
pub mod snapshot;
pub mod tile;

pub use tile_blast_types as types;

pub use config::{ConfigError, FieldLayout, GameConfig, MAX_GRID_SIDE};
pub use engine::BoardEngine;
pub use grid::Grid;
pub use presenter::{NullPresenter, Presenter, PresenterCall, RecordingPresenter};
pub use resolver::{Resolution, ResolverPhase, TurnResolver};
pub use rng::{KindSource, SimpleRng};
pub use scanner::{group_size_at, has_move, largest_group, reset_visited, scan_group, Group};
pub use session::Session;
pub use shuffle::shuffle_grid;
pub use snapshot::{BoardSnapshot, GameSnapshot, TileSnapshot};
pub use tile::{Tile, TileId};
