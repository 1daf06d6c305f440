//! Board engine - the grid-facing control surface
//!
//! Owns the grid, the resolver and the kind source, gates input on the `playing` flag and
//! queues [`CoreEvent`]s for the session. Every event is also mirrored to the presenter.
//!
//! Event order within one selection is `TurnEnd` first, then (when the no-moves check is on)
//! `NoMovesLeft`, so a winning clear is never reported as a dead board.

use std::collections::VecDeque;

use crate::config::{ConfigError, GameConfig};
use crate::grid::Grid;
use crate::presenter::Presenter;
use crate::resolver::{Resolution, TurnResolver};
use crate::rng::KindSource;
use crate::scanner::has_move;
use crate::shuffle::shuffle_grid;
use crate::tile::TileId;
use crate::types::{CoreEvent, TileKind};

#[derive(Debug, Clone)]
pub struct BoardEngine {
    grid: Grid,
    resolver: TurnResolver,
    kinds: KindSource,
    playing: bool,
    no_moves_check: bool,
    no_moves_reported: bool,
    events: VecDeque<CoreEvent>,
}

impl BoardEngine {
    /// Build an engine for a validated config. The grid starts empty.
    pub fn new(config: &GameConfig) -> Self {
        let (columns, rows) = config.dimensions();
        Self {
            grid: Grid::new(columns, rows),
            resolver: TurnResolver::new(
                config.min_blast_group as usize,
                config.min_power_group as usize,
            ),
            kinds: KindSource::new(config.seed, config.kind_count),
            playing: false,
            no_moves_check: false,
            no_moves_reported: false,
            events: VecDeque::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resolver(&self) -> &TurnResolver {
        &self.resolver
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn no_moves_check_enabled(&self) -> bool {
        self.no_moves_check
    }

    /// Current RNG state (a restart seeded with it continues the same sequence)
    pub fn seed(&self) -> u32 {
        self.kinds.seed()
    }

    /// Start or stop accepting input. Starting tops the grid up first.
    pub fn set_playing(&mut self, playing: bool, presenter: &mut dyn Presenter) {
        if playing {
            self.grid.refill(&mut self.kinds, presenter);
            self.playing = true;
            if self.no_moves_check {
                self.check_possible_moves(presenter);
            }
        } else {
            self.playing = false;
        }
    }

    /// Replace the board with a preset layout. Must match the grid size exactly and only
    /// use kinds in play.
    pub fn load_board(
        &mut self,
        layout: &[Vec<TileKind>],
        presenter: &mut dyn Presenter,
    ) -> Result<(), ConfigError> {
        let (columns, rows) = self.grid.dimensions();
        let tallest = layout.iter().map(Vec::len).max().unwrap_or(0);
        let shortest = layout.iter().map(Vec::len).min().unwrap_or(0);
        if layout.len() != columns || tallest != rows || shortest != rows {
            return Err(ConfigError::BoardShape {
                expected_columns: columns,
                expected_rows: rows,
                columns: layout.len(),
                rows: if shortest != tallest { shortest } else { tallest },
            });
        }
        let allowed = self.kinds.kinds();
        if let Some(&kind) = layout.iter().flatten().find(|k| !allowed.contains(k)) {
            return Err(ConfigError::KindOutOfCatalog {
                kind,
                kind_count: self.kinds.kind_count(),
            });
        }

        self.grid.load_kinds(layout, presenter);
        self.resolver.reset();
        Ok(())
    }

    /// Destroy every tile and forget pending state
    pub fn clear(&mut self, presenter: &mut dyn Presenter) {
        self.grid.clear(presenter);
        self.resolver.reset();
        self.events.clear();
        self.no_moves_reported = false;
    }

    /// Primary selection of a tile
    pub fn on_select(&mut self, id: TileId, presenter: &mut dyn Presenter) -> Resolution {
        if !self.playing {
            return Resolution::Ignored;
        }

        let resolution = self
            .resolver
            .resolve(&mut self.grid, id, &mut self.kinds, presenter);

        if let Some(size) = resolution.removed() {
            self.emit(CoreEvent::TurnEnd(size as u32), presenter);
            if self.no_moves_check {
                self.check_possible_moves(presenter);
            }
        }
        resolution
    }

    /// Secondary input: shuffle
    pub fn on_secondary_action(&mut self, presenter: &mut dyn Presenter) -> bool {
        self.request_shuffle(presenter)
    }

    /// Shuffle the board (no budget here; the session owns it)
    pub fn request_shuffle(&mut self, presenter: &mut dyn Presenter) -> bool {
        if !self.playing {
            return false;
        }
        let shuffled = shuffle_grid(&mut self.grid, self.kinds.rng_mut(), presenter);
        if shuffled && self.no_moves_check {
            self.check_possible_moves(presenter);
        }
        shuffled
    }

    /// Toggle the after-every-change "is any move left" check; enabling runs it once.
    pub fn set_no_moves_check_enabled(&mut self, enabled: bool, presenter: &mut dyn Presenter) {
        self.no_moves_check = enabled;
        if enabled && self.playing {
            self.check_possible_moves(presenter);
        }
    }

    /// Whether any removable group (or power tile) exists. Leaves no scan marks.
    pub fn has_possible_move(&mut self) -> bool {
        let min = self.resolver.min_blast();
        has_move(&mut self.grid, min)
    }

    /// Next queued event, oldest first
    pub fn take_event(&mut self) -> Option<CoreEvent> {
        self.events.pop_front()
    }

    fn check_possible_moves(&mut self, presenter: &mut dyn Presenter) {
        if self.no_moves_reported || self.has_possible_move() {
            return;
        }
        self.no_moves_reported = true;
        log::info!("no removable group left on the board");
        self.emit(CoreEvent::NoMovesLeft, presenter);
    }

    fn emit(&mut self, event: CoreEvent, presenter: &mut dyn Presenter) {
        presenter.emit(event);
        self.events.push_back(event);
    }
}
