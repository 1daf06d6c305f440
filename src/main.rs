//! Terminal Tile Blast runner (default binary).
//!
//! crossterm input (keyboard and mouse) and the framebuffer renderer from `tile-blast-term`.
//! Logging is off unless `TILE_BLAST_LOG` names a file; stderr would corrupt the screen.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::LevelFilter;

use tile_blast::core::{Resolution, Session};
use tile_blast::input::{handle_key_event, handle_mouse_event, should_quit, Cursor};
use tile_blast::term::{FrameBuffer, GameView, SettleTracker, TerminalRenderer, ViewState, Viewport};
use tile_blast::types::{CoreEvent, GameAction, SessionPhase};
use tile_blast::{init_logger, load_config, LogSink};

const FRAME_MS: u64 = 16;
/// Poll timeout while no tile is settling
const IDLE_MS: u64 = 250;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let log_path = std::env::var_os("TILE_BLAST_LOG").map(PathBuf::from);
    match &log_path {
        Some(path) => init_logger(LogSink::File(path), LevelFilter::Info)?,
        None => init_logger(LogSink::Off, LevelFilter::Off)?,
    }

    let config = load_config(args.config.as_deref())?;
    let session = Session::new(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(session).run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Command-line arguments for the terminal game.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON config file layered under the `TILE_BLAST_*` environment.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

struct App {
    session: Session,
    tracker: SettleTracker,
    cursor: Cursor,
    view: GameView,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        let (columns, rows) = session.grid().dimensions();
        Self {
            session,
            tracker: SettleTracker::new(),
            cursor: Cursor::new(columns, rows),
            view: GameView::default(),
            status: String::new(),
        }
    }

    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let mut fb = FrameBuffer::new(0, 0);
        let frame = Duration::from_millis(FRAME_MS);
        let idle = Duration::from_millis(IDLE_MS);
        let mut last_tick = Instant::now();

        loop {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let viewport = Viewport::new(w, h);
            let snap = self.session.snapshot();
            let state = ViewState {
                cursor: Some(self.cursor.position()),
                settle: Some(&self.tracker),
                status: Some(&self.status),
            };
            self.view.render_into(&snap, &state, viewport, &mut fb);
            term.draw(&fb)?;

            let busy = self.tracker.is_busy();
            let wait = if busy { frame } else { idle };
            let timeout = wait.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = handle_key_event(key) {
                            self.on_action(action);
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Some(pointer) = handle_mouse_event(mouse) {
                            let hit =
                                self.view
                                    .hit_test(&snap, viewport, pointer.column, pointer.row);
                            if let Some((col, row)) = hit {
                                self.cursor.set(col, row);
                            }
                            // Clicks outside the board only matter on menus.
                            let on_board = hit.is_some() || !snap.playable();
                            if pointer.action != GameAction::Select || on_board {
                                self.on_action(pointer.action);
                            }
                        }
                    }
                    Event::Resize(_, _) => term.invalidate(),
                    _ => {}
                }
            }

            if !busy {
                // Tiles placed by this event start aging now.
                last_tick = Instant::now();
            }
            let elapsed = last_tick.elapsed();
            if elapsed >= frame {
                last_tick = Instant::now();
                self.tracker.tick(elapsed.as_millis() as u32);
            }
        }
    }

    fn on_action(&mut self, action: GameAction) {
        if self.cursor.apply(action) {
            return;
        }

        let was = self.session.phase();
        let episode = self.session.episode_id();
        let mut note = None;
        match (action, was) {
            (GameAction::Select, SessionPhase::Playing) => {
                let (col, row) = self.cursor.position();
                match self.session.select_at(col, row, &mut self.tracker) {
                    Resolution::Rejected { size } => {
                        note = Some(format!("Group of {size} is too small"));
                    }
                    Resolution::Cleared {
                        column_clear: true,
                        ..
                    } => note = Some("column".to_string()),
                    _ => {}
                }
            }
            // Enter on a menu starts or restarts.
            (GameAction::Select, _) => {
                self.session.apply_action(GameAction::Start, &mut self.tracker);
            }
            (GameAction::Shuffle, SessionPhase::Playing) => {
                if !self.session.apply_action(action, &mut self.tracker) {
                    note = Some("No shuffles left".to_string());
                }
            }
            _ => {
                self.session.apply_action(action, &mut self.tracker);
            }
        }

        if self.session.episode_id() != episode || was != self.session.phase() {
            self.status.clear();
        }
        match (self.tracker.take_last_event(), note) {
            (Some(CoreEvent::TurnEnd(removed)), Some(note)) => {
                self.status = format!("+{removed} ({note})");
            }
            (Some(CoreEvent::TurnEnd(removed)), None) => self.status = format!("+{removed}"),
            (Some(CoreEvent::NoMovesLeft), _) => self.status = "No moves left".to_string(),
            (None, Some(note)) => self.status = note,
            (None, None) => {}
        }
    }
}
