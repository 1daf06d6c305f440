//! Session state machine
//!
//! `Init -> Playing -> Finished(reason)`. The session owns the budgets and the score and
//! reacts to the engine's [`CoreEvent`]s; it never touches the grid directly.

use crate::config::{ConfigError, GameConfig};
use crate::engine::BoardEngine;
use crate::grid::Grid;
use crate::presenter::{NullPresenter, Presenter};
use crate::resolver::Resolution;
use crate::snapshot::GameSnapshot;
use crate::tile::TileId;
use crate::types::{CoreEvent, FinishReason, GameAction, SessionPhase, TileKind};

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    engine: BoardEngine,
    phase: SessionPhase,
    score: u32,
    turns_remaining: u32,
    shuffles_remaining: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
}

impl Session {
    /// Validate `config` and build a session in `Init` with an empty grid.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = BoardEngine::new(&config);
        Ok(Self {
            turns_remaining: config.turn_budget,
            shuffles_remaining: config.shuffle_budget,
            config,
            engine,
            phase: SessionPhase::Init,
            score: 0,
            episode_id: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    pub fn shuffles_remaining(&self) -> u32 {
        self.shuffles_remaining
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Back to `Init`: counters reset, grid cleared and not playable.
    pub fn init(&mut self, presenter: &mut dyn Presenter) {
        self.engine.set_playing(false, presenter);
        self.engine.set_no_moves_check_enabled(false, presenter);
        self.engine.clear(presenter);
        self.phase = SessionPhase::Init;
        self.score = 0;
        self.turns_remaining = self.config.turn_budget;
        self.shuffles_remaining = self.config.shuffle_budget;
    }

    /// `Init -> Playing`: fill the grid and accept input. No-op outside `Init`.
    pub fn start(&mut self, presenter: &mut dyn Presenter) -> bool {
        if self.phase != SessionPhase::Init {
            return false;
        }
        self.phase = SessionPhase::Playing;
        self.engine.set_playing(true, presenter);
        log::info!(
            "episode {} started on a {}x{} grid",
            self.episode_id,
            self.grid().columns(),
            self.grid().rows()
        );
        if self.shuffles_remaining == 0 {
            self.engine.set_no_moves_check_enabled(true, presenter);
        }
        self.pump();
        true
    }

    /// Reset to `Init`, lay out a preset board and start on it.
    pub fn start_with_board(
        &mut self,
        layout: &[Vec<TileKind>],
        presenter: &mut dyn Presenter,
    ) -> Result<(), ConfigError> {
        self.init(presenter);
        self.engine.load_board(layout, presenter)?;
        self.start(presenter);
        Ok(())
    }

    /// Finished (or any phase) -> `Init` -> `Playing` with a fresh board.
    pub fn restart(&mut self, presenter: &mut dyn Presenter) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.init(presenter);
        self.start(presenter);
    }

    /// Primary selection by tile identity
    pub fn select(&mut self, id: TileId, presenter: &mut dyn Presenter) -> Resolution {
        if !self.is_playing() {
            return Resolution::Ignored;
        }
        let resolution = self.engine.on_select(id, presenter);
        self.pump();
        resolution
    }

    /// Primary selection of whatever occupies `(col, row)`
    pub fn select_at(
        &mut self,
        col: usize,
        row: usize,
        presenter: &mut dyn Presenter,
    ) -> Resolution {
        match self.grid().cell_at(col, row).map(|t| t.id()) {
            Some(id) => self.select(id, presenter),
            None => Resolution::Ignored,
        }
    }

    /// Spend one shuffle. The last one turns on the no-moves check.
    pub fn request_shuffle(&mut self, presenter: &mut dyn Presenter) -> bool {
        if !self.is_playing() {
            return false;
        }
        if self.shuffles_remaining == 0 {
            log::warn!("shuffle requested with no shuffles left");
            return false;
        }
        if !self.engine.on_secondary_action(presenter) {
            return false;
        }
        self.shuffles_remaining -= 1;
        log::debug!("shuffle used, {} left", self.shuffles_remaining);
        if self.shuffles_remaining == 0 {
            self.engine.set_no_moves_check_enabled(true, presenter);
        }
        self.pump();
        true
    }

    /// Apply a core event to the counters.
    pub fn handle_event(&mut self, event: CoreEvent) {
        if !self.is_playing() {
            log::debug!("{} ignored outside play", event.name());
            return;
        }
        match event {
            CoreEvent::TurnEnd(removed) => {
                self.turns_remaining = self.turns_remaining.saturating_sub(1);
                self.score = self.score.saturating_add(removed);
                if self.score >= self.config.win_score {
                    self.finish(FinishReason::Win);
                } else if self.turns_remaining == 0 {
                    self.finish(FinishReason::TurnsExhausted);
                }
            }
            CoreEvent::NoMovesLeft => self.finish(FinishReason::NoMovesLeft),
        }
    }

    /// Drain the engine's queued events into [`Session::handle_event`].
    pub fn pump(&mut self) {
        while let Some(event) = self.engine.take_event() {
            self.handle_event(event);
        }
    }

    /// Apply a front-end action. Cursor movement and `Select` need a board position and are
    /// resolved by the caller through [`Session::select_at`].
    pub fn apply_action(&mut self, action: GameAction, presenter: &mut dyn Presenter) -> bool {
        match action {
            GameAction::Shuffle => self.request_shuffle(presenter),
            GameAction::Start => match self.phase {
                SessionPhase::Init => self.start(presenter),
                SessionPhase::Finished(_) => {
                    self.restart(presenter);
                    true
                }
                SessionPhase::Playing => false,
            },
            GameAction::Restart => {
                self.restart(presenter);
                true
            }
            GameAction::CursorLeft
            | GameAction::CursorRight
            | GameAction::CursorUp
            | GameAction::CursorDown
            | GameAction::Select => false,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board.write_from(self.engine.grid());
        out.phase = self.phase;
        out.score = self.score;
        out.win_score = self.config.win_score;
        out.turns_remaining = self.turns_remaining;
        out.turn_budget = self.config.turn_budget;
        out.shuffles_remaining = self.shuffles_remaining;
        out.episode_id = self.episode_id;
        out.seed = self.engine.seed();
        out.pending_power = self.engine.resolver().pending_power();
        out.no_moves_check = self.engine.no_moves_check_enabled();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn finish(&mut self, reason: FinishReason) {
        self.phase = SessionPhase::Finished(reason);
        self.engine.set_playing(false, &mut NullPresenter);
        log::info!(
            "episode {} finished: {} (score {}/{}, {} turns left)",
            self.episode_id,
            reason.as_str(),
            self.score,
            self.config.win_score,
            self.turns_remaining
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;
    use crate::types::TileKind::*;

    fn session(columns: usize, rows: usize) -> Session {
        Session::new(GameConfig::with_grid(columns, rows)).unwrap()
    }

    #[test]
    fn test_new_session_is_init_and_empty() {
        let s = session(4, 4);
        assert_eq!(s.phase(), SessionPhase::Init);
        assert!(s.grid().is_empty());
        assert_eq!(s.turns_remaining(), 10);
        assert_eq!(s.shuffles_remaining(), 3);
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = GameConfig {
            kind_count: 9,
            ..GameConfig::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::KindCatalog { .. })
        ));
    }

    #[test]
    fn test_start_only_from_init() {
        let mut s = session(3, 3);
        assert!(s.start(&mut NullPresenter));
        assert!(s.grid().is_full());
        assert!(!s.start(&mut NullPresenter));
        assert!(!s.apply_action(GameAction::Start, &mut NullPresenter));
    }

    #[test]
    fn test_turn_end_updates_counters() {
        let mut s = session(2, 2);
        s.start_with_board(&[vec![Red, Red], vec![Blue, Green]], &mut NullPresenter)
            .unwrap();

        let outcome = s.select_at(0, 0, &mut NullPresenter);

        assert_eq!(outcome.removed(), Some(2));
        assert_eq!(s.score(), 2);
        assert_eq!(s.turns_remaining(), 9);
        assert!(s.is_playing());
    }

    #[test]
    fn test_rejected_selection_costs_nothing() {
        let mut s = session(2, 2);
        s.start_with_board(&[vec![Red, Blue], vec![Blue, Red]], &mut NullPresenter)
            .unwrap();
        assert_eq!(
            s.select_at(0, 0, &mut NullPresenter),
            Resolution::Rejected { size: 1 }
        );
        assert_eq!(s.turns_remaining(), 10);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_win_takes_priority_over_last_turn() {
        let config = GameConfig {
            turn_budget: 1,
            win_score: 2,
            ..GameConfig::with_grid(2, 2)
        };
        let mut s = Session::new(config).unwrap();
        s.start_with_board(&[vec![Red, Red], vec![Blue, Green]], &mut NullPresenter)
            .unwrap();
        s.select_at(0, 1, &mut NullPresenter);
        assert_eq!(s.phase(), SessionPhase::Finished(FinishReason::Win));
        assert_eq!(s.turns_remaining(), 0);
    }

    #[test]
    fn test_finished_session_ignores_input() {
        let config = GameConfig {
            turn_budget: 1,
            ..GameConfig::with_grid(2, 2)
        };
        let mut s = Session::new(config).unwrap();
        s.start_with_board(&[vec![Red, Red], vec![Blue, Blue]], &mut NullPresenter)
            .unwrap();
        s.select_at(0, 0, &mut NullPresenter);
        assert_eq!(
            s.phase(),
            SessionPhase::Finished(FinishReason::TurnsExhausted)
        );

        let mut presenter = RecordingPresenter::new();
        assert_eq!(s.select_at(1, 0, &mut presenter), Resolution::Ignored);
        assert!(!s.request_shuffle(&mut presenter));
        assert!(presenter.calls.is_empty());
    }

    #[test]
    fn test_shuffle_budget_is_spent_and_bounded() {
        let config = GameConfig {
            shuffle_budget: 2,
            ..GameConfig::with_grid(3, 3)
        };
        let mut s = Session::new(config).unwrap();
        s.start_with_board(
            &[
                vec![Red, Red, Red],
                vec![Red, Red, Red],
                vec![Red, Red, Red],
            ],
            &mut NullPresenter,
        )
        .unwrap();
        assert!(s.request_shuffle(&mut NullPresenter));
        assert!(!s.engine().no_moves_check_enabled());
        assert!(s.request_shuffle(&mut NullPresenter));
        assert!(s.engine().no_moves_check_enabled());
        assert!(!s.request_shuffle(&mut NullPresenter));
        assert_eq!(s.shuffles_remaining(), 0);
        assert!(s.is_playing());
    }

    #[test]
    fn test_restart_increments_episode_and_resets() {
        let mut s = session(2, 2);
        s.start_with_board(&[vec![Red, Red], vec![Blue, Green]], &mut NullPresenter)
            .unwrap();
        s.select_at(0, 0, &mut NullPresenter);
        assert!(s.apply_action(GameAction::Restart, &mut NullPresenter));
        assert_eq!(s.episode_id(), 1);
        assert_eq!(s.score(), 0);
        assert_eq!(s.turns_remaining(), 10);
        assert!(s.is_playing());
        assert!(s.grid().is_full());
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut s = session(2, 2);
        s.start_with_board(&[vec![Red, Red], vec![Blue, Green]], &mut NullPresenter)
            .unwrap();
        let snap = s.snapshot();
        assert!(snap.playable());
        assert_eq!(snap.board.get(1, 0).map(|t| t.kind), Some(Blue));
        assert_eq!(snap.turns_remaining, 10);
        assert_eq!(snap.win_score, 50);
    }
}
