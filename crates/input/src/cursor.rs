//! Keyboard cursor over the board, clamped to the grid.

use crate::types::GameAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    col: usize,
    row: usize,
    columns: usize,
    rows: usize,
}

impl Cursor {
    /// Cursor for a `columns x rows` board, starting at the top-left slot.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            col: 0,
            row: rows.saturating_sub(1),
            columns,
            rows,
        }
    }

    /// `(col, row)`; row 0 is the bottom of the board
    pub fn position(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Jump to a slot (e.g. after a mouse click). Out-of-range values are clamped.
    pub fn set(&mut self, col: usize, row: usize) {
        self.col = col.min(self.columns.saturating_sub(1));
        self.row = row.min(self.rows.saturating_sub(1));
    }

    /// Apply a cursor action. Returns `true` if the action was a cursor move.
    pub fn apply(&mut self, action: GameAction) -> bool {
        let (col, row) = (self.col, self.row);
        match action {
            GameAction::CursorLeft => self.set(col.saturating_sub(1), row),
            GameAction::CursorRight => self.set(col + 1, row),
            // Up the screen is up the column.
            GameAction::CursorUp => self.set(col, row + 1),
            GameAction::CursorDown => self.set(col, row.saturating_sub(1)),
            _ => return false,
        }
        true
    }
}
