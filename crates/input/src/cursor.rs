//! Keyboard cursor over the board.

use crate::types::{BoardAction, Coord};

/// Cell under the keyboard cursor, always kept inside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Coord,
    width: u8,
    height: u8,
}

impl Cursor {
    /// Cursor at the bottom-left cell of a `width` x `height` board.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            pos: Coord::new(0, 0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn pos(&self) -> Coord {
        self.pos
    }

    /// Change the board size, clamping the cursor into it.
    pub fn resize(&mut self, width: u8, height: u8) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pos = self.clamp(self.pos.x, self.pos.y);
    }

    /// Move by `(dx, dy)`; `dy > 0` is up. Returns true if the cursor moved.
    pub fn step(&mut self, dx: i8, dy: i8) -> bool {
        let next = self.clamp(
            self.pos.x.saturating_add(dx),
            self.pos.y.saturating_add(dy),
        );
        let moved = next != self.pos;
        self.pos = next;
        moved
    }

    /// Apply a cursor action. Other actions are ignored.
    pub fn apply(&mut self, action: BoardAction) -> bool {
        match action {
            BoardAction::CursorLeft => self.step(-1, 0),
            BoardAction::CursorRight => self.step(1, 0),
            BoardAction::CursorUp => self.step(0, 1),
            BoardAction::CursorDown => self.step(0, -1),
            _ => false,
        }
    }

    fn clamp(&self, x: i8, y: i8) -> Coord {
        Coord::new(
            x.clamp(0, self.width as i8 - 1),
            y.clamp(0, self.height as i8 - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_and_clamps() {
        let mut c = Cursor::new(3, 2);
        assert_eq!(c.pos(), Coord::new(0, 0));

        assert!(!c.apply(BoardAction::CursorLeft));
        assert!(!c.apply(BoardAction::CursorDown));
        assert!(c.apply(BoardAction::CursorUp));
        assert!(!c.apply(BoardAction::CursorUp));
        assert_eq!(c.pos(), Coord::new(0, 1));

        for _ in 0..5 {
            c.apply(BoardAction::CursorRight);
        }
        assert_eq!(c.pos(), Coord::new(2, 1));
    }

    #[test]
    fn test_non_cursor_actions_ignored() {
        let mut c = Cursor::new(4, 4);
        assert!(!c.apply(BoardAction::Select));
        assert!(!c.apply(BoardAction::StartRush));
        assert_eq!(c.pos(), Coord::new(0, 0));
    }

    #[test]
    fn test_resize_clamps_position() {
        let mut c = Cursor::new(8, 8);
        c.step(7, 7);
        assert_eq!(c.pos(), Coord::new(7, 7));
        c.resize(4, 3);
        assert_eq!(c.pos(), Coord::new(3, 2));
    }
}
