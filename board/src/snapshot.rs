//! Read model for renderers.

use chess::{Piece, PieceColor, PositionStatus, Square};

use crate::controller::BoardController;
use crate::geometry::{square_at_cell, Orientation};
use crate::input::DragSession;
use crate::promotion::PromotionRequest;

/// Complete, immutable picture of the board for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub game_id: String,
    /// FEN of the viewed position.
    pub fen: String,
    pub live_fen: String,
    pub side_to_move: PieceColor,
    pub plies: usize,
    pub cursor: isize,
    pub is_live: bool,
    pub orientation: Orientation,
    pub selected: Option<Square>,
    pub targets: Vec<Square>,
    pub drag: Option<DragSession>,
    pub promotion: Option<PromotionRequest>,
    /// Status of the viewed position.
    pub status: PositionStatus,
    /// Squares of the ply that produced the viewed position.
    pub last_move: Option<(Square, Square)>,
}

/// One on-screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSquare {
    pub square: Square,
    pub piece: Option<Piece>,
    pub selected: bool,
    pub target: bool,
    /// Source square of an active drag; renderers draw the piece at the
    /// pointer instead.
    pub dragging: bool,
}

impl BoardController {
    pub fn snapshot(&self) -> BoardSnapshot {
        let viewing = self.viewing_position();
        let last_move = self
            .viewed
            .checked_sub(1)
            .and_then(|i| self.game.history().get(i))
            .map(|e| (e.from, e.to));

        BoardSnapshot {
            game_id: self.game_id().to_string(),
            fen: viewing.to_fen(),
            live_fen: self.live_position().to_fen(),
            side_to_move: viewing.turn(),
            plies: self.len(),
            cursor: self.cursor(),
            is_live: self.is_live(),
            orientation: self.orientation,
            selected: self.selection.as_ref().map(|s| s.square),
            targets: self
                .selection
                .as_ref()
                .map(|s| s.targets.to_vec())
                .unwrap_or_default(),
            drag: self.drag,
            promotion: self.promotion.pending(),
            status: viewing.status(),
            last_move,
        }
    }

    /// The 64 cells of the viewed position, row by row from the top-left
    /// corner of the screen.
    pub fn view_grid(&self) -> Vec<ViewSquare> {
        let position = self.viewing_position();
        let selection = self.selection.as_ref();
        let drag_source = self.drag.filter(|d| d.active).map(|d| d.source);

        let mut cells = Vec::with_capacity(64);
        for row in 0..8 {
            for col in 0..8 {
                let square = square_at_cell(col, row, self.orientation);
                cells.push(ViewSquare {
                    square,
                    piece: position.piece_at(square),
                    selected: selection.is_some_and(|s| s.square == square),
                    target: selection.is_some_and(|s| s.targets.contains(&square)),
                    dragging: drag_source == Some(square),
                });
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{parse_square, PieceKind, STARTING_FEN};

    fn sq(s: &str) -> Square {
        parse_square(s).unwrap()
    }

    #[test]
    fn snapshot_tracks_cursor_and_selection() {
        let mut board = BoardController::default();
        board.execute_move(sq("e2"), sq("e4"), None);
        board.click(sq("g8"));

        let snap = board.snapshot();
        assert_eq!(snap.plies, 1);
        assert_eq!(snap.cursor, 0);
        assert!(snap.is_live);
        assert_eq!(snap.side_to_move, PieceColor::Black);
        assert_eq!(snap.selected, Some(sq("g8")));
        assert_eq!(snap.targets.len(), 2);
        assert_eq!(snap.last_move, Some((sq("e2"), sq("e4"))));

        board.jump_to_position(-1);
        let snap = board.snapshot();
        assert_eq!(snap.fen, STARTING_FEN);
        assert_ne!(snap.live_fen, STARTING_FEN);
        assert!(!snap.is_live);
        assert_eq!(snap.selected, None);
        assert_eq!(snap.last_move, None);
    }

    #[test]
    fn grid_follows_orientation() {
        let mut board = BoardController::default();
        let grid = board.view_grid();
        assert_eq!(grid.len(), 64);
        assert_eq!(grid[0].square, sq("a8"));
        assert_eq!(grid[63].square, sq("h1"));
        assert_eq!(grid[60].piece.map(|p| p.kind), Some(PieceKind::King));

        board.flip_orientation();
        let grid = board.view_grid();
        assert_eq!(grid[0].square, sq("h1"));
        assert_eq!(grid[63].square, sq("a8"));
    }

    #[test]
    fn grid_marks_selection_and_targets() {
        let mut board = BoardController::default();
        board.click(sq("e2"));
        let grid = board.view_grid();
        let marked: Vec<Square> = grid.iter().filter(|c| c.target).map(|c| c.square).collect();
        assert_eq!(marked.len(), 2);
        assert!(marked.contains(&sq("e3")));
        assert!(grid.iter().any(|c| c.selected && c.square == sq("e2")));
    }
}
