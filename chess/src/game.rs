use cozy_chess::{Move, Square};

use crate::position::{AppliedMove, MoveError, Position, PositionStatus};
use crate::types::{PieceColor, PieceKind};

/// A game record: the starting position plus an append-only move history.
///
/// Every history entry keeps the position reached after it, so any ply can be
/// shown without touching the others.
#[derive(Debug, Clone)]
pub struct Game {
    initial: Position,
    history: Vec<HistoryEntry>,
    start_position: StartPosition,
}

/// One committed move and the position it produced.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mv: Move,
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,         // Piece that made the move
    pub piece_color: PieceColor,  // Color of the piece that moved
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub san: String,              // Standard Algebraic Notation
    pub fen: String,              // FEN after this move
    pub position: Position,
}

/// Starting position of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPosition {
    Standard,
    Fen(String),
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        Self {
            initial: Position::start(),
            history: Vec::new(),
            start_position: StartPosition::Standard,
        }
    }

    /// Create a game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::parse(fen)?))
    }

    /// Create a game starting at `initial`.
    pub fn from_position(initial: Position) -> Self {
        let start_position = if initial.to_fen() == Position::start().to_fen() {
            StartPosition::Standard
        } else {
            StartPosition::Fen(initial.to_fen())
        };
        Self {
            initial,
            history: Vec::new(),
            start_position,
        }
    }

    pub fn start_position(&self) -> &StartPosition {
        &self.start_position
    }

    /// Position before any move.
    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    /// Position after the last committed move.
    pub fn position(&self) -> &Position {
        self.history
            .last()
            .map(|e| &e.position)
            .unwrap_or(&self.initial)
    }

    /// Position after `plies` moves (0 = initial). `None` past the end.
    pub fn position_at(&self, plies: usize) -> Option<&Position> {
        match plies {
            0 => Some(&self.initial),
            n => self.history.get(n - 1).map(|e| &e.position),
        }
    }

    /// Get the move history
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn status(&self) -> PositionStatus {
        self.position().status()
    }

    pub fn side_to_move(&self) -> PieceColor {
        self.position().turn()
    }

    /// Export the live position to FEN
    pub fn to_fen(&self) -> String {
        self.position().to_fen()
    }

    /// Make a move on the live position and append it to the history.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<&HistoryEntry, GameError> {
        let applied = self.position().apply_move(from, to, promotion)?;
        // Castling is recorded on the king's destination whichever form was given.
        let to = crate::uci::king_destination(self.position().board(), applied.mv);
        Ok(self.push(from, to, applied))
    }

    /// Append a move already in cozy-chess encoding (used by PGN import).
    pub fn make_raw_move(&mut self, mv: Move) -> Result<&HistoryEntry, GameError> {
        let before = self.position().clone();
        let applied = before.apply_raw(mv)?;
        let to = crate::uci::king_destination(before.board(), mv);
        Ok(self.push(mv.from, to, applied))
    }

    fn push(&mut self, from: Square, to: Square, applied: AppliedMove) -> &HistoryEntry {
        let entry = HistoryEntry {
            mv: applied.mv,
            from,
            to,
            piece: applied.piece.kind,
            piece_color: applied.piece.color,
            captured: applied.captured,
            promotion: applied.mv.promotion.map(PieceKind::from),
            san: applied.san,
            fen: applied.position.to_fen(),
            position: applied.position,
        };
        self.history.push(entry);
        &self.history[self.history.len() - 1]
    }

    /// Re-derive the position after `plies` moves by replaying the history
    /// from the initial position through the rule engine.
    pub fn replay(&self, plies: usize) -> Result<Position, GameError> {
        if plies > self.history.len() {
            return Err(GameError::PlyOutOfRange {
                requested: plies,
                available: self.history.len(),
            });
        }

        let mut position = self.initial.clone();
        for entry in &self.history[..plies] {
            position = position.apply_raw(entry.mv)?.position;
        }
        Ok(position)
    }

    /// Drop every move, keeping the starting position.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("Ply {requested} out of range ({available} played)")]
    PlyOutOfRange { requested: usize, available: usize },
    #[error("FEN parse error: {0}")]
    FenError(#[from] crate::fen::FenError),
}
