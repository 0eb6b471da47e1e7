//! Immutable position values on top of cozy-chess.
//!
//! A `Position` is never mutated once built: applying a move yields a new
//! value. That lets a move record keep one snapshot per ply without any
//! aliasing between the position being played and the one being viewed.

use cozy_chess::{Board, GameStatus, Move, Piece as CozyPiece, Rank, Square};

use crate::fen::{format_fen, parse_fen, FenError};
use crate::pgn::san::format_san;
use crate::types::{Piece, PieceColor, PieceKind};
use crate::uci::{convert_uci_castling_to_cozy, king_destination};

#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
}

/// A legal move as a board UI sees it: castling targets the king's
/// destination square rather than the rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Result of applying a legal move.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    /// The move in cozy-chess encoding.
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<PieceKind>,
    pub san: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    Ongoing,
    Checkmate { winner: PieceColor },
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("No piece on {0}")]
    NoPiece(Square),
    #[error("Illegal move: {from}{to}")]
    IllegalMove { from: Square, to: Square },
}

impl Position {
    /// The standard starting position.
    pub fn start() -> Self {
        Self {
            board: Board::default(),
        }
    }

    /// Parse a FEN string (or the `"start"` shorthand).
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen).map(|board| Self { board })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_fen(&self) -> String {
        format_fen(&self.board)
    }

    /// Side to move.
    pub fn turn(&self) -> PieceColor {
        self.board.side_to_move().into()
    }

    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let kind = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some(Piece::new(kind.into(), color.into()))
    }

    pub fn status(&self) -> PositionStatus {
        match self.board.status() {
            GameStatus::Ongoing => PositionStatus::Ongoing,
            GameStatus::Won => PositionStatus::Checkmate {
                winner: self.turn().opposite(),
            },
            GameStatus::Drawn => PositionStatus::Draw,
        }
    }

    pub fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    /// Whether moving from `from` to `to` would be a pawn reaching its last
    /// rank. Only the mover's identity and the target rank are consulted;
    /// legality is decided when the move is applied.
    pub fn needs_promotion(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        if piece.kind != PieceKind::Pawn || piece.color != self.turn() {
            return false;
        }
        let last_rank = match piece.color {
            PieceColor::White => Rank::Eighth,
            PieceColor::Black => Rank::First,
        };
        to.rank() == last_rank
    }

    /// Legal moves for the piece on `square`. Empty when the square is empty
    /// or holds a piece of the side not to move.
    pub fn legal_moves(&self, square: Square) -> Vec<LegalMove> {
        let mut moves = Vec::new();
        self.board.generate_moves_for(square.bitboard(), |mvs| {
            moves.extend(mvs.into_iter().map(|mv| self.to_legal_move(mv)));
            false
        });
        moves
    }

    /// Distinct destination squares for the piece on `square`.
    pub fn legal_targets(&self, square: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = Vec::new();
        for m in self.legal_moves(square) {
            if !targets.contains(&m.to) {
                targets.push(m.to);
            }
        }
        targets
    }

    /// Every legal move in the position.
    pub fn all_legal_moves(&self) -> Vec<LegalMove> {
        let mut moves = Vec::new();
        self.board.generate_moves(|mvs| {
            moves.extend(mvs.into_iter().map(|mv| self.to_legal_move(mv)));
            false
        });
        moves
    }

    /// Apply a move given in board-UI terms.
    ///
    /// A promotion piece supplied for a move that is not a promotion is
    /// ignored. Castling may be given as king-two-squares or king-takes-rook.
    pub fn apply_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<AppliedMove, MoveError> {
        let piece = self.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        let promotion = if self.needs_promotion(from, to) {
            promotion
        } else {
            None
        };

        let mv = convert_uci_castling_to_cozy(
            &self.board,
            Move {
                from,
                to,
                promotion: promotion.map(CozyPiece::from),
            },
        );

        if !self.board.is_legal(mv) {
            return Err(MoveError::IllegalMove { from, to });
        }

        Ok(self.play(mv, piece))
    }

    /// Apply a move already in cozy-chess encoding (e.g. from SAN parsing).
    pub fn apply_raw(&self, mv: Move) -> Result<AppliedMove, MoveError> {
        let piece = self.piece_at(mv.from).ok_or(MoveError::NoPiece(mv.from))?;
        if !self.board.is_legal(mv) {
            return Err(MoveError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }
        Ok(self.play(mv, piece))
    }

    fn play(&self, mv: Move, piece: Piece) -> AppliedMove {
        let san = format_san(&self.board, mv);
        let captured = self.captured_by(mv, piece);

        let mut board = self.board.clone();
        board.play_unchecked(mv);

        AppliedMove {
            mv,
            piece,
            captured,
            san,
            position: Self { board },
        }
    }

    fn captured_by(&self, mv: Move, piece: Piece) -> Option<PieceKind> {
        match self.piece_at(mv.to) {
            Some(target) if target.color != piece.color => Some(target.kind),
            Some(_) => None, // castling: king onto own rook
            None if piece.kind == PieceKind::Pawn && mv.from.file() != mv.to.file() => {
                Some(PieceKind::Pawn)
            }
            None => None,
        }
    }

    fn to_legal_move(&self, mv: Move) -> LegalMove {
        LegalMove {
            from: mv.from,
            to: king_destination(&self.board, mv),
            promotion: mv.promotion.map(PieceKind::from),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::parse_square;
    use crate::fen::STARTING_FEN;

    fn sq(s: &str) -> Square {
        parse_square(s).unwrap()
    }

    #[test]
    fn start_position_basics() {
        let pos = Position::start();
        assert_eq!(pos.to_fen(), STARTING_FEN);
        assert_eq!(pos.turn(), PieceColor::White);
        assert_eq!(
            pos.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, PieceColor::White))
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.status(), PositionStatus::Ongoing);
    }

    #[test]
    fn apply_move_leaves_source_position_untouched() {
        let pos = Position::start();
        let applied = pos.apply_move(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(applied.san, "e4");
        assert_eq!(applied.position.turn(), PieceColor::Black);
        assert_eq!(pos.to_fen(), STARTING_FEN);
    }

    #[test]
    fn illegal_and_empty_square_moves_are_rejected() {
        let pos = Position::start();
        assert_eq!(
            pos.apply_move(sq("e2"), sq("e5"), None).unwrap_err(),
            MoveError::IllegalMove {
                from: sq("e2"),
                to: sq("e5")
            }
        );
        assert_eq!(
            pos.apply_move(sq("e4"), sq("e5"), None).unwrap_err(),
            MoveError::NoPiece(sq("e4"))
        );
        // Black piece while white is to move.
        assert!(pos.apply_move(sq("e7"), sq("e5"), None).is_err());
    }

    #[test]
    fn pawn_on_seventh_needs_promotion() {
        let pos = Position::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(pos.needs_promotion(sq("a7"), sq("a8")));
        assert!(!pos.needs_promotion(sq("e1"), sq("e2")));

        let moves = pos.legal_moves(sq("a7"));
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.to == sq("a8") && m.promotion.is_some()));
        assert_eq!(pos.legal_targets(sq("a7")), vec![sq("a8")]);

        let applied = pos
            .apply_move(sq("a7"), sq("a8"), Some(PieceKind::Knight))
            .unwrap();
        assert_eq!(applied.san, "a8=N");
        assert_eq!(
            applied.position.piece_at(sq("a8")),
            Some(Piece::new(PieceKind::Knight, PieceColor::White))
        );
    }

    #[test]
    fn promotion_without_piece_is_illegal() {
        let pos = Position::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(pos.apply_move(sq("a7"), sq("a8"), None).is_err());
    }

    #[test]
    fn stray_promotion_piece_is_ignored() {
        let pos = Position::start();
        let applied = pos
            .apply_move(sq("g1"), sq("f3"), Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(applied.san, "Nf3");
    }

    #[test]
    fn castling_reported_and_applied_as_king_step() {
        let pos = Position::parse("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let targets = pos.legal_targets(sq("e1"));
        assert!(targets.contains(&sq("g1")));
        assert!(targets.contains(&sq("c1")));
        assert!(!targets.contains(&sq("h1")));

        let applied = pos.apply_move(sq("e1"), sq("g1"), None).unwrap();
        assert_eq!(applied.san, "O-O");
        assert_eq!(applied.captured, None);
        assert_eq!(
            applied.position.piece_at(sq("g1")).map(|p| p.kind),
            Some(PieceKind::King)
        );
        assert_eq!(
            applied.position.piece_at(sq("f1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn en_passant_records_captured_pawn() {
        let pos =
            Position::parse("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let applied = pos.apply_move(sq("e5"), sq("f6"), None).unwrap();
        assert_eq!(applied.san, "exf6");
        assert_eq!(applied.captured, Some(PieceKind::Pawn));
        assert_eq!(applied.position.piece_at(sq("f5")), None);
    }

    #[test]
    fn checkmate_status_names_winner() {
        let pos = Position::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert!(pos.is_check());
        assert_eq!(
            pos.status(),
            PositionStatus::Checkmate {
                winner: PieceColor::Black
            }
        );
        assert!(pos.all_legal_moves().is_empty());
    }

    #[test]
    fn opponent_pieces_have_no_legal_moves() {
        let pos = Position::start();
        assert!(pos.legal_moves(sq("e7")).is_empty());
        assert_eq!(pos.legal_targets(sq("b1")).len(), 2);
        assert_eq!(pos.all_legal_moves().len(), 20);
    }
}
