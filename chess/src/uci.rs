//! UCI (Universal Chess Interface) utilities

use cozy_chess::{Board, File, Move, Piece, Rank, Square};

use crate::converters::{format_piece, format_square};

/// Convert king-two-squares castling notation to cozy_chess notation
///
/// UCI and board UIs use standard notation (king moves 2 squares): e1g1, e1c1, e8g8, e8c8
/// cozy_chess uses king-to-rook notation: e1h1, e1a1, e8h8, e8a8
///
/// Returns the move unchanged when it is not a castling attempt or when the
/// translated move is not legal on `board`.
pub fn convert_uci_castling_to_cozy(board: &Board, mv: Move) -> Move {
    if board.piece_on(mv.from) != Some(Piece::King) || mv.promotion.is_some() {
        return mv;
    }

    let is_home_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let is_e_file = matches!(mv.from.file(), File::E);
    let same_rank = mv.from.rank() == mv.to.rank();

    if !(is_home_rank && is_e_file && same_rank) {
        return mv;
    }

    let rook_square = match mv.to.file() {
        File::G => Square::new(File::H, mv.from.rank()),
        File::C => Square::new(File::A, mv.from.rank()),
        _ => return mv,
    };

    let converted = Move {
        from: mv.from,
        to: rook_square,
        promotion: None,
    };

    if board.is_legal(converted) {
        converted
    } else {
        mv
    }
}

/// Map a cozy_chess castling move (king takes own rook) back to the king's
/// destination square. Non-castling moves return their own target.
pub fn king_destination(board: &Board, mv: Move) -> Square {
    if is_castling(board, mv) {
        let file = if mv.to.file() as u8 > mv.from.file() as u8 {
            File::G
        } else {
            File::C
        };
        Square::new(file, mv.from.rank())
    } else {
        mv.to
    }
}

/// Whether `mv` is a castling move in cozy_chess encoding.
pub fn is_castling(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move())
}

/// Format a move in UCI notation (e.g., "e2e4", "e7e8q")
pub fn format_uci_move(mv: Move) -> String {
    let mut s = format!("{}{}", format_square(mv.from), format_square(mv.to));
    if let Some(promo) = mv.promotion {
        s.push(format_piece(promo));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castling_ready() -> Board {
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_format_uci_move() {
        let mv = Move {
            from: Square::new(File::E, Rank::Second),
            to: Square::new(File::E, Rank::Fourth),
            promotion: None,
        };
        assert_eq!(format_uci_move(mv), "e2e4");
    }

    #[test]
    fn test_format_uci_move_with_promotion() {
        let mv = Move {
            from: Square::new(File::E, Rank::Seventh),
            to: Square::new(File::E, Rank::Eighth),
            promotion: Some(Piece::Queen),
        };
        assert_eq!(format_uci_move(mv), "e7e8q");
    }

    #[test]
    fn king_two_squares_becomes_king_takes_rook() {
        let board = castling_ready();
        let mv = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::G, Rank::First),
            promotion: None,
        };
        let converted = convert_uci_castling_to_cozy(&board, mv);
        assert_eq!(converted.to, Square::new(File::H, Rank::First));
        assert!(is_castling(&board, converted));
        assert_eq!(king_destination(&board, converted), mv.to);

        let long = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::C, Rank::First),
            promotion: None,
        };
        assert_eq!(
            convert_uci_castling_to_cozy(&board, long).to,
            Square::new(File::A, Rank::First)
        );
    }

    #[test]
    fn ordinary_king_step_is_untouched() {
        let board = castling_ready();
        let mv = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::F, Rank::First),
            promotion: None,
        };
        assert_eq!(convert_uci_castling_to_cozy(&board, mv), mv);
        assert!(!is_castling(&board, mv));
    }
}
