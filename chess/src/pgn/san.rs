use cozy_chess::{Board, GameStatus, Move, Piece};

use crate::converters::{file_char, format_square, rank_char};
use crate::types::PieceKind;
use crate::uci::is_castling;

/// Parse Standard Algebraic Notation (SAN) move
///
/// Resolution is done against the legal moves of `board`, so anything this
/// module formats is accepted back. Trailing check/mate markers and
/// annotation glyphs (`!`, `?`) are ignored, as is zero-castling (`0-0`).
pub fn parse_san(board: &Board, san: &str) -> Result<Move, SanError> {
    let wanted = normalize(san);
    if wanted.is_empty() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }

    let moves = legal_moves(board);
    let mut matches: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|&mv| san_body(board, mv) == wanted)
        .collect();

    // Tolerate missing disambiguation ("Nd2" for "Nbd2") when it is unique.
    if matches.is_empty() {
        matches = moves
            .iter()
            .copied()
            .filter(|&mv| loose_body(board, mv) == wanted)
            .collect();
    }

    match matches.as_slice() {
        [mv] => Ok(*mv),
        [] => Err(SanError::NoLegalMove(san.to_string())),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// Format a legal move as SAN, including the check (`+`) or mate (`#`) suffix.
pub fn format_san(board: &Board, mv: Move) -> String {
    let mut san = san_body(board, mv);

    let mut after = board.clone();
    after.play_unchecked(mv);
    match after.status() {
        GameStatus::Won => san.push('#'),
        _ if !after.checkers().is_empty() => san.push('+'),
        _ => {}
    }

    san
}

/// SAN without the check suffix.
fn san_body(board: &Board, mv: Move) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return crate::uci::format_uci_move(mv);
    };

    if is_castling(board, mv) {
        return if mv.to.file() as u8 > mv.from.file() as u8 {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();
    let is_capture = board.color_on(mv.to) == Some(!board.side_to_move());

    match piece {
        Piece::Pawn => {
            // En passant lands on an empty square, so file change is the tell.
            if is_capture || mv.from.file() != mv.to.file() {
                san.push(file_char(mv.from));
                san.push('x');
            }
            san.push_str(&format_square(mv.to));
            if let Some(promo) = mv.promotion {
                san.push('=');
                san.push(PieceKind::from(promo).to_char_upper());
            }
        }
        _ => {
            san.push(PieceKind::from(piece).to_char_upper());
            san.push_str(&disambiguation(board, mv, piece));
            if is_capture {
                san.push('x');
            }
            san.push_str(&format_square(mv.to));
        }
    }

    san
}

/// SAN body with any disambiguation stripped.
fn loose_body(board: &Board, mv: Move) -> String {
    match board.piece_on(mv.from) {
        Some(piece) if piece != Piece::Pawn && !is_castling(board, mv) => {
            let mut san = String::new();
            san.push(PieceKind::from(piece).to_char_upper());
            if board.color_on(mv.to) == Some(!board.side_to_move()) {
                san.push('x');
            }
            san.push_str(&format_square(mv.to));
            san
        }
        _ => san_body(board, mv),
    }
}

/// File, rank, or both, when another piece of the same kind can reach `mv.to`.
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Move> = legal_moves(board)
        .into_iter()
        .filter(|other| {
            other.to == mv.to
                && other.from != mv.from
                && board.piece_on(other.from) == Some(piece)
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|o| o.from.file() == mv.from.file());
    let shares_rank = rivals.iter().any(|o| o.from.rank() == mv.from.rank());

    match (shares_file, shares_rank) {
        (false, _) => file_char(mv.from).to_string(),
        (true, false) => rank_char(mv.from).to_string(),
        (true, true) => format_square(mv.from),
    }
}

fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|mvs| {
        moves.extend(mvs);
        false
    });
    moves
}

fn normalize(san: &str) -> String {
    san.trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
}

#[derive(Debug, thiserror::Error)]
pub enum SanError {
    #[error("No legal move found for: {0}")]
    NoLegalMove(String),
    #[error("Ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
