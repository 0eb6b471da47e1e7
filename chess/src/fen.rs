use cozy_chess::Board;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN string into a Board.
///
/// `"start"` and the empty string are shorthands for the standard starting
/// position.
pub fn parse_fen(fen: &str) -> Result<Board, FenError> {
    let fen = fen.trim();
    if fen.is_empty() || fen.eq_ignore_ascii_case("start") {
        return Ok(Board::default());
    }

    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FenError::InvalidFormat(fen.to_string()));
    }
    if parts[0].split('/').count() != 8 {
        return Err(FenError::InvalidBoardLayout(parts[0].to_string()));
    }

    fen.parse()
        .map_err(|_| FenError::InvalidFormat(fen.to_string()))
}

/// Format a Board as a FEN string
pub fn format_fen(board: &Board) -> String {
    board.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum FenError {
    #[error("Invalid FEN: {0}")]
    InvalidFormat(String),
    #[error("Invalid board layout: {0}")]
    InvalidBoardLayout(String),
}
