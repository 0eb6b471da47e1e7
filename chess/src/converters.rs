//! Text conversions between algebraic notation and cozy-chess values.

use cozy_chess::{File, Rank, Square};

use crate::types::PieceKind;

/// Parse a square like "e4". Returns `None` for anything else.
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = match bytes[0].to_ascii_lowercase() {
        b @ b'a'..=b'h' => File::index((b - b'a') as usize),
        _ => return None,
    };
    let rank = match bytes[1] {
        b @ b'1'..=b'8' => Rank::index((b - b'1') as usize),
        _ => return None,
    };
    Some(Square::new(file, rank))
}

/// Format a square as "e4".
pub fn format_square(sq: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push(file_char(sq));
    s.push(rank_char(sq));
    s
}

pub fn file_char(sq: Square) -> char {
    (b'a' + sq.file() as u8) as char
}

pub fn rank_char(sq: Square) -> char {
    (b'1' + sq.rank() as u8) as char
}

/// Lowercase UCI piece letter ("q", "n", ...).
pub fn format_piece(piece: cozy_chess::Piece) -> char {
    PieceKind::from(piece).to_char_lower()
}

/// Parse a promotion choice: "q"/"queen", "r"/"rook", "b"/"bishop", "n"/"knight".
pub fn parse_promotion(s: &str) -> Option<PieceKind> {
    let kind = match s.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => PieceKind::Queen,
        "r" | "rook" => PieceKind::Rook,
        "b" | "bishop" => PieceKind::Bishop,
        "n" | "knight" => PieceKind::Knight,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_round_trip_corners() {
        let a1 = parse_square("a1").unwrap();
        assert_eq!(a1, Square::new(File::A, Rank::First));
        assert_eq!(format_square(a1), "a1");

        let h8 = parse_square("H8").unwrap();
        assert_eq!(h8, Square::new(File::H, Rank::Eighth));
        assert_eq!(format_square(h8), "h8");
    }

    #[test]
    fn parse_square_rejects_garbage() {
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("e"), None);
        assert_eq!(parse_square("e44"), None);
    }

    #[test]
    fn parse_promotion_accepts_names_and_letters() {
        assert_eq!(parse_promotion("q"), Some(PieceKind::Queen));
        assert_eq!(parse_promotion("Knight"), Some(PieceKind::Knight));
        assert_eq!(parse_promotion("k"), None);
    }
}
