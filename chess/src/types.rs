//! Canonical piece and color types for the project.
//! cozy-chess types are internal implementation details.

use serde::{Deserialize, Serialize};

/// Project-owned piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Project-owned color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    White,
    Black,
}

/// A piece standing on a square: what it is and who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl PieceKind {
    /// Pieces a pawn may promote to, in dialog order.
    pub const PROMOTIONS: [PieceKind; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    pub fn to_char_upper(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub fn to_char_lower(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Whether a pawn may promote to this piece.
    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

impl PieceColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Single-letter form used by FEN and the coaching API ("w" / "b").
    pub fn as_letter(self) -> &'static str {
        match self {
            Self::White => "w",
            Self::Black => "b",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Parse "white"/"black" or "w"/"b", case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Some(Self::White),
            "b" | "black" => Some(Self::Black),
            _ => None,
        }
    }
}

impl Piece {
    pub fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        match self.color {
            PieceColor::White => self.kind.to_char_upper(),
            PieceColor::Black => self.kind.to_char_lower(),
        }
    }
}

impl From<cozy_chess::Piece> for PieceKind {
    fn from(p: cozy_chess::Piece) -> Self {
        match p {
            cozy_chess::Piece::Pawn => Self::Pawn,
            cozy_chess::Piece::Knight => Self::Knight,
            cozy_chess::Piece::Bishop => Self::Bishop,
            cozy_chess::Piece::Rook => Self::Rook,
            cozy_chess::Piece::Queen => Self::Queen,
            cozy_chess::Piece::King => Self::King,
        }
    }
}

impl From<PieceKind> for cozy_chess::Piece {
    fn from(p: PieceKind) -> Self {
        match p {
            PieceKind::Pawn => Self::Pawn,
            PieceKind::Knight => Self::Knight,
            PieceKind::Bishop => Self::Bishop,
            PieceKind::Rook => Self::Rook,
            PieceKind::Queen => Self::Queen,
            PieceKind::King => Self::King,
        }
    }
}

impl From<cozy_chess::Color> for PieceColor {
    fn from(c: cozy_chess::Color) -> Self {
        match c {
            cozy_chess::Color::White => Self::White,
            cozy_chess::Color::Black => Self::Black,
        }
    }
}

impl From<PieceColor> for cozy_chess::Color {
    fn from(c: PieceColor) -> Self {
        match c {
            PieceColor::White => Self::White,
            PieceColor::Black => Self::Black,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char_upper())
    }
}

impl std::fmt::Display for PieceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
