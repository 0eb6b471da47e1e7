//! PGN import/export and SAN notation.

pub mod parser;
pub mod san;
pub mod writer;

pub use parser::{parse_pgn, PgnError, PgnGame};
pub use san::{format_san, parse_san, SanError};
pub use writer::format_pgn;

/// Result token at the end of a PGN movetext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Ongoing,
}

impl GameResult {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Ongoing => "*",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(Self::WhiteWins),
            "0-1" => Some(Self::BlackWins),
            "1/2-1/2" => Some(Self::Draw),
            "*" => Some(Self::Ongoing),
            _ => None,
        }
    }
}
