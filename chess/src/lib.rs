//! Rule-engine adapter over cozy-chess: positions, move records, notation.

pub mod analysis;
pub mod converters;
pub mod fen;
pub mod game;
pub mod pgn;
pub mod position;
pub mod types;
pub mod uci;

pub use analysis::{parse_coaching_content, AnalysisError, AnalysisRequest, CoachingAnalysis};
pub use converters::*;
pub use fen::{FenError, STARTING_FEN};
pub use game::{Game, GameError, HistoryEntry, StartPosition};
pub use pgn::{format_pgn, parse_pgn, GameResult, PgnError, PgnGame, SanError};
pub use position::{AppliedMove, LegalMove, MoveError, Position, PositionStatus};
pub use types::{Piece, PieceColor, PieceKind};
pub use uci::{convert_uci_castling_to_cozy, format_uci_move};

pub use cozy_chess::{File, Rank, Square};
