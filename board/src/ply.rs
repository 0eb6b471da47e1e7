use chess::{format_square, HistoryEntry, PieceColor, PieceKind, Square};
use serde::{Deserialize, Serialize};

use crate::promotion::PromotionRequest;

/// One committed half-move as the board presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ply {
    /// Position in the move sequence, starting at 0.
    pub index: usize,
    /// Full-move number shared by a white move and the black reply.
    pub move_number: u32,
    pub side: PieceColor,
    pub san: String,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    /// FEN of the position right after this ply.
    pub fen: String,
}

impl Ply {
    /// `first_move_number` and `first_side` describe the game's starting
    /// position. From the standard start this gives `index / 2 + 1` and
    /// white on even indices.
    pub(crate) fn from_entry(
        index: usize,
        entry: &HistoryEntry,
        first_move_number: u32,
        first_side: PieceColor,
    ) -> Self {
        let offset = match first_side {
            PieceColor::White => 0,
            PieceColor::Black => 1,
        };
        Self {
            index,
            move_number: first_move_number + ((index + offset) / 2) as u32,
            side: entry.piece_color,
            san: entry.san.clone(),
            from: entry.from,
            to: entry.to,
            promotion: entry.promotion,
            fen: entry.fen.clone(),
        }
    }

    /// "e2e4", "e7e8q"
    pub fn uci(&self) -> String {
        let mut s = format_square(self.from);
        s.push_str(&format_square(self.to));
        if let Some(kind) = self.promotion {
            s.push(kind.to_char_lower());
        }
        s
    }
}

/// One line of the move list: a full move with one or both halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRow {
    pub move_number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

/// Group plies into numbered rows.
pub fn group_rows(plies: &[Ply]) -> Vec<MoveRow> {
    let mut rows: Vec<MoveRow> = Vec::new();
    for ply in plies {
        let needs_new_row = match rows.last() {
            Some(row) => row.move_number != ply.move_number,
            None => true,
        };
        if needs_new_row {
            rows.push(MoveRow {
                move_number: ply.move_number,
                white: None,
                black: None,
            });
        }
        if let Some(row) = rows.last_mut() {
            match ply.side {
                PieceColor::White => row.white = Some(ply.san.clone()),
                PieceColor::Black => row.black = Some(ply.san.clone()),
            }
        }
    }
    rows
}

/// Result of asking the controller to play a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Committed(Ply),
    /// A pawn reached its last rank without a promotion piece; retry with one.
    Suspended(PromotionRequest),
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The board is showing a historical position.
    NotLiveView,
    IllegalMove,
    /// A promotion choice is outstanding.
    PromotionPending,
    /// The board was configured as view-only.
    MovesDisabled,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NotLiveView => "not viewing the live position",
            Self::IllegalMove => "illegal move",
            Self::PromotionPending => "a promotion choice is pending",
            Self::MovesDisabled => "moves are disabled",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{parse_square, Game};

    fn plies_of(game: &Game) -> Vec<Ply> {
        let start = game.initial_position();
        game.history()
            .iter()
            .enumerate()
            .map(|(i, e)| Ply::from_entry(i, e, u32::from(start.fullmove_number()), start.turn()))
            .collect()
    }

    fn play(game: &mut Game, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            game.make_move(parse_square(from).unwrap(), parse_square(to).unwrap(), None)
                .unwrap();
        }
    }

    #[test]
    fn numbering_from_standard_start() {
        let mut game = Game::new();
        play(&mut game, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3")]);
        let plies = plies_of(&game);

        let numbers: Vec<u32> = plies.iter().map(|p| p.move_number).collect();
        assert_eq!(numbers, vec![1, 1, 2]);
        assert_eq!(plies[1].side, PieceColor::Black);
        assert_eq!(plies[2].uci(), "g1f3");

        let rows = group_rows(&plies);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].white.as_deref(), Some("e4"));
        assert_eq!(rows[0].black.as_deref(), Some("e5"));
        assert_eq!(rows[1].white.as_deref(), Some("Nf3"));
        assert_eq!(rows[1].black, None);
    }

    #[test]
    fn black_to_move_start_opens_with_half_row() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 12").unwrap();
        play(&mut game, &[("e8", "d7"), ("e2", "e4")]);
        let plies = plies_of(&game);

        assert_eq!(plies[0].move_number, 12);
        assert_eq!(plies[1].move_number, 13);

        let rows = group_rows(&plies);
        assert_eq!(
            rows,
            vec![
                MoveRow {
                    move_number: 12,
                    white: None,
                    black: Some("Kd7".into())
                },
                MoveRow {
                    move_number: 13,
                    white: Some("e4".into()),
                    black: None
                },
            ]
        );
    }
}
