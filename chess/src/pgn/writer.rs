use crate::game::{Game, StartPosition};
use crate::position::PositionStatus;
use crate::types::PieceColor;

use super::GameResult;

/// Render the first `plies` moves of `game` as PGN.
///
/// The tag section is only written when `tags` is non-empty or the game did
/// not start from the standard position (which needs `SetUp`/`FEN`). The
/// result token reflects the game's final status only when every ply is
/// included; a prefix of the game is always `*`.
pub fn format_pgn(game: &Game, plies: usize, tags: &[(String, String)]) -> String {
    let plies = plies.min(game.len());
    let result = if plies == game.len() {
        result_of(game.status())
    } else {
        GameResult::Ongoing
    };

    let mut out = String::new();

    let custom_fen = match game.start_position() {
        StartPosition::Standard => None,
        StartPosition::Fen(fen) => Some(fen.as_str()),
    };

    if !tags.is_empty() || custom_fen.is_some() {
        for (name, value) in tags {
            if matches!(name.as_str(), "Result" | "SetUp" | "FEN") {
                continue;
            }
            push_tag(&mut out, name, value);
        }
        if let Some(fen) = custom_fen {
            push_tag(&mut out, "SetUp", "1");
            push_tag(&mut out, "FEN", fen);
        }
        push_tag(&mut out, "Result", result.as_token());
        out.push('\n');
    }

    out.push_str(&movetext(game, plies));
    if !out.is_empty() && !out.ends_with('\n') {
        out.push(' ');
    }
    out.push_str(result.as_token());
    out
}

/// Numbered movetext, e.g. `1. e4 e5 2. Nf3` or `3... Nc6 4. Bb5`.
fn movetext(game: &Game, plies: usize) -> String {
    let initial = game.initial_position();
    let mut move_number = u32::from(initial.fullmove_number());
    let mut side = initial.turn();

    let mut tokens: Vec<String> = Vec::with_capacity(plies + plies / 2 + 1);
    for (i, entry) in game.history().iter().take(plies).enumerate() {
        match side {
            PieceColor::White => tokens.push(format!("{}.", move_number)),
            PieceColor::Black if i == 0 => tokens.push(format!("{}...", move_number)),
            PieceColor::Black => {}
        }
        tokens.push(entry.san.clone());

        if side == PieceColor::Black {
            move_number += 1;
        }
        side = side.opposite();
    }

    tokens.join(" ")
}

fn push_tag(out: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{} \"{}\"]\n", name, escaped));
}

fn result_of(status: PositionStatus) -> GameResult {
    match status {
        PositionStatus::Ongoing => GameResult::Ongoing,
        PositionStatus::Checkmate {
            winner: PieceColor::White,
        } => GameResult::WhiteWins,
        PositionStatus::Checkmate {
            winner: PieceColor::Black,
        } => GameResult::BlackWins,
        PositionStatus::Draw => GameResult::Draw,
    }
}
