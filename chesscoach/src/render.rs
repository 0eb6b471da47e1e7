//! Plain-text rendering of the board read model.

use board::{BoardController, MoveRow, Orientation, ViewSquare};
use chess::PositionStatus;

/// Board diagram in the current orientation.
///
/// `[X]` marks the selected piece, `*` a legal target, `.` an empty square.
pub fn render_board(board: &BoardController) -> String {
    let grid = board.view_grid();
    let snapshot = board.snapshot();
    let mut out = String::new();

    for (row, cells) in grid.chunks(8).enumerate() {
        let rank = match snapshot.orientation {
            Orientation::White => 8 - row,
            Orientation::Black => row + 1,
        };
        out.push_str(&format!("{} ", rank));
        for cell in cells {
            out.push_str(&render_cell(cell));
        }
        out.push('\n');
    }

    out.push_str("  ");
    let files: Vec<char> = match snapshot.orientation {
        Orientation::White => ('a'..='h').collect(),
        Orientation::Black => ('a'..='h').rev().collect(),
    };
    for file in files {
        out.push_str(&format!(" {} ", file));
    }
    out.push('\n');

    let view = if snapshot.is_live {
        "live".to_string()
    } else {
        format!("viewing ply {} of {}", snapshot.cursor + 1, snapshot.plies)
    };
    out.push_str(&format!(
        "{} to move | {} | {}",
        snapshot.side_to_move,
        view,
        status_text(snapshot.status)
    ));
    if let Some(req) = snapshot.promotion {
        out.push_str(&format!(
            " | promote {}{}: q/r/b/n or cancel",
            req.from, req.to
        ));
    }
    out
}

fn render_cell(cell: &ViewSquare) -> String {
    let glyph = cell.piece.map(|p| p.to_fen_char()).unwrap_or('.');
    if cell.selected {
        format!("[{}]", glyph)
    } else if cell.target {
        format!("*{} ", glyph)
    } else {
        format!(" {} ", glyph)
    }
}

fn status_text(status: PositionStatus) -> String {
    match status {
        PositionStatus::Ongoing => "in progress".to_string(),
        PositionStatus::Checkmate { winner } => format!("checkmate, {} wins", winner),
        PositionStatus::Draw => "draw".to_string(),
    }
}

/// Move list, one numbered row per full move. `>` marks the viewed ply.
pub fn render_history(rows: &[MoveRow], cursor: isize) -> String {
    if rows.is_empty() {
        return "(no moves)".to_string();
    }

    let mut index: isize = 0;
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = format!("{:>3}.", row.move_number);
        for half in [&row.white, &row.black] {
            match half {
                Some(san) => {
                    let mark = if index == cursor { '>' } else { ' ' };
                    line.push_str(&format!(" {}{:<7}", mark, san));
                    index += 1;
                }
                None => line.push_str("  ...    "),
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
