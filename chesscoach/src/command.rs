//! Line commands understood by the terminal front end.

use board::Key;
use chess::{parse_promotion, parse_square, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Click(Square),
    Move {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    Drag {
        from: Square,
        /// `None` drops the piece off the board.
        to: Option<Square>,
    },
    Promote(PieceKind),
    Cancel,
    Key(Key),
    Jump(isize),
    Flip,
    Reset,
    Random(Option<usize>),
    Pgn,
    Load(String),
    Fen,
    History,
    Analysis(Option<String>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <sq> | click <sq>          click a square (select, then click a target)
  move <from> <to> [q|r|b|n] play a move directly
  drag <from> <to|off>       drag a piece and release it
  promote <q|r|b|n>          answer a pending promotion
  cancel                     cancel a pending promotion
  left | right | home | end  step through the history
  jump <index>               view the position after ply <index> (-1 = start)
  flip                       flip the board
  reset                      start over
  random [plies]             play a random game
  pgn | fen | history        print the game
  load <file>                load a PGN file
  analysis [user]            print the game-review request
  show | help | quit";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("invalid promotion piece: {0}")]
    InvalidPiece(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),
}

fn square(arg: Option<&str>, cmd: &'static str) -> Result<Square, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(cmd))?;
    parse_square(arg).ok_or_else(|| CommandError::InvalidSquare(arg.to_string()))
}

fn piece(arg: &str) -> Result<PieceKind, CommandError> {
    parse_promotion(arg).ok_or_else(|| CommandError::InvalidPiece(arg.to_string()))
}

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let head = head.to_ascii_lowercase();

    // A bare square is a click.
    if let Some(sq) = parse_square(&head) {
        return Ok(Some(Command::Click(sq)));
    }

    let cmd = match head.as_str() {
        "click" => Command::Click(square(words.next(), "click")?),
        "move" | "mv" => {
            let from = square(words.next(), "move")?;
            let to = square(words.next(), "move")?;
            let promotion = words.next().map(piece).transpose()?;
            Command::Move {
                from,
                to,
                promotion,
            }
        }
        "drag" => {
            let from = square(words.next(), "drag")?;
            let to = match words.next() {
                Some("off") => None,
                other => Some(square(other, "drag")?),
            };
            Command::Drag { from, to }
        }
        "promote" => {
            let arg = words.next().ok_or(CommandError::MissingArgument("promote"))?;
            Command::Promote(piece(arg)?)
        }
        "cancel" => Command::Cancel,
        "left" | "back" | "prev" => Command::Key(Key::Left),
        "right" | "forward" | "next" => Command::Key(Key::Right),
        "home" | "start" => Command::Key(Key::Home),
        "end" | "live" => Command::Key(Key::End),
        "jump" => {
            let arg = words.next().ok_or(CommandError::MissingArgument("jump"))?;
            let index = arg
                .parse()
                .map_err(|_| CommandError::InvalidNumber(arg.to_string()))?;
            Command::Jump(index)
        }
        "flip" => Command::Flip,
        "reset" => Command::Reset,
        "random" => {
            let plies = words
                .next()
                .map(|arg| {
                    arg.parse()
                        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
                })
                .transpose()?;
            Command::Random(plies)
        }
        "pgn" => Command::Pgn,
        "load" => {
            let rest: Vec<&str> = words.collect();
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("load"));
            }
            Command::Load(rest.join(" "))
        }
        "fen" => Command::Fen,
        "history" | "moves" => Command::History,
        "analysis" | "analyze" => Command::Analysis(words.next().map(str::to_string)),
        "show" | "board" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(head)),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        parse_square(s).unwrap()
    }

    #[test]
    fn bare_square_is_a_click() {
        assert_eq!(parse_command("e2"), Ok(Some(Command::Click(sq("e2")))));
        assert_eq!(parse_command("  "), Ok(None));
    }

    #[test]
    fn move_with_promotion() {
        assert_eq!(
            parse_command("move e7 e8 q"),
            Ok(Some(Command::Move {
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(PieceKind::Queen)
            }))
        );
        assert_eq!(
            parse_command("move e7 e8 k"),
            Err(CommandError::InvalidPiece("k".into()))
        );
    }

    #[test]
    fn drag_off_board() {
        assert_eq!(
            parse_command("drag e2 off"),
            Ok(Some(Command::Drag {
                from: sq("e2"),
                to: None
            }))
        );
    }

    #[test]
    fn navigation_words() {
        assert_eq!(parse_command("left"), Ok(Some(Command::Key(Key::Left))));
        assert_eq!(parse_command("END"), Ok(Some(Command::Key(Key::End))));
        assert_eq!(parse_command("jump -1"), Ok(Some(Command::Jump(-1))));
        assert_eq!(
            parse_command("jump x"),
            Err(CommandError::InvalidNumber("x".into()))
        );
    }

    #[test]
    fn errors_name_the_problem() {
        assert_eq!(
            parse_command("click z9"),
            Err(CommandError::InvalidSquare("z9".into()))
        );
        assert_eq!(
            parse_command("promote"),
            Err(CommandError::MissingArgument("promote"))
        );
        assert_eq!(
            parse_command("castle"),
            Err(CommandError::Unknown("castle".into()))
        );
    }
}
