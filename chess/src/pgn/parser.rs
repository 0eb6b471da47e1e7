use crate::game::{Game, GameError};

use super::san::{parse_san, SanError};
use super::GameResult;

/// A parsed PGN game
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub game: Game,
    pub result: GameResult,
}

impl PgnGame {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a single-game PGN string and replay its moves.
///
/// Comments (`{...}`, `; ...`), variations (`(...)`), numeric annotation
/// glyphs (`$n`) and move numbers are skipped. A `FEN` tag sets the starting
/// position.
pub fn parse_pgn(input: &str) -> Result<PgnGame, PgnError> {
    let mut tags = Vec::new();
    let mut movetext = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && movetext.trim().is_empty() {
            tags.push(parse_tag(trimmed)?);
        } else {
            movetext.push_str(line);
            movetext.push('\n');
        }
    }

    let mut game = match tags.iter().find(|(n, _)| n == "FEN") {
        Some((_, fen)) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let mut result = GameResult::Ongoing;
    for token in tokenize(&movetext)? {
        if let Some(r) = GameResult::from_token(&token) {
            result = r;
            continue;
        }
        if token.starts_with('$') {
            continue;
        }
        let san = strip_move_number(&token);
        if san.is_empty() {
            continue;
        }

        let mv = parse_san(game.position().board(), san)?;
        game.make_raw_move(mv)?;
    }

    Ok(PgnGame { tags, game, result })
}

fn parse_tag(line: &str) -> Result<(String, String), PgnError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| PgnError::InvalidTag(line.to_string()))?;

    let (name, rest) = inner
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| PgnError::InvalidTag(line.to_string()))?;

    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| PgnError::InvalidTag(line.to_string()))?;

    Ok((
        name.to_string(),
        value.replace("\\\"", "\"").replace("\\\\", "\\"),
    ))
}

/// Split movetext into tokens, dropping comments and variations.
fn tokenize(movetext: &str) -> Result<Vec<String>, PgnError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = movetext.chars();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                // Brace comments do not nest.
                if !chars.by_ref().any(|c| c == '}') {
                    return Err(PgnError::InvalidFormat("unterminated comment".into()));
                }
                flush(&mut current, &mut tokens, depth);
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                flush(&mut current, &mut tokens, depth);
            }
            '(' => {
                flush(&mut current, &mut tokens, depth);
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(PgnError::InvalidFormat("unbalanced ')'".into()));
                }
                current.clear();
                depth -= 1;
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens, depth),
            c => current.push(c),
        }
    }
    if depth != 0 {
        return Err(PgnError::InvalidFormat("unterminated variation".into()));
    }
    flush(&mut current, &mut tokens, depth);
    Ok(tokens)
}

fn flush(current: &mut String, tokens: &mut Vec<String>, depth: usize) {
    if !current.is_empty() {
        if depth == 0 {
            tokens.push(std::mem::take(current));
        } else {
            current.clear();
        }
    }
}

/// "12." / "12..." / "12.e4" -> "" / "" / "e4"
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == token.len() || !rest.starts_with('.') {
        // "0-0" castling also starts with a digit
        return token;
    }
    rest.trim_start_matches('.')
}

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("Invalid PGN format: {0}")]
    InvalidFormat(String),
    #[error("Invalid tag: {0}")]
    InvalidTag(String),
    #[error("SAN parse error: {0}")]
    SanError(#[from] SanError),
    #[error(transparent)]
    Game(#[from] GameError),
}
