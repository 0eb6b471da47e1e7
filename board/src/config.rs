//! Board configuration.
//!
//! Every tunable has a compile-time default and can be overridden through a
//! dedicated environment variable. Command-line flags in the front end are
//! applied on top of [`BoardConfig::from_env`].

use chess::PieceColor;

/// Default broadcast channel capacity for board events.
const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Default number of plies played by a random playout.
const DEFAULT_RANDOM_PLIES: usize = 30;

const START_FEN_VAR: &str = "CHESSCOACH_START_FEN";
const PLAYER_COLOR_VAR: &str = "CHESSCOACH_PLAYER_COLOR";
const EVENT_CAPACITY_VAR: &str = "CHESSCOACH_EVENT_CAPACITY";
const RANDOM_PLIES_VAR: &str = "CHESSCOACH_RANDOM_PLIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Starting position. `None` means the standard start.
    pub start_fen: Option<String>,
    /// Colour the local player has; sets the initial orientation.
    pub player_color: PieceColor,
    /// When false the board is view-only: navigation works, moves do not.
    pub allow_moves: bool,
    pub event_capacity: usize,
    pub random_plies: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            start_fen: None,
            player_color: PieceColor::White,
            allow_moves: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            random_plies: DEFAULT_RANDOM_PLIES,
        }
    }
}

impl BoardConfig {
    /// Assemble a config from the `CHESSCOACH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            start_fen: get_start_fen(),
            player_color: get_player_color()?,
            allow_moves: true,
            event_capacity: get_event_capacity()?,
            random_plies: get_random_plies()?,
        })
    }

    pub fn with_start_fen(mut self, fen: impl Into<String>) -> Self {
        self.start_fen = Some(fen.into());
        self
    }

    pub fn with_player_color(mut self, color: PieceColor) -> Self {
        self.player_color = color;
        self
    }

    pub fn with_allow_moves(mut self, allow: bool) -> Self {
        self.allow_moves = allow;
        self
    }
}

/// Get the starting position.
///
/// Priority:
/// 1. `CHESSCOACH_START_FEN` env variable if set and non-empty
/// 2. `None` (standard starting position)
pub fn get_start_fen() -> Option<String> {
    std::env::var(START_FEN_VAR)
        .ok()
        .filter(|fen| !fen.trim().is_empty())
}

/// Get the player colour (`white`, `black`, `w` or `b`). Defaults to white.
pub fn get_player_color() -> Result<PieceColor, ConfigError> {
    match std::env::var(PLAYER_COLOR_VAR) {
        Ok(value) => PieceColor::parse(&value).ok_or(ConfigError::InvalidValue {
            var: PLAYER_COLOR_VAR,
            value,
        }),
        Err(_) => Ok(PieceColor::White),
    }
}

/// Get the event channel capacity. Must be at least 1; defaults to 100.
pub fn get_event_capacity() -> Result<usize, ConfigError> {
    match parse_usize(EVENT_CAPACITY_VAR)? {
        Some(0) => Err(ConfigError::InvalidValue {
            var: EVENT_CAPACITY_VAR,
            value: "0".to_string(),
        }),
        Some(n) => Ok(n),
        None => Ok(DEFAULT_EVENT_CAPACITY),
    }
}

/// Get the random playout length in plies. Defaults to 30.
pub fn get_random_plies() -> Result<usize, ConfigError> {
    Ok(parse_usize(RANDOM_PLIES_VAR)?.unwrap_or(DEFAULT_RANDOM_PLIES))
}

fn parse_usize(var: &'static str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.start_fen, None);
        assert_eq!(config.player_color, PieceColor::White);
        assert!(config.allow_moves);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
        assert_eq!(config.random_plies, DEFAULT_RANDOM_PLIES);
    }

    #[test]
    fn test_get_event_capacity() {
        match std::env::var(EVENT_CAPACITY_VAR) {
            Ok(_) => {}
            Err(_) => assert_eq!(get_event_capacity().unwrap(), DEFAULT_EVENT_CAPACITY),
        }
    }

    #[test]
    fn test_get_random_plies() {
        match std::env::var(RANDOM_PLIES_VAR) {
            Ok(_) => {}
            Err(_) => assert_eq!(get_random_plies().unwrap(), DEFAULT_RANDOM_PLIES),
        }
    }

    #[test]
    fn test_get_player_color() {
        match std::env::var(PLAYER_COLOR_VAR) {
            Ok(val) => assert_eq!(get_player_color().ok(), PieceColor::parse(&val)),
            Err(_) => assert_eq!(get_player_color().unwrap(), PieceColor::White),
        }
    }

    #[test]
    fn test_builders() {
        let config = BoardConfig::default()
            .with_start_fen("8/8/8/8/8/8/8/K6k w - - 0 1")
            .with_player_color(PieceColor::Black)
            .with_allow_moves(false);
        assert_eq!(config.start_fen.as_deref(), Some("8/8/8/8/8/8/8/K6k w - - 0 1"));
        assert_eq!(config.player_color, PieceColor::Black);
        assert!(!config.allow_moves);
    }
}
