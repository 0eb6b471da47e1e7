//! Coaching analysis payloads exchanged with the game-review service.
//!
//! Only the data contract lives here; sending the request is up to the caller.

use serde::{Deserialize, Serialize};

use crate::types::PieceColor;

/// Body of a game-review request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub pgn: String,
    /// Colour the reviewed player had, as `"w"` or `"b"`.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl AnalysisRequest {
    pub fn new(pgn: impl Into<String>, color: PieceColor) -> Self {
        Self {
            pgn: pgn.into(),
            color: color.as_letter().to_string(),
            game_id: None,
            user_id: None,
        }
    }

    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A coach's review of one game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingAnalysis {
    pub summary: String,
    #[serde(default)]
    pub key_learnings: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Decode the model's reply, which is often wrapped in a ```json fence.
pub fn parse_coaching_content(raw: &str) -> Result<CoachingAnalysis, AnalysisError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(AnalysisError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    // Drop the info string ("json") up to the first newline.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Empty analysis content")]
    Empty,
    #[error("Malformed analysis JSON: {0}")]
    Json(#[from] serde_json::Error),
}
