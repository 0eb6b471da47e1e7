//! The board controller: one game, the position being viewed, and the
//! interaction state layered on top (selection, drag, pending promotion).
//!
//! Every operation runs to completion synchronously. The move sequence only
//! changes through [`BoardController::execute_move`], [`BoardController::reset`],
//! [`BoardController::load_pgn`] and [`BoardController::play_random_game`].

use chess::{
    format_pgn, parse_pgn, AnalysisRequest, FenError, Game, PgnError, PieceColor, PieceKind,
    Position, Square,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BoardConfig;
use crate::events::BoardEvent;
use crate::geometry::Orientation;
use crate::input::{DragSession, Selection, Targets};
use crate::ply::{group_rows, MoveOutcome, MoveRow, Ply, RejectReason};
use crate::promotion::{PromotionRequest, PromotionState};

pub struct BoardController {
    pub(crate) config: BoardConfig,
    pub(crate) game: Game,
    /// Number of plies applied at the viewed position (0 = initial, len = live).
    pub(crate) viewed: usize,
    pub(crate) orientation: Orientation,
    pub(crate) selection: Option<Selection>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) promotion: PromotionState,
    game_id: Uuid,
    event_tx: broadcast::Sender<BoardEvent>,
}

impl BoardController {
    /// Build a controller from `config`. A malformed starting position is
    /// logged and replaced by the standard start.
    pub fn new(config: BoardConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let mut controller = Self {
            orientation: config.player_color.into(),
            config,
            game: Game::new(),
            viewed: 0,
            selection: None,
            drag: None,
            promotion: PromotionState::Idle,
            game_id: Uuid::new_v4(),
            event_tx,
        };
        let start = controller.config.start_fen.clone();
        // Already logged inside initialize; the fallback position is in place.
        let _ = controller.initialize(start.as_deref());
        controller
    }

    /// Start a fresh game from `start` (standard start when `None`).
    ///
    /// On a parse failure the standard start is used instead and the error
    /// is returned for information only; the controller is ready either way.
    pub fn initialize(&mut self, start: Option<&str>) -> Result<(), FenError> {
        let (game, result) = match start {
            None => (Game::new(), Ok(())),
            Some(fen) => match Position::parse(fen) {
                Ok(position) => (Game::from_position(position), Ok(())),
                Err(e) => {
                    warn!(
                        "Invalid starting position {:?}, using the standard start: {}",
                        fen, e
                    );
                    (Game::new(), Err(e))
                }
            },
        };

        self.config.start_fen = match (&result, start) {
            (Ok(()), Some(fen)) => Some(fen.to_string()),
            _ => None,
        };
        self.replace_game(game);
        result
    }

    // --- Accessors ---

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn len(&self) -> usize {
        self.game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.game.is_empty()
    }

    /// Index of the last ply applied at the viewed position, -1 for the start.
    pub fn cursor(&self) -> isize {
        self.viewed as isize - 1
    }

    pub fn is_live(&self) -> bool {
        self.viewed == self.game.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn player_color(&self) -> PieceColor {
        self.config.player_color
    }

    pub fn allow_moves(&self) -> bool {
        self.config.allow_moves
    }

    pub fn set_allow_moves(&mut self, allow: bool) {
        self.config.allow_moves = allow;
        if !allow {
            self.clear_interaction();
        }
    }

    /// Position after the last committed ply.
    pub fn live_position(&self) -> &Position {
        self.game.position()
    }

    /// Position at the cursor.
    pub fn viewing_position(&self) -> &Position {
        self.game
            .position_at(self.viewed)
            .unwrap_or_else(|| self.game.position())
    }

    pub fn pending_promotion(&self) -> Option<PromotionRequest> {
        self.promotion.pending()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_tx.subscribe()
    }

    // --- Plies ---

    pub fn ply(&self, index: usize) -> Option<Ply> {
        let entry = self.game.history().get(index)?;
        let start = self.game.initial_position();
        Some(Ply::from_entry(
            index,
            entry,
            u32::from(start.fullmove_number()),
            start.turn(),
        ))
    }

    pub fn plies(&self) -> Vec<Ply> {
        let start = self.game.initial_position();
        let first_move_number = u32::from(start.fullmove_number());
        let first_side = start.turn();
        self.game
            .history()
            .iter()
            .enumerate()
            .map(|(i, entry)| Ply::from_entry(i, entry, first_move_number, first_side))
            .collect()
    }

    /// Plies grouped into numbered white/black rows for a move list.
    pub fn history_rows(&self) -> Vec<MoveRow> {
        group_rows(&self.plies())
    }

    // --- Moves ---

    /// Play `from` -> `to` on the live position.
    ///
    /// A pawn reaching its last rank with no `promotion` is suspended rather
    /// than played. While suspended, only the retry of that same move with a
    /// promotion piece is accepted.
    pub fn execute_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> MoveOutcome {
        if !self.config.allow_moves {
            return MoveOutcome::Rejected(RejectReason::MovesDisabled);
        }
        if !self.is_live() {
            debug!("Rejected move while viewing ply {}", self.cursor());
            return MoveOutcome::Rejected(RejectReason::NotLiveView);
        }
        if self.promotion.is_pending() {
            if promotion.is_none() || !self.promotion.is_waiting_on(from, to) {
                return MoveOutcome::Rejected(RejectReason::PromotionPending);
            }
            self.promotion = PromotionState::Idle;
        }

        if promotion.is_none() && self.game.position().needs_promotion(from, to) {
            let request = PromotionRequest { from, to };
            self.promotion = PromotionState::AwaitingChoice(request);
            self.drag = None;
            debug!("Promotion pending for {}{}", from, to);
            self.emit(BoardEvent::PromotionRequested(request));
            return MoveOutcome::Suspended(request);
        }

        match self.commit(from, to, promotion) {
            Some(ply) => MoveOutcome::Committed(ply),
            None => MoveOutcome::Rejected(RejectReason::IllegalMove),
        }
    }

    /// Append a move to the game and move the cursor to live.
    pub(crate) fn commit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Ply> {
        let index = self.game.len();
        if let Err(e) = self.game.make_move(from, to, promotion) {
            debug!("Move rejected by rules: {}", e);
            return None;
        }

        self.viewed = self.game.len();
        self.selection = None;
        self.drag = None;

        let ply = self.ply(index)?;
        info!("Move {}: {} ({})", ply.move_number, ply.san, ply.uci());
        self.emit(BoardEvent::MoveCommitted(ply.clone()));
        Some(ply)
    }

    /// Play the pending promotion with `piece`. The pending request is
    /// cleared whatever the outcome. `None` when nothing was pending.
    pub fn choose_promotion(&mut self, piece: PieceKind) -> Option<MoveOutcome> {
        let request = self.promotion.take()?;
        self.selection = None;
        Some(self.execute_move(request.from, request.to, Some(piece)))
    }

    /// Drop the pending promotion without playing anything.
    pub fn cancel_promotion(&mut self) -> bool {
        if self.promotion.take().is_none() {
            return false;
        }
        self.selection = None;
        debug!("Promotion cancelled");
        self.emit(BoardEvent::PromotionCancelled);
        true
    }

    /// Legal destinations for the piece on `square`, empty unless the live
    /// position is being viewed.
    pub fn current_selectable_moves(&self, square: Square) -> Targets {
        if !self.is_live() || !self.config.allow_moves {
            return Targets::new();
        }
        self.viewing_position()
            .legal_targets(square)
            .into_iter()
            .collect()
    }

    // --- Navigation ---

    /// View the position after ply `index` (-1 for the start). Out-of-range
    /// indices leave everything unchanged.
    pub fn jump_to_position(&mut self, index: isize) -> &Position {
        if index < -1 || index >= self.game.len() as isize {
            debug!("Ignoring jump to {} ({} plies)", index, self.game.len());
            return self.viewing_position();
        }

        self.viewed = (index + 1) as usize;
        self.clear_interaction();
        debug!("Viewing ply {}", index);
        self.emit(BoardEvent::PositionViewed { cursor: index });
        self.viewing_position()
    }

    pub fn step_back(&mut self) -> bool {
        if self.viewed == 0 {
            return false;
        }
        self.jump_to_position(self.cursor() - 1);
        true
    }

    pub fn step_forward(&mut self) -> bool {
        if self.is_live() {
            return false;
        }
        self.jump_to_position(self.cursor() + 1);
        true
    }

    pub fn jump_to_start(&mut self) {
        self.jump_to_position(-1);
    }

    /// Return to the latest position.
    pub fn jump_to_live(&mut self) {
        self.jump_to_position(self.game.len() as isize - 1);
    }

    // --- Board-level commands ---

    /// Clear every move and go back to the configured starting position.
    pub fn reset(&mut self) {
        self.game.reset();
        self.viewed = 0;
        self.clear_interaction();
        self.game_id = Uuid::new_v4();
        info!("Board reset");
        self.emit(BoardEvent::Reset);
    }

    pub fn flip_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.flipped();
        self.emit(BoardEvent::OrientationFlipped(self.orientation));
        self.orientation
    }

    /// Re-derive the position at `index` by replaying moves from the start.
    pub fn replay_position(&self, index: isize) -> Option<Position> {
        let plies = usize::try_from(index.checked_add(1)?).ok()?;
        self.game.replay(plies).ok()
    }

    // --- Notation ---

    /// PGN of the whole game.
    pub fn pgn(&self) -> String {
        format_pgn(&self.game, self.game.len(), &[])
    }

    /// PGN of the moves up to the viewed position.
    pub fn viewing_pgn(&self) -> String {
        format_pgn(&self.game, self.viewed, &[])
    }

    /// Replace the game with one read from PGN and view its final position.
    /// Tags other than the start position are not kept.
    pub fn load_pgn(&mut self, text: &str) -> Result<usize, PgnError> {
        let parsed = parse_pgn(text)?;
        self.config.start_fen = match parsed.game.start_position() {
            chess::StartPosition::Standard => None,
            chess::StartPosition::Fen(fen) => Some(fen.clone()),
        };
        self.replace_game(parsed.game);
        info!("Loaded PGN with {} plies", self.game.len());
        Ok(self.game.len())
    }

    /// Game-review request for the viewed moves, or `None` before the first
    /// move.
    pub fn analysis_request(&self, user_id: Option<&str>) -> Option<AnalysisRequest> {
        if self.game.is_empty() {
            return None;
        }
        let request = AnalysisRequest::new(self.viewing_pgn(), self.config.player_color)
            .with_game_id(self.game_id.to_string());
        Some(match user_id {
            Some(id) => request.with_user_id(id),
            None => request,
        })
    }

    // --- Internals ---

    pub(crate) fn replace_game(&mut self, game: Game) {
        self.game = game;
        self.viewed = self.game.len();
        self.clear_interaction();
        self.game_id = Uuid::new_v4();
        self.emit(BoardEvent::Reset);
    }

    /// Drop selection, drag and any pending promotion.
    pub(crate) fn clear_interaction(&mut self) {
        self.selection = None;
        self.drag = None;
        if self.promotion.take().is_some() {
            self.emit(BoardEvent::PromotionCancelled);
        }
    }

    /// Broadcast `event`. Having no subscribers is not an error.
    pub(crate) fn emit(&self, event: BoardEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}
