//! Pointer, click and keyboard input resolved against the board controller.
//!
//! Clicks and drags both end in [`BoardController::execute_move`], so the
//! same pair of squares produces the same game whichever gesture was used.
//! While a promotion is pending, the view is historical, or moves are
//! disabled, board gestures are inert.

use chess::{Piece, Square};
use smallvec::SmallVec;
use tracing::debug;

use crate::controller::BoardController;
use crate::geometry::{square_from_coordinates, BoundingBox, Point};
use crate::ply::MoveOutcome;

/// Destination squares of a selected piece. A queen has at most 27.
pub type Targets = SmallVec<[Square; 32]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub square: Square,
    pub targets: Targets,
}

/// A piece being dragged. Lives from pointer-down to pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub source: Square,
    pub piece: Piece,
    /// Last pointer position, for drawing the piece under the cursor.
    pub pointer: Point,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click,
    /// Pointer pressed at this screen position.
    Drag(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Nothing happened.
    Ignored,
    Selected { square: Square, targets: Targets },
    Deselected,
    DragStarted { square: Square },
    DragMoved { pointer: Point },
    /// Released off the board; no move was attempted.
    DragAbandoned,
    Move(MoveOutcome),
    Navigated { cursor: isize },
}

impl BoardController {
    fn input_is_inert(&self) -> bool {
        !self.config.allow_moves || !self.is_live() || self.promotion.is_pending()
    }

    /// Piece on `square` if it belongs to the side to move.
    fn friendly_piece(&self, square: Square) -> Option<Piece> {
        let position = self.viewing_position();
        position
            .piece_at(square)
            .filter(|piece| piece.color == position.turn())
    }

    pub fn select_or_drag_square(&mut self, square: Square, gesture: Gesture) -> InputOutcome {
        match gesture {
            Gesture::Click => self.click(square),
            Gesture::Drag(pointer) => self.begin_drag(square, pointer),
        }
    }

    /// Click-to-move. A second click on a legal target plays the move; any
    /// other second click, or a rejected move, is treated as a fresh
    /// selection attempt on the clicked square.
    pub fn click(&mut self, square: Square) -> InputOutcome {
        if self.input_is_inert() {
            return InputOutcome::Ignored;
        }

        if let Some(selection) = self.selection.clone() {
            if selection.targets.contains(&square) {
                let outcome = self.execute_move(selection.square, square, None);
                if !matches!(outcome, MoveOutcome::Rejected(_)) {
                    return InputOutcome::Move(outcome);
                }
            }
        }

        self.select(square)
    }

    /// Click at a screen position. Clicks off the board are ignored.
    pub fn click_at(&mut self, point: Point, bbox: &BoundingBox) -> InputOutcome {
        match square_from_coordinates(point, bbox, self.orientation) {
            Some(square) => self.click(square),
            None => InputOutcome::Ignored,
        }
    }

    fn select(&mut self, square: Square) -> InputOutcome {
        if self.friendly_piece(square).is_some() {
            let targets = self.current_selectable_moves(square);
            debug!("Selected {} ({} targets)", square, targets.len());
            self.selection = Some(Selection {
                square,
                targets: targets.clone(),
            });
            return InputOutcome::Selected { square, targets };
        }

        match self.selection.take() {
            Some(_) => {
                debug!("Selection cleared");
                InputOutcome::Deselected
            }
            None => InputOutcome::Ignored,
        }
    }

    fn begin_drag(&mut self, square: Square, pointer: Point) -> InputOutcome {
        if self.input_is_inert() {
            return InputOutcome::Ignored;
        }
        let Some(piece) = self.friendly_piece(square) else {
            return InputOutcome::Ignored;
        };

        self.selection = Some(Selection {
            square,
            targets: self.current_selectable_moves(square),
        });
        self.drag = Some(DragSession {
            source: square,
            piece,
            pointer,
            active: true,
        });
        debug!("Drag started on {}", square);
        InputOutcome::DragStarted { square }
    }

    pub fn pointer_down(&mut self, point: Point, bbox: &BoundingBox) -> InputOutcome {
        match square_from_coordinates(point, bbox, self.orientation) {
            Some(square) => self.select_or_drag_square(square, Gesture::Drag(point)),
            None => InputOutcome::Ignored,
        }
    }

    /// Track the pointer during a drag. Never touches the game.
    pub fn pointer_move(&mut self, point: Point) -> InputOutcome {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.pointer = point;
                InputOutcome::DragMoved { pointer: point }
            }
            None => InputOutcome::Ignored,
        }
    }

    /// End a drag. The drag session is gone afterwards whatever happens.
    ///
    /// Releasing over the source square keeps the piece selected, so a
    /// press-and-release behaves like a click.
    pub fn pointer_up(&mut self, point: Point, bbox: &BoundingBox) -> InputOutcome {
        let Some(drag) = self.drag.take() else {
            return InputOutcome::Ignored;
        };

        let Some(target) = square_from_coordinates(point, bbox, self.orientation) else {
            debug!("Drag from {} released off the board", drag.source);
            self.selection = None;
            return InputOutcome::DragAbandoned;
        };

        if target == drag.source {
            let targets = self
                .selection
                .as_ref()
                .map(|s| s.targets.clone())
                .unwrap_or_default();
            return InputOutcome::Selected {
                square: target,
                targets,
            };
        }

        let outcome = self.execute_move(drag.source, target, None);
        if matches!(outcome, MoveOutcome::Rejected(_)) {
            self.selection = None;
        }
        InputOutcome::Move(outcome)
    }

    /// Arrow keys step through history; Home/End jump to either end.
    pub fn handle_key(&mut self, key: Key) -> InputOutcome {
        let moved = match key {
            Key::Left => self.step_back(),
            Key::Right => self.step_forward(),
            Key::Home if self.viewed > 0 => {
                self.jump_to_start();
                true
            }
            Key::End if !self.is_live() => {
                self.jump_to_live();
                true
            }
            Key::Home | Key::End => false,
        };

        if moved {
            InputOutcome::Navigated {
                cursor: self.cursor(),
            }
        } else {
            InputOutcome::Ignored
        }
    }
}
