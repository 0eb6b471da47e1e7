//! Promotion sub-flow: a pawn move to the last rank waits here for a piece.

use chess::{PieceKind, Square};

/// The move waiting on a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRequest {
    pub from: Square,
    pub to: Square,
}

impl PromotionRequest {
    /// Pieces offered, in dialog order.
    pub fn choices(&self) -> [PieceKind; 4] {
        PieceKind::PROMOTIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionState {
    #[default]
    Idle,
    AwaitingChoice(PromotionRequest),
}

impl PromotionState {
    pub fn pending(&self) -> Option<PromotionRequest> {
        match self {
            Self::Idle => None,
            Self::AwaitingChoice(req) => Some(*req),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AwaitingChoice(_))
    }

    /// Whether `(from, to)` is the move this state is waiting on.
    pub fn is_waiting_on(&self, from: Square, to: Square) -> bool {
        matches!(self, Self::AwaitingChoice(req) if req.from == from && req.to == to)
    }

    /// Return to `Idle`, handing back the request that was pending.
    pub fn take(&mut self) -> Option<PromotionRequest> {
        std::mem::take(self).pending()
    }
}
