use crate::geometry::Orientation;
use crate::ply::Ply;
use crate::promotion::PromotionRequest;

/// Events broadcast from a board controller to all subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    MoveCommitted(Ply),
    PromotionRequested(PromotionRequest),
    PromotionCancelled,
    /// The viewed position changed; `cursor` is -1 for the start.
    PositionViewed { cursor: isize },
    /// The game was cleared or replaced.
    Reset,
    OrientationFlipped(Orientation),
}
