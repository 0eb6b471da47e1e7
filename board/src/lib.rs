//! Interactive chessboard state: move history with replay navigation,
//! click and drag input, and the promotion sub-flow.

pub mod config;
pub mod controller;
pub mod events;
pub mod geometry;
pub mod input;
pub mod ply;
pub mod promotion;
pub mod random;
pub mod snapshot;

pub use config::{BoardConfig, ConfigError};
pub use controller::BoardController;
pub use events::BoardEvent;
pub use geometry::{square_center, square_from_coordinates, BoundingBox, Orientation, Point};
pub use input::{DragSession, Gesture, InputOutcome, Key, Selection, Targets};
pub use ply::{MoveOutcome, MoveRow, Ply, RejectReason};
pub use promotion::{PromotionRequest, PromotionState};
pub use snapshot::{BoardSnapshot, ViewSquare};
