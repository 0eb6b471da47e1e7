//! Mapping between screen coordinates and board squares.
//!
//! Orientation only changes which square sits under a point. It never
//! influences what is legal.

use chess::{File, PieceColor, Rank, Square};
use serde::{Deserialize, Serialize};

/// Which side sits at the bottom of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    White,
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl From<PieceColor> for Orientation {
    fn from(color: PieceColor) -> Self {
        match color {
            PieceColor::White => Self::White,
            PieceColor::Black => Self::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle the board is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    /// NaN coordinates are never contained.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.left + self.width
            && point.y >= self.top
            && point.y < self.top + self.height
    }

    fn cell_size(&self) -> (f64, f64) {
        (self.width / 8.0, self.height / 8.0)
    }
}

/// Square under `point`, or `None` when the point is off the board.
pub fn square_from_coordinates(
    point: Point,
    bbox: &BoundingBox,
    orientation: Orientation,
) -> Option<Square> {
    if bbox.width <= 0.0 || bbox.height <= 0.0 || !bbox.contains(point) {
        return None;
    }

    let (cell_w, cell_h) = bbox.cell_size();
    let col = (((point.x - bbox.left) / cell_w) as usize).min(7);
    let row = (((point.y - bbox.top) / cell_h) as usize).min(7);

    Some(square_at_cell(col, row, orientation))
}

/// Centre of `square` on screen. Inverse of [`square_from_coordinates`].
pub fn square_center(square: Square, bbox: &BoundingBox, orientation: Orientation) -> Point {
    let (col, row) = cell_of_square(square, orientation);
    let (cell_w, cell_h) = bbox.cell_size();
    Point {
        x: bbox.left + (col as f64 + 0.5) * cell_w,
        y: bbox.top + (row as f64 + 0.5) * cell_h,
    }
}

/// Square drawn at screen cell (`col`, `row`), counted from the top-left.
pub fn square_at_cell(col: usize, row: usize, orientation: Orientation) -> Square {
    let (file, rank) = match orientation {
        Orientation::White => (col, 7 - row),
        Orientation::Black => (7 - col, row),
    };
    Square::new(File::index(file), Rank::index(rank))
}

/// Screen cell (`col`, `row`) at which `square` is drawn.
pub fn cell_of_square(square: Square, orientation: Orientation) -> (usize, usize) {
    let file = square.file() as usize;
    let rank = square.rank() as usize;
    match orientation {
        Orientation::White => (file, 7 - rank),
        Orientation::Black => (7 - file, rank),
    }
}
