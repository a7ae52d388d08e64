use serde::Serialize;

use crate::shapes::{Bitmap, Color, PieceKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// A falling piece. Every transform returns a new value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub bitmap: Bitmap,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    /// Canonical orientation, horizontally centered on the top row.
    pub fn spawn(kind: PieceKind, field_width: usize) -> Self {
        let x = (field_width / 2) as i16 - (kind.bitmap().size() / 2) as i16;
        Self::new_at(kind, x, 0)
    }

    pub fn new_at(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            bitmap: kind.bitmap(),
            color: kind.color(),
            position: Position { x, y },
        }
    }

    /// Rotated a quarter turn clockwise in place; collision is the caller's concern.
    pub fn rotated(&self) -> Self {
        Self {
            bitmap: self.bitmap.rotated(),
            ..*self
        }
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            ..*self
        }
    }

    /// Absolute field coordinates of the filled cells.
    pub fn blocks(&self) -> impl Iterator<Item = Position> + '_ {
        self.bitmap.filled_cells().map(move |(dx, dy)| Position {
            x: self.position.x + dx,
            y: self.position.y + dy,
        })
    }
}
