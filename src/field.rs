use serde::Serialize;

use crate::piece::{Piece, Position};
use crate::shapes::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Play-field grid. Row 0 is the spawn edge, row `height - 1` the floor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes a cell; out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Rows from top to bottom. A zero-width field has no rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    // ------------------------------------------------------------------------
    // Collision
    // ------------------------------------------------------------------------

    pub fn collides(&self, piece: &Piece) -> bool {
        self.collides_at(piece, Position::ORIGIN)
    }

    /// True when any filled cell of `piece`, shifted by `offset`, leaves the side
    /// walls, passes the floor, or lands on an occupied cell. Cells above row 0
    /// only collide with the walls.
    pub fn collides_at(&self, piece: &Piece, offset: Position) -> bool {
        piece.blocks().any(|block| {
            let x = block.x + offset.x;
            let y = block.y + offset.y;
            if x < 0 || x >= self.width as i16 || y >= self.height as i16 {
                return true;
            }
            y >= 0 && self.cells[y as usize * self.width + x as usize].is_filled()
        })
    }

    // ------------------------------------------------------------------------
    // Locking and line clears
    // ------------------------------------------------------------------------

    /// Copy of the field with `piece` written into it in its color.
    pub fn merged(&self, piece: &Piece) -> Field {
        let mut field = self.clone();
        for block in piece.blocks() {
            if block.x >= 0 && block.y >= 0 {
                field.set(block.x as usize, block.y as usize, Cell::Filled(piece.color));
            }
        }
        field
    }

    /// Drops every full row, lets the rest fall, and reports how many were removed.
    pub fn cleared_full_rows(&self) -> (Field, u32) {
        let mut kept: Vec<&[Cell]> = Vec::with_capacity(self.height);
        let mut cleared = 0;

        for y in (0..self.height).rev() {
            if self.is_row_full(y) {
                cleared += 1;
            } else {
                kept.push(self.row(y));
            }
        }

        let mut cells = vec![Cell::Empty; cleared as usize * self.width];
        for row in kept.iter().rev() {
            cells.extend_from_slice(row);
        }

        let field = Field {
            width: self.width,
            height: self.height,
            cells,
        };
        (field, cleared)
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(Cell::is_filled)
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.row(y).iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_filled()).count()
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
