use serde::Serialize;

// ============================================================================
// Colors
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ============================================================================
// Bitmaps
// ============================================================================

pub const MAX_BITMAP_SIZE: usize = 4;

/// Square occupancy mask of a piece's bounding box, row-major with stride `size`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bitmap {
    size: usize,
    cells: [bool; MAX_BITMAP_SIZE * MAX_BITMAP_SIZE],
}

impl Bitmap {
    fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        let mut cells = [false; MAX_BITMAP_SIZE * MAX_BITMAP_SIZE];
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                cells[row * N + col] = *value != 0;
            }
        }
        Self { size: N, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    /// `(col, row)` offsets of every filled cell, top row first.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size)
                .filter(move |&col| self.get(row, col))
                .map(move |col| (col as i16, row as i16))
        })
    }

    /// Quarter turn clockwise: `rotated[j][n-1-i] = self[i][j]`.
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut cells = [false; MAX_BITMAP_SIZE * MAX_BITMAP_SIZE];
        for i in 0..n {
            for j in 0..n {
                cells[j * n + (n - 1 - i)] = self.get(i, j);
            }
        }
        Self { size: n, cells }
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.size).map(move |row| (0..self.size).map(|col| self.get(row, col)).collect())
    }
}

impl Serialize for Bitmap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    pub fn bitmap(self) -> Bitmap {
        match self {
            PieceKind::I => Bitmap::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
            PieceKind::J => Bitmap::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
            PieceKind::L => Bitmap::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
            PieceKind::O => Bitmap::from_rows([[1, 1], [1, 1]]),
            PieceKind::S => Bitmap::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
            PieceKind::T => Bitmap::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
            PieceKind::Z => Bitmap::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        }
    }

    pub fn color(self) -> Color {
        match self {
            PieceKind::I => Color::rgb(0x00, 0xf0, 0xf0),
            PieceKind::J => Color::rgb(0x00, 0x00, 0xf0),
            PieceKind::L => Color::rgb(0xf0, 0xa0, 0x00),
            PieceKind::O => Color::rgb(0xf0, 0xf0, 0x00),
            PieceKind::S => Color::rgb(0x00, 0xf0, 0x00),
            PieceKind::T => Color::rgb(0xa0, 0x00, 0xf0),
            PieceKind::Z => Color::rgb(0xf0, 0x00, 0x00),
        }
    }
}
