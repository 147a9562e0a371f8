use serde::{Deserialize, Serialize};

/// A playable square on the N×N board, addressed by (row, col).
///
/// Coordinates are stored signed so that off-board neighbors can be produced
/// and then discarded by a bounds check; there is no wraparound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    /// Cardinal directions: up, down, left, right.
    pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn step(self, (dr, dc): (i8, i8)) -> Square {
        Square {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// The four cardinal neighbors, including any that fall off the board.
    pub fn neighbors(self) -> impl Iterator<Item = Square> {
        Self::DIRECTIONS.into_iter().map(move |d| self.step(d))
    }

    #[inline]
    pub fn in_bounds(self, size: u8) -> bool {
        let n = size as i8;
        self.row >= 0 && self.row < n && self.col >= 0 && self.col < n
    }

    /// True when `other` is exactly one cardinal step away.
    #[inline]
    pub fn is_adjacent(self, other: Square) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        dr + dc == 1
    }
}

/// Orientation of a wall slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Runs left-right; separates `(row, col)` from `(row + 1, col)`.
    Horizontal,
    /// Runs up-down; separates `(row, col)` from `(row, col + 1)`.
    Vertical,
}

/// Typed key for the wall slot between two cardinally adjacent squares.
///
/// The (axis, row, col) triple is canonical: `row`/`col` always name the
/// upper/left square of the separated pair, so the slot between any two
/// adjacent squares has exactly one representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallSlot {
    pub axis: Axis,
    pub row: i8,
    pub col: i8,
}

impl WallSlot {
    #[inline]
    pub const fn horizontal(row: i8, col: i8) -> Self {
        Self {
            axis: Axis::Horizontal,
            row,
            col,
        }
    }

    #[inline]
    pub const fn vertical(row: i8, col: i8) -> Self {
        Self {
            axis: Axis::Vertical,
            row,
            col,
        }
    }

    /// The canonical slot separating `a` and `b`, or `None` when the squares
    /// are not cardinally adjacent.
    pub fn between(a: Square, b: Square) -> Option<WallSlot> {
        let (first, second) = if (a.row, a.col) <= (b.row, b.col) {
            (a, b)
        } else {
            (b, a)
        };

        if second.row == first.row + 1 && second.col == first.col {
            Some(WallSlot::horizontal(first.row, first.col))
        } else if second.col == first.col + 1 && second.row == first.row {
            Some(WallSlot::vertical(first.row, first.col))
        } else {
            None
        }
    }

    /// The two squares this slot separates.
    pub fn endpoints(self) -> (Square, Square) {
        let a = Square::new(self.row, self.col);
        let b = match self.axis {
            Axis::Horizontal => Square::new(self.row + 1, self.col),
            Axis::Vertical => Square::new(self.row, self.col + 1),
        };
        (a, b)
    }

    /// True when the slot shares an endpoint with `square`.
    pub fn touches(self, square: Square) -> bool {
        let (a, b) = self.endpoints();
        a == square || b == square
    }

    /// A slot is on the board when both of its endpoints are.
    pub fn in_bounds(self, size: u8) -> bool {
        let (a, b) = self.endpoints();
        a.in_bounds(size) && b.in_bounds(size)
    }
}
