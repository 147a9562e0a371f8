use wallgo_protocol::{Axis, PlayerId, Snapshot, Square, WallSlot};

/// Activity of every wall slot on an N×N board.
///
/// Horizontal slots form an (N-1)×N grid, vertical slots an N×(N-1) grid;
/// both are stored as flat row-major bit vectors so the blocked query is a
/// couple of index computations. Slots only ever flip from open to active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallSet {
    size: u8,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

impl WallSet {
    pub fn new(size: u8) -> Self {
        let n = size as usize;
        Self {
            size,
            horizontal: vec![false; n.saturating_sub(1) * n],
            vertical: vec![false; n * n.saturating_sub(1)],
        }
    }

    fn index_of(&self, slot: WallSlot) -> Option<usize> {
        if !slot.in_bounds(self.size) {
            return None;
        }
        let n = self.size as usize;
        let (row, col) = (slot.row as usize, slot.col as usize);
        match slot.axis {
            Axis::Horizontal => Some(row * n + col),
            Axis::Vertical => Some(row * (n - 1) + col),
        }
    }

    pub fn is_active(&self, slot: WallSlot) -> bool {
        match slot.axis {
            Axis::Horizontal => self
                .index_of(slot)
                .is_some_and(|i| self.horizontal[i]),
            Axis::Vertical => self.index_of(slot).is_some_and(|i| self.vertical[i]),
        }
    }

    /// Activate a slot. Returns false if the slot is off the board.
    /// Activation is permanent; there is no way to clear a slot.
    pub fn activate(&mut self, slot: WallSlot) -> bool {
        let Some(index) = self.index_of(slot) else {
            return false;
        };
        match slot.axis {
            Axis::Horizontal => self.horizontal[index] = true,
            Axis::Vertical => self.vertical[index] = true,
        }
        true
    }

    /// Is movement between two adjacent squares blocked by an active wall?
    /// Non-adjacent pairs are reported as blocked.
    pub fn is_blocked(&self, a: Square, b: Square) -> bool {
        match WallSlot::between(a, b) {
            Some(slot) => self.is_active(slot),
            None => true,
        }
    }

    /// All active slots in canonical (axis, row, col) order.
    pub fn active_slots(&self) -> Vec<WallSlot> {
        let n = self.size as i8;
        let mut out = Vec::new();
        for row in 0..n.saturating_sub(1) {
            for col in 0..n {
                let slot = WallSlot::horizontal(row, col);
                if self.is_active(slot) {
                    out.push(slot);
                }
            }
        }
        for row in 0..n {
            for col in 0..n.saturating_sub(1) {
                let slot = WallSlot::vertical(row, col);
                if self.is_active(slot) {
                    out.push(slot);
                }
            }
        }
        out
    }

    pub fn active_count(&self) -> usize {
        self.horizontal.iter().filter(|&&w| w).count()
            + self.vertical.iter().filter(|&&w| w).count()
    }
}

/// The playable grid: square occupancy plus the wall set between squares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: u8,
    squares: Vec<Option<PlayerId>>,
    walls: WallSet,
}

impl Board {
    pub fn new(size: u8) -> Self {
        let n = size as usize;
        Self {
            size,
            squares: vec![None; n * n],
            walls: WallSet::new(size),
        }
    }

    /// Rebuild occupancy and the blocking graph from a wire snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut board = Board::new(snapshot.size);
        let n = board.len().min(snapshot.board.len());
        board.squares[..n].copy_from_slice(&snapshot.board[..n]);
        for &slot in &snapshot.walls {
            board.walls.activate(slot);
        }
        board
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn index_of(&self, square: Square) -> Option<usize> {
        if !square.in_bounds(self.size) {
            return None;
        }
        Some(square.row as usize * self.size as usize + square.col as usize)
    }

    pub fn square_at(&self, index: usize) -> Option<Square> {
        if index >= self.squares.len() {
            return None;
        }
        let n = self.size as usize;
        Some(Square::new((index / n) as i8, (index % n) as i8))
    }

    pub fn occupant(&self, square: Square) -> Option<PlayerId> {
        self.index_of(square).and_then(|i| self.squares[i])
    }

    pub fn occupancy(&self) -> &[Option<PlayerId>] {
        &self.squares
    }

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn place(&mut self, square: Square, player: PlayerId) {
        if let Some(index) = self.index_of(square) {
            self.squares[index] = Some(player);
        }
    }

    pub fn relocate(&mut self, from: Square, to: Square) {
        let (Some(from_index), Some(to_index)) = (self.index_of(from), self.index_of(to)) else {
            return;
        };
        self.squares[to_index] = self.squares[from_index].take();
    }

    pub fn activate_wall(&mut self, slot: WallSlot) -> bool {
        self.walls.activate(slot)
    }

    /// In-grid cardinal neighbors of `square` reachable without crossing an
    /// active wall.
    pub fn open_neighbors(&self, square: Square) -> impl Iterator<Item = Square> + '_ {
        square
            .neighbors()
            .filter(move |n| n.in_bounds(self.size) && !self.walls.is_blocked(square, *n))
    }

    /// Positions of all pieces owned by `player`, in row-major order.
    pub fn pieces_of(&self, player: PlayerId) -> Vec<Square> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, occ)| **occ == Some(player))
            .filter_map(|(i, _)| self.square_at(i))
            .collect()
    }
}
