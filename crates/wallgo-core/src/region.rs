use std::collections::VecDeque;

use wallgo_protocol::{Outcome, PlayerId, Square};

use crate::board::Board;

/// One wall-bounded connected component of the board.
#[derive(Clone, Debug)]
pub struct Component {
    pub squares: Vec<Square>,
    /// Piece counts per player index inside this component.
    pub pieces: [u8; 2],
}

impl Component {
    pub fn area(&self) -> usize {
        self.squares.len()
    }

    /// The player holding a strict piece majority here, if any.
    pub fn majority_holder(&self) -> Option<PlayerId> {
        if self.pieces[0] > self.pieces[1] {
            Some(PlayerId(0))
        } else if self.pieces[1] > self.pieces[0] {
            Some(PlayerId(1))
        } else {
            None
        }
    }

    pub fn contains_pieces(&self) -> bool {
        self.pieces[0] > 0 || self.pieces[1] > 0
    }
}

/// The wall-induced partition of the board into connected components.
///
/// Computed by breadth-first flood fill over open edges; occupied squares are
/// traversable like any other, a piece never blocks movement by itself.
#[derive(Clone, Debug)]
pub struct Partition {
    components: Vec<Component>,
}

impl Partition {
    pub fn compute(board: &Board) -> Self {
        let mut visited = vec![false; board.len()];
        let mut components = Vec::new();

        for start_index in 0..board.len() {
            if visited[start_index] {
                continue;
            }
            let Some(start) = board.square_at(start_index) else {
                continue;
            };

            let mut squares = Vec::new();
            let mut pieces = [0_u8; 2];
            let mut queue = VecDeque::new();
            visited[start_index] = true;
            queue.push_back(start);

            while let Some(square) = queue.pop_front() {
                squares.push(square);
                if let Some(owner) = board.occupant(square) {
                    pieces[owner.index()] += 1;
                }
                for neighbor in board.open_neighbors(square) {
                    if let Some(index) = board.index_of(neighbor) {
                        if !visited[index] {
                            visited[index] = true;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }

            components.push(Component { squares, pieces });
        }

        Self { components }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Total area of components where `player` holds a strict piece majority.
    /// Split components count for nobody.
    pub fn controlled_area(&self, player: PlayerId) -> usize {
        self.components
            .iter()
            .filter(|c| c.majority_holder() == Some(player))
            .map(Component::area)
            .sum()
    }

    /// Total area of components that contain at least one piece of either
    /// player. While this covers the whole board the partition is still
    /// contested.
    pub fn piece_reachable_area(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.contains_pieces())
            .map(Component::area)
            .sum()
    }

    /// Score the partition: larger controlled area wins, equal areas draw.
    pub fn outcome(&self) -> Outcome {
        let a = self.controlled_area(PlayerId(0));
        let b = self.controlled_area(PlayerId(1));
        if a > b {
            Outcome::Winner { player: PlayerId(0) }
        } else if b > a {
            Outcome::Winner { player: PlayerId(1) }
        } else {
            Outcome::Draw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallgo_protocol::WallSlot;

    #[test]
    fn open_board_is_one_component() {
        let mut board = Board::new(3);
        board.place(Square::new(0, 0), PlayerId(0));
        board.place(Square::new(2, 2), PlayerId(1));

        let partition = Partition::compute(&board);
        assert_eq!(partition.components().len(), 1);
        assert_eq!(partition.components()[0].area(), 9);
        assert_eq!(partition.piece_reachable_area(), 9);
        // Split component, nobody controls it.
        assert_eq!(partition.controlled_area(PlayerId(0)), 0);
        assert_eq!(partition.controlled_area(PlayerId(1)), 0);
        assert_eq!(partition.outcome(), Outcome::Draw);
    }

    #[test]
    fn sealed_center_forms_its_own_component() {
        let mut board = Board::new(3);
        board.place(Square::new(1, 1), PlayerId(0));
        board.place(Square::new(0, 0), PlayerId(0));
        board.place(Square::new(2, 2), PlayerId(1));
        board.place(Square::new(2, 0), PlayerId(1));

        // Box in the center square on all four sides.
        board.activate_wall(WallSlot::horizontal(0, 1));
        board.activate_wall(WallSlot::horizontal(1, 1));
        board.activate_wall(WallSlot::vertical(1, 0));
        board.activate_wall(WallSlot::vertical(1, 1));

        let partition = Partition::compute(&board);
        assert_eq!(partition.components().len(), 2);

        // Center cell: 1 area to player one. Ring: 1 vs 2, player two's.
        assert_eq!(partition.controlled_area(PlayerId(0)), 1);
        assert_eq!(partition.controlled_area(PlayerId(1)), 8);
        assert_eq!(
            partition.outcome(),
            Outcome::Winner { player: PlayerId(1) }
        );
    }

    #[test]
    fn empty_component_does_not_count_as_reachable() {
        let mut board = Board::new(3);
        board.place(Square::new(0, 0), PlayerId(0));
        board.place(Square::new(0, 1), PlayerId(1));

        // Wall off the bottom row entirely.
        board.activate_wall(WallSlot::horizontal(1, 0));
        board.activate_wall(WallSlot::horizontal(1, 1));
        board.activate_wall(WallSlot::horizontal(1, 2));

        let partition = Partition::compute(&board);
        assert_eq!(partition.components().len(), 2);
        assert_eq!(partition.piece_reachable_area(), 6);
    }

    #[test]
    fn uneven_split_scores_by_area() {
        let mut board = Board::new(3);
        board.place(Square::new(0, 0), PlayerId(0));
        board.place(Square::new(2, 0), PlayerId(1));

        // Seal row 0 off from the rest: 3 squares vs 6.
        board.activate_wall(WallSlot::horizontal(0, 0));
        board.activate_wall(WallSlot::horizontal(0, 1));
        board.activate_wall(WallSlot::horizontal(0, 2));

        let partition = Partition::compute(&board);
        assert_eq!(partition.components().len(), 2);
        assert_eq!(partition.controlled_area(PlayerId(0)), 3);
        assert_eq!(partition.controlled_area(PlayerId(1)), 6);
        assert_eq!(
            partition.outcome(),
            Outcome::Winner { player: PlayerId(1) }
        );
    }
}
