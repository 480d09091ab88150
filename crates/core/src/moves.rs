//! Move feasibility
//!
//! Tries every right and down neighbour swap, exchanging kinds only on a
//! scratch copy, and asks the run scanner whether a match appears.

use crate::board::Board;
use crate::matcher::has_match;
use crate::types::{Pos, BOARD_SIZE};

/// A swap the player could make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
}

fn swappable(board: &Board, a: Pos, b: Pos) -> bool {
    !board.tile(a).blocks_swap() && !board.tile(b).blocks_swap()
}

fn creates_match(scratch: &mut Board, a: Pos, b: Pos) -> bool {
    let ka = scratch.tile(a).kind;
    let kb = scratch.tile(b).kind;
    scratch.tile_mut(a).kind = kb;
    scratch.tile_mut(b).kind = ka;
    let found = has_match(scratch);
    scratch.tile_mut(a).kind = ka;
    scratch.tile_mut(b).kind = kb;
    found
}

/// First legal matching swap in row-major order, trying right before down
pub fn find_move(board: &Board) -> Option<Move> {
    let mut scratch = board.clone();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let from = Pos::new(row, col);
            for to in [from.offset(0, 1), from.offset(1, 0)].into_iter().flatten() {
                if swappable(&scratch, from, to) && creates_match(&mut scratch, from, to) {
                    return Some(Move { from, to });
                }
            }
        }
    }
    None
}

pub fn has_possible_moves(board: &Board) -> bool {
    find_move(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Obstacle;

    #[test]
    fn test_finds_simple_move() {
        let board = Board::from_pattern(&[
            "FFWFNWNW", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
            "NWNWNWNW",
        ]);
        let before = board.clone();
        let mv = find_move(&board).unwrap();
        assert_eq!(mv, Move { from: Pos::new(0, 2), to: Pos::new(0, 3) });
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_moves_when_locked() {
        let board = Board::from_pattern(&[
            "FWNLVFWN", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS",
            "SSSSSSSS",
        ]);
        assert!(!has_possible_moves(&board));
    }

    #[test]
    fn test_chains_block_the_only_move() {
        let mut board = Board::from_pattern(&[
            "FFWFSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS", "SSSSSSSS",
            "SSSSSSSS",
        ]);
        assert!(has_possible_moves(&board));
        board.tile_mut(Pos::new(0, 3)).obstacle = Obstacle::Chains;
        assert!(!has_possible_moves(&board));
    }
}
