//! Swap validation and the plain/color-bomb decision

use thiserror::Error;

use crate::core::Board;
use crate::types::{Obstacle, Pos, PowerUp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("position is off the board")]
    OutOfBounds,
    #[error("tiles are not adjacent")]
    NotAdjacent,
    #[error("cannot swap with an empty cell")]
    EmptyCell,
    #[error("stones cannot be swapped")]
    Stone,
    #[error("chained runes cannot be swapped")]
    Chained,
    #[error("swap does not create a match")]
    NoMatch,
    #[error("level is not playable")]
    NotPlayable,
}

impl SwapError {
    pub fn code(self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "out_of_bounds",
            SwapError::NotAdjacent => "not_adjacent",
            SwapError::EmptyCell => "empty_cell",
            SwapError::Stone => "stone",
            SwapError::Chained => "chained",
            SwapError::NoMatch => "no_match",
            SwapError::NotPlayable => "not_playable",
        }
    }
}

/// How an accepted swap resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPlan {
    /// Exchange the tiles and keep the move only if a match appears
    Plain,
    /// A color bomb swapped into a colored rune; positions before the swap
    ColorBomb { bomb: Pos, target: Pos },
}

/// Structural checks, in order: bounds, adjacency, holes, stones, chains
pub fn validate_swap(board: &Board, a: Pos, b: Pos) -> Result<(), SwapError> {
    let (Some(ta), Some(tb)) = (board.get(a), board.get(b)) else {
        return Err(SwapError::OutOfBounds);
    };
    if !a.is_adjacent(b) {
        return Err(SwapError::NotAdjacent);
    }
    if ta.is_empty || tb.is_empty {
        return Err(SwapError::EmptyCell);
    }
    if ta.is_stone() || tb.is_stone() {
        return Err(SwapError::Stone);
    }
    if ta.obstacle == Obstacle::Chains || tb.obstacle == Obstacle::Chains {
        return Err(SwapError::Chained);
    }
    Ok(())
}

/// Validate and decide between the plain and the color bomb path.
///
/// When both tiles are bombs the first one fires at the second's color.
pub fn plan_swap(board: &Board, a: Pos, b: Pos) -> Result<SwapPlan, SwapError> {
    validate_swap(board, a, b)?;

    let (bomb, target) = if board.tile(a).power_up == PowerUp::ColorBomb {
        (a, b)
    } else if board.tile(b).power_up == PowerUp::ColorBomb {
        (b, a)
    } else {
        return Ok(SwapPlan::Plain);
    };

    if board.tile(target).kind.is_color() {
        Ok(SwapPlan::ColorBomb { bomb, target })
    } else {
        Ok(SwapPlan::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::from_pattern(&[
            "FWNLVFWN", "P.SFWNLV", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN",
            "WNLVFWNL",
        ])
    }

    #[test]
    fn test_rejection_order() {
        let board = board();
        assert_eq!(
            validate_swap(&board, Pos::new(0, 7), Pos::new(0, 8)),
            Err(SwapError::OutOfBounds)
        );
        assert_eq!(
            validate_swap(&board, Pos::new(0, 0), Pos::new(1, 1)),
            Err(SwapError::NotAdjacent)
        );
        assert_eq!(
            validate_swap(&board, Pos::new(0, 1), Pos::new(1, 1)),
            Err(SwapError::EmptyCell)
        );
        assert_eq!(
            validate_swap(&board, Pos::new(0, 2), Pos::new(1, 2)),
            Err(SwapError::Stone)
        );
        assert_eq!(validate_swap(&board, Pos::new(0, 0), Pos::new(1, 0)), Ok(()));
    }

    #[test]
    fn test_chains_rejected_ice_allowed() {
        let mut board = board();
        board.tile_mut(Pos::new(3, 3)).obstacle = Obstacle::Ice;
        assert_eq!(validate_swap(&board, Pos::new(3, 3), Pos::new(3, 4)), Ok(()));
        board.tile_mut(Pos::new(3, 4)).obstacle = Obstacle::Chains;
        let err = validate_swap(&board, Pos::new(3, 3), Pos::new(3, 4)).unwrap_err();
        assert_eq!(err, SwapError::Chained);
        assert_eq!(err.code(), "chained");
    }

    #[test]
    fn test_plan_detects_bomb_either_side() {
        let mut board = board();
        board.tile_mut(Pos::new(4, 4)).power_up = PowerUp::ColorBomb;
        assert_eq!(
            plan_swap(&board, Pos::new(4, 4), Pos::new(4, 5)),
            Ok(SwapPlan::ColorBomb { bomb: Pos::new(4, 4), target: Pos::new(4, 5) })
        );
        assert_eq!(
            plan_swap(&board, Pos::new(4, 3), Pos::new(4, 4)),
            Ok(SwapPlan::ColorBomb { bomb: Pos::new(4, 4), target: Pos::new(4, 3) })
        );
        // A bomb next to a potion takes the plain path
        board.tile_mut(Pos::new(0, 0)).power_up = PowerUp::ColorBomb;
        assert_eq!(plan_swap(&board, Pos::new(0, 0), Pos::new(1, 0)), Ok(SwapPlan::Plain));
    }
}
