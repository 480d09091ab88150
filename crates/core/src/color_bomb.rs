//! Player-triggered color bomb
//!
//! Swapping a color bomb into a rune consumes the bomb and every free tile
//! of the target kind. Unlike an in-cascade detonation there is no chain
//! reaction: power-ups caught by it are removed without firing.

use crate::board::Board;
use crate::types::{Obstacle, Pos, RuneType, TileStatus, MANUAL_BOMB_BONUS, TILE_SCORE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BombOutcome {
    pub score: u32,
    /// Target tiles cleared, the bomb itself not included
    pub count: u32,
    pub cleared: Vec<Pos>,
}

/// Mark the bomb at `bomb` and every matching tile as consumed.
///
/// Tiles under any obstacle, holes and potions are left alone.
pub fn trigger_color_bomb(board: &mut Board, bomb: Pos, target: RuneType) -> BombOutcome {
    let mut outcome = BombOutcome::default();

    let tile = board.tile_mut(bomb);
    if !tile.is_matched() {
        tile.status = TileStatus::Matched;
        tile.kind = RuneType::Wild;
        outcome.score += MANUAL_BOMB_BONUS;
    }

    if !target.is_color() {
        return outcome;
    }
    for tile in board.tiles_mut() {
        if !tile.is_empty
            && tile.obstacle == Obstacle::None
            && tile.kind == target
            && !tile.is_matched()
        {
            tile.status = TileStatus::Matched;
            tile.kind = RuneType::Wild;
            outcome.score += TILE_SCORE;
            outcome.count += 1;
            outcome.cleared.push(tile.pos());
        }
    }
    outcome
}
