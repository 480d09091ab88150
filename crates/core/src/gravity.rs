//! Gravity and refill
//!
//! Each column is handled on its own. Holes and stones never move. The
//! surviving tiles of the column keep their top-to-bottom order and fill the
//! free cells from the bottom up; whatever remains at the top is refilled
//! with fresh random runes.
//!
//! # Potion collection
//!
//! A potion that lands on a segment floor (the last row, or a cell sitting
//! directly on a hole or a stone) is collected instead of placed: it leaves
//! the board, the callback fires with the landing cell, and the next tile
//! from above takes the slot. Potions created by this refill are never
//! collected in the same call.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::board::Board;
use crate::rng::{random_color, roll_potion};
use crate::tile::Tile;
use crate::types::{Pos, RuneType, TileStatus, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Structure {
    Empty,
    Stone,
    Slot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GravityOutcome {
    /// Landing cells of collected potions, column by column
    pub collected: Vec<Pos>,
    /// Cells that received a freshly generated tile
    pub spawned: Vec<Pos>,
    /// Fresh potions created by the refill
    pub spawned_potions: Vec<Pos>,
}

impl GravityOutcome {
    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }
}

/// Settle the board: sweep matched tiles, compact, collect and refill.
///
/// `spawn_potion` allows at most one new potion per column, each eligible
/// refill cell rolling `POTION_SPAWN_PERCENT`.
pub fn apply_gravity<R, F>(
    board: &mut Board,
    spawn_potion: bool,
    rng: &mut R,
    mut on_collect: F,
) -> GravityOutcome
where
    R: Rng + ?Sized,
    F: FnMut(Pos),
{
    let mut outcome = GravityOutcome::default();

    for col in 0..BOARD_SIZE {
        let mut structure = [Structure::Slot; BOARD_SIZE];
        let mut survivors: ArrayVec<Tile, BOARD_SIZE> = ArrayVec::new();
        for (row, cell) in structure.iter_mut().enumerate() {
            let tile = board.tile(Pos::new(row, col));
            *cell = if tile.is_empty {
                Structure::Empty
            } else if tile.is_stone() {
                Structure::Stone
            } else {
                Structure::Slot
            };
            if *cell == Structure::Slot && !tile.is_matched() {
                survivors.push(*tile);
            }
        }

        let mut potion_spawned = false;
        for row in (0..BOARD_SIZE).rev() {
            if structure[row] != Structure::Slot {
                continue;
            }
            let pos = Pos::new(row, col);
            let is_floor = row == BOARD_SIZE - 1 || structure[row + 1] != Structure::Slot;

            let mut placed = None;
            while let Some(tile) = survivors.pop() {
                if tile.is_potion() && is_floor {
                    outcome.collected.push(pos);
                    on_collect(pos);
                    continue;
                }
                placed = Some(tile);
                break;
            }

            match placed {
                Some(mut tile) => {
                    tile.status = TileStatus::Dropping;
                    board.put(pos, tile);
                }
                None => {
                    let mut kind = random_color(rng);
                    if spawn_potion && !potion_spawned && roll_potion(rng) {
                        kind = RuneType::Potion;
                        potion_spawned = true;
                        outcome.spawned_potions.push(pos);
                    }
                    board.spawn(pos, Tile::rune(kind));
                    outcome.spawned.push(pos);
                }
            }
        }
    }
    outcome
}
