//! Board reshuffle
//!
//! Only free runes move: tiles with any obstacle, holes, potions and
//! matched tiles keep their cells. The kinds and power-ups of the movable
//! tiles are permuted across the same set of cells, and every reassigned
//! tile gets a fresh id.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::tile::Tile;
use crate::types::{Obstacle, Pos, PowerUp, RuneType};

/// Tiles that take part in a shuffle
pub fn is_movable(tile: &Tile) -> bool {
    !tile.is_empty && tile.obstacle == Obstacle::None && !tile.is_matched() && !tile.is_potion()
}

pub fn shuffle_board<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let slots: Vec<Pos> = board.positions(is_movable);
    let mut payload: Vec<(RuneType, PowerUp)> = slots
        .iter()
        .map(|pos| {
            let tile = board.tile(*pos);
            (tile.kind, tile.power_up)
        })
        .collect();
    payload.shuffle(rng);

    for (pos, (kind, power_up)) in slots.into_iter().zip(payload) {
        board.spawn(pos, Tile::rune(kind).with_power_up(power_up));
    }
}
