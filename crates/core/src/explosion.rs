//! Explosion propagation
//!
//! Starting from a seed set, every destroyed tile scores `TILE_SCORE`; a
//! destroyed power-up adds `POWER_UP_BONUS` and pulls its blast area into the
//! walk, which may detonate further power-ups. Potions, stones, holes and
//! already-matched tiles are never reached.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::board::Board;
use crate::rng::random_color;
use crate::tile::Tile;
use crate::traverse::breadth_first;
use crate::types::{Pos, PowerUp, BOARD_SIZE, CELL_COUNT, NOVA_RADIUS, POWER_UP_BONUS, TILE_SCORE};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Explosion {
    /// Destroy set in propagation order
    pub tiles: Vec<Tile>,
    pub score: u32,
    /// Power-ups that went off, in the order they fired
    pub detonated: Vec<(Pos, PowerUp)>,
}

/// Cells covered by the power-up carried by `tile`, before target filtering.
///
/// A color bomb on a tile with no color of its own (a consumed wild) picks a
/// random color.
pub fn blast_area<R: Rng + ?Sized>(
    board: &Board,
    tile: &Tile,
    rng: &mut R,
) -> ArrayVec<Pos, CELL_COUNT> {
    let mut area = ArrayVec::new();
    match tile.power_up {
        PowerUp::None => {}
        PowerUp::Horizontal => area.extend((0..BOARD_SIZE).map(|col| Pos::new(tile.row, col))),
        PowerUp::Vertical => area.extend((0..BOARD_SIZE).map(|row| Pos::new(row, tile.col))),
        PowerUp::ColorBomb => {
            let color = if tile.kind.is_color() {
                tile.kind
            } else {
                random_color(rng)
            };
            area.extend(
                board
                    .tiles()
                    .iter()
                    .filter(|t| t.kind == color)
                    .map(Tile::pos),
            );
        }
        PowerUp::Nova => {
            let r = NOVA_RADIUS as isize;
            for dr in -r..=r {
                for dc in -r..=r {
                    if let Some(pos) = tile.pos().offset(dr, dc) {
                        area.push(pos);
                    }
                }
            }
        }
    }
    area
}

/// Expand `seeds` into the full destroy set and its score
pub fn propagate<R: Rng + ?Sized>(board: &Board, seeds: &[Pos], rng: &mut R) -> Explosion {
    let mut score = 0;
    let mut detonated = Vec::new();

    let order = breadth_first(seeds.iter().copied(), |pos| {
        let tile = board.tile(pos);
        score += TILE_SCORE;
        if !tile.power_up.is_some() {
            return ArrayVec::<Pos, CELL_COUNT>::new();
        }
        score += POWER_UP_BONUS;
        detonated.push((pos, tile.power_up));
        let mut area = blast_area(board, tile, rng);
        area.retain(|p| board.tile(*p).is_blast_target());
        area
    });

    Explosion {
        tiles: order.into_iter().map(|pos| *board.tile(pos)).collect(),
        score,
        detonated,
    }
}
