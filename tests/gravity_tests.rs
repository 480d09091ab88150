//! Gravity, refill and potion collection

use rune_cascade::core::rng::seeded;
use rune_cascade::core::{apply_gravity, Board};
use rune_cascade::types::{Pos, TileStatus, BOARD_SIZE};

const FILLER: [&str; 8] = [
    "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
    "NWNWNWNW",
];

fn column_ids(board: &Board, col: usize, skip: &[usize]) -> Vec<u32> {
    (0..BOARD_SIZE)
        .filter(|row| !skip.contains(row))
        .map(|row| board.tile(Pos::new(row, col)).id.0)
        .collect()
}

#[test]
fn test_gravity_conserves_survivors_around_fixed_cells() {
    let mut rows = FILLER;
    rows[3] = "NW.WNWNW";
    rows[5] = "NWSWNWNW";
    let mut board = Board::from_pattern(&rows);

    let matched = [Pos::new(7, 2), Pos::new(4, 2), Pos::new(0, 2), Pos::new(6, 5)];
    for pos in matched {
        board.tile_mut(pos).status = TileStatus::Matched;
    }
    let hole_id = board.tile(Pos::new(3, 2)).id;
    let stone_id = board.tile(Pos::new(5, 2)).id;
    let survivors: Vec<u32> = [1, 2, 6]
        .into_iter()
        .map(|row| board.tile(Pos::new(row, 2)).id.0)
        .collect();

    let outcome = apply_gravity(&mut board, false, &mut seeded(4), |_| {});

    assert_eq!(board.tile(Pos::new(3, 2)).id, hole_id);
    assert_eq!(board.tile(Pos::new(5, 2)).id, stone_id);
    // Column 2 keeps its survivors in order at the bottom of the slots
    let after = column_ids(&board, 2, &[3, 5]);
    assert_eq!(&after[3..], survivors.as_slice());
    assert_eq!(outcome.spawned.len(), matched.len());
    assert!(outcome.collected.is_empty());
    assert!(board.tiles().iter().all(|t| !t.is_matched()));
    board.validate();
}

#[test]
fn test_potion_on_bottom_row_is_collected() {
    let mut rows = FILLER;
    rows[7] = "PWNWNWNW";
    let mut board = Board::from_pattern(&rows);
    let above = board.tile(Pos::new(6, 0)).id;

    let mut seen = Vec::new();
    let outcome = apply_gravity(&mut board, false, &mut seeded(1), |pos| seen.push(pos));

    assert_eq!(seen, vec![Pos::new(7, 0)]);
    assert_eq!(outcome.collected, seen);
    assert_eq!(board.potion_count(), 0);
    // The next tile from above takes the slot
    assert_eq!(board.tile(Pos::new(7, 0)).id, above);
    assert_eq!(outcome.spawned, vec![Pos::new(0, 0)]);
}

#[test]
fn test_potion_resting_on_hole_is_collected() {
    let mut rows = FILLER;
    rows[4] = "PNWNWNWN";
    rows[5] = ".WNWNWNW";
    let mut board = Board::from_pattern(&rows);

    let outcome = apply_gravity(&mut board, false, &mut seeded(1), |_| {});
    assert_eq!(outcome.collected, vec![Pos::new(4, 0)]);
    assert!(board.tile(Pos::new(5, 0)).is_empty);
    assert_eq!(board.potion_count(), 0);
    board.validate();
}

#[test]
fn test_potion_above_the_floor_stays() {
    let mut rows = FILLER;
    rows[2] = "PNWNWNWN";
    let mut board = Board::from_pattern(&rows);
    let outcome = apply_gravity(&mut board, false, &mut seeded(1), |_| {});
    assert!(outcome.collected.is_empty());
    assert!(board.tile(Pos::new(2, 0)).is_potion());
}

#[test]
fn test_refill_spawns_at_most_one_potion_per_column() {
    for seed in 0..32 {
        let mut board = Board::from_pattern(&FILLER);
        for tile in board.tiles_mut() {
            tile.status = TileStatus::Matched;
        }
        let outcome = apply_gravity(&mut board, true, &mut seeded(seed), |_| {});
        assert!(outcome.spawned_potions.len() <= BOARD_SIZE);
        let mut cols: Vec<usize> = outcome.spawned_potions.iter().map(|p| p.col).collect();
        cols.dedup();
        assert_eq!(cols.len(), outcome.spawned_potions.len(), "seed {seed}");
        // Fresh potions are not collected in the call that made them
        assert!(outcome.collected.is_empty());
        assert_eq!(board.potion_count(), outcome.spawned_potions.len());
    }
}
