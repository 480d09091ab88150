//! Board and layout tests

use rune_cascade::core::layout::Cell;
use rune_cascade::core::rng::seeded;
use rune_cascade::core::{create_board, Board, Layout, LayoutError};
use rune_cascade::types::{Obstacle, Pos, RuneType, TileStatus, BOARD_SIZE, STONE_HEALTH};

const GARDEN: [&str; 8] = [
    "########", "#.####.#", "##S##S##", "########", "#II##CC#", "########", "###PP###",
    "########",
];

#[test]
fn test_create_board_follows_layout() {
    let layout = Layout::parse(&GARDEN).unwrap();
    let board = create_board(&layout, &mut seeded(42));
    board.validate();

    let hole = board.tile(Pos::new(1, 1));
    assert!(hole.is_empty);

    let stone = board.tile(Pos::new(2, 2));
    assert_eq!(stone.obstacle, Obstacle::Stone);
    assert_eq!(stone.obstacle_health, STONE_HEALTH);

    let ice = board.tile(Pos::new(4, 1));
    assert_eq!(ice.obstacle, Obstacle::Ice);
    assert!(ice.kind.is_color());

    let chained = board.tile(Pos::new(4, 5));
    assert_eq!(chained.obstacle, Obstacle::Chains);
    assert!(chained.kind.is_color());

    assert_eq!(board.potion_count(), 2);
    assert_eq!(board.tile(Pos::new(6, 3)).kind, RuneType::Potion);

    for tile in board.tiles() {
        assert_eq!(tile.status, TileStatus::Normal);
        if layout.cell(tile.pos()) == Cell::Rune {
            assert!(tile.kind.is_color(), "rune cell {:?} got {:?}", tile.pos(), tile.kind);
        }
    }
}

#[test]
fn test_layout_round_trips_through_board() {
    let layout = Layout::parse(&GARDEN).unwrap();
    for seed in 0..8 {
        let board = create_board(&layout, &mut seeded(seed));
        assert_eq!(board.layout(), layout);
    }
    assert_eq!(layout.rows(), GARDEN.map(String::from).to_vec());
}

#[test]
fn test_same_seed_same_board() {
    let layout = Layout::parse(&GARDEN).unwrap();
    let a = create_board(&layout, &mut seeded(9));
    let b = create_board(&layout, &mut seeded(9));
    let c = create_board(&layout, &mut seeded(10));
    assert_eq!(a, b);
    assert_ne!(a.to_pattern(), c.to_pattern());
}

#[test]
fn test_layout_rejects_malformed_descriptors() {
    let mut rows = GARDEN.to_vec();
    rows.pop();
    assert_eq!(Layout::parse(&rows), Err(LayoutError::RowCount(7)));

    let mut rows = GARDEN.to_vec();
    rows[3] = "#######";
    assert_eq!(
        Layout::parse(&rows),
        Err(LayoutError::RowWidth { row: 3, len: 7 })
    );

    let mut rows = GARDEN.to_vec();
    rows[5] = "###x####";
    let err = Layout::parse(&rows).unwrap_err();
    assert_eq!(err, LayoutError::UnknownCell { row: 5, col: 3, ch: 'x' });
    assert_eq!(err.code(), "layout_cell");
}

#[test]
fn test_swap_moves_tiles_with_their_ids() {
    let mut board = Board::from_pattern(&[
        "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN",
        "WNLVFWNL",
    ]);
    let a = *board.tile(Pos::new(0, 0));
    let b = *board.tile(Pos::new(0, 1));
    board.swap(a.pos(), b.pos());

    assert_eq!(board.tile(Pos::new(0, 0)).id, b.id);
    assert_eq!(board.tile(Pos::new(0, 1)).id, a.id);
    assert_eq!(board.tile(Pos::new(0, 1)).kind, RuneType::Fire);
    board.validate();
}

#[test]
fn test_get_is_bounds_checked() {
    let board = Board::from_pattern(&[
        "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN",
        "WNLVFWNL",
    ]);
    assert!(board.get(Pos::new(BOARD_SIZE - 1, BOARD_SIZE - 1)).is_some());
    assert!(board.get(Pos::new(BOARD_SIZE, 0)).is_none());
    assert!(board.get(Pos::new(0, BOARD_SIZE)).is_none());
}

#[test]
#[should_panic]
fn test_tile_off_board_panics() {
    let board = Board::from_pattern(&[
        "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN", "WNLVFWNL", "FWNLVFWN",
        "WNLVFWNL",
    ]);
    let _ = board.tile(Pos::new(8, 0));
}
