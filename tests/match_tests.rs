//! Match detection and power-up classification

use rune_cascade::core::matcher::{find_matches, has_match, PowerUpBirth};
use rune_cascade::core::rng::seeded;
use rune_cascade::core::{handle_matches, Board};
use rune_cascade::types::{Pos, PowerUp, RuneType, TileStatus, POWER_UP_BONUS, TILE_SCORE};

const FILLER: [&str; 8] = [
    "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
    "NWNWNWNW",
];

fn board_with(edits: &[(usize, &'static str)]) -> Board {
    let mut rows = FILLER;
    for &(row, text) in edits {
        rows[row] = text;
    }
    Board::from_pattern(&rows)
}

#[test]
fn test_settled_board_has_no_matches() {
    let board = Board::from_pattern(&FILLER);
    let outcome = find_matches(&board, &mut seeded(1));
    assert!(outcome.is_empty());
    assert!(outcome.new_power_ups.is_empty());
    assert_eq!(outcome.score, 0);
    assert!(!has_match(&board));
}

#[test]
fn test_five_fire_in_row_three() {
    let board = board_with(&[(3, "NWFFFFFW")]);
    let outcome = find_matches(&board, &mut seeded(1));

    let mut cols: Vec<usize> = outcome.matches.iter().map(|t| t.col).collect();
    cols.sort_unstable();
    assert_eq!(cols, vec![2, 3, 4, 5, 6]);
    assert!(outcome.matches.iter().all(|t| t.row == 3 && t.kind == RuneType::Fire));

    assert_eq!(outcome.new_power_ups.len(), 1);
    let birth = outcome.new_power_ups[0];
    assert_eq!(birth.kind, PowerUp::ColorBomb);
    assert_eq!(birth.pos.row, 3);
    assert!((3..=5).contains(&birth.pos.col), "anchor at {:?}", birth.pos);
    // First interior tile wins the tie
    assert_eq!(birth.pos, Pos::new(3, 3));

    assert_eq!(outcome.score, 5 * TILE_SCORE + POWER_UP_BONUS);
}

#[test]
fn test_horizontal_four_spawns_vertical() {
    let board = board_with(&[(5, "FFFFNWNW")]);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.matches.len(), 4);
    assert_eq!(
        outcome.new_power_ups,
        vec![PowerUpBirth { pos: Pos::new(5, 1), kind: PowerUp::Vertical }]
    );
}

#[test]
fn test_vertical_four_spawns_horizontal() {
    let mut rows = FILLER;
    rows[1] = "NLNWNWNW";
    rows[2] = "WLWNWNWN";
    rows[3] = "NLNWNWNW";
    rows[4] = "WLWNWNWN";
    let board = Board::from_pattern(&rows);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.matches.len(), 4);
    assert_eq!(outcome.new_power_ups.len(), 1);
    assert_eq!(outcome.new_power_ups[0].kind, PowerUp::Horizontal);
    assert_eq!(outcome.new_power_ups[0].pos, Pos::new(2, 1));
}

#[test]
fn test_t_shape_of_five_spawns_nova_at_junction() {
    // LLL across row 2, plus two more L below the middle
    let mut rows = FILLER;
    rows[2] = "WLLLWNWN";
    rows[3] = "NWLWNWNW";
    rows[4] = "WNLNWNWN";
    let board = Board::from_pattern(&rows);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.matches.len(), 5);
    assert_eq!(
        outcome.new_power_ups,
        vec![PowerUpBirth { pos: Pos::new(2, 2), kind: PowerUp::Nova }]
    );
}

#[test]
fn test_six_in_a_row_spawns_nova() {
    let board = board_with(&[(0, "VVVVVVWN")]);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.matches.len(), 6);
    assert_eq!(outcome.new_power_ups.len(), 1);
    assert_eq!(outcome.new_power_ups[0].kind, PowerUp::Nova);
}

#[test]
fn test_three_run_spawns_nothing() {
    let board = board_with(&[(7, "NWNFFFNW")]);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.matches.len(), 3);
    assert!(outcome.new_power_ups.is_empty());
    assert_eq!(outcome.score, 3 * TILE_SCORE);
}

#[test]
fn test_separate_runs_make_separate_clusters() {
    let board = board_with(&[(0, "FFFNWNWN"), (7, "NWNWLLLL")]);
    let outcome = find_matches(&board, &mut seeded(1));
    assert_eq!(outcome.clusters.len(), 2);
    assert_eq!(outcome.matches.len(), 7);
    assert_eq!(outcome.new_power_ups.len(), 1);
    assert_eq!(outcome.new_power_ups[0].kind, PowerUp::Vertical);
}

#[test]
fn test_potions_and_stones_break_runs() {
    let board = board_with(&[(2, "FFPFFSFF")]);
    assert!(!has_match(&board));
    assert!(find_matches(&board, &mut seeded(1)).is_empty());
}

#[test]
fn test_handle_matches_keeps_anchor_and_marks_the_rest() {
    let mut board = board_with(&[(3, "NWFFFFFW")]);
    let anchor_id = board.tile(Pos::new(3, 3)).id;
    let mut rng = seeded(1);
    let outcome = find_matches(&board, &mut rng);
    handle_matches(&mut board, &outcome.matches, &outcome.new_power_ups, &mut rng);

    let anchor = board.tile(Pos::new(3, 3));
    assert_eq!(anchor.id, anchor_id);
    assert_eq!(anchor.power_up, PowerUp::ColorBomb);
    assert_eq!(anchor.kind, RuneType::Fire);
    assert!(!anchor.is_matched());

    for col in [2, 4, 5, 6] {
        let tile = board.tile(Pos::new(3, col));
        assert_eq!(tile.status, TileStatus::Matched);
        assert_eq!(tile.kind, RuneType::Wild);
    }
}

#[test]
fn test_matched_power_up_detonates() {
    let mut board = board_with(&[(4, "FFFNWNWN")]);
    board.tile_mut(Pos::new(4, 1)).power_up = PowerUp::Vertical;
    let outcome = find_matches(&board, &mut seeded(1));

    // Three in the row plus the rest of column 1
    assert_eq!(outcome.matches.len(), 3 + 7);
    assert_eq!(outcome.detonated, vec![(Pos::new(4, 1), PowerUp::Vertical)]);
    assert_eq!(outcome.score, 10 * TILE_SCORE + POWER_UP_BONUS);
}
