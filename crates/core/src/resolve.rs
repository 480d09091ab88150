//! Applying a match outcome to the board

use rand::Rng;

use crate::board::Board;
use crate::matcher::{MatchOutcome, PowerUpBirth};
use crate::obstacles::{resolve_obstacles, ObstacleReport};
use crate::tile::Tile;
use crate::types::{Pos, RuneType, TileStatus};

/// Mark the destroy set, create power-ups and damage obstacles.
///
/// Destroyed tiles become `Matched` wilds awaiting gravity. A power-up anchor
/// keeps its kind, gets the new power-up and is marked `New`. Obstacle damage
/// is driven by the tiles actually cleared, anchors excluded. Returns the
/// obstacle report whose `score` is the step's bonus.
pub fn handle_matches<R: Rng + ?Sized>(
    board: &mut Board,
    matches: &[Tile],
    new_power_ups: &[PowerUpBirth],
    rng: &mut R,
) -> ObstacleReport {
    let is_birth = |pos: Pos| new_power_ups.iter().any(|b| b.pos == pos);
    let cleared: Vec<Pos> = matches
        .iter()
        .map(Tile::pos)
        .filter(|pos| !is_birth(*pos))
        .collect();

    for &pos in &cleared {
        let tile = board.tile_mut(pos);
        tile.status = TileStatus::Matched;
        tile.kind = RuneType::Wild;
    }

    for birth in new_power_ups {
        let tile = board.tile_mut(birth.pos);
        tile.status = TileStatus::New;
        tile.power_up = birth.kind;
    }

    resolve_obstacles(board, &cleared, rng)
}

/// [`handle_matches`] for a whole [`MatchOutcome`]
pub fn apply_outcome<R: Rng + ?Sized>(
    board: &mut Board,
    outcome: &MatchOutcome,
    rng: &mut R,
) -> ObstacleReport {
    handle_matches(board, &outcome.matches, &outcome.new_power_ups, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::rng::seeded;
    use crate::types::{Obstacle, PowerUp};

    #[test]
    fn test_anchor_survives_as_power_up() {
        let mut board = Board::from_pattern(&[
            "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWFFFFFW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
            "NWNWNWNW",
        ]);
        let mut rng = seeded(5);
        let outcome = find_matches(&board, &mut rng);
        let report = apply_outcome(&mut board, &outcome, &mut rng);
        assert_eq!(report.score, 0);

        let anchor = board.tile(Pos::new(3, 3));
        assert_eq!(anchor.power_up, PowerUp::ColorBomb);
        assert_eq!(anchor.kind, RuneType::Fire);
        assert_eq!(anchor.status, TileStatus::New);

        for col in [2, 4, 5, 6] {
            let tile = board.tile(Pos::new(3, col));
            assert_eq!(tile.status, TileStatus::Matched);
            assert_eq!(tile.kind, RuneType::Wild);
        }
    }

    #[test]
    fn test_chained_tile_freed_by_match() {
        let mut board = Board::from_pattern(&[
            "FFFNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
            "NWNWNWNW",
        ]);
        board.tile_mut(Pos::new(0, 1)).obstacle = Obstacle::Chains;
        board.tile_mut(Pos::new(0, 1)).obstacle_health = 1;
        let mut rng = seeded(5);
        let outcome = find_matches(&board, &mut rng);
        let report = apply_outcome(&mut board, &outcome, &mut rng);
        assert_eq!(report.overlays_cleared, vec![Pos::new(0, 1)]);
        assert_eq!(board.tile(Pos::new(0, 1)).obstacle, Obstacle::None);
    }
}
