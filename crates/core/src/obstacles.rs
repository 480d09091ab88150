//! Obstacle resolution
//!
//! Stones take one point of damage from each cascade step that clears an
//! orthogonal neighbour; at zero health they turn into a random plain rune.
//! Ice and chains overlays are removed when the tile under them is cleared.

use rand::Rng;

use crate::board::Board;
use crate::rng::random_color;
use crate::traverse::{neighbors4, Visited};
use crate::types::{
    Obstacle, Pos, TileStatus, OVERLAY_BREAK_SCORE, STONE_BREAK_BONUS, STONE_HIT_SCORE,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObstacleReport {
    pub score: u32,
    pub stones_hit: Vec<Pos>,
    /// Stones that reached zero health this step (also listed in `stones_hit`)
    pub stones_broken: Vec<Pos>,
    pub overlays_cleared: Vec<Pos>,
}

/// Apply obstacle damage for the tiles cleared at `destroyed`.
///
/// A stone is damaged at most once per call, however many cleared tiles
/// touch it.
pub fn resolve_obstacles<R: Rng + ?Sized>(
    board: &mut Board,
    destroyed: &[Pos],
    rng: &mut R,
) -> ObstacleReport {
    let mut report = ObstacleReport::default();
    let mut damaged = Visited::default();

    for &pos in destroyed {
        for next in neighbors4(pos) {
            let stone = board.tile_mut(next);
            if !stone.is_stone() || stone.is_matched() || !damaged.insert(next) {
                continue;
            }
            stone.obstacle_health = stone.obstacle_health.saturating_sub(1);
            stone.status = TileStatus::New;
            report.score += STONE_HIT_SCORE;
            report.stones_hit.push(next);

            if stone.obstacle_health == 0 {
                stone.obstacle = Obstacle::None;
                stone.kind = random_color(rng);
                report.score += STONE_BREAK_BONUS;
                report.stones_broken.push(next);
            }
        }

        let tile = board.tile_mut(pos);
        if tile.obstacle.is_overlay() {
            tile.obstacle = Obstacle::None;
            tile.obstacle_health = 0;
            report.score += OVERLAY_BREAK_SCORE;
            report.overlays_cleared.push(pos);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::types::STONE_HEALTH;

    fn board() -> Board {
        Board::from_pattern(&[
            "WNWNWNWN", "NWSWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN", "NWNWNWNW", "WNWNWNWN",
            "NWNWNWNW",
        ])
    }

    #[test]
    fn test_stone_hit_once_per_step() {
        let mut board = board();
        let stone = Pos::new(1, 2);
        // Two cleared neighbours in the same step
        let report =
            resolve_obstacles(&mut board, &[Pos::new(0, 2), Pos::new(1, 1)], &mut seeded(1));
        assert_eq!(report.stones_hit, vec![stone]);
        assert_eq!(report.score, STONE_HIT_SCORE);
        assert_eq!(board.tile(stone).obstacle_health, STONE_HEALTH - 1);
        assert!(board.tile(stone).is_stone());
    }

    #[test]
    fn test_stone_breaks_on_second_step() {
        let mut board = board();
        let stone = Pos::new(1, 2);
        let id = board.tile(stone).id;
        resolve_obstacles(&mut board, &[Pos::new(0, 2)], &mut seeded(1));
        let report = resolve_obstacles(&mut board, &[Pos::new(2, 2)], &mut seeded(2));
        assert_eq!(report.stones_broken, vec![stone]);
        assert_eq!(report.score, STONE_HIT_SCORE + STONE_BREAK_BONUS);
        let tile = board.tile(stone);
        assert_eq!(tile.obstacle, Obstacle::None);
        assert!(tile.kind.is_color());
        assert_eq!(tile.id, id);

        // A third clear next to the broken stone does nothing
        let report = resolve_obstacles(&mut board, &[Pos::new(1, 3)], &mut seeded(3));
        assert_eq!(report, ObstacleReport::default());
    }

    #[test]
    fn test_overlay_cleared_under_destroyed_tile() {
        let mut board = board();
        let pos = Pos::new(5, 5);
        board.tile_mut(pos).obstacle = Obstacle::Ice;
        board.tile_mut(pos).obstacle_health = 1;
        let report = resolve_obstacles(&mut board, &[pos], &mut seeded(1));
        assert_eq!(report.overlays_cleared, vec![pos]);
        assert_eq!(report.score, OVERLAY_BREAK_SCORE);
        assert_eq!(board.tile(pos).obstacle, Obstacle::None);
    }
}
