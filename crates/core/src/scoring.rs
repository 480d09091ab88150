//! Scoring module - cascade gains, end-of-level bonus and star rating
//!
//! A cascade step that matched scores `match_score * MATCH_SCORE_FACTOR *
//! combo_factor(step)`, where the first step counts once and later steps
//! get an extra point of multiplier (1, 3, 4, 5, ...). Obstacle bonuses are
//! added on top, unmultiplied. Every total saturates at `u32::MAX` so a
//! level with a huge target never overflows.

use crate::types::{MATCH_SCORE_FACTOR, POINTS_PER_MOVE};

/// Multiplier for the `combo`-th matching step of a move (1-based)
pub fn combo_factor(combo: u32) -> u32 {
    if combo > 1 {
        combo + 1
    } else {
        combo
    }
}

/// Score gained by one matching cascade step
pub fn step_gain(match_score: u32, combo: u32) -> u32 {
    match_score
        .saturating_mul(MATCH_SCORE_FACTOR)
        .saturating_mul(combo_factor(combo))
}

/// Bonus for moves left over when a level is won
pub fn move_bonus(moves_left: u32) -> u32 {
    moves_left.saturating_mul(POINTS_PER_MOVE)
}

/// Score needed for 1, 2 and 3 stars
pub fn star_thresholds(target_score: u32) -> [u32; 3] {
    [
        target_score,
        scaled(target_score, 3, 2),
        scaled(target_score, 5, 2),
    ]
}

/// `value * num / den` computed wide, clamped to `u32::MAX`
fn scaled(value: u32, num: u64, den: u64) -> u32 {
    u32::try_from(u64::from(value) * num / den).unwrap_or(u32::MAX)
}

/// Stars for a won level: at least one, more at 1.5x and 2.5x the target
pub fn star_rating(final_score: u32, target_score: u32) -> u8 {
    let [_, two, three] = star_thresholds(target_score);
    if final_score >= three {
        3
    } else if final_score >= two {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_factor_skips_two() {
        assert_eq!(combo_factor(1), 1);
        assert_eq!(combo_factor(2), 3);
        assert_eq!(combo_factor(3), 4);
        assert_eq!(combo_factor(10), 11);
    }

    #[test]
    fn test_step_gain() {
        // Plain match-3 on the first step
        assert_eq!(step_gain(30, 1), 60);
        // Same match as the second link of a chain
        assert_eq!(step_gain(30, 2), 180);
        assert_eq!(step_gain(0, 5), 0);
    }

    #[test]
    fn test_move_bonus() {
        assert_eq!(move_bonus(0), 0);
        assert_eq!(move_bonus(4), 600);
    }

    #[test]
    fn test_star_rating() {
        assert_eq!(star_thresholds(1000), [1000, 1500, 2500]);
        assert_eq!(star_thresholds(333), [333, 499, 832]);
        assert_eq!(star_rating(1000, 1000), 1);
        assert_eq!(star_rating(1499, 1000), 1);
        assert_eq!(star_rating(1500, 1000), 2);
        assert_eq!(star_rating(2500, 1000), 3);
    }

    #[test]
    fn test_huge_values_saturate() {
        assert_eq!(move_bonus(u32::MAX), u32::MAX);
        assert_eq!(step_gain(u32::MAX / 2, 3), u32::MAX);
        assert_eq!(
            star_thresholds(1_000_000_000),
            [1_000_000_000, 1_500_000_000, 2_500_000_000]
        );
        assert_eq!(star_thresholds(u32::MAX), [u32::MAX; 3]);
        assert_eq!(star_rating(u32::MAX, u32::MAX), 3);
    }
}
