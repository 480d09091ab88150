//! Level definitions: move budget, objective and layout

use crate::core::scoring::star_thresholds;
use crate::core::Layout;

/// What a level asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Reach `target` points
    Score { target: u32 },
    /// Collect `target` potions; `target_score` only sets the star thresholds
    CollectPotions { target: u32, target_score: u32 },
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Score { .. } => "score",
            Objective::CollectPotions { .. } => "collect_potions",
        }
    }

    pub fn target(&self) -> u32 {
        match *self {
            Objective::Score { target } | Objective::CollectPotions { target, .. } => target,
        }
    }

    /// Score the star thresholds are derived from
    pub fn target_score(&self) -> u32 {
        match *self {
            Objective::Score { target } => target,
            Objective::CollectPotions { target_score, .. } => target_score,
        }
    }

    pub fn collects_potions(&self) -> bool {
        matches!(self, Objective::CollectPotions { .. })
    }

    pub fn is_met(&self, score: u32, potions_collected: u32) -> bool {
        match *self {
            Objective::Score { target } => score >= target,
            Objective::CollectPotions { target, .. } => potions_collected >= target,
        }
    }

    /// Scores for one, two and three stars
    pub fn star_thresholds(&self) -> [u32; 3] {
        star_thresholds(self.target_score())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub name: String,
    pub moves: u32,
    pub objective: Objective,
    pub layout: Layout,
}

impl Default for LevelConfig {
    /// Open 8x8 board, 20 moves, 3000 points
    fn default() -> Self {
        Self {
            name: "practice".to_string(),
            moves: 20,
            objective: Objective::Score { target: 3000 },
            layout: Layout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_met() {
        let score = Objective::Score { target: 1000 };
        assert!(!score.is_met(999, 10));
        assert!(score.is_met(1000, 0));

        let potions = Objective::CollectPotions { target: 3, target_score: 2000 };
        assert!(!potions.is_met(100_000, 2));
        assert!(potions.is_met(0, 3));
        assert_eq!(potions.target_score(), 2000);
        assert_eq!(potions.star_thresholds(), [2000, 3000, 5000]);
        assert!(potions.collects_potions());
        assert_eq!(potions.as_str(), "collect_potions");
    }
}
