//! Cascade driver
//!
//! One player move settles through repeated iterations of:
//! match detection, marking and obstacle damage (when something matched),
//! then gravity, which always runs so that pending potions get collected.
//! The loop continues while an iteration matched or collected, up to
//! `MAX_CASCADE_STEPS`. Each [`Cascade::step`] is atomic, so a caller that
//! paces animation between steps can stop at any point.

use rand::Rng;

use crate::core::matcher::{find_matches, has_match, PowerUpBirth};
use crate::core::scoring::{combo_factor, step_gain};
use crate::core::{apply_gravity, handle_matches, Board, ObstacleReport};
use crate::types::{Pos, PowerUp, BOARD_SIZE, MAX_CASCADE_STEPS, POTIONS_ON_BOARD};

/// Whether refills may create potions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PotionPolicy {
    #[default]
    Never,
    /// Top the board back up to `POTIONS_ON_BOARD` potions
    KeepStocked,
}

impl PotionPolicy {
    pub fn should_spawn(self, board: &Board) -> bool {
        match self {
            PotionPolicy::Never => false,
            PotionPolicy::KeepStocked => board.potion_count() < POTIONS_ON_BOARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeStep {
    /// 1-based iteration index
    pub step: u32,
    /// Matching-step counter driving the multiplier; 0 when nothing matched
    pub combo: u32,
    pub combo_factor: u32,
    /// Tiles removed, power-up anchors excluded
    pub destroyed: Vec<Pos>,
    pub births: Vec<PowerUpBirth>,
    pub detonations: Vec<(Pos, PowerUp)>,
    pub match_score: u32,
    /// `match_score` scaled by the combo multiplier
    pub gain: u32,
    pub obstacles: ObstacleReport,
    pub collected: Vec<Pos>,
}

impl CascadeStep {
    pub fn matched(&self) -> bool {
        self.combo > 0
    }

    /// Everything this step adds to the player's score
    pub fn total_score(&self) -> u32 {
        self.gain.saturating_add(self.obstacles.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeReport {
    pub steps: Vec<CascadeStep>,
    pub score: u32,
    pub collected: Vec<Pos>,
    /// Highest combo reached
    pub max_combo: u32,
    /// The iteration ceiling stopped a still-active cascade
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    combo: u32,
    steps: u32,
    settled: bool,
    truncated: bool,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            combo: 1,
            steps: 0,
            settled: false,
            truncated: false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps
    }

    /// Run one iteration. `None` once the board is quiet or the ceiling is hit.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
        potions: PotionPolicy,
    ) -> Option<CascadeStep> {
        if self.settled {
            return None;
        }
        if self.steps >= MAX_CASCADE_STEPS {
            self.truncated = has_pending_work(board);
            self.settled = true;
            return None;
        }
        self.steps += 1;

        let outcome = find_matches(board, rng);
        let matched = !outcome.is_empty();
        let mut step = CascadeStep {
            step: self.steps,
            ..CascadeStep::default()
        };

        if matched {
            step.combo = self.combo;
            step.combo_factor = combo_factor(self.combo);
            step.match_score = outcome.score;
            step.gain = step_gain(outcome.score, self.combo);
            step.destroyed = outcome.cleared().map(|t| t.pos()).collect();
            step.births = outcome.new_power_ups.clone();
            step.detonations = outcome.detonated.clone();
            step.obstacles =
                handle_matches(board, &outcome.matches, &outcome.new_power_ups, rng);
        }

        let spawn = potions.should_spawn(board);
        let gravity = apply_gravity(board, spawn, rng, |_| {});
        step.collected = gravity.collected;

        if matched || !step.collected.is_empty() {
            board.reset_status();
            if matched {
                self.combo += 1;
            }
            Some(step)
        } else {
            self.settled = true;
            None
        }
    }

    /// Drive to completion; statuses are reset to `Normal` at the end
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
        potions: PotionPolicy,
    ) -> CascadeReport {
        let mut report = CascadeReport::default();
        while let Some(step) = self.step(board, rng, potions) {
            report.score = report.score.saturating_add(step.total_score());
            report.max_combo = report.max_combo.max(step.combo);
            report.collected.extend_from_slice(&step.collected);
            report.steps.push(step);
        }
        board.reset_status();
        report.truncated = self.truncated;
        report
    }
}

/// A match is standing or a potion rests on a floor waiting to be collected
fn has_pending_work(board: &Board) -> bool {
    has_match(board)
        || board.positions(|t| t.is_potion()).into_iter().any(|pos| {
            pos.row + 1 == BOARD_SIZE || !board.tile(Pos::new(pos.row + 1, pos.col)).is_slot()
        })
}
