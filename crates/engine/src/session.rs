//! Game session - one level being played
//!
//! Owns the board, the seeded RNG, the score and the move budget. Every
//! player operation validates, mutates the board through the core, settles
//! the cascade, checks win/lose and reshuffles a dead board. Operations
//! return the [`SessionEvent`]s they produced; presentation and audio react
//! to those instead of being called from here.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::cascade::{Cascade, CascadeReport, PotionPolicy};
use crate::core::color_bomb::trigger_color_bomb;
use crate::core::matcher::{has_match, scan_runs};
use crate::core::rng::{random_color, seeded};
use crate::core::scoring::{move_bonus, star_rating};
use crate::core::{
    apply_gravity, create_board, find_move, has_possible_moves, shuffle_board, Board, Move,
};
use crate::level::LevelConfig;
use crate::swap::{plan_swap, SwapError, SwapPlan};
use crate::types::{
    Obstacle, Pos, PowerUp, RuneType, TileStatus, BOARD_SIZE, POTIONS_ON_BOARD,
};

/// Shuffles tried before giving up on a dead board
pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 32;

/// Random probes when seeding the starting potions
const POTION_SEED_ATTEMPTS: u32 = 100;

/// Rerolls of the starting board to remove ready-made matches
const INITIAL_SETTLE_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    pub won: bool,
    /// Final score, move bonus included on a win
    pub score: u32,
    /// 1 to 3 on a win, 0 on a loss
    pub stars: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Swapped { from: Pos, to: Pos },
    ColorBombFired { bomb: Pos, target: RuneType, cleared: u32, score: u32 },
    Matched { combo: u32, tiles: usize, gain: u32 },
    PowerUpCreated { pos: Pos, kind: PowerUp },
    PowerUpDetonated { pos: Pos, kind: PowerUp },
    StoneDamaged { pos: Pos },
    StoneBroken { pos: Pos },
    OverlayCleared { pos: Pos },
    PotionCollected { pos: Pos },
    CascadeTruncated,
    Reshuffled { auto: bool },
    BombPlaced { pos: Pos },
    MovesAdded { moves: u32 },
    LevelEnded(LevelResult),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Swapped { .. } => "swapped",
            SessionEvent::ColorBombFired { .. } => "color_bomb_fired",
            SessionEvent::Matched { .. } => "matched",
            SessionEvent::PowerUpCreated { .. } => "power_up_created",
            SessionEvent::PowerUpDetonated { .. } => "power_up_detonated",
            SessionEvent::StoneDamaged { .. } => "stone_damaged",
            SessionEvent::StoneBroken { .. } => "stone_broken",
            SessionEvent::OverlayCleared { .. } => "overlay_cleared",
            SessionEvent::PotionCollected { .. } => "potion_collected",
            SessionEvent::CascadeTruncated => "cascade_truncated",
            SessionEvent::Reshuffled { .. } => "reshuffled",
            SessionEvent::BombPlaced { .. } => "bomb_placed",
            SessionEvent::MovesAdded { .. } => "moves_added",
            SessionEvent::LevelEnded(_) => "level_ended",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    level: LevelConfig,
    seed: u64,
    rng: StdRng,
    board: Board,
    score: u32,
    moves_left: u32,
    moves_made: u32,
    potions_collected: u32,
    result: Option<LevelResult>,
}

impl GameSession {
    pub fn new(level: LevelConfig, seed: u64) -> Self {
        let mut rng = seeded(seed);
        let mut board = create_board(&level.layout, &mut rng);
        if level.objective.collects_potions() {
            seed_potions(&mut board, &mut rng);
        }
        clear_standing_matches(&mut board, &mut rng);

        let mut session = Self {
            moves_left: level.moves,
            level,
            seed,
            rng,
            board,
            score: 0,
            moves_made: 0,
            potions_collected: 0,
            result: None,
        };
        session.ensure_moves(&mut Vec::new());
        session
    }

    /// Start the same level over with a new seed
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(self.level.clone(), seed);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn potions_collected(&self) -> u32 {
        self.potions_collected
    }

    pub fn result(&self) -> Option<LevelResult> {
        self.result
    }

    pub fn is_playable(&self) -> bool {
        self.result.is_none() && self.moves_left > 0
    }

    fn ensure_playable(&self) -> Result<(), SwapError> {
        if self.is_playable() {
            Ok(())
        } else {
            Err(SwapError::NotPlayable)
        }
    }

    fn potion_policy(&self) -> PotionPolicy {
        if self.level.objective.collects_potions() {
            PotionPolicy::KeepStocked
        } else {
            PotionPolicy::Never
        }
    }

    /// Swap two adjacent tiles.
    ///
    /// A swap that creates no match is undone and costs no move
    /// ([`SwapError::NoMatch`]). A color bomb swapped into a colored rune
    /// always fires.
    pub fn swap(&mut self, from: Pos, to: Pos) -> Result<Vec<SessionEvent>, SwapError> {
        self.ensure_playable()?;
        let plan = plan_swap(&self.board, from, to)?;
        let mut events = Vec::new();

        match plan {
            SwapPlan::ColorBomb { target, .. } => {
                let color = self.board.tile(target).kind;
                self.board.swap(from, to);
                self.spend_move();
                events.push(SessionEvent::Swapped { from, to });

                // The bomb now sits where its target was
                let fired = trigger_color_bomb(&mut self.board, target, color);
                self.score = self.score.saturating_add(fired.score);
                debug!(
                    "color bomb at {:?} cleared {} {} tiles (+{})",
                    target,
                    fired.count,
                    color.as_str(),
                    fired.score
                );
                events.push(SessionEvent::ColorBombFired {
                    bomb: target,
                    target: color,
                    cleared: fired.count,
                    score: fired.score,
                });

                let spawn = self.potion_policy().should_spawn(&self.board);
                let gravity = apply_gravity(&mut self.board, spawn, &mut self.rng, |_| {});
                self.record_collected(&gravity.collected, &mut events);
                self.board.reset_status();
            }
            SwapPlan::Plain => {
                self.board.swap(from, to);
                if !has_match(&self.board) {
                    self.board.swap(from, to);
                    return Err(SwapError::NoMatch);
                }
                self.spend_move();
                events.push(SessionEvent::Swapped { from, to });
            }
        }

        self.settle(&mut events);
        self.finish_move(&mut events);
        Ok(events)
    }

    /// Shuffle booster: rearrange the free runes, then resolve any matches
    pub fn shuffle_booster(&mut self) -> Result<Vec<SessionEvent>, SwapError> {
        self.ensure_playable()?;
        let mut events = vec![SessionEvent::Reshuffled { auto: false }];
        shuffle_board(&mut self.board, &mut self.rng);
        self.settle(&mut events);
        self.finish_move(&mut events);
        Ok(events)
    }

    /// Bomb booster: turn a random plain rune into a color bomb
    pub fn bomb_booster(&mut self) -> Result<Vec<SessionEvent>, SwapError> {
        self.ensure_playable()?;
        let candidates = self.board.positions(|t| {
            !t.is_empty
                && t.obstacle == Obstacle::None
                && t.power_up == PowerUp::None
                && !t.is_matched()
                && !t.is_potion()
        });
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let pos = candidates[self.rng.random_range(0..candidates.len())];
        let tile = self.board.tile_mut(pos);
        tile.power_up = PowerUp::ColorBomb;
        tile.status = TileStatus::New;
        debug!("bomb booster placed at {pos:?}");
        Ok(vec![SessionEvent::BombPlaced { pos }])
    }

    pub fn add_moves(&mut self, moves: u32) -> Result<Vec<SessionEvent>, SwapError> {
        self.ensure_playable()?;
        self.moves_left = self.moves_left.saturating_add(moves);
        Ok(vec![SessionEvent::MovesAdded { moves }])
    }

    /// First legal matching swap, if the level is still running
    pub fn hint(&self) -> Option<Move> {
        if self.result.is_some() {
            return None;
        }
        find_move(&self.board)
    }

    fn spend_move(&mut self) {
        self.moves_left = self.moves_left.saturating_sub(1);
        self.moves_made += 1;
    }

    fn record_collected(&mut self, collected: &[Pos], events: &mut Vec<SessionEvent>) {
        self.potions_collected += collected.len() as u32;
        events.extend(
            collected
                .iter()
                .map(|&pos| SessionEvent::PotionCollected { pos }),
        );
    }

    fn settle(&mut self, events: &mut Vec<SessionEvent>) {
        let policy = self.potion_policy();
        let report = Cascade::new().run(&mut self.board, &mut self.rng, policy);
        self.apply_report(&report, events);
    }

    fn apply_report(&mut self, report: &CascadeReport, events: &mut Vec<SessionEvent>) {
        self.score = self.score.saturating_add(report.score);
        for step in &report.steps {
            if step.matched() {
                debug!(
                    "cascade step {} combo {} x{}: {} tiles, +{} (+{} obstacles)",
                    step.step,
                    step.combo,
                    step.combo_factor,
                    step.destroyed.len(),
                    step.gain,
                    step.obstacles.score
                );
                events.push(SessionEvent::Matched {
                    combo: step.combo,
                    tiles: step.destroyed.len(),
                    gain: step.gain,
                });
            }
            events.extend(step.births.iter().map(|b| SessionEvent::PowerUpCreated {
                pos: b.pos,
                kind: b.kind,
            }));
            events.extend(
                step.detonations
                    .iter()
                    .map(|&(pos, kind)| SessionEvent::PowerUpDetonated { pos, kind }),
            );
            for &pos in &step.obstacles.stones_hit {
                if step.obstacles.stones_broken.contains(&pos) {
                    events.push(SessionEvent::StoneBroken { pos });
                } else {
                    events.push(SessionEvent::StoneDamaged { pos });
                }
            }
            events.extend(
                step.obstacles
                    .overlays_cleared
                    .iter()
                    .map(|&pos| SessionEvent::OverlayCleared { pos }),
            );
            self.record_collected(&step.collected, events);
        }
        if report.truncated {
            warn!("cascade stopped at the step ceiling");
            events.push(SessionEvent::CascadeTruncated);
        }
    }

    fn finish_move(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(result) = self.check_result() {
            events.push(SessionEvent::LevelEnded(result));
        } else {
            self.ensure_moves(events);
        }
    }

    fn check_result(&mut self) -> Option<LevelResult> {
        let objective = self.level.objective;
        let result = if objective.is_met(self.score, self.potions_collected) {
            let score = self.score.saturating_add(move_bonus(self.moves_left));
            self.score = score;
            LevelResult {
                won: true,
                score,
                stars: star_rating(score, objective.target_score()),
            }
        } else if self.moves_left == 0 {
            LevelResult {
                won: false,
                score: self.score,
                stars: 0,
            }
        } else {
            return None;
        };

        info!(
            "level {:?} ended: won={} score={} stars={}",
            self.level.name, result.won, result.score, result.stars
        );
        self.result = Some(result);
        Some(result)
    }

    /// Reshuffle while the board has no legal move
    fn ensure_moves(&mut self, events: &mut Vec<SessionEvent>) {
        if has_possible_moves(&self.board) {
            return;
        }
        for attempt in 1..=MAX_RESHUFFLE_ATTEMPTS {
            shuffle_board(&mut self.board, &mut self.rng);
            if !has_match(&self.board) && has_possible_moves(&self.board) {
                debug!("no moves left, reshuffled after {attempt} attempt(s)");
                self.board.reset_status();
                events.push(SessionEvent::Reshuffled { auto: true });
                return;
            }
        }
        warn!("no playable arrangement after {MAX_RESHUFFLE_ATTEMPTS} reshuffles");
        self.board.reset_status();
        events.push(SessionEvent::Reshuffled { auto: true });
        self.settle(events);
        if !has_possible_moves(&self.board) {
            warn!("board left without a legal move after the fallback settle");
        }
    }
}

/// Put potions on random free runes of the top half until there are two
fn seed_potions<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let mut placed = board.potion_count();
    let mut attempts = 0;
    while placed < POTIONS_ON_BOARD && attempts < POTION_SEED_ATTEMPTS {
        let pos = Pos::new(
            rng.random_range(0..BOARD_SIZE / 2),
            rng.random_range(0..BOARD_SIZE),
        );
        let tile = board.tile_mut(pos);
        if !tile.is_empty && tile.obstacle == Obstacle::None && !tile.is_potion() {
            tile.kind = RuneType::Potion;
            placed += 1;
        }
        attempts += 1;
    }
}

/// Recolor run members until the starting board has no ready-made match
fn clear_standing_matches<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    for _ in 0..INITIAL_SETTLE_ATTEMPTS {
        let runs = scan_runs(board);
        if runs.is_empty() {
            return;
        }
        for pos in runs {
            board.tile_mut(pos).kind = random_color(rng);
        }
    }
}
