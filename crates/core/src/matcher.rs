//! Match detection - run scan, cluster grouping, power-up classification
//!
//! # Algorithm
//!
//! 1. Scan every row, then every column, for maximal runs of at least
//!    [`MIN_RUN`] matchable tiles of one kind. Run members form the candidate
//!    set (row hits first in row-major order, then new column hits).
//! 2. Group candidates into 4-connected same-kind clusters, so an L, T or +
//!    made of a row run and a column run becomes one cluster.
//! 3. Classify each cluster by size and bounding box:
//!
//! | Cluster | Power-up |
//! |---------|----------|
//! | 6 or more, any shape | `Nova` |
//! | 5, not a line | `Nova` |
//! | 5, straight line | `ColorBomb` |
//! | 4, straight line | `Vertical` when wider than tall, else `Horizontal` |
//! | 3 | none |
//!
//! The power-up is anchored at the pivot: the first member (BFS order)
//! with the most same-cluster neighbours.
//!
//! 4. Feed the candidates to the explosion propagator for the destroy set
//!    and score. Each power-up birth adds a `POWER_UP_BONUS` creation bonus.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::board::Board;
use crate::explosion::propagate;
use crate::tile::Tile;
use crate::traverse::{connected_component, neighbors4, Visited};
use crate::types::{Pos, PowerUp, RuneType, BOARD_SIZE, MIN_RUN, POWER_UP_BONUS};

/// A power-up to be created at `pos` once the match resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerUpBirth {
    pub pos: Pos,
    pub kind: PowerUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub kind: RuneType,
    /// Members in BFS order from the first candidate found
    pub members: Vec<Pos>,
    pub width: usize,
    pub height: usize,
    pub pivot: Pos,
}

impl Cluster {
    fn from_members(kind: RuneType, members: Vec<Pos>) -> Self {
        let min_r = members.iter().map(|p| p.row).min().unwrap_or(0);
        let max_r = members.iter().map(|p| p.row).max().unwrap_or(0);
        let min_c = members.iter().map(|p| p.col).min().unwrap_or(0);
        let max_c = members.iter().map(|p| p.col).max().unwrap_or(0);

        let mut inside = Visited::default();
        for pos in &members {
            inside.insert(*pos);
        }
        let mut pivot = members[0];
        let mut best = 0;
        for pos in &members {
            let n = neighbors4(*pos)
                .into_iter()
                .filter(|p| inside.contains(*p))
                .count();
            if n > best {
                best = n;
                pivot = *pos;
            }
        }

        Self {
            kind,
            width: max_c - min_c + 1,
            height: max_r - min_r + 1,
            members,
            pivot,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// One cell thick in either direction
    pub fn is_line(&self) -> bool {
        self.width == 1 || self.height == 1
    }

    pub fn power_up(&self) -> PowerUp {
        classify(self.len(), self.width, self.height)
    }
}

/// Power-up earned by a cluster of `size` tiles with the given bounding box.
///
/// Four-runs cross over: a horizontal run yields a column-clearing `Vertical`,
/// a vertical run yields a row-clearing `Horizontal`.
pub fn classify(size: usize, width: usize, height: usize) -> PowerUp {
    let is_line = width == 1 || height == 1;
    if size >= 6 || (size == 5 && !is_line) {
        PowerUp::Nova
    } else if size == 5 {
        PowerUp::ColorBomb
    } else if size == 4 && is_line {
        if width > height {
            PowerUp::Vertical
        } else {
            PowerUp::Horizontal
        }
    } else {
        PowerUp::None
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchOutcome {
    /// Full destroy set, power-up anchors included
    pub matches: Vec<Tile>,
    pub score: u32,
    pub new_power_ups: Vec<PowerUpBirth>,
    pub clusters: Vec<Cluster>,
    pub detonated: Vec<(Pos, PowerUp)>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn is_birth(&self, pos: Pos) -> bool {
        self.new_power_ups.iter().any(|b| b.pos == pos)
    }

    /// Tiles that are actually removed: the destroy set minus power-up anchors
    pub fn cleared(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.matches.iter().filter(|t| !self.is_birth(t.pos()))
    }
}

fn scan_line(board: &Board, line: impl Iterator<Item = Pos>, emit: &mut impl FnMut(&[Pos])) {
    let mut run: ArrayVec<Pos, BOARD_SIZE> = ArrayVec::new();
    let mut run_kind = None;
    let mut flush = |run: &ArrayVec<Pos, BOARD_SIZE>| {
        if run.len() >= MIN_RUN {
            emit(run.as_slice());
        }
    };

    for pos in line {
        let tile = board.tile(pos);
        if !tile.is_matchable() {
            flush(&run);
            run.clear();
            run_kind = None;
        } else if run_kind == Some(tile.kind) {
            run.push(pos);
        } else {
            flush(&run);
            run.clear();
            run.push(pos);
            run_kind = Some(tile.kind);
        }
    }
    flush(&run);
}

fn for_each_run(board: &Board, mut emit: impl FnMut(&[Pos])) {
    for row in 0..BOARD_SIZE {
        scan_line(board, (0..BOARD_SIZE).map(|col| Pos::new(row, col)), &mut emit);
    }
    for col in 0..BOARD_SIZE {
        scan_line(board, (0..BOARD_SIZE).map(|row| Pos::new(row, col)), &mut emit);
    }
}

/// Candidate set: every tile in a run of three or more, without duplicates
pub fn scan_runs(board: &Board) -> Vec<Pos> {
    let mut seen = Visited::default();
    let mut candidates = Vec::new();
    for_each_run(board, |run| {
        candidates.extend(run.iter().copied().filter(|p| seen.insert(*p)));
    });
    candidates
}

/// Whether any run of three exists
pub fn has_match(board: &Board) -> bool {
    let mut found = false;
    for_each_run(board, |_| found = true);
    found
}

/// Group candidates into same-kind 4-connected clusters
pub fn find_clusters(board: &Board, candidates: &[Pos]) -> Vec<Cluster> {
    let mut in_set = Visited::default();
    for pos in candidates {
        in_set.insert(*pos);
    }

    let mut grouped = Visited::default();
    let mut clusters = Vec::new();
    for &start in candidates {
        if grouped.contains(start) {
            continue;
        }
        let kind = board.tile(start).kind;
        let members = connected_component(start, |_, to| {
            in_set.contains(to) && board.tile(to).kind == kind
        });
        for pos in &members {
            grouped.insert(*pos);
        }
        clusters.push(Cluster::from_members(kind, members));
    }
    clusters
}

/// Detect matches on `board` without mutating it
pub fn find_matches<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> MatchOutcome {
    let candidates = scan_runs(board);
    if candidates.is_empty() {
        return MatchOutcome::default();
    }

    let clusters = find_clusters(board, &candidates);
    let new_power_ups: Vec<PowerUpBirth> = clusters
        .iter()
        .filter_map(|c| {
            let kind = c.power_up();
            kind.is_some().then_some(PowerUpBirth { pos: c.pivot, kind })
        })
        .collect();

    let blast = propagate(board, &candidates, rng);
    let score = blast.score + POWER_UP_BONUS * new_power_ups.len() as u32;

    MatchOutcome {
        matches: blast.tiles,
        score,
        new_power_ups,
        clusters,
        detonated: blast.detonated,
    }
}
