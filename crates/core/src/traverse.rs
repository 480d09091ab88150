//! Breadth-first traversal over board positions
//!
//! Cluster grouping and explosion propagation are the same walk with a
//! different successor rule, so both go through [`breadth_first`].

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::types::{Pos, CELL_COUNT};

/// Per-cell visited flags
#[derive(Debug, Clone)]
pub struct Visited([bool; CELL_COUNT]);

impl Default for Visited {
    fn default() -> Self {
        Self([false; CELL_COUNT])
    }
}

impl Visited {
    /// Mark `pos`; returns `false` if it was already marked
    #[inline]
    pub fn insert(&mut self, pos: Pos) -> bool {
        !std::mem::replace(&mut self.0[pos.index()], true)
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.0[pos.index()]
    }
}

/// Orthogonal neighbours that lie on the board (up, down, left, right)
pub fn neighbors4(pos: Pos) -> ArrayVec<Pos, 4> {
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .filter_map(|(dr, dc)| pos.offset(dr, dc))
        .collect()
}

/// Visit every position reachable from `seeds`.
///
/// `successors` is called once per visited position, in FIFO order, and
/// returns the positions it reaches. Each position is visited at most once,
/// so the walk always terminates. Returns positions in visit order.
pub fn breadth_first<S, F>(seeds: impl IntoIterator<Item = Pos>, mut successors: F) -> Vec<Pos>
where
    S: IntoIterator<Item = Pos>,
    F: FnMut(Pos) -> S,
{
    let mut visited = Visited::default();
    let mut queue: VecDeque<Pos> = seeds
        .into_iter()
        .filter(|pos| visited.insert(*pos))
        .collect();
    let mut order = Vec::with_capacity(queue.len());

    while let Some(pos) = queue.pop_front() {
        order.push(pos);
        for next in successors(pos) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}

/// 4-connected component of `start` under the `accept(from, to)` edge rule
pub fn connected_component(start: Pos, mut accept: impl FnMut(Pos, Pos) -> bool) -> Vec<Pos> {
    breadth_first([start], |pos| {
        neighbors4(pos)
            .into_iter()
            .filter(|next| accept(pos, *next))
            .collect::<ArrayVec<Pos, 4>>()
    })
}
