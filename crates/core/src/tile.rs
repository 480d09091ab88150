//! Tile module - one cell's worth of state
//!
//! Every board cell always holds a `Tile`. Holes are tiles with `is_empty`
//! set, stones are tiles whose obstacle is `Stone`; nothing is ever `None`.

use crate::types::{
    Obstacle, Pos, PowerUp, RuneType, TileStatus, OVERLAY_HEALTH, STONE_HEALTH,
};

/// Identity of a tile instance, stable across moves and swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub kind: RuneType,
    pub status: TileStatus,
    pub power_up: PowerUp,
    pub obstacle: Obstacle,
    pub obstacle_health: u8,
    /// Permanent hole in an irregular layout
    pub is_empty: bool,
    pub row: usize,
    pub col: usize,
}

impl Tile {
    /// A plain rune of the given kind. Id and coordinates are assigned by the board.
    pub fn rune(kind: RuneType) -> Self {
        Self {
            id: TileId(0),
            kind,
            status: TileStatus::Normal,
            power_up: PowerUp::None,
            obstacle: Obstacle::None,
            obstacle_health: 0,
            is_empty: false,
            row: 0,
            col: 0,
        }
    }

    pub fn potion() -> Self {
        Self::rune(RuneType::Potion)
    }

    /// Stones carry no meaningful color; `Void` is a placeholder.
    pub fn stone() -> Self {
        Self {
            obstacle: Obstacle::Stone,
            obstacle_health: STONE_HEALTH,
            ..Self::rune(RuneType::Void)
        }
    }

    pub fn hole() -> Self {
        Self {
            is_empty: true,
            ..Self::rune(RuneType::Void)
        }
    }

    /// Put an ice or chains overlay on this tile
    pub fn with_overlay(mut self, overlay: Obstacle) -> Self {
        debug_assert!(overlay.is_overlay());
        self.obstacle = overlay;
        self.obstacle_health = OVERLAY_HEALTH;
        self
    }

    pub fn with_power_up(mut self, power_up: PowerUp) -> Self {
        self.power_up = power_up;
        self
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    #[inline]
    pub fn is_stone(&self) -> bool {
        self.obstacle == Obstacle::Stone
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.status == TileStatus::Matched
    }

    #[inline]
    pub fn is_potion(&self) -> bool {
        self.kind == RuneType::Potion
    }

    /// Eligible for the row/column run scan.
    ///
    /// Ice and chains overlays do not prevent color matching.
    pub fn is_matchable(&self) -> bool {
        !self.is_empty && !self.is_stone() && !self.is_matched() && self.kind.is_color()
    }

    /// Can be reached by a line, nova or color blast
    pub fn is_blast_target(&self) -> bool {
        !self.is_empty && !self.is_stone() && !self.is_matched() && !self.is_potion()
    }

    /// Cannot take part in a swap from either side
    pub fn blocks_swap(&self) -> bool {
        self.is_empty || self.is_stone() || self.obstacle == Obstacle::Chains
    }

    /// Part of the falling column: not a hole, not a stone
    pub fn is_slot(&self) -> bool {
        !self.is_empty && !self.is_stone()
    }

    /// Plain colored rune without obstacle or power-up
    pub fn is_plain(&self) -> bool {
        self.is_slot()
            && self.obstacle == Obstacle::None
            && self.power_up == PowerUp::None
            && self.kind.is_color()
            && !self.is_matched()
    }

    /// Single-character code used by patterns and text dumps
    pub fn code(&self) -> char {
        if self.is_empty {
            '.'
        } else if self.is_stone() {
            'S'
        } else {
            self.kind.code()
        }
    }
}
